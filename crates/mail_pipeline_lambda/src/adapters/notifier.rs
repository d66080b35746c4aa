use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body_text: String,
}

/// Outbound mail capability. None of the default steps send mail; custom
/// step lists reach it through the data bundle.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns the provider's message id.
    async fn send_email(&self, email: &OutboundEmail) -> Result<String, String>;
}
