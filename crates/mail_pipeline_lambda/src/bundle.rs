//! The per-invocation record threaded through every step.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::adapters::completion::Completion;
use crate::adapters::logger::Logger;
use crate::adapters::notifier::Notifier;
use crate::adapters::object_store::ObjectStore;
use crate::settings::PipelineSettings;

/// Runtime facts about the current invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvocationContext {
    pub request_id: String,
    pub invoked_function_arn: String,
    pub deadline_ms: u64,
    pub received_at: String,
}

/// Created once per invocation and moved from step to step. Steps add or
/// overwrite fields; nothing is removed.
pub struct DataBundle {
    pub event: Value,
    pub callback: Arc<dyn Completion>,
    pub context: InvocationContext,
    pub settings: PipelineSettings,
    pub items: Vec<String>,
    pub config: BTreeMap<String, Value>,
    pub response: String,
    pub log: Arc<dyn Logger>,
    pub ses: Arc<dyn Notifier>,
    pub s3: Arc<dyn ObjectStore>,
}

impl DataBundle {
    /// SES message id of the first receipt record, when the event has one.
    pub fn message_id(&self) -> Option<&str> {
        self.event["Records"][0]["ses"]["mail"]["messageId"].as_str()
    }

    /// Pretty, fully expanded rendering for diagnostics. Collaborators show
    /// up as placeholders.
    pub fn render(&self) -> String {
        let snapshot = json!({
            "event": self.event,
            "callback": "[Completion]",
            "context": self.context,
            "settings": self.settings,
            "items": self.items,
            "config": self.config,
            "response": self.response,
            "log": "[Logger]",
            "ses": "[Notifier]",
            "s3": "[ObjectStore]",
        });
        format!("{snapshot:#}")
    }
}

impl fmt::Debug for DataBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataBundle")
            .field("event", &self.event)
            .field("context", &self.context)
            .field("settings", &self.settings)
            .field("items", &self.items)
            .field("config", &self.config)
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}
