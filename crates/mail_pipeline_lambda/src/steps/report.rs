use async_trait::async_trait;
use mail_pipeline_core::Step;

use crate::adapters::logger::LogRecord;
use crate::bundle::DataBundle;

/// Logs a full rendering of the bundle. Leaves the bundle untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct Report;

impl Report {
    pub const NAME: &'static str = "report";
}

#[async_trait]
impl Step<DataBundle> for Report {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self, bundle: DataBundle) -> anyhow::Result<DataBundle> {
        bundle.log.log(LogRecord::info(bundle.render()));
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::adapters::logger::LogLevel;
    use crate::test_helpers::{sample_ses_event, StubObjectStore, TestCollaborators};

    #[tokio::test]
    async fn logs_nested_bundle_contents_without_changing_them() {
        let collaborators = TestCollaborators::new(StubObjectStore::new());
        let mut bundle = collaborators.bundle(sample_ses_event());
        bundle.items = vec!["foobar".to_string()];
        bundle
            .config
            .insert("foobar".to_string(), json!({"rules": {"forward": ["a@example.com"]}}));

        let bundle = Report.run(bundle).await.expect("report never fails");

        let messages = collaborators.logger.messages(LogLevel::Info);
        assert_eq!(messages.len(), 1);
        let rendered: Value = serde_json::from_str(&messages[0]).expect("rendering is json");
        assert_eq!(rendered["config"]["foobar"]["rules"]["forward"][0], json!("a@example.com"));
        assert_eq!(rendered["context"]["request_id"], json!("req-0001"));
        assert_eq!(rendered["s3"], json!("[ObjectStore]"));
        assert_eq!(
            rendered["event"]["Records"][0]["ses"]["mail"]["source"],
            json!("sender@example.com")
        );
        assert_eq!(bundle.items, vec!["foobar"]);
        assert_eq!(bundle.config.len(), 1);
        assert!(bundle.response.is_empty());
    }
}
