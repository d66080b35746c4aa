//! In-memory collaborators for exercising steps and the handler without AWS.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::adapters::completion::{CapturedCompletion, Completion};
use crate::adapters::logger::{LogLevel, LogRecord, Logger};
use crate::adapters::notifier::{Notifier, OutboundEmail};
use crate::adapters::object_store::ObjectStore;
use crate::bundle::{DataBundle, InvocationContext};
use crate::handlers::inbound::Collaborators;
use crate::settings::PipelineSettings;

/// Serves seeded objects; any other key fails like a missing S3 object.
#[derive(Debug, Default)]
pub struct StubObjectStore {
    objects: HashMap<(String, String), Vec<u8>>,
    slow_keys: HashMap<String, usize>,
    requests: Mutex<Vec<String>>,
}

impl StubObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) -> Self {
        self.objects
            .insert((bucket.to_string(), key.to_string()), body.into());
        self
    }

    /// Makes retrieval of `key` yield to the scheduler `yields` times before
    /// answering.
    pub fn with_slow_key(mut self, key: &str, yields: usize) -> Self {
        self.slow_keys.insert(key.to_string(), yields);
        self
    }

    pub fn requested_keys(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ObjectStore for StubObjectStore {
    async fn retrieve(&self, bucket: &str, key: &str) -> Result<Vec<u8>, String> {
        self.requests.lock().push(key.to_string());
        for _ in 0..self.slow_keys.get(key).copied().unwrap_or(0) {
            tokio::task::yield_now().await;
        }
        self.objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| format!("NoSuchKey: s3://{bucket}/{key}"))
    }
}

#[derive(Debug, Default)]
pub struct RecordingLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingLogger {
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter(|record| record.level == level)
            .map(|record| record.message.clone())
            .collect()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, record: LogRecord) {
        self.records.lock().push(record);
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_email(&self, email: &OutboundEmail) -> Result<String, String> {
        let mut sent = self.sent.lock();
        sent.push(email.clone());
        Ok(format!("stub-message-{}", sent.len()))
    }
}

/// Concrete handles to the stand-ins, kept so tests can inspect them after
/// handing type-erased clones to the code under test.
pub struct TestCollaborators {
    pub store: Arc<StubObjectStore>,
    pub logger: Arc<RecordingLogger>,
    pub notifier: Arc<RecordingNotifier>,
    pub completion: Arc<CapturedCompletion>,
}

impl TestCollaborators {
    pub fn new(store: StubObjectStore) -> Self {
        Self {
            store: Arc::new(store),
            logger: Arc::new(RecordingLogger::default()),
            notifier: Arc::new(RecordingNotifier::default()),
            completion: Arc::new(CapturedCompletion::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            log: self.logger.clone(),
            ses: self.notifier.clone(),
            s3: self.store.clone(),
        }
    }

    pub fn callback(&self) -> Arc<dyn Completion> {
        self.completion.clone()
    }

    pub fn bundle(&self, event: Value) -> DataBundle {
        DataBundle {
            event,
            callback: self.callback(),
            context: sample_context(),
            settings: PipelineSettings::default(),
            items: Vec::new(),
            config: BTreeMap::new(),
            response: String::new(),
            log: self.logger.clone(),
            ses: self.notifier.clone(),
            s3: self.store.clone(),
        }
    }
}

pub fn sample_context() -> InvocationContext {
    InvocationContext {
        request_id: "req-0001".to_string(),
        invoked_function_arn: "arn:aws:lambda:eu-west-1:000000000000:function:inbound-mail"
            .to_string(),
        deadline_ms: 1_760_000_000_000,
        received_at: "2026-10-19T08:00:00+00:00".to_string(),
    }
}

/// A trimmed SES receipt notification.
pub fn sample_ses_event() -> Value {
    serde_json::json!({
        "Records": [{
            "eventSource": "aws:ses",
            "eventVersion": "1.0",
            "ses": {
                "mail": {
                    "messageId": "o3vrnil0e2ic28trm7dfhrc2v0clambda4nbp0g1",
                    "source": "sender@example.com",
                    "destination": ["inbox@example.com"]
                },
                "receipt": {"action": {"type": "Lambda"}}
            }
        }]
    })
}
