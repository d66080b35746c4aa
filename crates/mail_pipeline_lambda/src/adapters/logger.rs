use std::fmt::Display;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl LogRecord {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            message: message.into(),
            error: None,
            stack: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Error,
            message: message.into(),
            error: None,
            stack: None,
        }
    }

    pub fn with_error(mut self, error: impl Display) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

pub trait Logger: Send + Sync {
    fn log(&self, record: LogRecord);
}

impl<F> Logger for F
where
    F: Fn(LogRecord) + Send + Sync,
{
    fn log(&self, record: LogRecord) {
        self(record)
    }
}

/// Forwards records to `tracing`; the subscriber installed by the binary
/// decides the output format.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, record: LogRecord) {
        match record.level {
            LogLevel::Info => tracing::info!(component = "inbound_mail", "{}", record.message),
            LogLevel::Error => tracing::error!(
                component = "inbound_mail",
                error = record.error.as_deref(),
                stack = record.stack.as_deref(),
                "{}",
                record.message
            ),
        }
    }
}
