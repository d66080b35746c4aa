use std::collections::BTreeMap;
use std::sync::Arc;

use mail_pipeline_core::{run_series, PipelineError, StepSlot};
use serde_json::Value;
use tracing::{info_span, Instrument};

use crate::adapters::completion::Completion;
use crate::adapters::logger::{LogRecord, Logger};
use crate::adapters::notifier::Notifier;
use crate::adapters::object_store::ObjectStore;
use crate::bundle::{DataBundle, InvocationContext};
use crate::error::HandlerError;
use crate::settings::PipelineSettings;
use crate::steps::default_steps;

/// Collaborators used when the caller does not override them.
#[derive(Clone)]
pub struct Collaborators {
    pub log: Arc<dyn Logger>,
    pub ses: Arc<dyn Notifier>,
    pub s3: Arc<dyn ObjectStore>,
}

/// Per-invocation replacements for the step list and collaborators.
#[derive(Default)]
pub struct Overrides {
    pub steps: Option<Vec<StepSlot<DataBundle>>>,
    pub log: Option<Arc<dyn Logger>>,
    pub ses: Option<Arc<dyn Notifier>>,
    pub s3: Option<Arc<dyn ObjectStore>>,
}

/// Runs the step pipeline for one inbound mail event and reports the outcome
/// through `callback`: `Ok(())` on success, `HandlerError::StepReturnedError`
/// on any pipeline failure. The underlying failure is only logged.
pub async fn handle_inbound_event(
    event: Value,
    context: InvocationContext,
    callback: Arc<dyn Completion>,
    overrides: Option<Overrides>,
    defaults: Collaborators,
    settings: PipelineSettings,
) {
    let overrides = overrides.unwrap_or_default();
    let log = overrides.log.unwrap_or(defaults.log);
    let steps = overrides.steps.unwrap_or_else(default_steps);

    let bundle = DataBundle {
        event,
        callback: Arc::clone(&callback),
        context,
        settings,
        items: Vec::new(),
        config: BTreeMap::new(),
        response: String::new(),
        log: Arc::clone(&log),
        ses: overrides.ses.unwrap_or(defaults.ses),
        s3: overrides.s3.unwrap_or(defaults.s3),
    };

    let span = info_span!(
        "inbound_mail",
        request_id = %bundle.context.request_id,
        message_id = bundle.message_id().unwrap_or("-")
    );

    match run_series(steps, bundle).instrument(span).await {
        Ok(_) => {
            log.log(LogRecord::info("Process finished successfully."));
            callback.complete(Ok(()));
        }
        Err(error) => {
            log.log(step_failure_record(&error));
            callback.complete(Err(HandlerError::StepReturnedError));
        }
    }
}

fn step_failure_record(error: &PipelineError) -> LogRecord {
    let (message, stack) = match error.step_error() {
        Some(source) => (source.to_string(), format!("{source:?}")),
        None => (error.to_string(), format!("{error:?}")),
    };
    LogRecord::error(format!("Step returned error: {message}"))
        .with_error(error)
        .with_stack(stack)
}
