//! Ordered, fail-fast execution of steps over a threaded value.

use std::sync::Arc;

use tracing::{event, info_span, instrument, Instrument, Level};

use crate::error::PipelineError;
use crate::step::{Step, StepSlot};

/// A validated, ordered list of steps.
///
/// Construction rejects any unresolved slot, so a built pipeline always runs
/// every step it holds unless one of them fails.
pub struct Pipeline<T: Send + 'static> {
    steps: Vec<Arc<dyn Step<T>>>,
}

impl<T: Send + 'static> Pipeline<T> {
    pub fn new(slots: impl IntoIterator<Item = StepSlot<T>>) -> Result<Self, PipelineError> {
        let mut steps = Vec::new();
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                StepSlot::Resolved(step) => steps.push(step),
                StepSlot::Unresolved(step) => {
                    event!(Level::ERROR, step_index = index, step = %step, "Step is not runnable.");
                    return Err(PipelineError::InvalidStep { index, step });
                }
            }
        }
        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Runs every step in order, feeding each one the value resolved by the
    /// step before it. The first failure stops the run and is returned with
    /// the step's own error attached as the source.
    #[instrument(
        name = "Pipeline::run",
        skip_all,
        fields(num_steps = self.steps.len()),
        err(Display)
    )]
    pub async fn run(&self, initial: T) -> Result<T, PipelineError> {
        event!(Level::DEBUG, "Pipeline execution starting.");

        let mut value = initial;
        for (index, step) in self.steps.iter().enumerate() {
            let step_span = info_span!("pipeline_step", step_name = step.name(), step_index = index);
            value = match step.run(value).instrument(step_span).await {
                Ok(next) => next,
                Err(source) => {
                    event!(
                        Level::ERROR,
                        step_name = step.name(),
                        step_index = index,
                        error = %source,
                        "Step failed."
                    );
                    return Err(PipelineError::StepFailed {
                        index,
                        step: step.name().to_string(),
                        source,
                    });
                }
            };
        }

        event!(Level::DEBUG, "Pipeline execution completed successfully.");
        Ok(value)
    }
}

/// Validates `slots` and runs them against `initial`.
///
/// An unresolved slot anywhere in the list fails the call before any step
/// runs.
pub async fn run_series<T: Send + 'static>(
    slots: impl IntoIterator<Item = StepSlot<T>>,
    initial: T,
) -> Result<T, PipelineError> {
    Pipeline::new(slots)?.run(initial).await
}
