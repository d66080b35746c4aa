use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid step at position {index}: {step}")]
    InvalidStep { index: usize, step: String },

    #[error("step '{step}' failed: {source}")]
    StepFailed {
        index: usize,
        step: String,
        #[source]
        source: anyhow::Error,
    },
}

impl PipelineError {
    /// The error returned by the failing step, untouched.
    pub fn step_error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::StepFailed { source, .. } => Some(source),
            Self::InvalidStep { .. } => None,
        }
    }

    pub fn step_name(&self) -> &str {
        match self {
            Self::InvalidStep { step, .. } | Self::StepFailed { step, .. } => step,
        }
    }
}
