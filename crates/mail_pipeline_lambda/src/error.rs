use thiserror::Error;

/// The only failure the handler reports to its caller. Step details are
/// logged, never forwarded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HandlerError {
    #[error("Error: Step returned error.")]
    StepReturnedError,
}
