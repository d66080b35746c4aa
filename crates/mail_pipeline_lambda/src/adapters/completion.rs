use parking_lot::Mutex;

use crate::error::HandlerError;

/// Receives an invocation's outcome. The handler reports exactly once, but
/// steps hold the same callback through the bundle and may report earlier.
pub trait Completion: Send + Sync {
    fn complete(&self, outcome: Result<(), HandlerError>);
}

impl<F> Completion for F
where
    F: Fn(Result<(), HandlerError>) + Send + Sync,
{
    fn complete(&self, outcome: Result<(), HandlerError>) {
        self(outcome)
    }
}

/// Holds the first reported outcome until the caller collects it. Later
/// reports are ignored.
#[derive(Debug, Default)]
pub struct CapturedCompletion {
    outcome: Mutex<Option<Result<(), HandlerError>>>,
}

impl CapturedCompletion {
    pub fn take(&self) -> Option<Result<(), HandlerError>> {
        self.outcome.lock().take()
    }
}

impl Completion for CapturedCompletion {
    fn complete(&self, outcome: Result<(), HandlerError>) {
        let mut slot = self.outcome.lock();
        if slot.is_none() {
            *slot = Some(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captured_outcome_is_taken_once() {
        let completion = CapturedCompletion::default();
        completion.complete(Err(HandlerError::StepReturnedError));

        assert_eq!(completion.take(), Some(Err(HandlerError::StepReturnedError)));
        assert_eq!(completion.take(), None);
    }

    #[test]
    fn first_reported_outcome_is_kept() {
        let completion = CapturedCompletion::default();
        completion.complete(Ok(()));
        completion.complete(Err(HandlerError::StepReturnedError));

        assert_eq!(completion.take(), Some(Ok(())));
    }
}
