//! A single stage of a pipeline and the slots a caller lists them in.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

/// One stage of a pipeline.
///
/// A step takes ownership of the value produced by the previous step and
/// resolves with its successor. Steps hold no per-invocation state.
#[async_trait]
pub trait Step<T: Send + 'static>: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, value: T) -> anyhow::Result<T>;
}

pub type StepFuture<T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send>>;

/// A step backed by a closure returning a future.
pub struct FnStep<T> {
    name: String,
    run_fn: Box<dyn Fn(T) -> StepFuture<T> + Send + Sync>,
}

pub fn step_fn<T, F, Fut>(name: impl Into<String>, f: F) -> FnStep<T>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    FnStep {
        name: name.into(),
        run_fn: Box::new(move |value| Box::pin(f(value))),
    }
}

#[async_trait]
impl<T: Send + 'static> Step<T> for FnStep<T> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, value: T) -> anyhow::Result<T> {
        (self.run_fn)(value).await
    }
}

impl<T> fmt::Debug for FnStep<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStep").field("name", &self.name).finish()
    }
}

/// An entry of a caller-supplied step list.
///
/// `Unresolved` carries a reference that did not name anything runnable; a
/// pipeline refuses to start while such an entry is present.
pub enum StepSlot<T: Send + 'static> {
    Resolved(Arc<dyn Step<T>>),
    Unresolved(String),
}

impl<T: Send + 'static> StepSlot<T> {
    pub fn resolved(step: impl Step<T> + 'static) -> Self {
        Self::Resolved(Arc::new(step))
    }

    pub fn unresolved(reference: impl Into<String>) -> Self {
        Self::Unresolved(reference.into())
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Resolved(step) => step.name(),
            Self::Unresolved(reference) => reference,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl<T: Send + 'static> Clone for StepSlot<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Resolved(step) => Self::Resolved(Arc::clone(step)),
            Self::Unresolved(reference) => Self::Unresolved(reference.clone()),
        }
    }
}

impl<T: Send + 'static> From<Arc<dyn Step<T>>> for StepSlot<T> {
    fn from(step: Arc<dyn Step<T>>) -> Self {
        Self::Resolved(step)
    }
}

impl<T: Send + 'static> fmt::Debug for StepSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(step) => f.debug_tuple("Resolved").field(&step.name()).finish(),
            Self::Unresolved(reference) => f.debug_tuple("Unresolved").field(reference).finish(),
        }
    }
}
