//! Sequential step pipeline primitives.
//!
//! This crate owns ordered, fail-fast step execution over a value threaded
//! from one step to the next. It intentionally excludes AWS SDK and Lambda
//! runtime concerns; those live in `mail_pipeline_lambda`.

pub mod error;
pub mod pipeline;
pub mod registry;
pub mod step;

pub use error::PipelineError;
pub use pipeline::{run_series, Pipeline};
pub use registry::StepRegistry;
pub use step::{step_fn, FnStep, Step, StepFuture, StepSlot};
