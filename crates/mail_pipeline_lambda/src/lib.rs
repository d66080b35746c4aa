//! AWS-oriented handler for inbound SES mail notifications.
//!
//! This crate owns the per-invocation data bundle, the collaborator seams
//! (object store, notifier, logger, completion), the processing steps and the
//! handler entry point. Sequencing itself lives in `mail_pipeline_core`; the
//! AWS SDK clients are only wired up in the Lambda binary.

pub mod adapters;
pub mod bundle;
pub mod error;
pub mod handlers;
pub mod settings;
pub mod steps;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
