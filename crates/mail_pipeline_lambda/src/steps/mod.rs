//! The processing steps run against each inbound mail event.

use mail_pipeline_core::{StepRegistry, StepSlot};

use crate::bundle::DataBundle;

pub mod fetch_config;
pub mod report;
pub mod seed_items;

pub use fetch_config::FetchConfig;
pub use report::Report;
pub use seed_items::SeedItems;

pub const DEFAULT_STEP_NAMES: [&str; 3] = [SeedItems::NAME, FetchConfig::NAME, Report::NAME];

pub fn default_registry() -> StepRegistry<DataBundle> {
    let mut registry = StepRegistry::new();
    registry.register(SeedItems).register(FetchConfig).register(Report);
    registry
}

pub fn default_steps() -> Vec<StepSlot<DataBundle>> {
    default_registry().resolve(DEFAULT_STEP_NAMES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_steps_are_resolved_in_order() {
        let steps = default_steps();

        assert!(steps.iter().all(StepSlot::is_resolved));
        assert_eq!(
            steps.iter().map(StepSlot::label).collect::<Vec<_>>(),
            vec!["seed_items", "fetch_config", "report"]
        );
    }
}
