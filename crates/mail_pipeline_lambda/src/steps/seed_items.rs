use async_trait::async_trait;
use mail_pipeline_core::Step;

use crate::bundle::DataBundle;

pub const SEED_ITEMS: [&str; 3] = ["foobar", "blubb", "pfiffikus"];

/// Fills `items` with the fixed list of configuration names.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeedItems;

impl SeedItems {
    pub const NAME: &'static str = "seed_items";
}

#[async_trait]
impl Step<DataBundle> for SeedItems {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self, mut bundle: DataBundle) -> anyhow::Result<DataBundle> {
        bundle.items = SEED_ITEMS.iter().map(|item| item.to_string()).collect();
        Ok(bundle)
    }
}
