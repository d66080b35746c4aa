use anyhow::Context;
use async_trait::async_trait;
use futures_util::future::join_all;
use mail_pipeline_core::Step;
use serde_json::Value;
use tracing::debug;

use crate::adapters::logger::LogRecord;
use crate::bundle::DataBundle;

/// Reads one JSON configuration object per item from the object store.
///
/// All retrievals are issued together and joined before the step resolves.
/// A failed retrieval or parse is logged and leaves that item out of
/// `config`; it never fails the step.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchConfig;

impl FetchConfig {
    pub const NAME: &'static str = "fetch_config";
}

#[async_trait]
impl Step<DataBundle> for FetchConfig {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self, mut bundle: DataBundle) -> anyhow::Result<DataBundle> {
        let fetched = join_all(
            bundle
                .items
                .iter()
                .map(|item| fetch_item_config(&bundle, item)),
        )
        .await;

        // Item order; a later duplicate overwrites an earlier one.
        bundle.config.extend(fetched.into_iter().flatten());
        Ok(bundle)
    }
}

async fn fetch_item_config(bundle: &DataBundle, item: &str) -> Option<(String, Value)> {
    bundle
        .log
        .log(LogRecord::info(format!("Read config for: {item}")));

    let key = bundle.settings.object_key(item);
    let body = match bundle.s3.retrieve(&bundle.settings.bucket, &key).await {
        Ok(body) => body,
        Err(error) => {
            bundle.log.log(
                LogRecord::error(format!("Failed to read config for: {item}")).with_error(error),
            );
            return None;
        }
    };
    bundle.log.log(LogRecord::info("Success"));

    match parse_config(&body) {
        Ok(config) if is_truthy(&config) => Some((item.to_string(), config)),
        Ok(_) => {
            debug!(item, key = %key, "Config object is empty, skipping.");
            None
        }
        Err(error) => {
            bundle.log.log(
                LogRecord::error(format!("Failed to parse config for: {item}"))
                    .with_error(format!("{error:#}"))
                    .with_stack(format!("{error:?}")),
            );
            None
        }
    }
}

fn parse_config(body: &[u8]) -> anyhow::Result<Value> {
    let text = std::str::from_utf8(body).context("config object is not valid UTF-8")?;
    serde_json::from_str(text).context("config object is not valid JSON")
}

/// `null`, `false`, zero and the empty string count as "no config".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
