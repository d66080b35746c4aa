//! Environment-driven settings for the handler.

use serde::Serialize;

pub const CONFIG_BUCKET_VAR: &str = "CONFIG_BUCKET";
pub const CONFIG_KEY_PREFIX_VAR: &str = "CONFIG_KEY_PREFIX";
pub const PIPELINE_STEPS_VAR: &str = "PIPELINE_STEPS";

pub const DEFAULT_CONFIG_BUCKET: &str = "ses.schams.net";
pub const DEFAULT_CONFIG_KEY_PREFIX: &str = "promise/";

/// Where per-item configuration objects are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineSettings {
    pub bucket: String,
    pub key_prefix: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_CONFIG_BUCKET.to_string(),
            key_prefix: DEFAULT_CONFIG_KEY_PREFIX.to_string(),
        }
    }
}

impl PipelineSettings {
    /// Builds settings from a variable lookup. Unset or blank values fall back
    /// to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bucket: non_blank(lookup(CONFIG_BUCKET_VAR)).unwrap_or(defaults.bucket),
            key_prefix: non_blank(lookup(CONFIG_KEY_PREFIX_VAR)).unwrap_or(defaults.key_prefix),
        }
    }

    pub fn object_key(&self, item: &str) -> String {
        format!("{}{item}", self.key_prefix)
    }
}

/// Reads a comma-separated step list. Returns `None` when the variable is
/// unset or blank. Empty entries are kept so the pipeline rejects them.
pub fn step_names_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Vec<String>> {
    let raw = non_blank(lookup(PIPELINE_STEPS_VAR))?;
    Some(raw.split(',').map(|name| name.trim().to_string()).collect())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn falls_back_to_defaults_when_unset_or_blank() {
        let settings = PipelineSettings::from_lookup(lookup_from(&[(CONFIG_KEY_PREFIX_VAR, "  ")]));

        assert_eq!(settings, PipelineSettings::default());
        assert_eq!(settings.object_key("foobar"), "promise/foobar");
    }

    #[test]
    fn environment_values_override_defaults() {
        let settings = PipelineSettings::from_lookup(lookup_from(&[
            (CONFIG_BUCKET_VAR, "mail-config"),
            (CONFIG_KEY_PREFIX_VAR, "tenants/a/"),
        ]));

        assert_eq!(settings.bucket, "mail-config");
        assert_eq!(settings.object_key("blubb"), "tenants/a/blubb");
    }

    #[test]
    fn step_list_is_split_and_trimmed() {
        let names = step_names_from_lookup(lookup_from(&[(
            PIPELINE_STEPS_VAR,
            "seed_items, fetch_config ,,report",
        )]));

        assert_eq!(
            names,
            Some(vec![
                "seed_items".to_string(),
                "fetch_config".to_string(),
                String::new(),
                "report".to_string(),
            ])
        );
    }

    #[test]
    fn missing_step_list_means_default_steps() {
        assert_eq!(step_names_from_lookup(lookup_from(&[])), None);
        assert_eq!(
            step_names_from_lookup(lookup_from(&[(PIPELINE_STEPS_VAR, " ")])),
            None
        );
    }
}
