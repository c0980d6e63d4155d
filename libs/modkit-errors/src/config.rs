//! Problem details configuration, extracted from a `figment::Figment`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use modkit_result::ProblemCategory;
use serde::{Deserialize, Serialize};

use crate::catalog::{DescriptorError, DescriptorOverride};

/// Prefix of environment variables read by [`ProblemDetailsConfig::figment`].
pub const ENV_PREFIX: &str = "MODKIT_PROBLEMS_";

/// Configuration error for problem details options
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid problem details configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
    #[error("failed to load problem descriptors: {0}")]
    Descriptors(#[from] DescriptorError),
    #[error("unknown problem category '{key}'")]
    UnknownCategory { key: String },
}

/// Deployment settings for rendering problem details.
///
/// ```yaml
/// base_address: "https://errors.example.com/"
/// descriptors_file: "config/problems.json"
/// categories:
///   not_found:
///     title: "Missing"
/// aggregate_title: "Several Problems"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemDetailsConfig {
    pub base_address: String,
    /// JSON array of descriptors in source format.
    pub descriptors_file: Option<PathBuf>,
    /// Per-category overrides keyed by category name (`not_found`,
    /// `NotFound` and `not-found` are all accepted).
    pub categories: BTreeMap<String, DescriptorOverride>,
    pub aggregate_title: Option<String>,
    pub aggregate_detail: Option<String>,
}

impl ProblemDetailsConfig {
    /// Layered providers: the YAML file at `path`, then `MODKIT_PROBLEMS_*`
    /// environment variables (`__` separates nested keys).
    #[must_use]
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::new()
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extracts the configuration; missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Extract`] when a provider fails or a value has
    /// the wrong shape.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(|e| ConfigError::Extract(Box::new(e)))
    }
}

/// Resolves a configuration key to a category, ignoring case, `_` and `-`.
pub(crate) fn parse_category_key(key: &str) -> Option<ProblemCategory> {
    let normalized: String = key.chars().filter(|c| !matches!(c, '_' | '-')).collect();
    ProblemCategory::ALL
        .into_iter()
        .find(|c| c.as_str().eq_ignore_ascii_case(&normalized))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use figment::providers::Serialized;
    use serde_json::json;

    #[test]
    fn category_keys_accept_several_spellings() {
        for key in ["not_found", "NotFound", "not-found", "NOT_FOUND"] {
            assert_eq!(parse_category_key(key), Some(ProblemCategory::NotFound));
        }
        assert_eq!(
            parse_category_key("internal_server_error"),
            Some(ProblemCategory::InternalServerError)
        );
        assert_eq!(parse_category_key("teapot"), None);
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let figment = Figment::new().merge(Serialized::defaults(json!({
            "base_address": "https://errors.example.com/"
        })));
        let config = ProblemDetailsConfig::from_figment(&figment).unwrap();
        assert_eq!(config.base_address, "https://errors.example.com/");
        assert!(config.categories.is_empty());
        assert!(config.descriptors_file.is_none());
    }

    #[test]
    fn wrong_shape_is_an_extract_error() {
        let figment = Figment::new().merge(Serialized::defaults(json!({
            "categories": "nope"
        })));
        let err = ProblemDetailsConfig::from_figment(&figment).unwrap_err();
        assert!(matches!(err, ConfigError::Extract(_)));
    }

    #[test]
    fn yaml_and_env_layers_merge() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "problems.yaml",
                r#"
base_address: "https://errors.example.com/"
categories:
  not_found:
    title: "Missing"
    status: 410
"#,
            )?;
            jail.set_env("MODKIT_PROBLEMS_AGGREGATE_TITLE", "Several Problems");
            jail.set_env("MODKIT_PROBLEMS_CATEGORIES__NOT_ALLOWED__TITLE", "Forbidden");

            let config = ProblemDetailsConfig::from_figment(&ProblemDetailsConfig::figment(
                "problems.yaml",
            ))
            .map_err(|e| e.to_string())?;

            assert_eq!(config.base_address, "https://errors.example.com/");
            assert_eq!(config.aggregate_title.as_deref(), Some("Several Problems"));
            let not_found = &config.categories["not_found"];
            assert_eq!(not_found.title.as_deref(), Some("Missing"));
            assert_eq!(not_found.status, Some(410));
            assert_eq!(
                config.categories["not_allowed"].title.as_deref(),
                Some("Forbidden")
            );
            Ok(())
        });
    }
}
