//! Runtime options shared by both conversion directions.

use std::fmt;
use std::sync::Arc;

use modkit_result::{DefaultPointerParser, PointerParser};

use crate::catalog::{Descriptor, DescriptorCatalog, DescriptorOverride};
use crate::config::{ConfigError, ProblemDetailsConfig, parse_category_key};

/// Everything the converters need: how `type` URIs are built, which
/// descriptors exist and how property paths map to pointers.
#[derive(Clone)]
pub struct ProblemDetailsOptions {
    /// Prefix of derived `type` URIs: `{base_address}#{type_id}`.
    pub base_address: String,
    pub catalog: DescriptorCatalog,
    pub pointer_parser: Arc<dyn PointerParser>,
}

impl Default for ProblemDetailsOptions {
    fn default() -> Self {
        Self {
            base_address: String::new(),
            catalog: DescriptorCatalog::default(),
            pointer_parser: Arc::new(DefaultPointerParser),
        }
    }
}

impl fmt::Debug for ProblemDetailsOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProblemDetailsOptions")
            .field("base_address", &self.base_address)
            .field("catalog", &self.catalog)
            .field("pointer_parser", &"<dyn PointerParser>")
            .finish()
    }
}

impl ProblemDetailsOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_base_address(mut self, base_address: impl Into<String>) -> Self {
        self.base_address = base_address.into();
        self
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: DescriptorCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn with_pointer_parser(mut self, parser: Arc<dyn PointerParser>) -> Self {
        self.pointer_parser = parser;
        self
    }

    /// Builds options from configuration: loads `descriptors_file` when set,
    /// then applies category and aggregate overrides.
    ///
    /// # Errors
    /// Returns [`ConfigError::Descriptors`] when the descriptor file cannot be
    /// loaded and [`ConfigError::UnknownCategory`] for an override key that
    /// names no category.
    pub fn from_config(config: &ProblemDetailsConfig) -> Result<Self, ConfigError> {
        let mut catalog = match &config.descriptors_file {
            Some(path) => DescriptorCatalog::from_json_file(path)?,
            None => DescriptorCatalog::new(),
        };
        for (key, patch) in &config.categories {
            let category =
                parse_category_key(key).ok_or_else(|| ConfigError::UnknownCategory {
                    key: key.clone(),
                })?;
            catalog.set_category(category, patch);
        }
        catalog.set_aggregate(&DescriptorOverride {
            title: config.aggregate_title.clone(),
            description: config.aggregate_detail.clone(),
            status: None,
        });

        tracing::debug!(
            base_address = %config.base_address,
            overrides = config.categories.len(),
            "problem details options configured"
        );

        Ok(Self::new()
            .with_base_address(config.base_address.clone())
            .with_catalog(catalog))
    }

    /// `type` URI for a document described by `descriptor`: its explicit
    /// `type` when present, otherwise `{base_address}#{type_id}`.
    #[must_use]
    pub fn type_url_for(&self, descriptor: &Descriptor, type_id: &str) -> String {
        match &descriptor.type_url {
            Some(url) => url.clone(),
            None => format!("{}#{type_id}", self.base_address.trim_end_matches('#')),
        }
    }
}
