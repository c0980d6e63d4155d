//! A single classified problem.

use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::category::ProblemCategory;
use crate::error::Error;
use crate::handler::{ErrorHandler, find_argument_error};

/// Replaceable rendering used by a problem's `Display` implementation.
pub type ProblemFormatter = fn(&Problem, &mut fmt::Formatter<'_>) -> fmt::Result;

/// One classified error with a human-readable detail message.
///
/// `detail`, `category` and `type_id` are fixed at construction. The
/// property path and the extension bag stay mutable so a problem raised deep
/// in a call chain can be annotated while it bubbles up.
#[derive(Clone, Serialize)]
#[must_use]
pub struct Problem {
    detail: String,
    category: ProblemCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extensions: Option<Map<String, Value>>,
    #[serde(skip)]
    formatter: Option<ProblemFormatter>,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl Problem {
    /// Creates a problem of any category.
    ///
    /// # Errors
    /// Returns [`Error::MissingTypeId`] when `category` is
    /// [`ProblemCategory::CustomProblem`] and `type_id` is absent or blank.
    pub fn new(
        category: ProblemCategory,
        detail: impl Into<String>,
        type_id: Option<String>,
    ) -> Result<Self, Error> {
        let type_id = type_id.filter(|t| !is_blank(t));
        if category == ProblemCategory::CustomProblem && type_id.is_none() {
            return Err(Error::MissingTypeId);
        }
        Ok(Self::unchecked(category, detail.into(), type_id))
    }

    fn unchecked(category: ProblemCategory, detail: String, type_id: Option<String>) -> Self {
        Self {
            detail,
            category,
            type_id,
            property: None,
            extensions: None,
            formatter: None,
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::unchecked(ProblemCategory::NotFound, detail.into(), None)
    }

    pub fn invalid_parameter(detail: impl Into<String>) -> Self {
        Self::unchecked(ProblemCategory::InvalidParameter, detail.into(), None)
    }

    pub fn validation_failed(detail: impl Into<String>) -> Self {
        Self::unchecked(ProblemCategory::ValidationFailed, detail.into(), None)
    }

    pub fn invalid_state(detail: impl Into<String>) -> Self {
        Self::unchecked(ProblemCategory::InvalidState, detail.into(), None)
    }

    pub fn not_allowed(detail: impl Into<String>) -> Self {
        Self::unchecked(ProblemCategory::NotAllowed, detail.into(), None)
    }

    /// An `InternalServerError` problem with an explicit message.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::unchecked(ProblemCategory::InternalServerError, detail.into(), None)
    }

    /// A problem identified by `type_id`, described by a registered descriptor.
    ///
    /// # Errors
    /// Returns [`Error::MissingTypeId`] if `type_id` is empty or whitespace.
    pub fn custom(detail: impl Into<String>, type_id: impl Into<String>) -> Result<Self, Error> {
        Self::new(
            ProblemCategory::CustomProblem,
            detail,
            Some(type_id.into()),
        )
    }

    /// Translates a host error with the default rules.
    ///
    /// The detail is the error's message. If an [`ArgumentError`](crate::ArgumentError)
    /// sits anywhere in the source chain, its parameter becomes the property.
    pub fn internal_error(error: &(dyn StdError + 'static)) -> Self {
        tracing::error!(error = %error, "Translating unhandled error into an internal problem");
        let problem = Self::internal(error.to_string());
        match find_argument_error(error) {
            Some(arg) => problem.with_property(arg.parameter.clone()),
            None => problem,
        }
    }

    /// Like [`Problem::internal_error`], but lets `handler` claim the error first.
    pub fn internal_error_with(
        error: &(dyn StdError + 'static),
        handler: &dyn ErrorHandler,
    ) -> Self {
        handler
            .try_handle(error)
            .unwrap_or_else(|| Self::internal_error(error))
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }

    #[must_use]
    pub fn category(&self) -> ProblemCategory {
        self.category
    }

    #[must_use]
    pub fn type_id(&self) -> Option<&str> {
        self.type_id.as_deref()
    }

    #[must_use]
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// The extension bag, `None` until the first extension is written.
    #[must_use]
    pub fn extensions(&self) -> Option<&Map<String, Value>> {
        self.extensions.as_ref()
    }

    #[must_use]
    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.as_ref().and_then(|ext| ext.get(key))
    }

    /// Sets the property path.
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// Sets an optional type id on a built-in category. Blank ids are ignored,
    /// and the id of a custom problem is never replaced.
    pub fn with_type_id(mut self, type_id: impl Into<String>) -> Self {
        let type_id = type_id.into();
        if self.category != ProblemCategory::CustomProblem && !is_blank(&type_id) {
            self.type_id = Some(type_id);
        }
        self
    }

    /// Adds an extension value; the last write for a key wins.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert_extension(key, value);
        self
    }

    /// Adds any serializable value as an extension.
    ///
    /// Unit enum variants serialize to their symbolic name, not an ordinal.
    ///
    /// # Errors
    /// Returns [`Error::Extension`] if `value` fails to serialize.
    pub fn try_with<V: Serialize + ?Sized>(
        mut self,
        key: impl Into<String>,
        value: &V,
    ) -> Result<Self, Error> {
        let key = key.into();
        let value = serde_json::to_value(value).map_err(|source| Error::Extension {
            key: key.clone(),
            source,
        })?;
        self.insert_extension(key, value);
        Ok(self)
    }

    /// In-place variant of [`Problem::with`].
    pub fn insert_extension(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.extensions
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
    }

    /// Prefixes the property with `parent`: `name` becomes `parent.name`.
    ///
    /// No-op when either `parent` or the current property is empty.
    pub fn chain_property(&mut self, parent: &str) {
        if parent.is_empty() {
            return;
        }
        if let Some(property) = self.property.as_mut().filter(|p| !p.is_empty()) {
            *property = format!("{parent}.{property}");
        }
    }

    /// Prefixes the property with an indexed parent: `name` becomes
    /// `parent[index].name`.
    ///
    /// Same guards as [`Problem::chain_property`]. The index is written
    /// verbatim, negative values included.
    pub fn chain_indexed_property(&mut self, parent: &str, index: i64) {
        if parent.is_empty() {
            return;
        }
        if let Some(property) = self.property.as_mut().filter(|p| !p.is_empty()) {
            *property = format!("{parent}[{index}].{property}");
        }
    }

    /// Overwrites the property unconditionally, `None` and `""` included.
    pub fn replace_property(&mut self, property: Option<String>) {
        self.property = property;
    }

    /// Installs a rendering for this instance's `Display` output.
    pub fn with_formatter(mut self, formatter: ProblemFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// The default `Display` rendering:
    /// `Category: .., Details: ..[, Property: ..][, TypeId: ..][, Extensions: { k: v }]`.
    ///
    /// # Errors
    /// Propagates formatter write failures.
    pub fn default_format(problem: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Category: {}, Details: {}",
            problem.category, problem.detail
        )?;
        if let Some(property) = problem.property().filter(|p| !p.is_empty()) {
            write!(f, ", Property: {property}")?;
        }
        if let Some(type_id) = problem.type_id().filter(|t| !t.is_empty()) {
            write!(f, ", TypeId: {type_id}")?;
        }
        if let Some(extensions) = problem.extensions().filter(|e| !e.is_empty()) {
            f.write_str(", Extensions: { ")?;
            for (i, (key, value)) in extensions.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                match value {
                    Value::String(s) => write!(f, "{key}: {s}")?,
                    other => write!(f, "{key}: {other}")?,
                }
            }
            f.write_str(" }")?;
        }
        Ok(())
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let render = self.formatter.unwrap_or(Self::default_format);
        render(self, f)
    }
}

impl fmt::Debug for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Problem")
            .field("detail", &self.detail)
            .field("category", &self.category)
            .field("type_id", &self.type_id)
            .field("property", &self.property)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Problem {
    fn eq(&self, other: &Self) -> bool {
        self.detail == other.detail
            && self.category == other.category
            && self.type_id == other.type_id
            && self.property == other.property
            && self.extensions == other.extensions
    }
}

impl From<anyhow::Error> for Problem {
    fn from(error: anyhow::Error) -> Self {
        let error: &(dyn StdError + 'static) = error.as_ref();
        Self::internal_error(error)
    }
}
