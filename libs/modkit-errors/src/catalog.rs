//! Descriptor catalog: titles, descriptions and status codes for problem types

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use http::StatusCode;
use modkit_result::{Problem, ProblemCategory};
use serde::{Deserialize, Serialize};

/// `type` of every built-in category document.
pub const ABOUT_BLANK: &str = "about:blank";

/// Type id of the envelope used for several problems including custom ones.
pub const AGGREGATE_TYPE_ID: &str = "aggregate-problems-details";

/// Errors raised while loading or registering descriptors.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("failed to read descriptors from '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse descriptors: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid descriptor '{type_id}': {reason}")]
    Invalid {
        type_id: String,
        reason: &'static str,
    },
}

/// Static description of one problem type.
///
/// The serialized shape is the descriptor source format:
/// `{"typeId", "type"?, "title", "description", "status", "category"?}`.
/// A descriptor with a `category` refines that built-in category: problems
/// of it carrying the type id render with this descriptor, and documents
/// of this type come back as that category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct Descriptor {
    pub type_id: String,
    /// Explicit `type` URI; when absent one is derived from the base address.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_url: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ProblemCategory>,
}

impl Descriptor {
    pub fn new(
        type_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        status: u16,
    ) -> Self {
        Self {
            type_id: type_id.into(),
            type_url: None,
            title: title.into(),
            description: description.into(),
            status,
            category: None,
        }
    }

    pub fn for_category(mut self, category: ProblemCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_type_url(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = Some(type_url.into());
        self
    }

    /// Status as an `http::StatusCode`, `500` for codes outside `100..=999`.
    #[inline]
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn validate(&self) -> Result<(), DescriptorError> {
        let invalid = |reason| DescriptorError::Invalid {
            type_id: self.type_id.clone(),
            reason,
        };
        if self.type_id.trim().is_empty() {
            return Err(invalid("type id must not be blank"));
        }
        if self.title.trim().is_empty() {
            return Err(invalid("title must not be blank"));
        }
        if StatusCode::from_u16(self.status).is_err() {
            return Err(invalid("status must be within 100..=999"));
        }
        if self.category == Some(ProblemCategory::CustomProblem) {
            return Err(invalid("category must be a built-in one"));
        }
        Ok(())
    }
}

/// Partial replacement for a built-in descriptor, as read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorOverride {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<u16>,
}

impl DescriptorOverride {
    fn apply(&self, descriptor: &mut Descriptor) {
        if let Some(title) = &self.title {
            descriptor.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            descriptor.description.clone_from(description);
        }
        if let Some(status) = self.status {
            descriptor.status = status;
        }
    }
}

/// Type id used for a built-in category.
#[must_use]
pub const fn category_type_id(category: ProblemCategory) -> &'static str {
    match category {
        ProblemCategory::NotFound => "not-found",
        ProblemCategory::InvalidParameter => "invalid-parameter",
        ProblemCategory::ValidationFailed => "validation-failed",
        ProblemCategory::InvalidState => "invalid-state",
        ProblemCategory::NotAllowed => "not-allowed",
        ProblemCategory::InternalServerError => "internal-server-error",
        ProblemCategory::CustomProblem => "custom-problem",
    }
}

/// Type id carried by a `type` URI: the fragment after the last `#`, or the
/// whole value when there is none.
#[must_use]
pub fn type_id_from_url(type_url: &str) -> &str {
    type_url
        .rsplit_once('#')
        .map_or(type_url, |(_, fragment)| fragment)
}

fn default_category_descriptor(category: ProblemCategory) -> Descriptor {
    let (title, description) = match category {
        ProblemCategory::NotFound => ("Not Found", "The requested resource was not found."),
        ProblemCategory::InvalidParameter => {
            ("Invalid Parameters", "One or more parameters are invalid.")
        }
        ProblemCategory::ValidationFailed => {
            ("Validation Failed", "One or more validation errors occurred.")
        }
        ProblemCategory::InvalidState => (
            "Invalid State",
            "The resource is not in a valid state for this operation.",
        ),
        ProblemCategory::NotAllowed => ("Not Allowed", "The operation is not allowed."),
        ProblemCategory::InternalServerError => {
            ("Internal Server Error", "An internal server error occurred.")
        }
        ProblemCategory::CustomProblem => ("Custom Problem", "A custom problem occurred."),
    };
    let descriptor = Descriptor::new(
        category_type_id(category),
        title,
        description,
        category.default_status(),
    );
    // Unregistered custom problems derive their type from their own type id.
    if category == ProblemCategory::CustomProblem {
        descriptor
    } else {
        descriptor.with_type_url(ABOUT_BLANK)
    }
}

fn default_aggregate_descriptor() -> Descriptor {
    Descriptor::new(
        AGGREGATE_TYPE_ID,
        "Multiple Problems",
        "Multiple problems occurred. See the details for more information.",
        400,
    )
}

/// Registry of problem descriptors.
///
/// Every built-in category always has a descriptor; custom type ids are
/// registered explicitly. Build it once at startup and share it read-only.
#[derive(Debug, Clone)]
pub struct DescriptorCatalog {
    custom: HashMap<String, Descriptor>,
    categories: [Descriptor; 7],
    aggregate: Descriptor,
}

impl Default for DescriptorCatalog {
    fn default() -> Self {
        Self {
            custom: HashMap::new(),
            categories: ProblemCategory::ALL.map(default_category_descriptor),
            aggregate: default_aggregate_descriptor(),
        }
    }
}

impl DescriptorCatalog {
    /// Catalog holding only the built-in category descriptors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a custom descriptor; an existing registration for the same
    /// type id is replaced.
    ///
    /// # Errors
    /// Returns [`DescriptorError::Invalid`] for a blank type id or title, or a
    /// status outside `100..=999`.
    pub fn register(&mut self, descriptor: Descriptor) -> Result<(), DescriptorError> {
        descriptor.validate()?;
        if self.custom.contains_key(&descriptor.type_id) {
            tracing::warn!(
                type_id = %descriptor.type_id,
                "problem descriptor registered twice; keeping the latest"
            );
        }
        self.custom.insert(descriptor.type_id.clone(), descriptor);
        Ok(())
    }

    /// Registers every descriptor, stopping at the first invalid one.
    ///
    /// # Errors
    /// See [`DescriptorCatalog::register`].
    pub fn register_all<I>(&mut self, descriptors: I) -> Result<(), DescriptorError>
    where
        I: IntoIterator<Item = Descriptor>,
    {
        descriptors.into_iter().try_for_each(|d| self.register(d))
    }

    /// Overrides title, description or status of a built-in category.
    pub fn set_category(&mut self, category: ProblemCategory, patch: &DescriptorOverride) {
        patch.apply(&mut self.categories[category as usize]);
    }

    /// Overrides the aggregate envelope; `description` is its detail.
    pub fn set_aggregate(&mut self, patch: &DescriptorOverride) {
        patch.apply(&mut self.aggregate);
    }

    /// Registered descriptor for a custom type id.
    #[must_use]
    pub fn lookup(&self, type_id: &str) -> Option<&Descriptor> {
        self.custom.get(type_id)
    }

    /// Descriptor of a built-in category; total over every category.
    #[must_use]
    pub fn lookup_by_category(&self, category: ProblemCategory) -> &Descriptor {
        &self.categories[category as usize]
    }

    #[must_use]
    pub fn aggregate(&self) -> &Descriptor {
        &self.aggregate
    }

    /// Descriptor used to render `problem`.
    ///
    /// A registered type id wins, whatever the category; otherwise the
    /// category's own descriptor is used.
    #[must_use]
    pub fn describe(&self, problem: &Problem) -> &Descriptor {
        problem
            .type_id()
            .and_then(|id| self.lookup(id))
            .unwrap_or_else(|| self.lookup_by_category(problem.category()))
    }

    /// Built-in category whose type id is `type_id`.
    #[must_use]
    pub fn category_for_type_id(&self, type_id: &str) -> Option<ProblemCategory> {
        ProblemCategory::ALL
            .into_iter()
            .filter(|c| *c != ProblemCategory::CustomProblem)
            .find(|c| self.lookup_by_category(*c).type_id == type_id)
    }

    /// Built-in category whose current status is `status`; the first in
    /// declaration order wins when overrides make statuses collide.
    #[must_use]
    pub fn category_for_status(&self, status: u16) -> Option<ProblemCategory> {
        ProblemCategory::ALL
            .into_iter()
            .filter(|c| *c != ProblemCategory::CustomProblem)
            .find(|c| self.lookup_by_category(*c).status == status)
    }

    /// Registered descriptor carrying the explicit `type` URI `type_url`.
    #[must_use]
    pub fn lookup_by_type_url(&self, type_url: &str) -> Option<&Descriptor> {
        self.custom
            .values()
            .find(|d| d.type_url.as_deref() == Some(type_url))
    }

    /// Built-in descriptors plus those of a JSON array in descriptor source
    /// format.
    ///
    /// # Errors
    /// Returns [`DescriptorError::Parse`] for malformed JSON and
    /// [`DescriptorError::Invalid`] for an invalid record.
    pub fn from_json_str(json: &str) -> Result<Self, DescriptorError> {
        let descriptors: Vec<Descriptor> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        catalog.register_all(descriptors)?;
        Ok(catalog)
    }

    /// Same as [`DescriptorCatalog::from_json_str`], reading `path`.
    ///
    /// # Errors
    /// Returns [`DescriptorError::Io`] when the file cannot be read, otherwise
    /// as [`DescriptorCatalog::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DescriptorError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| DescriptorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
