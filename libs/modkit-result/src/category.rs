//! Closed set of problem categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classifies a [`Problem`](crate::Problem).
///
/// The declaration order is stable but it is *not* the aggregation
/// precedence; see [`ProblemCategory::severity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProblemCategory {
    NotFound,
    InvalidParameter,
    ValidationFailed,
    InvalidState,
    NotAllowed,
    InternalServerError,
    CustomProblem,
}

impl ProblemCategory {
    /// All categories in declaration order.
    pub const ALL: [Self; 7] = [
        Self::NotFound,
        Self::InvalidParameter,
        Self::ValidationFailed,
        Self::InvalidState,
        Self::NotAllowed,
        Self::InternalServerError,
        Self::CustomProblem,
    ];

    /// Symbolic name, identical to the variant identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::InvalidParameter => "InvalidParameter",
            Self::ValidationFailed => "ValidationFailed",
            Self::InvalidState => "InvalidState",
            Self::NotAllowed => "NotAllowed",
            Self::InternalServerError => "InternalServerError",
            Self::CustomProblem => "CustomProblem",
        }
    }

    /// Default HTTP-equivalent status code.
    #[must_use]
    pub const fn default_status(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::InvalidParameter | Self::CustomProblem => 400,
            Self::ValidationFailed => 422,
            Self::InvalidState => 409,
            Self::NotAllowed => 403,
            Self::InternalServerError => 500,
        }
    }

    /// Rank used when several categories compete for the overall status.
    ///
    /// Higher wins: `InternalServerError > InvalidState > ValidationFailed >
    /// InvalidParameter > NotAllowed > NotFound`. Custom problems never
    /// compete and rank lowest.
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::InternalServerError => 6,
            Self::InvalidState => 5,
            Self::ValidationFailed => 4,
            Self::InvalidParameter => 3,
            Self::NotAllowed => 2,
            Self::NotFound => 1,
            Self::CustomProblem => 0,
        }
    }

    /// Built-in category whose default status is `status`.
    ///
    /// `400` resolves to `InvalidParameter`; custom problems are never
    /// recovered from a status alone.
    #[must_use]
    pub const fn from_status(status: u16) -> Option<Self> {
        match status {
            404 => Some(Self::NotFound),
            400 => Some(Self::InvalidParameter),
            422 => Some(Self::ValidationFailed),
            409 => Some(Self::InvalidState),
            403 => Some(Self::NotAllowed),
            500 => Some(Self::InternalServerError),
            _ => None,
        }
    }

    /// Parses the symbolic name produced by [`ProblemCategory::as_str`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for ProblemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn severity_ladder() {
        let mut ranked = ProblemCategory::ALL;
        ranked.sort_by_key(|c| std::cmp::Reverse(c.severity()));
        assert_eq!(
            ranked,
            [
                ProblemCategory::InternalServerError,
                ProblemCategory::InvalidState,
                ProblemCategory::ValidationFailed,
                ProblemCategory::InvalidParameter,
                ProblemCategory::NotAllowed,
                ProblemCategory::NotFound,
                ProblemCategory::CustomProblem,
            ]
        );
    }

    #[test]
    fn status_round_trip_for_builtin_categories() {
        for category in ProblemCategory::ALL {
            if category == ProblemCategory::CustomProblem {
                continue;
            }
            assert_eq!(
                ProblemCategory::from_status(category.default_status()),
                Some(category)
            );
        }
        assert_eq!(ProblemCategory::from_status(418), None);
    }

    #[test]
    fn names() {
        assert_eq!(ProblemCategory::NotAllowed.to_string(), "NotAllowed");
        assert_eq!(
            ProblemCategory::from_name("ValidationFailed"),
            Some(ProblemCategory::ValidationFailed)
        );
        assert_eq!(ProblemCategory::from_name("validationfailed"), None);
        let json = serde_json::to_string(&ProblemCategory::InvalidState).unwrap_or_default();
        assert_eq!(json, "\"InvalidState\"");
    }
}
