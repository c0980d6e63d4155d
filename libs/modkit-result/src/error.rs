//! Programmer-error conditions raised by the result types.
//!
//! Expected, data-driven failures travel as [`Problems`]. The variants below
//! are reserved for calls that are wrong in correct code: a custom problem
//! without a type id, a failing outcome with nothing in it, and so on.

use crate::problems::Problems;

/// Errors returned by constructors and escape hatches of this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("a custom problem requires a non-blank type id")]
    MissingTypeId,

    #[error("a failing outcome requires at least one problem")]
    EmptyProblems,

    #[error("cannot accumulate problems into a successful outcome that carries a value")]
    AccumulateIntoSuccess,

    #[error("index {index} is out of range for {len} problem(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("destination has {available} free slot(s) but {required} are required")]
    InsufficientCapacity { available: usize, required: usize },

    #[error("failed to serialize extension '{key}': {source}")]
    Extension {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("outcome was not successful:\n{0}")]
    Unsuccessful(Problems),
}

impl Error {
    /// Problems carried by an [`Error::Unsuccessful`], if any.
    #[must_use]
    pub fn problems(&self) -> Option<&Problems> {
        match self {
            Self::Unsuccessful(problems) => Some(problems),
            _ => None,
        }
    }
}
