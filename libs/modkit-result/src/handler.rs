//! Translation of host errors into problems.

use std::error::Error as StdError;

use crate::problem::Problem;

/// Capability that may take over the translation of a host error.
///
/// Handlers are consulted before the default translation in
/// [`Problem::internal_error_with`]. Returning `None` falls back to the
/// default, which produces an `InternalServerError` problem.
pub trait ErrorHandler: Send + Sync {
    fn try_handle(&self, error: &(dyn StdError + 'static)) -> Option<Problem>;
}

/// Handler that never intercepts anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorHandler;

impl ErrorHandler for DefaultErrorHandler {
    fn try_handle(&self, _error: &(dyn StdError + 'static)) -> Option<Problem> {
        None
    }
}

impl<F> ErrorHandler for F
where
    F: Fn(&(dyn StdError + 'static)) -> Option<Problem> + Send + Sync,
{
    fn try_handle(&self, error: &(dyn StdError + 'static)) -> Option<Problem> {
        self(error)
    }
}

/// An error caused by a bad argument, tagged with the offending parameter.
///
/// When it appears anywhere in an error's source chain, the default
/// translation copies `parameter` into the problem's property.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (parameter '{parameter}')")]
pub struct ArgumentError {
    pub parameter: String,
    pub message: String,
}

impl ArgumentError {
    pub fn new(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            message: message.into(),
        }
    }
}

/// Finds the first [`ArgumentError`] in `error`'s source chain.
pub(crate) fn find_argument_error<'a>(
    error: &'a (dyn StdError + 'static),
) -> Option<&'a ArgumentError> {
    std::iter::successors(Some(error), |&e| e.source())
        .find_map(|e| e.downcast_ref::<ArgumentError>())
}
