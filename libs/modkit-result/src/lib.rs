//! Result types for the modkit framework
//!
//! Application code reports expected failures as data instead of panicking or
//! bubbling opaque errors. This crate provides:
//! - `Problem`: one classified error (`ProblemCategory`) with a detail message
//! - `Problems`: an ordered, append-only list of problems
//! - `Outcome` / `ValueOutcome<T>`: success or a non-empty `Problems`, with
//!   `map` / `and_then` / accumulation combinators and async variants
//! - `PointerParser`: property path to JSON pointer translation
//!
//! Rendering problems as RFC 9457 documents lives in `modkit-errors`.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod category;
pub mod error;
pub mod find;
pub mod future;
pub mod handler;
pub mod outcome;
pub mod pointer;
pub mod problem;
pub mod problems;
pub mod value_outcome;

pub use category::ProblemCategory;
pub use error::Error;
pub use find::{FindExt, FindOutcome, find, find_by};
pub use future::{OutcomeFutureExt, ValueOutcomeFutureExt};
pub use handler::{ArgumentError, DefaultErrorHandler, ErrorHandler};
pub use outcome::{Outcome, ProblemSource};
pub use pointer::{DefaultPointerParser, PointerParser};
pub use problem::{Problem, ProblemFormatter};
pub use problems::Problems;
pub use value_outcome::ValueOutcome;
