//! The two conversions a transport layer calls at its boundary.

mod aggregate;
mod reverse;

pub use aggregate::to_problem_details;
pub use reverse::to_problems;
