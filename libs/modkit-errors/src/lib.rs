//! Problem details for the modkit framework
//!
//! This crate renders accumulated [`modkit_result::Problems`] as RFC 9457
//! documents and reads them back, with no dependencies on HTTP frameworks.
//! It includes:
//! - The wire document (`ProblemDetails`, `ErrorItem`)
//! - Descriptor catalog support (`Descriptor`, `DescriptorCatalog`)
//! - Options and configuration (`ProblemDetailsOptions`, `ProblemDetailsConfig`)
//! - The conversions `to_problem_details` and `to_problems`
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod catalog;
pub mod config;
pub mod convert;
pub mod options;
pub mod problem;

// Re-export commonly used types
pub use catalog::{
    ABOUT_BLANK, AGGREGATE_TYPE_ID, Descriptor, DescriptorCatalog, DescriptorError,
    DescriptorOverride,
};
pub use config::{ConfigError, ProblemDetailsConfig};
pub use convert::{to_problem_details, to_problems};
pub use options::ProblemDetailsOptions;
pub use problem::{APPLICATION_PROBLEM_JSON, ErrorItem, ProblemDetails};

/// Helper to attach instance and `trace_id` to a document
///
/// This is a convenience function for enriching documents with
/// request-specific context before returning them as responses.
pub fn finalize(
    mut doc: ProblemDetails,
    instance: &str,
    trace_id: Option<String>,
) -> ProblemDetails {
    doc = doc.with_instance(instance);
    if let Some(tid) = trace_id {
        doc = doc.with_trace_id(tid);
    }
    doc
}
