//! `ProblemDetails` back to `Problems`.

use modkit_result::{Problem, ProblemCategory, Problems};
use serde_json::{Map, Value};

use super::aggregate::in_errors_group;
use crate::catalog::{ABOUT_BLANK, Descriptor, type_id_from_url};
use crate::options::ProblemDetailsOptions;
use crate::problem::{ErrorItem, ProblemDetails};

/// Rebuilds the problems a document was rendered from.
///
/// Grouped documents yield their `not_found` items, then their `errors`
/// items, then every `inner_details` document in turn; the original
/// interleaving across groups is not recorded on the wire. An `errors`
/// item's `status` picks its category, so an item tagged `500` becomes an
/// internal server error.
pub fn to_problems(doc: &ProblemDetails, options: &ProblemDetailsOptions) -> Problems {
    if !doc.is_aggregate() {
        return Problems::from(single_problem(doc, options));
    }

    let fallback = errors_fallback(doc, options);
    let mut problems = Problems::new();
    for item in doc.not_found.iter().flatten() {
        problems.push(replay(Problem::not_found(&item.detail), item, options));
    }
    for item in doc.errors.iter().flatten() {
        problems.push(error_item_problem(item, fallback, options));
    }
    for inner in doc.inner_details.iter().flatten() {
        problems.append(to_problems(inner, options));
    }
    problems
}

fn single_problem(doc: &ProblemDetails, options: &ProblemDetailsOptions) -> Problem {
    let mut problem = match resolve_document(doc, options) {
        Resolved::Category(category) => built_in(category, &doc.detail),
        Resolved::UnknownStatus(status) => {
            tracing::warn!(
                status,
                "problem details document carries an unknown status; keeping it as an extension"
            );
            Problem::internal(&doc.detail).with("status", status)
        }
        Resolved::Refined(category, type_id) => {
            built_in(category, &doc.detail).with_type_id(type_id)
        }
        Resolved::Custom(type_id) => Problem::custom(&doc.detail, type_id).unwrap_or_else(|_| {
            tracing::warn!(
                type_url = %doc.type_url,
                "problem details type carries no type id; treating as internal error"
            );
            Problem::internal(&doc.detail)
        }),
    };
    if let Some(property) = property_of(doc.pointer.as_deref(), options) {
        problem = problem.with_property(property);
    }
    with_extensions(problem, &doc.extensions)
}

enum Resolved<'a> {
    Category(ProblemCategory),
    /// `about:blank` with a status no category uses.
    UnknownStatus(u16),
    /// Built-in category carrying a registered type id.
    Refined(ProblemCategory, &'a str),
    Custom(&'a str),
}

fn registered(descriptor: &Descriptor) -> Resolved<'_> {
    match descriptor.category {
        Some(category) => Resolved::Refined(category, &descriptor.type_id),
        None => Resolved::Custom(&descriptor.type_id),
    }
}

/// Category or custom type id behind a single document's `type`.
fn resolve_document<'a>(doc: &'a ProblemDetails, options: &'a ProblemDetailsOptions) -> Resolved<'a> {
    let status = doc.status.as_u16();
    if doc.type_url == ABOUT_BLANK {
        return options
            .catalog
            .category_for_status(status)
            .map_or(Resolved::UnknownStatus(status), Resolved::Category);
    }
    if let Some(descriptor) = options.catalog.lookup_by_type_url(&doc.type_url) {
        return registered(descriptor);
    }
    let type_id = type_id_from_url(&doc.type_url);
    if let Some(descriptor) = options.catalog.lookup(type_id) {
        return registered(descriptor);
    }
    match options.catalog.category_for_type_id(type_id) {
        Some(category) => Resolved::Category(category),
        None => Resolved::Custom(type_id),
    }
}

/// Category for an `errors` item without a usable status: the envelope's
/// own category when it belongs to that group, otherwise `InvalidParameter`.
fn errors_fallback(doc: &ProblemDetails, options: &ProblemDetailsOptions) -> ProblemCategory {
    options
        .catalog
        .category_for_status(doc.status.as_u16())
        .filter(|c| in_errors_group(*c))
        .unwrap_or(ProblemCategory::InvalidParameter)
}

fn error_item_problem(
    item: &ErrorItem,
    fallback: ProblemCategory,
    options: &ProblemDetailsOptions,
) -> Problem {
    let known = item.status.and_then(|status| {
        options
            .catalog
            .category_for_status(status)
            .filter(|c| in_errors_group(*c))
    });
    let problem = replay(
        built_in(known.unwrap_or(fallback), &item.detail),
        item,
        options,
    );
    if let (None, Some(status)) = (known, item.status) {
        tracing::warn!(
            status,
            category = %fallback,
            "problem details item carries an unknown status; keeping it as an extension"
        );
        return problem.with("status", status);
    }
    problem
}

fn built_in(category: ProblemCategory, detail: &str) -> Problem {
    match category {
        ProblemCategory::NotFound => Problem::not_found(detail),
        ProblemCategory::InvalidParameter => Problem::invalid_parameter(detail),
        ProblemCategory::ValidationFailed => Problem::validation_failed(detail),
        ProblemCategory::InvalidState => Problem::invalid_state(detail),
        ProblemCategory::NotAllowed => Problem::not_allowed(detail),
        ProblemCategory::InternalServerError | ProblemCategory::CustomProblem => {
            Problem::internal(detail)
        }
    }
}

fn replay(mut problem: Problem, item: &ErrorItem, options: &ProblemDetailsOptions) -> Problem {
    if let Some(property) = property_of(item.pointer.as_deref(), options) {
        problem = problem.with_property(property);
    }
    with_extensions(problem, &item.extensions)
}

fn property_of(pointer: Option<&str>, options: &ProblemDetailsOptions) -> Option<String> {
    pointer
        .map(|p| options.pointer_parser.pointer_to_property(p))
        .filter(|p| !p.is_empty())
}

fn with_extensions(problem: Problem, extensions: &Map<String, Value>) -> Problem {
    extensions
        .iter()
        .fold(problem, |problem, (key, value)| problem.with(key.clone(), value.clone()))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::catalog::DescriptorCatalog;
    use http::StatusCode;
    use serde_json::json;
    use tracing_test::traced_test;

    fn document(value: &Value) -> ProblemDetails {
        serde_json::from_value(value.clone()).unwrap()
    }

    #[test]
    fn about_blank_resolves_by_status() {
        let doc = document(&json!({
            "type": "about:blank",
            "title": "Not Allowed",
            "status": 403,
            "detail": "nope",
            "pointer": "#/owner",
            "hint": "ask an admin"
        }));
        let problems = to_problems(&doc, &ProblemDetailsOptions::new());
        assert_eq!(problems.len(), 1);
        let problem = &problems[0];
        assert_eq!(problem.category(), ProblemCategory::NotAllowed);
        assert_eq!(problem.property(), Some("owner"));
        assert_eq!(problem.extension("hint"), Some(&json!("ask an admin")));
    }

    #[test]
    #[traced_test]
    fn unknown_about_blank_status_is_internal() {
        let doc = ProblemDetails::new(StatusCode::IM_A_TEAPOT, "Teapot", "short and stout");
        let problems = to_problems(&doc, &ProblemDetailsOptions::new());
        assert_eq!(problems[0].category(), ProblemCategory::InternalServerError);
        assert_eq!(problems[0].extension("status"), Some(&json!(418)));
        assert!(logs_contain("unknown status"));
    }

    #[test]
    fn refining_descriptor_restores_category_and_type_id() {
        let mut catalog = DescriptorCatalog::new();
        catalog
            .register(
                Descriptor::new("user-not-found", "User Not Found", "", 404)
                    .for_category(ProblemCategory::NotFound),
            )
            .unwrap();
        let options = ProblemDetailsOptions::new()
            .with_base_address("https://errors.example.com/")
            .with_catalog(catalog);
        let doc = ProblemDetails::new(StatusCode::NOT_FOUND, "User Not Found", "user 7")
            .with_type("https://errors.example.com/#user-not-found");

        let problems = to_problems(&doc, &options);
        assert_eq!(problems[0].category(), ProblemCategory::NotFound);
        assert_eq!(problems[0].type_id(), Some("user-not-found"));
    }

    #[test]
    fn fragments_resolve_custom_and_category_type_ids() {
        let options = ProblemDetailsOptions::new().with_base_address("https://errors.example.com/");

        let custom = ProblemDetails::new(StatusCode::TOO_MANY_REQUESTS, "Quota", "slow down")
            .with_type("https://errors.example.com/#quota");
        let problems = to_problems(&custom, &options);
        assert_eq!(problems[0].category(), ProblemCategory::CustomProblem);
        assert_eq!(problems[0].type_id(), Some("quota"));

        let category = ProblemDetails::new(StatusCode::CONFLICT, "Invalid State", "locked")
            .with_type("https://errors.example.com/#invalid-state");
        assert_eq!(
            to_problems(&category, &options)[0].category(),
            ProblemCategory::InvalidState
        );
    }

    #[test]
    fn registered_type_urls_resolve_to_their_type_id() {
        let mut catalog = DescriptorCatalog::new();
        catalog
            .register(
                Descriptor::new("legal", "Legal Hold", "", 451)
                    .with_type_url("https://errors.example.com/legal"),
            )
            .unwrap();
        let options = ProblemDetailsOptions::new().with_catalog(catalog);
        let doc = ProblemDetails::new(StatusCode::UNAVAILABLE_FOR_LEGAL_REASONS, "Legal Hold", "held")
            .with_type("https://errors.example.com/legal");
        assert_eq!(to_problems(&doc, &options)[0].type_id(), Some("legal"));
    }

    #[test]
    #[traced_test]
    fn blank_fragment_falls_back_to_internal() {
        let doc = ProblemDetails::new(StatusCode::BAD_REQUEST, "Odd", "odd").with_type("https://x/#");
        let problems = to_problems(&doc, &ProblemDetailsOptions::new());
        assert_eq!(problems[0].category(), ProblemCategory::InternalServerError);
        assert!(logs_contain("carries no type id"));
    }

    #[test]
    #[traced_test]
    fn unknown_item_status_is_kept_as_extension() {
        let doc = document(&json!({
            "type": "about:blank",
            "title": "Validation Failed",
            "status": 422,
            "detail": "many",
            "errors": [
                {"detail": "odd", "status": 418},
                {"detail": "plain"}
            ]
        }));
        let problems = to_problems(&doc, &ProblemDetailsOptions::new());
        assert_eq!(problems[0].category(), ProblemCategory::ValidationFailed);
        assert_eq!(problems[0].extension("status"), Some(&json!(418)));
        assert_eq!(problems[1].category(), ProblemCategory::ValidationFailed);
        assert!(problems[1].extension("status").is_none());
        assert!(logs_contain("unknown status"));
    }

    #[test]
    fn status_overrides_pick_the_category() {
        let doc = document(&json!({
            "type": "about:blank",
            "title": "Not Found",
            "status": 404,
            "detail": "many",
            "not_found": [{"detail": "gone", "pointer": "#/items/0"}],
            "errors": [{"detail": "boom", "status": 500, "pointer": "#/items/1/name"}]
        }));
        let problems = to_problems(&doc, &ProblemDetailsOptions::new());
        assert_eq!(problems[0].category(), ProblemCategory::NotFound);
        assert_eq!(problems[0].property(), Some("items[0]"));
        assert_eq!(problems[1].category(), ProblemCategory::InternalServerError);
        assert_eq!(problems[1].property(), Some("items[1].name"));
        // Envelope status 404 is no errors category, so unknown items fall back.
        assert_eq!(
            errors_fallback(&doc, &ProblemDetailsOptions::new()),
            ProblemCategory::InvalidParameter
        );
    }
}
