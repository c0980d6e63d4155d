//! `Problems` to one `ProblemDetails` document.

use http::StatusCode;
use modkit_result::{Problem, ProblemCategory, Problems};
use serde_json::{Map, Value};

use crate::catalog::AGGREGATE_TYPE_ID;
use crate::options::ProblemDetailsOptions;
use crate::problem::{ErrorItem, ProblemDetails, is_reserved_member};

/// Which envelope a document was rendered with; logged on every conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Empty,
    Single,
    Grouped,
    Aggregate,
}

impl Shape {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Single => "single",
            Self::Grouped => "grouped",
            Self::Aggregate => "aggregate",
        }
    }
}

/// Collapses accumulated problems into one problem details document.
///
/// - one problem renders as itself, with no groups;
/// - several built-in problems render with the descriptor of the most severe
///   category and `not_found` / `errors` groups;
/// - as soon as a custom problem is among several, the fixed aggregate
///   envelope is used and every custom problem becomes an `inner_details`
///   document.
///
/// The function is total. An empty list, which a failing outcome never
/// holds, renders as an internal server error.
pub fn to_problem_details(problems: &Problems, options: &ProblemDetailsOptions) -> ProblemDetails {
    let (shape, doc) = match problems.iter().as_slice() {
        [] => {
            tracing::warn!("rendering problem details for an empty problem list");
            (Shape::Empty, empty_document(options))
        }
        [only] => (Shape::Single, single_document(only, options)),
        all if all.iter().any(is_custom) => (Shape::Aggregate, aggregate_document(all, options)),
        all => (Shape::Grouped, grouped_document(all, options)),
    };

    tracing::debug!(
        problems = problems.len(),
        status = doc.status.as_u16(),
        shape = shape.as_str(),
        "aggregated problem details"
    );
    doc
}

fn is_custom(problem: &Problem) -> bool {
    problem.category() == ProblemCategory::CustomProblem
}

/// Categories rendered as `errors` items, which carry a status.
pub(super) fn in_errors_group(category: ProblemCategory) -> bool {
    !matches!(
        category,
        ProblemCategory::NotFound | ProblemCategory::CustomProblem
    )
}

/// Most severe built-in category present, if any.
fn dominant_category<'a, I>(problems: I) -> Option<ProblemCategory>
where
    I: IntoIterator<Item = &'a Problem>,
{
    problems
        .into_iter()
        .map(Problem::category)
        .filter(|c| *c != ProblemCategory::CustomProblem)
        .max_by_key(|c| c.severity())
}

fn empty_document(options: &ProblemDetailsOptions) -> ProblemDetails {
    let descriptor = options
        .catalog
        .lookup_by_category(ProblemCategory::InternalServerError);
    ProblemDetails::new(
        descriptor.status_code(),
        &descriptor.title,
        &descriptor.description,
    )
    .with_type(options.type_url_for(descriptor, &descriptor.type_id))
}

/// Renders exactly one problem as a full document.
fn single_document(problem: &Problem, options: &ProblemDetailsOptions) -> ProblemDetails {
    let descriptor = options.catalog.describe(problem);
    let type_id = if is_custom(problem) {
        problem.type_id().unwrap_or(&descriptor.type_id)
    } else {
        &descriptor.type_id
    };

    // Problems that would be `errors` items keep their carried status here too.
    let status = carried_status(problem)
        .filter(|_| in_errors_group(problem.category()))
        .and_then(|s| StatusCode::from_u16(s).ok())
        .unwrap_or_else(|| descriptor.status_code());

    let mut doc = ProblemDetails::new(status, &descriptor.title, problem.detail())
        .with_type(options.type_url_for(descriptor, type_id));
    doc.pointer = pointer_of(problem, options);
    doc.extensions = extensions_of(problem);
    doc
}

fn grouped_document(problems: &[Problem], options: &ProblemDetailsOptions) -> ProblemDetails {
    let category = dominant_category(problems).unwrap_or(ProblemCategory::InternalServerError);
    let descriptor = options.catalog.lookup_by_category(category);

    let (not_found, errors) = group_items(problems, options);
    let mut doc = ProblemDetails::new(
        descriptor.status_code(),
        &descriptor.title,
        &descriptor.description,
    )
    .with_type(options.type_url_for(descriptor, &descriptor.type_id));
    doc.not_found = non_empty(not_found);
    doc.errors = non_empty(errors);
    doc
}

fn aggregate_document(problems: &[Problem], options: &ProblemDetailsOptions) -> ProblemDetails {
    let descriptor = options.catalog.aggregate();
    let status = dominant_category(problems).map_or_else(
        || descriptor.status_code(),
        |c| options.catalog.lookup_by_category(c).status_code(),
    );

    let (not_found, errors) = group_items(problems, options);
    let inner: Vec<ProblemDetails> = problems
        .iter()
        .filter(|p| is_custom(p))
        .map(|p| single_document(p, options))
        .collect();

    let mut doc = ProblemDetails::new(status, &descriptor.title, &descriptor.description)
        .with_type(options.type_url_for(descriptor, AGGREGATE_TYPE_ID));
    doc.not_found = non_empty(not_found);
    doc.errors = non_empty(errors);
    doc.inner_details = non_empty(inner);
    doc
}

/// Splits built-in problems into `not_found` and `errors` items, keeping
/// arrival order inside each group. Custom problems are skipped.
fn group_items(
    problems: &[Problem],
    options: &ProblemDetailsOptions,
) -> (Vec<ErrorItem>, Vec<ErrorItem>) {
    let mut not_found = Vec::new();
    let mut errors = Vec::new();
    for problem in problems {
        match problem.category() {
            ProblemCategory::CustomProblem => {}
            ProblemCategory::NotFound => not_found.push(item_of(problem, options)),
            category => {
                let status = carried_status(problem).unwrap_or_else(|| {
                    options.catalog.lookup_by_category(category).status
                });
                errors.push(item_of(problem, options).with_status(status));
            }
        }
    }
    (not_found, errors)
}

fn item_of(problem: &Problem, options: &ProblemDetailsOptions) -> ErrorItem {
    let mut item = ErrorItem::new(problem.detail());
    item.pointer = pointer_of(problem, options);
    item.extensions = extensions_of(problem);
    item
}

/// Integer `status` extension that overrides the category status.
fn carried_status(problem: &Problem) -> Option<u16> {
    problem
        .extension("status")
        .and_then(Value::as_u64)
        .and_then(|s| u16::try_from(s).ok())
        .filter(|s| StatusCode::from_u16(*s).is_ok())
}

fn pointer_of(problem: &Problem, options: &ProblemDetailsOptions) -> Option<String> {
    problem
        .property()
        .filter(|p| !p.is_empty())
        .map(|p| options.pointer_parser.property_to_pointer(p))
}

fn extensions_of(problem: &Problem) -> Map<String, Value> {
    problem
        .extensions()
        .map(|ext| {
            ext.iter()
                .filter(|(key, _)| !is_reserved_member(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default()
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}
