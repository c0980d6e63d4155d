//! Entity lookup helpers.

use std::fmt::Display;

use crate::problem::Problem;
use crate::value_outcome::ValueOutcome;

/// Outcome of looking an entity up: the entity, or a not-found /
/// invalid-parameter problem.
pub type FindOutcome<T> = ValueOutcome<T>;

/// Turns an optional lookup by id into a [`FindOutcome`].
///
/// A blank id yields an `InvalidParameter` problem on property `id`; a
/// missing entity yields a `NotFound` problem on the same property.
pub fn find<T>(entity: Option<T>, entity_name: &str, id: impl Display) -> FindOutcome<T> {
    find_by(entity, entity_name, "id", id)
}

/// Turns an optional lookup by an arbitrary key into a [`FindOutcome`].
pub fn find_by<T>(
    entity: Option<T>,
    entity_name: &str,
    property: &str,
    key: impl Display,
) -> FindOutcome<T> {
    let key = key.to_string();
    if key.trim().is_empty() {
        return Problem::invalid_parameter(format!("{entity_name} {property} must not be empty."))
            .with_property(property)
            .into();
    }
    match entity {
        Some(entity) => ValueOutcome::Success(entity),
        None => Problem::not_found(format!(
            "{entity_name} with {property} '{key}' was not found."
        ))
        .with_property(property)
        .into(),
    }
}

/// Lookup extension for `Option`.
pub trait FindExt<T> {
    fn or_not_found(self, entity_name: &str, id: impl Display) -> FindOutcome<T>;
}

impl<T> FindExt<T> for Option<T> {
    fn or_not_found(self, entity_name: &str, id: impl Display) -> FindOutcome<T> {
        find(self, entity_name, id)
    }
}
