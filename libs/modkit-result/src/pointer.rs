//! Conversion between property paths and JSON pointers.
//!
//! A property path is the dotted/indexed notation used on [`Problem`](crate::Problem)
//! (`items[0].name`); the wire format uses JSON-pointer fragments
//! (`#/items/0/name`).

/// Strategy for translating property paths to and from JSON pointers.
pub trait PointerParser: Send + Sync {
    /// `items[0].name` to `#/items/0/name`.
    fn property_to_pointer(&self, property: &str) -> String;

    /// `#/items/0/name` to `items[0].name`.
    fn pointer_to_property(&self, pointer: &str) -> String;
}

/// The standard translation.
///
/// Delimiters `.`, `[` and `]` separate segments; empty segments are
/// dropped, so `a[0].b` yields `#/a/0/b` and a trailing delimiter leaves no
/// trailing empty segment. On the way back a purely numeric segment becomes
/// an index glued to the previous token.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPointerParser;

const POINTER_PREFIX: &str = "#/";

fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

impl PointerParser for DefaultPointerParser {
    fn property_to_pointer(&self, property: &str) -> String {
        let mut pointer = String::with_capacity(property.len() + POINTER_PREFIX.len());
        pointer.push_str(POINTER_PREFIX);
        let segments = property
            .split(['.', '[', ']'])
            .filter(|segment| !segment.is_empty());
        for (i, segment) in segments.enumerate() {
            if i > 0 {
                pointer.push('/');
            }
            pointer.push_str(segment);
        }
        pointer
    }

    fn pointer_to_property(&self, pointer: &str) -> String {
        let path = pointer.strip_prefix('#').unwrap_or(pointer);
        let path = path.strip_prefix('/').unwrap_or(path);
        let mut property = String::with_capacity(path.len() + 2);
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            if is_index(segment) {
                property.push('[');
                property.push_str(segment);
                property.push(']');
            } else {
                if !property.is_empty() {
                    property.push('.');
                }
                property.push_str(segment);
            }
        }
        property
    }
}
