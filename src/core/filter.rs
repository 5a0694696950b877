//! List filtering shared by all entity types

use crate::core::entity::contains_ci;

/// Selection criteria applied to one entity type
///
/// Each entity module provides a `...Filter` struct implementing this; plain
/// closures work too.
pub trait Criteria<E> {
    fn matches(&self, entity: &E) -> bool;
}

impl<E, F> Criteria<E> for F
where
    F: Fn(&E) -> bool,
{
    fn matches(&self, entity: &E) -> bool {
        self(entity)
    }
}

/// `None` matches everything, otherwise the value must be equal
pub fn matches_opt<T: PartialEq>(wanted: Option<T>, actual: T) -> bool {
    wanted.map_or(true, |w| w == actual)
}

/// Free-text search: empty or absent query matches; otherwise any field
/// containing the query (case-insensitive) matches
pub fn matches_text(query: Option<&str>, fields: &[&str]) -> bool {
    match query.map(str::trim) {
        None | Some("") => true,
        Some(q) => fields.iter().any(|f| contains_ci(f, q)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_opt() {
        assert!(matches_opt(None, 3));
        assert!(matches_opt(Some(3), 3));
        assert!(!matches_opt(Some(2), 3));
    }

    #[test]
    fn test_matches_text_blank_query() {
        assert!(matches_text(None, &["anything"]));
        assert!(matches_text(Some("  "), &["anything"]));
    }

    #[test]
    fn test_matches_text_any_field() {
        assert!(matches_text(Some("garm"), &["Display", "Garmin"]));
        assert!(!matches_text(Some("boeing"), &["Display", "Garmin"]));
    }

    #[test]
    fn test_closure_criteria() {
        let even = |n: &u32| n % 2 == 0;
        assert!(Criteria::<u32>::matches(&even, &4));
        assert!(!Criteria::<u32>::matches(&even, &5));
    }
}
