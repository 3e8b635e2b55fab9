//! Dotted-path joining and collection-index rewriting.
//!
//! Paths are dot-separated strings; a segment is either a member name or a
//! collection marker (`#` while unresolved, `#<n>` once an index is known).
//! The empty string is the root. All functions here are pure.

use std::borrow::Cow;

/// The segment marking a collection item whose index is not yet applied.
pub const COLLECTION_ITEM_SEGMENT: &str = "#";

/// Join `segment` onto `base` with a single dot.
///
/// An empty segment leaves `base` unchanged; an empty base yields exactly
/// `segment`, with no leading dot.
pub fn resolve_next_level_path(base: &str, segment: &str) -> String {
    if segment.is_empty() {
        return base.to_string();
    }
    if base.is_empty() {
        return segment.to_string();
    }
    format!("{base}.{segment}")
}

/// Join the `#` collection placeholder onto `base`.
pub fn resolve_collection_item_path(base: &str) -> String {
    resolve_next_level_path(base, COLLECTION_ITEM_SEGMENT)
}

/// Rewrite the last bare `#` segment of `path` to `#<index>`.
///
/// Nested collections carry one bare placeholder per unresolved level;
/// callers resolve them one at a time, most-recently-entered first. A path
/// without a bare placeholder is returned unchanged.
pub fn apply_index_to_path(path: &str, index: usize) -> String {
    let mut segments: Vec<Cow<'_, str>> = path.split('.').map(Cow::Borrowed).collect();
    match segments.iter().rposition(|s| s == COLLECTION_ITEM_SEGMENT) {
        Some(pos) => {
            segments[pos] = Cow::Owned(format!("#{index}"));
            segments.join(".")
        }
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_from_root() {
        assert_eq!(resolve_next_level_path("", "Name"), "Name");
    }

    #[test]
    fn test_resolve_nested() {
        assert_eq!(resolve_next_level_path("Author", "Email"), "Author.Email");
    }

    #[test]
    fn test_resolve_empty_segment_is_identity() {
        assert_eq!(resolve_next_level_path("Author.Email", ""), "Author.Email");
        assert_eq!(resolve_next_level_path("", ""), "");
    }

    #[test]
    fn test_resolve_is_associative_over_segments() {
        let joined = resolve_next_level_path(&resolve_next_level_path("A", "B"), "C");
        assert_eq!(joined, "A.B.C");
    }

    #[test]
    fn test_collection_item_path() {
        assert_eq!(resolve_collection_item_path(""), "#");
        assert_eq!(resolve_collection_item_path("Tags"), "Tags.#");
    }

    #[test]
    fn test_apply_index_rewrites_trailing_placeholder() {
        assert_eq!(apply_index_to_path("Tags.#", 3), "Tags.#3");
        assert_eq!(apply_index_to_path("#", 0), "#0");
    }

    #[test]
    fn test_apply_index_rewrites_last_placeholder_first() {
        // Innermost collection resolves first.
        let once = apply_index_to_path("Rows.#.Cells.#", 7);
        assert_eq!(once, "Rows.#.Cells.#7");
        let twice = apply_index_to_path(&once, 2);
        assert_eq!(twice, "Rows.#2.Cells.#7");
    }

    #[test]
    fn test_apply_index_without_placeholder_is_identity() {
        assert_eq!(apply_index_to_path("Tags.#3", 9), "Tags.#3");
        assert_eq!(apply_index_to_path("", 1), "");
    }
}
