//! Byte-range text edits collected against one source text.

use std::ops::Range;

/// A single replacement of a byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Byte range in the original text.
    pub range: Range<usize>,
    /// Text that replaces the range.
    pub replacement: String,
}

impl Edit {
    /// Replaces `range` with `replacement`.
    pub fn replace(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    /// Inserts `text` at byte `at`.
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at..at, text)
    }

    /// Deletes `range`.
    pub fn delete(range: Range<usize>) -> Self {
        Self::replace(range, String::new())
    }
}

/// Edits against one text, applied together.
///
/// Edits are applied in position order; insertions at the same position keep
/// the order they were added in. An edit overlapping an earlier one is
/// skipped.
#[derive(Debug, Default)]
pub struct EditSet {
    edits: Vec<Edit>,
}

/// The text produced by [`EditSet::apply`].
#[derive(Debug, PartialEq, Eq)]
pub struct Applied {
    /// The edited text.
    pub text: String,
    /// Number of edits dropped because they overlapped another edit.
    pub skipped: usize,
}

impl EditSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an edit.
    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Moves every edit of `other` into this set.
    pub fn append(&mut self, mut other: EditSet) {
        self.edits.append(&mut other.edits);
    }

    /// Returns `true` if no edits were added.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Number of edits added.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Applies every edit to `source`.
    ///
    /// Edits whose range falls outside `source` or off a char boundary are
    /// counted as skipped.
    pub fn apply(mut self, source: &str) -> Applied {
        self.edits.sort_by_key(|e| (e.range.start, e.range.end));

        let mut text = String::with_capacity(source.len());
        let mut cursor = 0;
        let mut skipped = 0;

        for edit in self.edits {
            let Range { start, end } = edit.range;
            let valid = start <= end
                && end <= source.len()
                && source.is_char_boundary(start)
                && source.is_char_boundary(end);
            if !valid || start < cursor {
                skipped += 1;
                continue;
            }
            text.push_str(&source[cursor..start]);
            text.push_str(&edit.replacement);
            cursor = end;
        }
        text.push_str(&source[cursor..]);

        Applied { text, skipped }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_insert_delete() {
        let mut edits = EditSet::new();
        edits.push(Edit::replace(6..11, "there"));
        edits.push(Edit::insert(0, ">> "));
        edits.push(Edit::delete(11..12));
        let applied = edits.apply("hello world!");
        assert_eq!(applied.text, ">> hello there");
        assert_eq!(applied.skipped, 0);
    }

    #[test]
    fn test_insertions_at_same_point_keep_order() {
        let mut edits = EditSet::new();
        edits.push(Edit::insert(3, "a"));
        edits.push(Edit::insert(3, "b"));
        assert_eq!(edits.apply("xyz").text, "xyzab");
    }

    #[test]
    fn test_overlap_is_skipped() {
        let mut edits = EditSet::new();
        edits.push(Edit::replace(0..5, "HELLO"));
        edits.push(Edit::replace(3..8, "nope"));
        let applied = edits.apply("hello world");
        assert_eq!(applied.text, "HELLO world");
        assert_eq!(applied.skipped, 1);
    }

    #[test]
    fn test_append_merges_sets() {
        let mut first = EditSet::new();
        first.push(Edit::insert(0, "a"));
        let mut second = EditSet::new();
        second.push(Edit::insert(1, "b"));
        first.append(second);
        assert_eq!(first.len(), 2);
        assert_eq!(first.apply("xy").text, "axby");
    }

    #[test]
    fn test_out_of_bounds_is_skipped() {
        let mut edits = EditSet::new();
        edits.push(Edit::replace(2..50, "x"));
        let applied = edits.apply("abc");
        assert_eq!(applied.text, "abc");
        assert_eq!(applied.skipped, 1);
    }
}
