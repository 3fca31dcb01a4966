//! Source location types.

use serde::{Deserialize, Serialize};

/// A position within a source file.
///
/// - `line` is 1-indexed
/// - `column` is 0-indexed, in bytes
/// - `byte_offset` is the absolute byte position from the start of the file
///
/// # Examples
///
/// ```
/// use nv_core::SourceLocation;
///
/// let loc = SourceLocation::new(3, 0, 57);
/// assert_eq!(loc.to_string(), "3:0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Line number (1-indexed).
    pub line: u32,

    /// Column number (0-indexed, UTF-8 byte offset within the line).
    pub column: u32,

    /// Absolute byte offset from the start of the file.
    pub byte_offset: u32,
}

impl SourceLocation {
    /// Creates a new source location.
    #[inline]
    #[must_use]
    pub const fn new(line: u32, column: u32, byte_offset: u32) -> Self {
        Self {
            line,
            column,
            byte_offset,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_location_new() {
        let loc = SourceLocation::new(10, 5, 245);
        assert_eq!(loc.line, 10);
        assert_eq!(loc.column, 5);
        assert_eq!(loc.byte_offset, 245);
    }

    #[test]
    fn test_source_location_display() {
        assert_eq!(SourceLocation::new(12, 4, 300).to_string(), "12:4");
    }
}
