//! Source location tracking

use std::fmt;
use std::sync::Arc;

/// Source position of a token or syntax node.
///
/// A zero `line` means the position is unknown, which is how synthetic
/// nodes (derived by the parser or the checker) are marked.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Pos {
    /// File the position belongs to
    pub filename: Arc<str>,
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed, in bytes)
    pub column: u16,
}

impl Pos {
    /// Create a new position
    #[inline]
    pub fn new(
        filename: Arc<str>,
        line: u32,
        column: u16,
    ) -> Self {
        Self {
            filename,
            line,
            column,
        }
    }

    /// Create a synthetic position
    #[inline]
    pub fn dummy() -> Self {
        Self {
            filename: Arc::from(""),
            line: 0,
            column: 0,
        }
    }

    /// Check if this position is synthetic
    #[inline]
    pub fn is_dummy(&self) -> bool {
        self.line == 0
    }
}

impl Default for Pos {
    fn default() -> Self {
        Self::dummy()
    }
}

impl fmt::Display for Pos {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.is_dummy() {
            return write!(f, "{}", self.filename);
        }
        if self.filename.is_empty() {
            write!(f, "{}:{}", self.line, self.column)
        } else {
            write!(f, "{}:{}:{}", self.filename, self.line, self.column)
        }
    }
}

impl fmt::Debug for Pos {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Pos({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_display() {
        let pos = Pos::new(Arc::from("main.ng"), 10, 20);
        assert_eq!(pos.to_string(), "main.ng:10:20");
        let anon = Pos::new(Arc::from(""), 3, 4);
        assert_eq!(anon.to_string(), "3:4");
    }

    #[test]
    fn test_pos_dummy() {
        let pos = Pos::dummy();
        assert!(pos.is_dummy());
        assert_eq!(pos, Pos::default());
    }
}
