use std::fmt;

use thiserror::Error;

/// Identifies a file registered in a [`SourceContext`].
#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct SourceFileId(u32);

impl SourceFileId {
    #[must_use]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("no source registered for file id `{0}`")]
    UnknownFile(u32),
}

/// A point in a registered source file.
///
/// `line` and `column` are 1-based; zero means the component is absent.
/// Synthetic nodes carry a location with no file at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub file: Option<SourceFileId>,
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub const NULL: Self = Self {
        file: None,
        offset: 0,
        line: 0,
        column: 0,
    };

    #[must_use]
    pub fn new(file: SourceFileId, offset: usize, line: u32, column: u32) -> Self {
        debug_assert!(line != 0 || column == 0);
        Self {
            file: Some(file),
            offset,
            line,
            column,
        }
    }
}

/// A half-open byte interval in a source file, with line/column metadata
/// precomputed at its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRange {
    pub start: Location,
    pub length: usize,
}

impl SourceRange {
    /// The canonical range for synthetic nodes. Carrying it disables sample
    /// rendering.
    pub const NULL: Self = Self {
        start: Location::NULL,
        length: 0,
    };

    #[must_use]
    pub fn new(start: Location, length: usize) -> Self {
        Self { start, length }
    }

    /// Whether the range points at real, sampleable source text.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.start.file.is_some() && self.start.line != 0 && self.start.column != 0
    }
}

/// One registered source file with its eagerly loaded contents.
#[derive(Debug, Clone)]
pub struct Source {
    path: String,
    text: String,
    /// Byte offset of the start of each line. `line_starts[0]` is always 0.
    line_starts: Vec<usize>,
}

impl Source {
    fn new(path: String, text: String) -> Self {
        let mut line_starts = vec![0usize];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            path,
            text,
            line_starts,
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Convert a byte offset to a 1-based `(line, column)` pair.
    #[must_use]
    pub fn line_column(&self, offset: usize) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next.saturating_sub(1),
        };
        let column = offset.saturating_sub(self.line_starts[line]);
        (line as u32 + 1, column as u32 + 1)
    }

    /// The exact bytes covered by `[offset, offset + length)`, or `None` when
    /// the interval falls outside the file.
    #[must_use]
    pub fn slice(&self, offset: usize, length: usize) -> Option<&str> {
        self.text.get(offset..offset.checked_add(length)?)
    }

    /// The text of the whole lines covered by a range, from the start of the
    /// range's first line through the end of its last line, without the final
    /// line terminator. Used for diagnostic samples.
    #[must_use]
    pub fn enclosing_lines(&self, range: &SourceRange) -> Option<&str> {
        if !range.is_resolved() {
            return None;
        }
        let line_start = range
            .start
            .offset
            .checked_sub(range.start.column as usize - 1)?;
        let end = range.start.offset.checked_add(range.length.max(1))?;
        let mut line_end = self.text.len();
        for (i, b) in self.text.get(end - 1..)?.bytes().enumerate() {
            if b == b'\n' {
                line_end = end - 1 + i;
                break;
            }
        }
        self.text.get(line_start..line_end)
    }
}

/// Owns every source file the compiler has read, for the lifetime of the
/// compilation. Ranges hold non-owning views into it.
#[derive(Debug, Clone, Default)]
pub struct SourceContext {
    files: Vec<Source>,
}

impl SourceContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file's contents, returning the id future locations refer to.
    pub fn add_file(&mut self, path: impl Into<String>, text: impl Into<String>) -> SourceFileId {
        let id = SourceFileId(self.files.len() as u32);
        self.files.push(Source::new(path.into(), text.into()));
        id
    }

    pub fn get(&self, id: SourceFileId) -> Result<&Source, SourceError> {
        self.files
            .get(id.index())
            .ok_or(SourceError::UnknownFile(id.0))
    }

    /// Build a fully resolved location for a byte offset in a registered file.
    pub fn location_of(&self, id: SourceFileId, offset: usize) -> Result<Location, SourceError> {
        let source = self.get(id)?;
        let (line, column) = source.line_column(offset);
        Ok(Location::new(id, offset, line, column))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (0, _) => write!(f, "?"),
            (line, 0) => write!(f, "{line}"),
            (line, column) => write!(f, "{line}:{column}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with(text: &str) -> (SourceContext, SourceFileId) {
        let mut context = SourceContext::new();
        let id = context.add_file("test.frg", text);
        (context, id)
    }

    #[test]
    fn test_line_column() {
        let (context, id) = context_with("fn f() -> u8 {\n  return 0u8;\n}\n");
        let source = context.get(id).unwrap();
        assert_eq!((1, 1), source.line_column(0));
        assert_eq!((1, 4), source.line_column(3));
        assert_eq!((2, 1), source.line_column(15));
        assert_eq!((2, 3), source.line_column(17));
        assert_eq!((3, 1), source.line_column(29));
    }

    #[test]
    fn test_slice() {
        let (context, id) = context_with("fn f() -> u8 {\n  return 0u8;\n}\n");
        let source = context.get(id).unwrap();
        assert_eq!(Some("return"), source.slice(17, 6));
        assert_eq!(None, source.slice(17, 10_000));
    }

    #[test]
    fn test_enclosing_lines_single() {
        let (context, id) = context_with("fn f() -> u8 {\n  return 0u8;\n}\n");
        let range = SourceRange::new(context.location_of(id, 24).unwrap(), 3);
        let source = context.get(id).unwrap();
        assert_eq!(Some("  return 0u8;"), source.enclosing_lines(&range));
    }

    #[test]
    fn test_enclosing_lines_null_range() {
        let (context, id) = context_with("x\n");
        let source = context.get(id).unwrap();
        assert_eq!(None, source.enclosing_lines(&SourceRange::NULL));
    }

    #[test]
    fn test_unknown_file() {
        let context = SourceContext::new();
        assert!(context.get(SourceFileId(7)).is_err());
    }
}
