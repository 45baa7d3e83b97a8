//! Source - validated, immutable source buffers.
//!
//! A [`Source`] wraps the text of a single compilation unit. Construction
//! enforces the process-wide input limits so that everything downstream can
//! assume a well-formed, bounded buffer. The buffer also lazily exposes a
//! line-start table for mapping byte offsets to human-readable positions.

use std::cell::OnceCell;

use thiserror::Error;

/// Maximum number of characters accepted in a single source buffer.
pub const MAX_SOURCE_CHARS: usize = 10 * 1024 * 1024;

/// Maximum number of bytes accepted in a single source buffer.
///
/// Sized for the worst common case of three UTF-8 bytes per character over
/// [`MAX_SOURCE_CHARS`] characters, rounded to 50 MiB.
pub const MAX_SOURCE_BYTES: usize = 50 * 1024 * 1024;

/// Rejection reasons for source text, raised synchronously at parser
/// construction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The source text is empty or contains only whitespace.
    #[error("source text is empty or contains only whitespace")]
    Empty,

    /// The source text exceeds [`MAX_SOURCE_CHARS`].
    #[error("source text has {0} characters, exceeding the limit of {MAX_SOURCE_CHARS}")]
    TooManyChars(usize),

    /// The source text exceeds [`MAX_SOURCE_BYTES`].
    #[error("source text has {0} bytes, exceeding the limit of {MAX_SOURCE_BYTES}")]
    TooLarge(usize),
}

/// An immutable, validated source buffer.
///
/// # Examples
///
/// ```
/// use jfmt_util::Source;
///
/// let source = Source::new("class A {}".to_string()).unwrap();
/// assert_eq!(source.len(), 10);
/// assert_eq!(source.line_col(6), (1, 7));
/// ```
pub struct Source {
    text: String,
    /// Byte offsets of line starts, built on first line/column query.
    line_starts: OnceCell<Vec<u32>>,
}

impl Source {
    /// Validates and wraps source text.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when the text is empty, whitespace-only,
    /// or exceeds the character or byte limits.
    pub fn new(text: String) -> Result<Self, SourceError> {
        Self::validate(&text)?;
        Ok(Self {
            text,
            line_starts: OnceCell::new(),
        })
    }

    /// Checks the input limits without taking ownership of the text.
    ///
    /// Callers that only borrow their source (the parser) validate through
    /// this and keep working on the borrowed slice.
    pub fn validate(text: &str) -> Result<(), SourceError> {
        if text.len() > MAX_SOURCE_BYTES {
            return Err(SourceError::TooLarge(text.len()));
        }

        let char_count = text.chars().count();
        if char_count > MAX_SOURCE_CHARS {
            return Err(SourceError::TooManyChars(char_count));
        }

        if text.trim().is_empty() {
            return Err(SourceError::Empty);
        }

        Ok(())
    }

    /// Returns the source text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the length of the source in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true if the buffer is empty. Always false for a validated
    /// `Source`; present for API completeness.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Maps a byte offset to a 1-based `(line, column)` pair.
    ///
    /// The column is measured in bytes from the line start. Offsets past the
    /// end of the buffer map to the last position.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let starts = self.line_starts.get_or_init(|| {
            let mut starts = vec![0u32];
            for (i, b) in self.text.bytes().enumerate() {
                if b == b'\n' {
                    starts.push(i as u32 + 1);
                }
            }
            starts
        });

        let offset = (offset as usize).min(self.text.len()) as u32;
        let line = match starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        (line as u32 + 1, offset - starts[line] + 1)
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("len", &self.text.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_source() {
        let source = Source::new("class A {}".to_string()).unwrap();
        assert_eq!(source.text(), "class A {}");
        assert_eq!(source.len(), 10);
    }

    #[test]
    fn test_empty_source_rejected() {
        assert_eq!(Source::new(String::new()).unwrap_err(), SourceError::Empty);
    }

    #[test]
    fn test_whitespace_only_rejected() {
        let err = Source::new("  \n\t  ".to_string()).unwrap_err();
        assert_eq!(err, SourceError::Empty);
    }

    #[test]
    fn test_line_col_first_line() {
        let source = Source::new("abc\ndef\nghi".to_string()).unwrap();
        assert_eq!(source.line_col(0), (1, 1));
        assert_eq!(source.line_col(2), (1, 3));
    }

    #[test]
    fn test_line_col_later_lines() {
        let source = Source::new("abc\ndef\nghi".to_string()).unwrap();
        assert_eq!(source.line_col(4), (2, 1));
        assert_eq!(source.line_col(8), (3, 1));
        assert_eq!(source.line_col(10), (3, 3));
    }

    #[test]
    fn test_line_col_past_end_clamps() {
        let source = Source::new("ab".to_string()).unwrap();
        assert_eq!(source.line_col(100), (1, 3));
    }
}
