//! The input stream as a chain of decoded chunks.
//!
//! [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
//!
//! Each call to `feed` appends one chunk; earlier chunks are never copied or
//! rescanned. Positions are global code point indices into the
//! preprocessed stream, so a [`Span`] may start in one chunk and end in a
//! later one.

use std::collections::VecDeque;

use weft_common::{Result, Span, Status};

#[derive(Debug)]
struct Chunk {
    /// Global position of `chars[0]`.
    start: usize,
    chars: Box<[char]>,
}

impl Chunk {
    fn end(&self) -> usize {
        self.start + self.chars.len()
    }
}

/// Append-only chain of preprocessed input.
#[derive(Debug, Default)]
pub struct InputChain {
    chunks: VecDeque<Chunk>,
    end: usize,
    released: usize,
    /// The previous chunk ended in U+000D, so a leading U+000A belongs to
    /// the same newline.
    pending_cr: bool,
}

impl InputChain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `text`.
    ///
    /// "Before the tokenization stage, the input stream must be
    /// preprocessed by normalizing newlines." Every CR LF pair becomes a
    /// single LF and every remaining CR becomes LF, including pairs split
    /// across two chunks.
    ///
    /// # Errors
    /// Returns [`Status::MemoryAllocation`] if the chunk cannot be stored.
    pub fn push_str(&mut self, text: &str) -> Result<()> {
        let mut chars = Vec::new();
        Status::reserve(&mut chars, text.len())?;
        for c in text.chars() {
            if std::mem::take(&mut self.pending_cr) && c == '\n' {
                continue;
            }
            if c == '\r' {
                self.pending_cr = true;
                chars.push('\n');
            } else {
                chars.push(c);
            }
        }
        if chars.is_empty() {
            return Ok(());
        }
        let chunk = Chunk {
            start: self.end,
            chars: chars.into_boxed_slice(),
        };
        self.end = chunk.end();
        self.chunks
            .try_reserve(1)
            .map_err(|_| Status::MemoryAllocation)?;
        self.chunks.push_back(chunk);
        Ok(())
    }

    /// One past the last position appended so far.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Code point at `pos`, if it has been appended and not released.
    #[must_use]
    pub fn get(&self, pos: usize) -> Option<char> {
        if pos >= self.end || pos < self.released {
            return None;
        }
        let index = self.chunks.partition_point(|chunk| chunk.end() <= pos);
        let chunk = self.chunks.get(index)?;
        chunk.chars.get(pos - chunk.start).copied()
    }

    /// Whether the code points from `pos` onward begin with `expected`.
    ///
    /// Returns `None` when the chain ends before a decision can be made.
    #[must_use]
    pub fn starts_with(&self, pos: usize, expected: &str, ignore_case: bool) -> Option<bool> {
        for (offset, want) in expected.chars().enumerate() {
            let got = self.get(pos + offset)?;
            let same = if ignore_case {
                got.eq_ignore_ascii_case(&want)
            } else {
                got == want
            };
            if !same {
                return Some(false);
            }
        }
        Some(true)
    }

    /// Materialize the text covered by `span`, walking every chunk it
    /// touches. Returns `None` if part of the span was released.
    #[must_use]
    pub fn text(&self, span: Span) -> Option<String> {
        if span.start < self.released || span.end > self.end {
            return None;
        }
        let mut out = String::new();
        let first = self.chunks.partition_point(|chunk| chunk.end() <= span.start);
        for chunk in self.chunks.iter().skip(first) {
            if chunk.start >= span.end {
                break;
            }
            let from = span.start.max(chunk.start) - chunk.start;
            let to = span.end.min(chunk.end()) - chunk.start;
            out.extend(&chunk.chars[from..to]);
        }
        Some(out)
    }

    /// Drop every chunk that lies entirely before `pos`.
    pub fn release_before(&mut self, pos: usize) {
        while self.chunks.front().is_some_and(|chunk| chunk.end() <= pos) {
            if let Some(chunk) = self.chunks.pop_front() {
                self.released = chunk.end();
            }
        }
    }

    /// Forget all input.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_cross_chunks() {
        let mut input = InputChain::new();
        let _ = input.push_str("<ti").ok();
        let _ = input.push_str("tle>").ok();
        assert_eq!(input.end(), 7);
        assert_eq!(input.get(3), Some('t'));
        assert_eq!(input.text(Span::new(1, 6)).as_deref(), Some("title"));
    }

    #[test]
    fn test_crlf_split_across_chunks_is_one_newline() {
        let mut input = InputChain::new();
        let _ = input.push_str("a\r").ok();
        let _ = input.push_str("\nb\r\rc").ok();
        assert_eq!(input.text(Span::new(0, input.end())).as_deref(), Some("a\nb\n\nc"));
    }

    #[test]
    fn test_starts_with_reports_undecided() {
        let mut input = InputChain::new();
        let _ = input.push_str("<!DOC").ok();
        assert_eq!(input.starts_with(2, "DOCTYPE", true), None);
        assert_eq!(input.starts_with(2, "--", false), Some(false));
        let _ = input.push_str("type").ok();
        assert_eq!(input.starts_with(2, "DOCTYPE", true), Some(true));
    }

    #[test]
    fn test_release_before_keeps_later_chunks() {
        let mut input = InputChain::new();
        let _ = input.push_str("abc").ok();
        let _ = input.push_str("def").ok();
        input.release_before(4);
        assert_eq!(input.get(1), None);
        assert_eq!(input.get(4), Some('e'));
        assert_eq!(input.text(Span::new(0, 2)), None);
    }
}
