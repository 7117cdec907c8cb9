//! Parse-error records.
//!
//! Every parsing session owns an append-only list of `(code, position)`
//! pairs. Recording an error never changes control flow; the parser applies
//! the recovery its grammar defines and carries on.

use std::fmt;

/// One recoverable deviation from a grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParseError<C> {
    /// What went wrong.
    pub code: C,
    /// Input position (in code points) where it was detected.
    pub position: usize,
}

impl<C: fmt::Display> fmt::Display for ParseError<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.code, self.position)
    }
}

/// Append-only parse-error sink.
#[derive(Debug, Clone)]
pub struct ParseErrors<C> {
    entries: Vec<ParseError<C>>,
}

impl<C> Default for ParseErrors<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<C: Copy + fmt::Display> ParseErrors<C> {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `code` at `position`.
    pub fn push(&mut self, code: C, position: usize) {
        log::debug!(target: "parse_error", "{code} at {position}");
        self.entries.push(ParseError { code, position });
    }

    /// All recorded errors in the order they were detected.
    #[must_use]
    pub fn as_slice(&self) -> &[ParseError<C>] {
        &self.entries
    }

    /// Just the codes, in order.
    pub fn codes(&self) -> impl Iterator<Item = C> + '_ {
        self.entries.iter().map(|e| e.code)
    }

    /// Number of recorded errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
    #[strum(serialize_all = "kebab-case")]
    enum Code {
        EofInTag,
        UnexpectedNullCharacter,
    }

    #[test]
    fn test_errors_keep_detection_order() {
        let mut errors = ParseErrors::new();
        errors.push(Code::UnexpectedNullCharacter, 3);
        errors.push(Code::EofInTag, 9);

        let codes: Vec<Code> = errors.codes().collect();
        assert_eq!(codes, vec![Code::UnexpectedNullCharacter, Code::EofInTag]);
        assert_eq!(errors.as_slice()[1].position, 9);
        assert_eq!(errors.as_slice()[1].to_string(), "eof-in-tag at 9");
    }
}
