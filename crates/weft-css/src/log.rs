//! Structured CSS diagnostics.
//!
//! Recovered problems in stylesheets and selectors are recorded here in
//! addition to being logged through the `log` facade, so callers can list
//! them after a parse without installing a logger.

use std::fmt;

use serde::Serialize;
use strum_macros::{Display, IntoStaticStr};
use weft_common::{Result, Status};

use crate::tokenizer::{CssToken, token_to_string};

/// Kind of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, Serialize)]
#[strum(serialize_all = "title_case")]
pub enum CssLogKind {
    /// The input breaks the grammar at this point.
    Syntax,
    /// A recognized feature this engine does not implement.
    NotSupported,
    /// A name that matches nothing known.
    Unknown,
}

/// One diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CssLogMessage {
    /// What kind of problem this is.
    pub kind: CssLogKind,
    /// Component that reported it, e.g. `Selectors`.
    pub module: &'static str,
    /// Human-readable detail.
    pub text: String,
    /// Position (in code points) of the offending token.
    pub offset: usize,
}

impl fmt::Display for CssLogMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CssLogKind::Syntax => write!(f, "Syntax error. {}. {}", self.module, self.text),
            CssLogKind::NotSupported => write!(f, "{}. Not supported: {}", self.module, self.text),
            CssLogKind::Unknown => write!(f, "{}. Unknown: {}", self.module, self.text),
        }
    }
}

/// Append-only list of diagnostics for one parse session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CssLog {
    messages: Vec<CssLogMessage>,
}

impl CssLog {
    /// Create an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Record a message.
    ///
    /// # Errors
    /// [`Status::MemoryAllocation`] if the log cannot grow.
    pub fn push(
        &mut self,
        kind: CssLogKind,
        module: &'static str,
        text: impl Into<String>,
        offset: usize,
    ) -> Result<()> {
        Status::reserve(&mut self.messages, 1)?;
        self.messages.push(CssLogMessage {
            kind,
            module,
            text: text.into(),
            offset,
        });
        Ok(())
    }

    /// Record an "Unexpected token" syntax error for `token`.
    ///
    /// # Errors
    /// [`Status::MemoryAllocation`] if the log cannot grow.
    pub fn unexpected_token(
        &mut self,
        module: &'static str,
        token: &CssToken,
        offset: usize,
    ) -> Result<()> {
        let text = if token.is_eof() {
            "Unexpected end of input".to_string()
        } else {
            format!("Unexpected token: {}", token_to_string(token)?)
        };
        self.push(CssLogKind::Syntax, module, text, offset)
    }

    /// Messages in the order they were recorded.
    #[must_use]
    pub fn messages(&self) -> &[CssLogMessage] {
        &self.messages
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages of one kind.
    pub fn of_kind(&self, kind: CssLogKind) -> impl Iterator<Item = &CssLogMessage> {
        self.messages.iter().filter(move |m| m.kind == kind)
    }

    /// Move the messages of `other` into this log, keeping source order.
    ///
    /// # Errors
    /// [`Status::MemoryAllocation`] if the log cannot grow.
    pub fn merge(&mut self, other: Self) -> Result<()> {
        Status::reserve(&mut self.messages, other.messages.len())?;
        self.messages.extend(other.messages);
        self.messages.sort_by_key(|message| message.offset);
        Ok(())
    }

    /// Forget all messages.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_text() {
        let mut log = CssLog::new();
        log.unexpected_token("Selectors", &CssToken::percentage(1.0, Some(1)), 4)
            .unwrap();
        log.push(CssLogKind::NotSupported, "Selectors", "Pseudo-class: :visited", 0)
            .unwrap();
        assert_eq!(
            log.messages()[0].to_string(),
            "Syntax error. Selectors. Unexpected token: 1%"
        );
        assert_eq!(
            log.messages()[1].to_string(),
            "Selectors. Not supported: Pseudo-class: :visited"
        );
        assert_eq!(log.of_kind(CssLogKind::Syntax).count(), 1);
    }
}
