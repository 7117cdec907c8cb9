//! Streaming serialization.
//!
//! Serializers never build one large string themselves. They hand pieces of
//! text to a write callback, which may append to a buffer, write to a file
//! or forward to a socket. A callback error aborts the serialization and is
//! returned unchanged.

use crate::status::{Result, Status};

/// Write-callback shape accepted by every serializer in the workspace.
pub trait Write {
    /// Accept the next piece of output.
    ///
    /// # Errors
    /// Implementations return a [`Status`] to abort serialization.
    fn write(&mut self, data: &str) -> Result<()>;

    /// Write a single character.
    ///
    /// # Errors
    /// Propagates the error of [`Write::write`].
    fn write_char(&mut self, c: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.write(c.encode_utf8(&mut buf))
    }
}

impl<F> Write for F
where
    F: FnMut(&str) -> Result<()>,
{
    fn write(&mut self, data: &str) -> Result<()> {
        self(data)
    }
}

/// Run `serialize` against an in-memory buffer and return the text.
///
/// # Errors
/// Returns the first error produced by `serialize`, or
/// [`Status::MemoryAllocation`] if the buffer cannot grow.
pub fn to_string_with<S>(serialize: S) -> Result<String>
where
    S: FnOnce(&mut dyn Write) -> Result<()>,
{
    let mut out = String::new();
    let mut sink = |data: &str| -> Result<()> {
        Status::reserve_str(&mut out, data.len())?;
        out.push_str(data);
        Ok(())
    };
    serialize(&mut sink)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_string_with_collects_pieces() {
        let text = to_string_with(|w| {
            w.write("a")?;
            w.write_char('b')?;
            w.write("cd")
        });
        assert_eq!(text, Ok("abcd".to_string()));
    }

    #[test]
    fn test_callback_error_stops_serialization() {
        let mut calls = 0;
        let mut failing = |_: &str| -> Result<()> {
            calls += 1;
            Err(Status::Failed)
        };
        let result = failing.write("x").and_then(|()| failing.write("y"));
        assert_eq!(result, Err(Status::Failed));
        assert_eq!(calls, 1);
    }
}
