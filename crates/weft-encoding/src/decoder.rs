//! Resumable decoding.
//!
//! A [`Decoder`] is fed byte windows of any size. Each call to
//! [`Decoder::decode`] consumes bytes from `input[*cursor..]` until it can
//! report one code point, an error, or that the window ran out. Partial
//! sequences stay in the decoder, so the same bytes split at any boundary
//! decode to the same sequence of results.

use crate::decoders::{self, Handled, Handler};
use crate::encoding::Encoding;

/// Outcome of one decode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeResult {
    /// A complete code point.
    Codepoint(char),
    /// The window is exhausted; call again with more bytes. After
    /// [`Decoder::finish`] this means the stream is fully drained.
    Continue,
    /// The bytes just consumed are invalid. Callers substitute U+FFFD.
    /// At least one byte has been taken from the input or the decoder's
    /// own queue, so repeated calls always make progress.
    Error,
}

/// Bytes handed back to the decoder by the "prepend to stream" steps.
///
/// Stored reversed so the next byte to read is at the end.
#[derive(Debug, Default)]
pub(crate) struct Prepend {
    stack: Vec<u8>,
}

impl Prepend {
    /// Prepend `bytes` so that `bytes[0]` is read next.
    pub(crate) fn push(&mut self, bytes: &[u8]) {
        self.stack.extend(bytes.iter().rev());
    }

    fn pop(&mut self) -> Option<u8> {
        self.stack.pop()
    }

    fn clear(&mut self) {
        self.stack.clear();
    }
}

/// A streaming decoder bound to one encoding.
pub struct Decoder {
    encoding: Encoding,
    handler: Box<dyn Handler>,
    prepend: Prepend,
    pending: Option<char>,
    finished: bool,
}

impl std::fmt::Debug for Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("encoding", &self.encoding)
            .field("pending", &self.pending)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl Decoder {
    /// Create a decoder for `encoding` in its initial state.
    #[must_use]
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            handler: decoders::handler_for(encoding),
            prepend: Prepend::default(),
            pending: None,
            finished: false,
        }
    }

    /// Encoding this decoder reads.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Return to the initial state, dropping any partial sequence.
    pub fn reset(&mut self) {
        self.handler = decoders::handler_for(self.encoding);
        self.prepend.clear();
        self.pending = None;
        self.finished = false;
    }

    /// Decode the next code point from `input[*cursor..]`.
    ///
    /// Advances `*cursor` past every byte it consumed, including bytes that
    /// were only stored as part of an incomplete sequence.
    pub fn decode(&mut self, input: &[u8], cursor: &mut usize) -> DecodeResult {
        if let Some(c) = self.pending.take() {
            return DecodeResult::Codepoint(c);
        }
        if self.finished {
            *cursor = input.len();
            return DecodeResult::Continue;
        }

        loop {
            let byte = if let Some(byte) = self.prepend.pop() {
                byte
            } else if let Some(&byte) = input.get(*cursor) {
                *cursor += 1;
                byte
            } else {
                return DecodeResult::Continue;
            };

            let handled = self.handler.handle(Some(byte), &mut self.prepend);
            if let Some(result) = self.resolve(handled) {
                return result;
            }
            if self.finished {
                *cursor = input.len();
                return DecodeResult::Continue;
            }
        }
    }

    /// Signal end of stream and drain what remains.
    ///
    /// Call repeatedly until it returns [`DecodeResult::Continue`]: a
    /// truncated sequence produces one [`DecodeResult::Error`], and bytes
    /// the decoder queued for itself may still decode to code points.
    pub fn finish(&mut self) -> DecodeResult {
        if let Some(c) = self.pending.take() {
            return DecodeResult::Codepoint(c);
        }

        loop {
            if self.finished {
                return DecodeResult::Continue;
            }
            let byte = self.prepend.pop();
            let at_end = byte.is_none();
            let handled = self.handler.handle(byte, &mut self.prepend);

            if at_end && matches!(handled, Handled::Continue) {
                // A handler that neither finishes nor errors at end of
                // queue has nothing left to say.
                self.finished = true;
                return DecodeResult::Continue;
            }
            if let Some(result) = self.resolve(handled) {
                return result;
            }
        }
    }

    fn resolve(&mut self, handled: Handled) -> Option<DecodeResult> {
        match handled {
            Handled::Continue => None,
            Handled::Finished => {
                self.finished = true;
                None
            }
            Handled::Error => Some(DecodeResult::Error),
            Handled::Codepoint(cp) => Some(
                char::from_u32(cp).map_or(DecodeResult::Error, DecodeResult::Codepoint),
            ),
            Handled::Pair(first, second) => {
                self.pending = char::from_u32(second);
                Some(char::from_u32(first).map_or(DecodeResult::Error, DecodeResult::Codepoint))
            }
        }
    }

    /// Decode a whole window into `out`, replacing errors with U+FFFD.
    ///
    /// With `last` set the stream is finished afterwards. Returns whether
    /// any error was replaced.
    pub fn decode_into(&mut self, input: &[u8], last: bool, out: &mut String) -> bool {
        let mut had_errors = false;
        let mut cursor = 0;
        loop {
            match self.decode(input, &mut cursor) {
                DecodeResult::Codepoint(c) => out.push(c),
                DecodeResult::Error => {
                    had_errors = true;
                    out.push(char::REPLACEMENT_CHARACTER);
                }
                DecodeResult::Continue => break,
            }
        }
        if last {
            loop {
                match self.finish() {
                    DecodeResult::Codepoint(c) => out.push(c),
                    DecodeResult::Error => {
                        had_errors = true;
                        out.push(char::REPLACEMENT_CHARACTER);
                    }
                    DecodeResult::Continue => break,
                }
            }
        }
        if had_errors {
            log::debug!(target: "encoding", "{} input contained invalid sequences", self.encoding);
        }
        had_errors
    }
}

/// Decode a complete buffer.
///
/// [decode](https://encoding.spec.whatwg.org/#decode): a byte order mark
/// overrides `fallback`. Returns the text, the encoding actually used and
/// whether replacement characters were substituted.
#[must_use]
pub fn decode_to_string(fallback: Encoding, bytes: &[u8]) -> (String, Encoding, bool) {
    let (encoding, skip) = crate::encoding::sniff_bom(bytes).unwrap_or((fallback, 0));
    let mut decoder = Decoder::new(encoding);
    let mut out = String::with_capacity(bytes.len());
    let had_errors = decoder.decode_into(&bytes[skip..], true, &mut out);
    (out, encoding, had_errors)
}
