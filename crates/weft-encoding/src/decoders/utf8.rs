//! [§ 8.1.1 UTF-8 decoder](https://encoding.spec.whatwg.org/#utf-8-decoder)

use super::{Handled, Handler};
use crate::decoder::Prepend;

#[derive(Debug)]
pub(crate) struct Utf8Decoder {
    code_point: u32,
    bytes_seen: u8,
    bytes_needed: u8,
    lower_boundary: u8,
    upper_boundary: u8,
}

impl Default for Utf8Decoder {
    fn default() -> Self {
        Self {
            code_point: 0,
            bytes_seen: 0,
            bytes_needed: 0,
            lower_boundary: 0x80,
            upper_boundary: 0xBF,
        }
    }
}

impl Handler for Utf8Decoder {
    fn handle(&mut self, byte: Option<u8>, prepend: &mut Prepend) -> Handled {
        let Some(byte) = byte else {
            // "If byte is end-of-queue and UTF-8 bytes needed is not 0, set
            // UTF-8 bytes needed to 0 and return error."
            if self.bytes_needed != 0 {
                *self = Self::default();
                return Handled::Error;
            }
            return Handled::Finished;
        };

        if self.bytes_needed == 0 {
            match byte {
                0x00..=0x7F => return Handled::Codepoint(u32::from(byte)),
                0xC2..=0xDF => {
                    self.bytes_needed = 1;
                    self.code_point = u32::from(byte & 0x1F);
                }
                0xE0..=0xEF => {
                    if byte == 0xE0 {
                        self.lower_boundary = 0xA0;
                    }
                    if byte == 0xED {
                        self.upper_boundary = 0x9F;
                    }
                    self.bytes_needed = 2;
                    self.code_point = u32::from(byte & 0x0F);
                }
                0xF0..=0xF4 => {
                    if byte == 0xF0 {
                        self.lower_boundary = 0x90;
                    }
                    if byte == 0xF4 {
                        self.upper_boundary = 0x8F;
                    }
                    self.bytes_needed = 3;
                    self.code_point = u32::from(byte & 0x07);
                }
                _ => return Handled::Error,
            }
            return Handled::Continue;
        }

        // "If byte is not in the range UTF-8 lower boundary to UTF-8 upper
        // boundary, inclusive, then: set everything back, restore byte to
        // ioQueue and return error."
        if byte < self.lower_boundary || byte > self.upper_boundary {
            *self = Self::default();
            prepend.push(&[byte]);
            return Handled::Error;
        }

        self.lower_boundary = 0x80;
        self.upper_boundary = 0xBF;
        self.code_point = (self.code_point << 6) | u32::from(byte & 0x3F);
        self.bytes_seen += 1;

        if self.bytes_seen != self.bytes_needed {
            return Handled::Continue;
        }

        let code_point = self.code_point;
        *self = Self::default();
        Handled::Codepoint(code_point)
    }
}
