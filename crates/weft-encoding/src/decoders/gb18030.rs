//! [§ 10.2.1 gb18030 decoder](https://encoding.spec.whatwg.org/#gb18030-decoder)
//!
//! Also used for GBK. Four-byte sequences are `lead 0x81..=0xFE`,
//! `digit`, `0x81..=0xFE`, `digit`; a bad byte in any later position hands
//! the bytes after the lead back to the stream.

use super::{Handled, Handler};
use crate::decoder::Prepend;
use crate::index;

#[derive(Debug, Default)]
pub(crate) struct Gb18030Decoder {
    first: u8,
    second: u8,
    third: u8,
}

impl Gb18030Decoder {
    fn reset(&mut self) {
        self.first = 0;
        self.second = 0;
        self.third = 0;
    }
}

impl Handler for Gb18030Decoder {
    fn handle(&mut self, byte: Option<u8>, prepend: &mut Prepend) -> Handled {
        let Some(byte) = byte else {
            if self.first == 0 && self.second == 0 && self.third == 0 {
                return Handled::Finished;
            }
            self.reset();
            return Handled::Error;
        };

        if self.third != 0 {
            if !(0x30..=0x39).contains(&byte) {
                prepend.push(&[self.second, self.third, byte]);
                self.reset();
                return Handled::Error;
            }

            let pointer = (u32::from(self.first) - 0x81) * (10 * 126 * 10)
                + (u32::from(self.second) - 0x30) * (10 * 126)
                + (u32::from(self.third) - 0x81) * 10
                + u32::from(byte)
                - 0x30;
            self.reset();

            return index::gb18030_ranges(pointer).map_or(Handled::Error, Handled::Codepoint);
        }

        if self.second != 0 {
            if (0x81..=0xFE).contains(&byte) {
                self.third = byte;
                return Handled::Continue;
            }
            prepend.push(&[self.second, byte]);
            self.first = 0;
            self.second = 0;
            return Handled::Error;
        }

        if self.first != 0 {
            if (0x30..=0x39).contains(&byte) {
                self.second = byte;
                return Handled::Continue;
            }

            let lead = u32::from(self.first);
            self.first = 0;

            let offset = if byte < 0x7F { 0x40 } else { 0x41 };
            let pointer = match byte {
                0x40..=0x7E | 0x80..=0xFE => Some((lead - 0x81) * 190 + (u32::from(byte) - offset)),
                _ => None,
            };

            if let Some(code_point) = pointer.and_then(index::gb18030) {
                return Handled::Codepoint(code_point);
            }
            if byte.is_ascii() {
                prepend.push(&[byte]);
            }
            return Handled::Error;
        }

        match byte {
            0x00..=0x7F => Handled::Codepoint(u32::from(byte)),
            0x80 => Handled::Codepoint(0x20AC),
            0x81..=0xFE => {
                self.first = byte;
                Handled::Continue
            }
            _ => Handled::Error,
        }
    }
}
