//! [§ 11.3.1 Shift_JIS decoder](https://encoding.spec.whatwg.org/#shift_jis-decoder)

use super::{Handled, Handler};
use crate::decoder::Prepend;
use crate::index;

#[derive(Debug, Default)]
pub(crate) struct ShiftJisDecoder {
    lead: u8,
}

impl Handler for ShiftJisDecoder {
    fn handle(&mut self, byte: Option<u8>, prepend: &mut Prepend) -> Handled {
        let Some(byte) = byte else {
            if self.lead != 0 {
                self.lead = 0;
                return Handled::Error;
            }
            return Handled::Finished;
        };

        if self.lead != 0 {
            let lead = u32::from(self.lead);
            self.lead = 0;

            let offset = if byte < 0x7F { 0x40 } else { 0x41 };
            let lead_offset = if lead < 0xA0 { 0x81 } else { 0xC1 };
            let pointer = match byte {
                0x40..=0x7E | 0x80..=0xFC => {
                    Some((lead - lead_offset) * 188 + u32::from(byte) - offset)
                }
                _ => None,
            };

            // EUDC range maps straight onto the Private Use Area.
            if let Some(pointer @ 8836..=10715) = pointer {
                return Handled::Codepoint(0xE000 - 8836 + pointer);
            }

            if let Some(code_point) = pointer.and_then(index::jis0208) {
                return Handled::Codepoint(code_point);
            }
            if byte.is_ascii() {
                prepend.push(&[byte]);
            }
            return Handled::Error;
        }

        match byte {
            0x00..=0x80 => Handled::Codepoint(u32::from(byte)),
            0xA1..=0xDF => Handled::Codepoint(0xFF61 - 0xA1 + u32::from(byte)),
            0x81..=0x9F | 0xE0..=0xFC => {
                self.lead = byte;
                Handled::Continue
            }
            _ => Handled::Error,
        }
    }
}
