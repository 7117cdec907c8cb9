//! [§ 12.1.1 Big5 decoder](https://encoding.spec.whatwg.org/#big5-decoder)

use super::{Handled, Handler};
use crate::decoder::Prepend;
use crate::index;

#[derive(Debug, Default)]
pub(crate) struct Big5Decoder {
    lead: u8,
}

impl Handler for Big5Decoder {
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

            let offset = if byte < 0x7F { 0x40 } else { 0x62 };
            let pointer = match byte {
                0x40..=0x7E | 0xA1..=0xFE => Some((lead - 0x81) * 157 + (u32::from(byte) - offset)),
                _ => None,
            };

            // Four pointers decode to a base letter plus a combining mark.
            match pointer {
                Some(1133) => return Handled::Pair(0x00CA, 0x0304),
                Some(1135) => return Handled::Pair(0x00CA, 0x030C),
                Some(1164) => return Handled::Pair(0x00EA, 0x0304),
                Some(1166) => return Handled::Pair(0x00EA, 0x030C),
                _ => {}
            }

            if let Some(code_point) = pointer.and_then(index::big5) {
                return Handled::Codepoint(code_point);
            }

            if byte.is_ascii() {
                prepend.push(&[byte]);
            }
            return Handled::Error;
        }

        match byte {
            0x00..=0x7F => Handled::Codepoint(u32::from(byte)),
            0x81..=0xFE => {
                self.lead = byte;
                Handled::Continue
            }
            _ => Handled::Error,
        }
    }
}
