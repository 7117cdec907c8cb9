//! [§ 11.1.1 EUC-JP decoder](https://encoding.spec.whatwg.org/#euc-jp-decoder)

use super::{Handled, Handler};
use crate::decoder::Prepend;
use crate::index;

#[derive(Debug, Default)]
pub(crate) struct EucJpDecoder {
    jis0212: bool,
    lead: u8,
}

impl Handler for EucJpDecoder {
    fn handle(&mut self, byte: Option<u8>, prepend: &mut Prepend) -> Handled {
        let Some(byte) = byte else {
            if self.lead != 0 {
                self.lead = 0;
                return Handled::Error;
            }
            return Handled::Finished;
        };

        // Half-width katakana.
        if self.lead == 0x8E && (0xA1..=0xDF).contains(&byte) {
            self.lead = 0;
            return Handled::Codepoint(0xFF61 - 0xA1 + u32::from(byte));
        }

        // JIS X 0212 introducer: the real lead follows.
        if self.lead == 0x8F && (0xA1..=0xFE).contains(&byte) {
            self.jis0212 = true;
            self.lead = byte;
            return Handled::Continue;
        }

        if self.lead != 0 {
            let lead = self.lead;
            self.lead = 0;

            let mut code_point = None;
            if (0xA1..=0xFE).contains(&lead) && (0xA1..=0xFE).contains(&byte) {
                let pointer = (u32::from(lead) - 0xA1) * 94 + u32::from(byte) - 0xA1;
                code_point = if self.jis0212 {
                    index::jis0212(pointer)
                } else {
                    index::jis0208(pointer)
                };
            }
            self.jis0212 = false;

            if let Some(code_point) = code_point {
                return Handled::Codepoint(code_point);
            }
            if byte.is_ascii() {
                prepend.push(&[byte]);
            }
            return Handled::Error;
        }

        match byte {
            0x00..=0x7F => Handled::Codepoint(u32::from(byte)),
            0x8E | 0x8F | 0xA1..=0xFE => {
                self.lead = byte;
                Handled::Continue
            }
            _ => Handled::Error,
        }
    }
}
