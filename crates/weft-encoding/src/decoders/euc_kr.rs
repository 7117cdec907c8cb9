//! [§ 13.1.1 EUC-KR decoder](https://encoding.spec.whatwg.org/#euc-kr-decoder)

use super::{Handled, Handler};
use crate::decoder::Prepend;
use crate::index;

#[derive(Debug, Default)]
pub(crate) struct EucKrDecoder {
    lead: u8,
}

impl Handler for EucKrDecoder {
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

            // "If byte is in the range 0x41 to 0xFE, inclusive, set pointer
            // to (lead − 0x81) × 190 + (byte − 0x41)."
            let pointer = (0x41..=0xFE)
                .contains(&byte)
                .then(|| (lead - 0x81) * 190 + (u32::from(byte) - 0x41));

            if let Some(code_point) = pointer.and_then(index::euc_kr) {
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
