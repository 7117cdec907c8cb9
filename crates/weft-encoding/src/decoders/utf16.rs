//! [§ 14.2.1 shared UTF-16 decoder](https://encoding.spec.whatwg.org/#shared-utf-16-decoder)

use super::{Handled, Handler};
use crate::decoder::Prepend;

#[derive(Debug)]
pub(crate) struct Utf16Decoder {
    lead_byte: Option<u8>,
    lead_surrogate: Option<u16>,
    big_endian: bool,
}

impl Utf16Decoder {
    pub(crate) const fn new(big_endian: bool) -> Self {
        Self {
            lead_byte: None,
            lead_surrogate: None,
            big_endian,
        }
    }
}

impl Handler for Utf16Decoder {
    fn handle(&mut self, byte: Option<u8>, prepend: &mut Prepend) -> Handled {
        let Some(byte) = byte else {
            if self.lead_byte.is_some() || self.lead_surrogate.is_some() {
                self.lead_byte = None;
                self.lead_surrogate = None;
                return Handled::Error;
            }
            return Handled::Finished;
        };

        let Some(lead) = self.lead_byte.take() else {
            self.lead_byte = Some(byte);
            return Handled::Continue;
        };

        let code_unit = if self.big_endian {
            u16::from_be_bytes([lead, byte])
        } else {
            u16::from_le_bytes([lead, byte])
        };

        if let Some(lead_surrogate) = self.lead_surrogate.take() {
            if (0xDC00..=0xDFFF).contains(&code_unit) {
                return Handled::Codepoint(
                    0x1_0000
                        + ((u32::from(lead_surrogate) - 0xD800) << 10)
                        + (u32::from(code_unit) - 0xDC00),
                );
            }
            // Not a trail surrogate: give the unit's bytes back in stream
            // order and report the lone lead surrogate.
            let bytes = if self.big_endian {
                code_unit.to_be_bytes()
            } else {
                code_unit.to_le_bytes()
            };
            prepend.push(&bytes);
            return Handled::Error;
        }

        match code_unit {
            0xD800..=0xDBFF => {
                self.lead_surrogate = Some(code_unit);
                Handled::Continue
            }
            0xDC00..=0xDFFF => Handled::Error,
            _ => Handled::Codepoint(u32::from(code_unit)),
        }
    }
}
