//! [§ 14.5.1 x-user-defined decoder](https://encoding.spec.whatwg.org/#x-user-defined-decoder)

use super::{Handled, Handler};
use crate::decoder::Prepend;

#[derive(Debug)]
pub(crate) struct XUserDefinedDecoder;

impl Handler for XUserDefinedDecoder {
    fn handle(&mut self, byte: Option<u8>, _prepend: &mut Prepend) -> Handled {
        match byte {
            None => Handled::Finished,
            Some(byte @ 0x00..=0x7F) => Handled::Codepoint(u32::from(byte)),
            Some(byte) => Handled::Codepoint(0xF780 + u32::from(byte) - 0x80),
        }
    }
}
