//! [§ 9.1 single-byte decoder](https://encoding.spec.whatwg.org/#single-byte-decoder)

use super::{Handled, Handler};
use crate::decoder::Prepend;
use crate::encoding::Encoding;
use crate::index;

#[derive(Debug)]
pub(crate) struct SingleByteDecoder {
    encoding: Encoding,
}

impl SingleByteDecoder {
    pub(crate) const fn new(encoding: Encoding) -> Self {
        Self { encoding }
    }
}

impl Handler for SingleByteDecoder {
    fn handle(&mut self, byte: Option<u8>, _prepend: &mut Prepend) -> Handled {
        match byte {
            None => Handled::Finished,
            Some(byte @ 0x00..=0x7F) => Handled::Codepoint(u32::from(byte)),
            Some(byte) => index::single_byte(self.encoding, byte)
                .map_or(Handled::Error, Handled::Codepoint),
        }
    }
}
