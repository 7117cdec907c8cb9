//! [§ 14.1.1 replacement decoder](https://encoding.spec.whatwg.org/#replacement-decoder)

use super::{Handled, Handler};
use crate::decoder::Prepend;

#[derive(Debug, Default)]
pub(crate) struct ReplacementDecoder {
    error_returned: bool,
}

impl Handler for ReplacementDecoder {
    fn handle(&mut self, byte: Option<u8>, _prepend: &mut Prepend) -> Handled {
        if byte.is_none() || self.error_returned {
            return Handled::Finished;
        }
        self.error_returned = true;
        Handled::Error
    }
}
