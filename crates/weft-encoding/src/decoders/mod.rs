//! Per-encoding decoder state machines.
//!
//! Each handler follows the "handler" algorithm of its encoding in the
//! Encoding Standard, one byte at a time. `None` is end-of-queue.

mod big5;
mod euc_jp;
mod euc_kr;
mod gb18030;
mod iso_2022_jp;
mod replacement;
mod shift_jis;
mod single_byte;
mod utf16;
mod utf8;
mod x_user_defined;

use crate::decoder::Prepend;
use crate::encoding::Encoding;

/// Result of handing one byte (or end-of-queue) to a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handled {
    /// Byte absorbed into the partial sequence.
    Continue,
    /// One code point.
    Codepoint(u32),
    /// Two code points from one sequence (Big5 base + combining mark).
    Pair(u32, u32),
    /// Invalid sequence.
    Error,
    /// No further output for this stream.
    Finished,
}

/// A decoder's byte handler.
pub(crate) trait Handler: Send {
    /// Process `byte`, or end-of-queue when `None`.
    fn handle(&mut self, byte: Option<u8>, prepend: &mut Prepend) -> Handled;
}

pub(crate) fn handler_for(encoding: Encoding) -> Box<dyn Handler> {
    match encoding {
        Encoding::Utf8 => Box::new(utf8::Utf8Decoder::default()),
        Encoding::Utf16Be => Box::new(utf16::Utf16Decoder::new(true)),
        Encoding::Utf16Le => Box::new(utf16::Utf16Decoder::new(false)),
        Encoding::Gbk | Encoding::Gb18030 => Box::new(gb18030::Gb18030Decoder::default()),
        Encoding::Big5 => Box::new(big5::Big5Decoder::default()),
        Encoding::EucJp => Box::new(euc_jp::EucJpDecoder::default()),
        Encoding::Iso2022Jp => Box::new(iso_2022_jp::Iso2022JpDecoder::default()),
        Encoding::ShiftJis => Box::new(shift_jis::ShiftJisDecoder::default()),
        Encoding::EucKr => Box::new(euc_kr::EucKrDecoder::default()),
        Encoding::Replacement => Box::new(replacement::ReplacementDecoder::default()),
        Encoding::XUserDefined => Box::new(x_user_defined::XUserDefinedDecoder),
        single => Box::new(single_byte::SingleByteDecoder::new(single)),
    }
}
