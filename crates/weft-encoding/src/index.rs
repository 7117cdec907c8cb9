//! Index lookups.
//!
//! The WHATWG indexes themselves come from the `encoding-index-*` crates.
//! Every access goes through this module so decoders only ever see
//! `Option<u32>`: `None` is the standard's "null" code point.

use encoding_index_japanese as japanese;
use encoding_index_korean as korean;
use encoding_index_simpchinese as simpchinese;
use encoding_index_singlebyte as singlebyte;
use encoding_index_tradchinese as tradchinese;

use crate::encoding::Encoding;

/// Sentinel the index crates use for unmapped entries.
const UNMAPPED: u32 = 0xFFFF;

/// Highest pointer present in each index. Pointers past these are null.
const BIG5_LAST: u32 = 19781;
const JIS0208_LAST: u32 = 11103;
const JIS0212_LAST: u32 = 8835;
const EUC_KR_LAST: u32 = 23749;
const GB18030_LAST: u32 = 23939;

fn mapped(code_point: u32) -> Option<u32> {
    (code_point != UNMAPPED).then_some(code_point)
}

fn pointer16(pointer: u32, last: u32) -> Option<u16> {
    if pointer > last {
        return None;
    }
    u16::try_from(pointer).ok()
}

/// Code point for a non-ASCII `byte` in a single-byte encoding.
///
/// The index pointer is `byte - 0x80`; the index crates take the byte
/// itself and do the subtraction.
pub(crate) fn single_byte(encoding: Encoding, byte: u8) -> Option<u32> {
    let forward: fn(u8) -> u16 = match encoding {
        Encoding::Ibm866 => singlebyte::ibm866::forward,
        Encoding::Iso8859_2 => singlebyte::iso_8859_2::forward,
        Encoding::Iso8859_3 => singlebyte::iso_8859_3::forward,
        Encoding::Iso8859_4 => singlebyte::iso_8859_4::forward,
        Encoding::Iso8859_5 => singlebyte::iso_8859_5::forward,
        Encoding::Iso8859_6 => singlebyte::iso_8859_6::forward,
        Encoding::Iso8859_7 => singlebyte::iso_8859_7::forward,
        Encoding::Iso8859_8 | Encoding::Iso8859_8I => singlebyte::iso_8859_8::forward,
        Encoding::Iso8859_10 => singlebyte::iso_8859_10::forward,
        Encoding::Iso8859_13 => singlebyte::iso_8859_13::forward,
        Encoding::Iso8859_14 => singlebyte::iso_8859_14::forward,
        Encoding::Iso8859_15 => singlebyte::iso_8859_15::forward,
        Encoding::Iso8859_16 => singlebyte::iso_8859_16::forward,
        Encoding::Koi8R => singlebyte::koi8_r::forward,
        Encoding::Koi8U => singlebyte::koi8_u::forward,
        Encoding::Macintosh => singlebyte::macintosh::forward,
        Encoding::Windows874 => singlebyte::windows_874::forward,
        Encoding::Windows1250 => singlebyte::windows_1250::forward,
        Encoding::Windows1251 => singlebyte::windows_1251::forward,
        Encoding::Windows1252 => singlebyte::windows_1252::forward,
        Encoding::Windows1253 => singlebyte::windows_1253::forward,
        Encoding::Windows1254 => singlebyte::windows_1254::forward,
        Encoding::Windows1255 => singlebyte::windows_1255::forward,
        Encoding::Windows1256 => singlebyte::windows_1256::forward,
        Encoding::Windows1257 => singlebyte::windows_1257::forward,
        Encoding::Windows1258 => singlebyte::windows_1258::forward,
        Encoding::XMacCyrillic => singlebyte::x_mac_cyrillic::forward,
        _ => return None,
    };
    if byte < 0x80 {
        return None;
    }
    mapped(u32::from(forward(byte)))
}

/// [index Big5 code point](https://encoding.spec.whatwg.org/#index-big5)
pub(crate) fn big5(pointer: u32) -> Option<u32> {
    let pointer = pointer16(pointer, BIG5_LAST)?;
    let code_point = tradchinese::big5::forward(pointer);
    // Nothing in the Big5 index maps below U+0080; the crate uses small
    // values and 0xFFFF/0xFFFFFFFF as "no entry".
    if code_point < 0x80
        || code_point == UNMAPPED
        || char::from_u32(code_point).is_none()
    {
        return None;
    }
    Some(code_point)
}

/// [index jis0208 code point](https://encoding.spec.whatwg.org/#index-jis0208)
pub(crate) fn jis0208(pointer: u32) -> Option<u32> {
    mapped(japanese::jis0208::forward(pointer16(pointer, JIS0208_LAST)?))
}

/// [index jis0212 code point](https://encoding.spec.whatwg.org/#index-jis0212)
pub(crate) fn jis0212(pointer: u32) -> Option<u32> {
    mapped(japanese::jis0212::forward(pointer16(pointer, JIS0212_LAST)?))
}

/// [index EUC-KR code point](https://encoding.spec.whatwg.org/#index-euc-kr)
pub(crate) fn euc_kr(pointer: u32) -> Option<u32> {
    mapped(korean::euc_kr::forward(pointer16(pointer, EUC_KR_LAST)?))
}

/// [index gb18030 code point](https://encoding.spec.whatwg.org/#index-gb18030)
pub(crate) fn gb18030(pointer: u32) -> Option<u32> {
    mapped(simpchinese::gb18030::forward(pointer16(pointer, GB18030_LAST)?))
}

/// [index gb18030 ranges code point](https://encoding.spec.whatwg.org/#index-gb18030-ranges-code-point)
pub(crate) fn gb18030_ranges(pointer: u32) -> Option<u32> {
    // "If pointer is greater than 39419 and less than 189000, or pointer is
    // greater than 1237575, return null."
    if (pointer > 39419 && pointer < 189_000) || pointer > 1_237_575 {
        return None;
    }

    // "If pointer is 7457, return code point U+E7C7."
    if pointer == 7457 {
        return Some(0xE7C7);
    }

    // The supplementary planes are one contiguous range starting at 189000.
    if pointer >= 189_000 {
        return Some(0x1_0000 + pointer - 189_000);
    }

    let code_point = simpchinese::gb18030_ranges::forward(pointer);
    char::from_u32(code_point).map(u32::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pointers() {
        assert_eq!(jis0208(0), Some(0x3000));
        assert_eq!(euc_kr(0), Some(0xAC02));
        assert_eq!(gb18030(0), Some(0x4E02));
        assert_eq!(single_byte(Encoding::Windows1252, 0x80), Some(0x20AC));
    }

    #[test]
    fn test_unmapped_entries_are_null() {
        // The first rows of jis0212 are empty.
        assert_eq!(jis0212(0), None);
        assert_eq!(jis0208(JIS0208_LAST + 1), None);
        assert_eq!(single_byte(Encoding::Iso8859_8, 0xA1), None);
        assert_eq!(single_byte(Encoding::Windows1252, b'a'), None);
    }
}
