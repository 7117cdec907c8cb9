//! The encoding registry.
//!
//! [§ 4 Encodings](https://encoding.spec.whatwg.org/#encodings)

use strum_macros::{Display, EnumIter, IntoStaticStr};

use crate::decoder::Decoder;
use crate::labels::LABELS;

/// An encoding defined by the Encoding Standard.
///
/// `Display` prints the canonical name, e.g. `Shift_JIS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum Encoding {
    /// UTF-8
    #[strum(serialize = "UTF-8")]
    Utf8,
    /// IBM866
    #[strum(serialize = "IBM866")]
    Ibm866,
    /// ISO-8859-2
    #[strum(serialize = "ISO-8859-2")]
    Iso8859_2,
    /// ISO-8859-3
    #[strum(serialize = "ISO-8859-3")]
    Iso8859_3,
    /// ISO-8859-4
    #[strum(serialize = "ISO-8859-4")]
    Iso8859_4,
    /// ISO-8859-5
    #[strum(serialize = "ISO-8859-5")]
    Iso8859_5,
    /// ISO-8859-6
    #[strum(serialize = "ISO-8859-6")]
    Iso8859_6,
    /// ISO-8859-7
    #[strum(serialize = "ISO-8859-7")]
    Iso8859_7,
    /// ISO-8859-8
    #[strum(serialize = "ISO-8859-8")]
    Iso8859_8,
    /// ISO-8859-8-I (same index as ISO-8859-8, logical ordering)
    #[strum(serialize = "ISO-8859-8-I")]
    Iso8859_8I,
    /// ISO-8859-10
    #[strum(serialize = "ISO-8859-10")]
    Iso8859_10,
    /// ISO-8859-13
    #[strum(serialize = "ISO-8859-13")]
    Iso8859_13,
    /// ISO-8859-14
    #[strum(serialize = "ISO-8859-14")]
    Iso8859_14,
    /// ISO-8859-15
    #[strum(serialize = "ISO-8859-15")]
    Iso8859_15,
    /// ISO-8859-16
    #[strum(serialize = "ISO-8859-16")]
    Iso8859_16,
    /// KOI8-R
    #[strum(serialize = "KOI8-R")]
    Koi8R,
    /// KOI8-U
    #[strum(serialize = "KOI8-U")]
    Koi8U,
    /// macintosh
    #[strum(serialize = "macintosh")]
    Macintosh,
    /// windows-874
    #[strum(serialize = "windows-874")]
    Windows874,
    /// windows-1250
    #[strum(serialize = "windows-1250")]
    Windows1250,
    /// windows-1251
    #[strum(serialize = "windows-1251")]
    Windows1251,
    /// windows-1252, also what `latin1` and `us-ascii` resolve to
    #[strum(serialize = "windows-1252")]
    Windows1252,
    /// windows-1253
    #[strum(serialize = "windows-1253")]
    Windows1253,
    /// windows-1254
    #[strum(serialize = "windows-1254")]
    Windows1254,
    /// windows-1255
    #[strum(serialize = "windows-1255")]
    Windows1255,
    /// windows-1256
    #[strum(serialize = "windows-1256")]
    Windows1256,
    /// windows-1257
    #[strum(serialize = "windows-1257")]
    Windows1257,
    /// windows-1258
    #[strum(serialize = "windows-1258")]
    Windows1258,
    /// x-mac-cyrillic
    #[strum(serialize = "x-mac-cyrillic")]
    XMacCyrillic,
    /// GBK (decodes exactly like gb18030)
    #[strum(serialize = "GBK")]
    Gbk,
    /// gb18030
    #[strum(serialize = "gb18030")]
    Gb18030,
    /// Big5
    #[strum(serialize = "Big5")]
    Big5,
    /// EUC-JP
    #[strum(serialize = "EUC-JP")]
    EucJp,
    /// ISO-2022-JP
    #[strum(serialize = "ISO-2022-JP")]
    Iso2022Jp,
    /// `Shift_JIS`
    #[strum(serialize = "Shift_JIS")]
    ShiftJis,
    /// EUC-KR
    #[strum(serialize = "EUC-KR")]
    EucKr,
    /// replacement: decodes any non-empty input to a single error
    #[strum(serialize = "replacement")]
    Replacement,
    /// UTF-16BE
    #[strum(serialize = "UTF-16BE")]
    Utf16Be,
    /// UTF-16LE
    #[strum(serialize = "UTF-16LE")]
    Utf16Le,
    /// x-user-defined
    #[strum(serialize = "x-user-defined")]
    XUserDefined,
}

impl Encoding {
    /// [get an encoding](https://encoding.spec.whatwg.org/#concept-encoding-get)
    ///
    /// "Remove any leading and trailing ASCII whitespace from label."
    /// "If label is an ASCII case-insensitive match for any of the labels
    /// listed in the table below, then return the corresponding encoding;
    /// otherwise return failure."
    #[must_use]
    pub fn for_label(label: &str) -> Option<Self> {
        let trimmed = label.trim_matches(|c: char| {
            matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
        });
        if trimmed.is_empty() || !trimmed.is_ascii() {
            return None;
        }
        let lowered = trimmed.to_ascii_lowercase();

        LABELS
            .binary_search_by(|(candidate, _)| candidate.cmp(&lowered.as_str()))
            .ok()
            .map(|idx| LABELS[idx].1)
    }

    /// Canonical name, e.g. `"EUC-JP"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Whether the encoding uses one byte per code point and an index of
    /// 128 entries for the upper half.
    #[must_use]
    pub const fn is_single_byte(self) -> bool {
        !matches!(
            self,
            Self::Utf8
                | Self::Gbk
                | Self::Gb18030
                | Self::Big5
                | Self::EucJp
                | Self::Iso2022Jp
                | Self::ShiftJis
                | Self::EucKr
                | Self::Replacement
                | Self::Utf16Be
                | Self::Utf16Le
                | Self::XUserDefined
        )
    }

    /// Whether bytes 0x00..=0x7F always decode to the same ASCII code
    /// point. Markup sniffers rely on this to scan for `<meta charset>`.
    #[must_use]
    pub const fn is_ascii_compatible(self) -> bool {
        !matches!(
            self,
            Self::Iso2022Jp | Self::Replacement | Self::Utf16Be | Self::Utf16Le
        )
    }

    /// [get an output encoding](https://encoding.spec.whatwg.org/#get-an-output-encoding)
    #[must_use]
    pub const fn output_encoding(self) -> Self {
        match self {
            Self::Replacement | Self::Utf16Be | Self::Utf16Le => Self::Utf8,
            other => other,
        }
    }

    /// A fresh decoder for this encoding.
    #[must_use]
    pub fn new_decoder(self) -> Decoder {
        Decoder::new(self)
    }
}

/// [BOM sniff](https://encoding.spec.whatwg.org/#bom-sniff)
///
/// Returns the encoding a byte order mark selects and the BOM length.
/// Fewer than three bytes of input can only match the UTF-16 BOMs.
#[must_use]
pub fn sniff_bom(bytes: &[u8]) -> Option<(Encoding, usize)> {
    match bytes {
        [0xEF, 0xBB, 0xBF, ..] => Some((Encoding::Utf8, 3)),
        [0xFE, 0xFF, ..] => Some((Encoding::Utf16Be, 2)),
        [0xFF, 0xFE, ..] => Some((Encoding::Utf16Le, 2)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_labels_are_sorted_for_binary_search() {
        for pair in LABELS.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} >= {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn test_every_encoding_is_reachable_by_its_name() {
        for encoding in Encoding::iter() {
            assert_eq!(
                Encoding::for_label(encoding.name()),
                Some(encoding),
                "{encoding}"
            );
            assert_eq!(encoding.to_string(), encoding.name());
        }
    }

    #[test]
    fn test_label_lookup_trims_and_folds_case() {
        assert_eq!(Encoding::for_label("  Latin1\n"), Some(Encoding::Windows1252));
        assert_eq!(Encoding::for_label("SJIS"), Some(Encoding::ShiftJis));
        assert_eq!(Encoding::for_label("utf8"), Some(Encoding::Utf8));
        assert_eq!(Encoding::for_label("iso-2022-kr"), Some(Encoding::Replacement));
        assert_eq!(Encoding::for_label("utf-7"), None);
        assert_eq!(Encoding::for_label(""), None);
    }

    #[test]
    fn test_bom_sniffing() {
        assert_eq!(sniff_bom(b"\xEF\xBB\xBFabc"), Some((Encoding::Utf8, 3)));
        assert_eq!(sniff_bom(b"\xFE\xFF\x00a"), Some((Encoding::Utf16Be, 2)));
        assert_eq!(sniff_bom(b"\xFF\xFE"), Some((Encoding::Utf16Le, 2)));
        assert_eq!(sniff_bom(b"\xEF\xBB"), None);
        assert_eq!(sniff_bom(b"<!DOCTYPE"), None);
    }
}
