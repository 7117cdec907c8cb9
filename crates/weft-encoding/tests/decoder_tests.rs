//! Decoder tests.
//!
//! Boundary bytes for every multi-byte encoding: first and last valid lead,
//! first and last valid trail, and one past each. Also checks that the
//! result sequence does not depend on how the input is split.

use weft_encoding::{DecodeResult, Decoder, Encoding, decode_to_string};

use DecodeResult::{Codepoint, Error};

/// Decode `bytes` in one window and flush, collecting every result.
fn decode_all(encoding: Encoding, bytes: &[u8]) -> Vec<DecodeResult> {
    let mut decoder = Decoder::new(encoding);
    let mut results = Vec::new();
    let mut cursor = 0;
    loop {
        match decoder.decode(bytes, &mut cursor) {
            DecodeResult::Continue => break,
            other => results.push(other),
        }
    }
    loop {
        match decoder.finish() {
            DecodeResult::Continue => break,
            other => results.push(other),
        }
    }
    results
}

/// Decode `bytes` one byte per window.
fn decode_bytewise(encoding: Encoding, bytes: &[u8]) -> Vec<DecodeResult> {
    let mut decoder = Decoder::new(encoding);
    let mut results = Vec::new();
    for byte in bytes {
        let window = [*byte];
        let mut cursor = 0;
        loop {
            match decoder.decode(&window, &mut cursor) {
                DecodeResult::Continue => break,
                other => results.push(other),
            }
        }
        assert_eq!(cursor, 1, "decoder must consume the whole window");
    }
    loop {
        match decoder.finish() {
            DecodeResult::Continue => break,
            other => results.push(other),
        }
    }
    results
}

fn cp(c: u32) -> DecodeResult {
    Codepoint(char::from_u32(c).unwrap())
}

// ========================================================================
// Big5
// ========================================================================

#[test]
fn test_big5_ascii_passes_through() {
    assert_eq!(decode_all(Encoding::Big5, &[0x58]), vec![cp(88)]);
}

#[test]
fn test_big5_invalid_single_bytes() {
    assert_eq!(decode_all(Encoding::Big5, &[0x80]), vec![Error]);
    assert_eq!(decode_all(Encoding::Big5, &[0xFF]), vec![Error]);
}

#[test]
fn test_big5_ascii_trail_is_reprocessed() {
    // 0x7F is between the two trail ranges; being ASCII it is handed back.
    assert_eq!(decode_all(Encoding::Big5, &[0x81, 0x7F]), vec![Error, cp(0x7F)]);
    // Pointer 0 has no entry in the index.
    assert_eq!(decode_all(Encoding::Big5, &[0x81, 0x40]), vec![Error, cp('@' as u32)]);
}

#[test]
fn test_big5_non_ascii_bad_trail_is_dropped() {
    assert_eq!(decode_all(Encoding::Big5, &[0xA4, 0xA0]), vec![Error]);
}

#[test]
fn test_big5_table_boundaries() {
    // First pointer of the common range.
    assert_eq!(decode_all(Encoding::Big5, &[0xA1, 0x40]), vec![cp(0x3000)]);
    assert_eq!(decode_all(Encoding::Big5, &[0xA4, 0x40]), vec![cp(0x4E00)]);
    // Last lead, last trail.
    assert_eq!(decode_all(Encoding::Big5, &[0xFE, 0xFE]), vec![cp(31188)]);
    // Last lead, last trail of the low range (HKSCS, astral).
    assert_eq!(decode_all(Encoding::Big5, &[0xFE, 0x7E]), vec![cp(150_156)]);
}

#[test]
fn test_big5_combining_pairs() {
    assert_eq!(decode_all(Encoding::Big5, &[0x88, 0x62]), vec![cp(202), cp(772)]);
    assert_eq!(decode_all(Encoding::Big5, &[0x88, 0x64]), vec![cp(202), cp(780)]);
    assert_eq!(decode_all(Encoding::Big5, &[0x88, 0xA3]), vec![cp(234), cp(772)]);
    assert_eq!(decode_all(Encoding::Big5, &[0x88, 0xA5]), vec![cp(234), cp(780)]);
}

#[test]
fn test_big5_truncated_lead_at_end() {
    assert_eq!(decode_all(Encoding::Big5, &[0x41, 0xA4]), vec![cp(0x41), Error]);
}

// ========================================================================
// UTF-8
// ========================================================================

#[test]
fn test_utf8_multibyte() {
    assert_eq!(
        decode_all(Encoding::Utf8, "a€😀".as_bytes()),
        vec![cp('a' as u32), cp(0x20AC), cp(0x1F600)]
    );
}

#[test]
fn test_utf8_overlong_and_surrogates_are_errors() {
    // Each continuation byte that can't follow is reprocessed as a lead.
    assert_eq!(decode_all(Encoding::Utf8, &[0xE0, 0x80]), vec![Error, Error]);
    assert_eq!(decode_all(Encoding::Utf8, &[0xED, 0xA0, 0x80]), vec![Error, Error, Error]);
    assert_eq!(decode_all(Encoding::Utf8, &[0xF4, 0x90, 0x80, 0x80]).len(), 4);
    assert_eq!(decode_all(Encoding::Utf8, &[0xC0, 0x80]), vec![Error, Error]);
}

#[test]
fn test_utf8_boundary_leads() {
    assert_eq!(decode_all(Encoding::Utf8, &[0xC2, 0x80]), vec![cp(0x80)]);
    assert_eq!(decode_all(Encoding::Utf8, &[0xDF, 0xBF]), vec![cp(0x7FF)]);
    assert_eq!(decode_all(Encoding::Utf8, &[0xE0, 0xA0, 0x80]), vec![cp(0x800)]);
    assert_eq!(decode_all(Encoding::Utf8, &[0xF4, 0x8F, 0xBF, 0xBF]), vec![cp(0x10FFFF)]);
    assert_eq!(decode_all(Encoding::Utf8, &[0xF5]), vec![Error]);
}

#[test]
fn test_utf8_truncated_sequence_reports_once() {
    assert_eq!(decode_all(Encoding::Utf8, &[0xE2, 0x82]), vec![Error]);
}

// ========================================================================
// UTF-16
// ========================================================================

#[test]
fn test_utf16le_surrogate_pair() {
    assert_eq!(
        decode_all(Encoding::Utf16Le, &[0x61, 0x00, 0x3D, 0xD8, 0x00, 0xDE]),
        vec![cp('a' as u32), cp(0x1F600)]
    );
}

#[test]
fn test_utf16be_lone_lead_surrogate_then_ascii() {
    assert_eq!(
        decode_all(Encoding::Utf16Be, &[0xD8, 0x3D, 0x00, 0x61]),
        vec![Error, cp('a' as u32)]
    );
}

#[test]
fn test_utf16_odd_trailing_byte() {
    assert_eq!(decode_all(Encoding::Utf16Le, &[0x61, 0x00, 0x62]), vec![cp('a' as u32), Error]);
}

// ========================================================================
// gb18030 / GBK
// ========================================================================

#[test]
fn test_gb18030_single_and_double_byte() {
    assert_eq!(decode_all(Encoding::Gb18030, &[0x80]), vec![cp(0x20AC)]);
    assert_eq!(decode_all(Encoding::Gb18030, &[0xFF]), vec![Error]);
    assert_eq!(decode_all(Encoding::Gb18030, &[0x81, 0x40]), vec![cp(0x4E02)]);
    assert_eq!(decode_all(Encoding::Gbk, &[0xA1, 0xA1]), vec![cp(0x3000)]);
}

#[test]
fn test_gb18030_four_byte_range_boundaries() {
    assert_eq!(decode_all(Encoding::Gb18030, &[0x81, 0x30, 0x81, 0x30]), vec![cp(0x80)]);
    assert_eq!(decode_all(Encoding::Gb18030, &[0x84, 0x31, 0xA4, 0x39]), vec![cp(0xFFFF)]);
    // One past the BMP ranges: pointer 39420 is unassigned.
    assert_eq!(decode_all(Encoding::Gb18030, &[0x84, 0x31, 0xA5, 0x30]), vec![Error]);
    assert_eq!(decode_all(Encoding::Gb18030, &[0x90, 0x30, 0x81, 0x30]), vec![cp(0x10000)]);
    assert_eq!(decode_all(Encoding::Gb18030, &[0xE3, 0x32, 0x9A, 0x35]), vec![cp(0x10FFFF)]);
    assert_eq!(decode_all(Encoding::Gb18030, &[0xE3, 0x32, 0x9A, 0x36]), vec![Error]);
    assert_eq!(decode_all(Encoding::Gb18030, &[0x81, 0x35, 0xF4, 0x37]), vec![cp(0xE7C7)]);
}

#[test]
fn test_gb18030_bad_fourth_byte_requeues_three_bytes() {
    // 0x30 comes back as '0', then 0x81 0x41 is a valid two-byte sequence.
    let expected = vec![Error, cp('0' as u32), cp(0x4E04)];
    assert_eq!(decode_all(Encoding::Gb18030, &[0x81, 0x30, 0x81, 0x41]), expected);
    assert_eq!(decode_bytewise(Encoding::Gb18030, &[0x81, 0x30, 0x81, 0x41]), expected);
}

#[test]
fn test_gb18030_bad_third_byte_requeues_two_bytes() {
    assert_eq!(
        decode_all(Encoding::Gb18030, &[0x81, 0x30, 0x41]),
        vec![Error, cp('0' as u32), cp('A' as u32)]
    );
}

// ========================================================================
// Japanese and Korean
// ========================================================================

#[test]
fn test_shift_jis() {
    assert_eq!(decode_all(Encoding::ShiftJis, &[0x82, 0xA0]), vec![cp(0x3042)]);
    assert_eq!(decode_all(Encoding::ShiftJis, &[0x80]), vec![cp(0x80)]);
    assert_eq!(decode_all(Encoding::ShiftJis, &[0xA1]), vec![cp(0xFF61)]);
    assert_eq!(decode_all(Encoding::ShiftJis, &[0xDF]), vec![cp(0xFF9F)]);
    assert_eq!(decode_all(Encoding::ShiftJis, &[0xA0]), vec![Error]);
    assert_eq!(decode_all(Encoding::ShiftJis, &[0xF0, 0x40]), vec![cp(0xE000)]);
    assert_eq!(decode_all(Encoding::ShiftJis, &[0x82, 0x3F]), vec![Error, cp('?' as u32)]);
}

#[test]
fn test_euc_jp() {
    assert_eq!(decode_all(Encoding::EucJp, &[0xA4, 0xA2]), vec![cp(0x3042)]);
    assert_eq!(decode_all(Encoding::EucJp, &[0x8E, 0xA1]), vec![cp(0xFF61)]);
    assert_eq!(decode_all(Encoding::EucJp, &[0x8E, 0xE0]), vec![Error]);
    assert_eq!(decode_all(Encoding::EucJp, &[0xA4, 0x41]), vec![Error, cp('A' as u32)]);
    assert!(matches!(
        decode_all(Encoding::EucJp, &[0x8F, 0xA2, 0xAF]).as_slice(),
        [Codepoint(_)]
    ));
}

#[test]
fn test_iso_2022_jp_switches_sets() {
    let bytes = b"a\x1B$B\x24\x22\x1B(Bb";
    assert_eq!(
        decode_all(Encoding::Iso2022Jp, bytes),
        vec![cp('a' as u32), cp(0x3042), cp('b' as u32)]
    );
    // Katakana set.
    assert_eq!(decode_all(Encoding::Iso2022Jp, b"\x1B(I\x21"), vec![cp(0xFF61)]);
    // Roman set swaps backslash and tilde.
    assert_eq!(
        decode_all(Encoding::Iso2022Jp, b"\x1B(J\x5C\x7E"),
        vec![cp(0xA5), cp(0x203E)]
    );
}

#[test]
fn test_iso_2022_jp_back_to_back_escapes_error() {
    assert_eq!(decode_all(Encoding::Iso2022Jp, b"\x1B(B\x1B(Ba"), vec![Error, cp('a' as u32)]);
}

#[test]
fn test_iso_2022_jp_unknown_escape_requeues() {
    assert_eq!(
        decode_all(Encoding::Iso2022Jp, b"\x1B(Z"),
        vec![Error, cp('(' as u32), cp('Z' as u32)]
    );
}

#[test]
fn test_euc_kr() {
    assert_eq!(decode_all(Encoding::EucKr, &[0xB0, 0xA1]), vec![cp(0xAC00)]);
    assert_eq!(decode_all(Encoding::EucKr, &[0x80]), vec![Error]);
    assert_eq!(decode_all(Encoding::EucKr, &[0xB0, 0x30]), vec![Error, cp('0' as u32)]);
}

// ========================================================================
// Single-byte and special encodings
// ========================================================================

#[test]
fn test_single_byte_indexes() {
    assert_eq!(decode_all(Encoding::Windows1252, &[0x80]), vec![cp(0x20AC)]);
    assert_eq!(decode_all(Encoding::Koi8R, &[0xC1]), vec![cp(0x0430)]);
    assert_eq!(decode_all(Encoding::Iso8859_8, &[0xA1]), vec![Error]);
    assert_eq!(decode_all(Encoding::Windows1252, b"A"), vec![cp('A' as u32)]);
}

#[test]
fn test_x_user_defined() {
    assert_eq!(decode_all(Encoding::XUserDefined, &[0x80, 0xFF]), vec![cp(0xF780), cp(0xF7FF)]);
}

#[test_log::test]
fn test_replacement_reports_one_error() {
    assert_eq!(decode_all(Encoding::Replacement, b"abc"), vec![Error]);
    assert_eq!(decode_all(Encoding::Replacement, b""), vec![]);
}

// ========================================================================
// Chunking and whole-buffer helpers
// ========================================================================

#[test_log::test]
fn test_split_position_does_not_change_results() {
    let cases: &[(Encoding, &[u8])] = &[
        (Encoding::Utf8, "xé€😀y".as_bytes()),
        (Encoding::Big5, &[0xA4, 0x40, 0x88, 0x62, 0x81, 0x40]),
        (Encoding::Gb18030, &[0x81, 0x30, 0x81, 0x30, 0x81, 0x30, 0x41]),
        (Encoding::Iso2022Jp, b"\x1B$B\x24\x22\x1B(Bz"),
        (Encoding::Utf16Be, &[0xD8, 0x3D, 0xDE, 0x00, 0x00]),
    ];
    for (encoding, bytes) in cases {
        assert_eq!(
            decode_all(*encoding, bytes),
            decode_bytewise(*encoding, bytes),
            "{encoding}"
        );
    }
}

#[test_log::test]
fn test_decode_to_string_honours_bom() {
    let (text, encoding, had_errors) =
        decode_to_string(Encoding::Windows1252, b"\xFF\xFEh\x00i\x00");
    assert_eq!(text, "hi");
    assert_eq!(encoding, Encoding::Utf16Le);
    assert!(!had_errors);

    let (text, _, had_errors) = decode_to_string(Encoding::Utf8, b"a\xFFb");
    assert_eq!(text, "a\u{FFFD}b");
    assert!(had_errors);
}
