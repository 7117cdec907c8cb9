//! Character encodings per the [WHATWG Encoding Standard](https://encoding.spec.whatwg.org/).
//!
//! This crate turns bytes into code points for the tokenizers:
//! - [`Encoding`] - every encoding the standard defines, with label lookup
//!   and BOM sniffing
//! - [`Decoder`] - a resumable decoder that accepts input in arbitrary
//!   chunks and keeps partial multi-byte sequences in its own state
//!
//! # Example
//!
//! ```
//! use weft_encoding::{DecodeResult, Encoding};
//!
//! let mut decoder = Encoding::Big5.new_decoder();
//! let mut cursor = 0;
//! // First half of a two-byte sequence: the decoder asks for more input.
//! assert_eq!(decoder.decode(&[0xA4], &mut cursor), DecodeResult::Continue);
//! cursor = 0;
//! assert_eq!(decoder.decode(&[0x40], &mut cursor), DecodeResult::Codepoint('一'));
//! ```

pub mod decoder;
mod decoders;
pub mod encoding;
mod index;
mod labels;

pub use decoder::{DecodeResult, Decoder, decode_to_string};
pub use encoding::{Encoding, sniff_bom};
