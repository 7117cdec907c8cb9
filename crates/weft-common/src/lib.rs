//! Common infrastructure for the weft parsers.
//!
//! This crate provides the pieces every parsing component shares:
//! - **Status codes** - the non-OK outcomes a parse can end with
//! - **Parse errors** - `(code, position)` records collected per session
//! - **Spans** - half-open ranges into an input stream
//! - **Serialization** - the write-callback shape used to stream text out
//! - **Warnings** - once-only notices for unsupported features

pub mod error;
pub mod serialize;
pub mod span;
pub mod status;
pub mod warning;

pub use error::{ParseError, ParseErrors};
pub use serialize::{Write, to_string_with};
pub use span::Span;
pub use status::{Result, Status};
pub use warning::{clear_warnings, warn_once};
