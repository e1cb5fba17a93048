//! Parallel PackBits decoder for the RLE-compressed channel data of
//! layered-image documents.
//!
//! A compressed channel starts with a table of per-scanline compressed
//! lengths followed by the concatenated PackBits payload. [`decode`] reads
//! both from a stream and expands the scanlines into a caller-owned buffer,
//! splitting the work across the rayon pool.

pub mod api;
pub mod error;
pub mod logger;
pub mod parser;

pub use crate::error::{Error, Result, Section};
pub use api::{DecodeOptions, decode, decode_to_vec, decode_with_options};
pub use parser::{LengthTable, LengthWidth, read_length_table, unpack_line};
