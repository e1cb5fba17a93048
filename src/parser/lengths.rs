use std::borrow::Cow;
use std::io::Read;

use crate::error::{Error, Result, Section};

use super::byteorder::LengthWidth;

/// Per-scanline compressed lengths together with their payload offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthTable {
    lengths: Vec<usize>,
    offsets: Vec<usize>,
    table_bytes: usize,
}

impl LengthTable {
    /// Builds a table from already-decoded lengths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the summed lengths overflow `usize`.
    pub fn from_lengths(lengths: Vec<usize>, table_bytes: usize) -> Result<Self> {
        let mut offsets = Vec::with_capacity(lengths.len() + 1);
        let mut total = 0usize;
        for &len in &lengths {
            offsets.push(total);
            total = total
                .checked_add(len)
                .ok_or(Error::InvalidArgument {
                    details: Cow::Borrowed("scanline lengths overflow the address space"),
                })?;
        }
        offsets.push(total);
        Ok(Self {
            lengths,
            offsets,
            table_bytes,
        })
    }

    #[must_use]
    pub fn lines(&self) -> usize {
        self.lengths.len()
    }

    #[must_use]
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Start offset of every line within the payload, followed by the total.
    #[must_use]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Size of the compressed payload that follows the table.
    #[must_use]
    pub fn payload_len(&self) -> usize {
        self.offsets.last().copied().unwrap_or(0)
    }

    /// Number of bytes the table occupied in the stream.
    #[must_use]
    pub const fn table_bytes(&self) -> usize {
        self.table_bytes
    }
}

/// Reads `lines` big-endian length fields from `reader`.
///
/// # Errors
///
/// Returns [`Error::Allocation`] if the table cannot be buffered,
/// [`Error::Truncated`] if the stream ends before the table is complete, or
/// [`Error::Io`] for other read failures.
#[cfg_attr(feature = "hotpath", hotpath::measure)]
pub fn read_length_table<R: Read + ?Sized>(
    reader: &mut R,
    lines: usize,
    width: LengthWidth,
) -> Result<LengthTable> {
    let field = width.field_size();
    let table_bytes = lines.checked_mul(field).ok_or(Error::InvalidArgument {
        details: Cow::Borrowed("length table size overflows the address space"),
    })?;

    let mut raw = Vec::new();
    raw.try_reserve_exact(table_bytes)
        .map_err(|err| Error::Allocation {
            details: Cow::Owned(format!("length table of {table_bytes} bytes: {err}")),
        })?;
    raw.resize(table_bytes, 0);
    reader
        .read_exact(&mut raw)
        .map_err(|err| Error::from_read(err, Section::LengthTable, table_bytes))?;

    let lengths = raw.chunks_exact(field).map(|chunk| width.read(chunk)).collect();
    LengthTable::from_lengths(lengths, table_bytes)
}
