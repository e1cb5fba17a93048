use std::ops::Range;

use smallvec::SmallVec;

use crate::error::{Result, Section};

use super::lengths::LengthTable;
use super::packbits::decode_lines;

const INLINE_PARTITIONS: usize = 16;

pub type PartitionRanges = SmallVec<[Range<usize>; INLINE_PARTITIONS]>;

/// Picks how many workers to use so that each one gets at least two lines.
#[must_use]
pub const fn choose_worker_count(lines: usize, parallelism: usize) -> usize {
    let mut n = if parallelism == 0 { 1 } else { parallelism };
    while n > 1 && n.saturating_mul(2) > lines {
        n -= 1;
    }
    n
}

/// Splits `[0, lines)` into `workers` contiguous ranges; the last range
/// absorbs the remainder.
#[must_use]
pub fn partition_ranges(lines: usize, workers: usize) -> PartitionRanges {
    let workers = workers.max(1);
    let step = lines / workers;
    let mut ranges = PartitionRanges::with_capacity(workers);
    let mut start = 0usize;
    for _ in 1..workers {
        ranges.push(start..start + step);
        start += step;
    }
    ranges.push(start..lines);
    ranges
}

/// One worker's share of the decode: disjoint destination and payload slices.
#[derive(Debug)]
pub struct Partition<'a> {
    index: usize,
    lines: Range<usize>,
    width: usize,
    dest: &'a mut [u8],
    payload: &'a [u8],
    lengths: &'a [usize],
}

impl Partition<'_> {
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn lines(&self) -> Range<usize> {
        self.lines.clone()
    }

    #[must_use]
    pub fn section(&self) -> Section {
        Section::Partition {
            index: self.index,
            lines: self.lines(),
        }
    }

    /// Decodes every line of the partition into its destination slice.
    ///
    /// # Errors
    ///
    /// Returns the first malformed line encountered.
    pub fn decode(self) -> Result<()> {
        decode_lines(
            self.dest,
            self.payload,
            self.lengths,
            self.width,
            self.lines.start,
        )
    }
}

/// Carves `dest`, `payload` and the table's lengths into one partition per
/// range of [`partition_ranges`].
///
/// `dest` must hold at least `table.lines() * width` bytes and `payload`
/// exactly `table.payload_len()` bytes.
pub fn split_partitions<'a>(
    dest: &'a mut [u8],
    payload: &'a [u8],
    table: &'a LengthTable,
    width: usize,
    workers: usize,
) -> SmallVec<[Partition<'a>; INLINE_PARTITIONS]> {
    let offsets = table.offsets();
    let lengths = table.lengths();
    let ranges = partition_ranges(table.lines(), workers);

    let mut partitions = SmallVec::with_capacity(ranges.len());
    let mut remaining = dest;
    for (index, lines) in ranges.into_iter().enumerate() {
        let (head, tail) = std::mem::take(&mut remaining).split_at_mut(lines.len() * width);
        remaining = tail;
        partitions.push(Partition {
            index,
            width,
            dest: head,
            payload: &payload[offsets[lines.start]..offsets[lines.end]],
            lengths: &lengths[lines.clone()],
            lines,
        });
    }
    partitions
}
