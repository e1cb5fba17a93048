mod byteorder;
mod lengths;
mod packbits;
mod partition;
mod payload;
mod supervisor;

pub use byteorder::LengthWidth;
pub use lengths::{LengthTable, read_length_table};
pub use packbits::{decode_lines, unpack_line};
pub use partition::{
    Partition, PartitionRanges, choose_worker_count, partition_ranges, split_partitions,
};
pub use payload::load_payload;
pub use supervisor::run_partitions;
