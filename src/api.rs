use std::borrow::Cow;
use std::io::Read;

use crate::error::{Error, Result};
use crate::logger::set_log_prefix;
use crate::parser::{
    LengthWidth, choose_worker_count, load_payload, read_length_table, run_partitions,
    split_partitions,
};

/// Configures parallelism and diagnostics for a decode call.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    parallelism: Option<usize>,
    label: Option<String>,
}

impl DecodeOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parallelism: None,
            label: None,
        }
    }

    /// Caps the number of partitions; defaults to the rayon pool size.
    #[must_use]
    pub const fn with_parallelism(mut self, workers: usize) -> Self {
        self.parallelism = Some(workers);
        self
    }

    /// Prefixes diagnostics emitted during the decode, e.g. `"layer 2 / channel -1"`.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = if label.is_empty() { None } else { Some(label) };
        self
    }

    fn parallelism(&self) -> usize {
        self.parallelism.unwrap_or_else(rayon::current_num_threads)
    }
}

fn required_len(width: usize, lines: usize) -> Result<usize> {
    lines.checked_mul(width).ok_or(Error::InvalidArgument {
        details: Cow::Owned(format!(
            "{lines} lines of {width} bytes overflow the address space"
        )),
    })
}

/// Decodes `lines` PackBits scanlines of `width` bytes from `source` into `dest`.
///
/// The stream must be positioned at the scanline length table; `large`
/// selects 32-bit rather than 16-bit length fields. On success returns the
/// number of bytes consumed from `source`.
///
/// # Errors
///
/// See [`decode_with_options`].
pub fn decode<R: Read + ?Sized>(
    dest: &mut [u8],
    source: &mut R,
    width: usize,
    lines: usize,
    large: bool,
) -> Result<usize> {
    decode_with_options(dest, source, width, lines, large, &DecodeOptions::default())
}

/// Like [`decode`], with explicit [`DecodeOptions`].
///
/// When an error is returned the contents of `dest` are unspecified.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if `dest` is shorter than `lines * width`;
///   nothing is read from `source` in that case.
/// - [`Error::Truncated`] or [`Error::Io`] if the length table or the
///   payload cannot be read.
/// - [`Error::TaskFailed`] wrapping the first malformed run or contained
///   panic reported by any partition.
#[cfg_attr(feature = "hotpath", hotpath::measure)]
pub fn decode_with_options<R: Read + ?Sized>(
    dest: &mut [u8],
    source: &mut R,
    width: usize,
    lines: usize,
    large: bool,
    options: &DecodeOptions,
) -> Result<usize> {
    let _prefix = options.label.as_deref().map(set_log_prefix);

    let required = required_len(width, lines)?;
    if dest.len() < required {
        return Err(Error::InvalidArgument {
            details: Cow::Owned(format!(
                "destination holds {} bytes but {lines} lines of {width} bytes need {required}",
                dest.len()
            )),
        });
    }

    let table = read_length_table(source, lines, LengthWidth::from_large(large))?;
    let payload = load_payload(source, table.payload_len())?;

    let workers = choose_worker_count(lines, options.parallelism());
    run_partitions(split_partitions(
        &mut dest[..required],
        &payload,
        &table,
        width,
        workers,
    ))?;

    Ok(table.table_bytes() + payload.len())
}

/// Decodes into a freshly allocated `lines * width` buffer.
///
/// # Errors
///
/// Same as [`decode_with_options`], plus [`Error::Allocation`] if the
/// destination cannot be allocated.
pub fn decode_to_vec<R: Read + ?Sized>(
    source: &mut R,
    width: usize,
    lines: usize,
    large: bool,
    options: &DecodeOptions,
) -> Result<Vec<u8>> {
    let required = required_len(width, lines)?;
    let mut dest = Vec::new();
    dest.try_reserve_exact(required)
        .map_err(|err| Error::Allocation {
            details: Cow::Owned(format!("destination of {required} bytes: {err}")),
        })?;
    dest.resize(required, 0);
    decode_with_options(&mut dest, source, width, lines, large, options)?;
    Ok(dest)
}
