use std::borrow::Cow;
use std::io::Read;

use crate::error::{Error, Result, Section};

/// Reads exactly `total` compressed bytes from `reader`.
///
/// # Errors
///
/// Returns [`Error::Allocation`] if the buffer cannot be reserved,
/// [`Error::Truncated`] on a short stream, or [`Error::Io`] otherwise.
#[cfg_attr(feature = "hotpath", hotpath::measure)]
pub fn load_payload<R: Read + ?Sized>(reader: &mut R, total: usize) -> Result<Vec<u8>> {
    let mut payload = Vec::new();
    payload
        .try_reserve_exact(total)
        .map_err(|err| Error::Allocation {
            details: Cow::Owned(format!("compressed payload of {total} bytes: {err}")),
        })?;
    payload.resize(total, 0);
    reader
        .read_exact(&mut payload)
        .map_err(|err| Error::from_read(err, Section::Payload, total))?;
    Ok(payload)
}
