use std::borrow::Cow;

use crate::error::{Error, Result, Section};

const NO_OP: u8 = 0x80;

enum RunOp {
    Literal(usize),
    Repeat { len: usize, byte: u8 },
    Skip,
}

fn decode_run_command(
    control: u8,
    input: &[u8],
    cursor: &mut usize,
) -> std::result::Result<RunOp, &'static str> {
    match control {
        0..=0x7F => Ok(RunOp::Literal(usize::from(control) + 1)),
        NO_OP => Ok(RunOp::Skip),
        _ => {
            let Some(&byte) = input.get(*cursor) else {
                return Err("repeat run is missing its value byte");
            };
            *cursor += 1;
            Ok(RunOp::Repeat {
                len: 257 - usize::from(control),
                byte,
            })
        }
    }
}

/// Expands one scanline of PackBits data into `output`.
///
/// The whole of `input` is consumed and must produce exactly `output.len()`
/// bytes.
pub fn unpack_line(input: &[u8], output: &mut [u8]) -> std::result::Result<(), &'static str> {
    let expected_len = output.len();
    let mut out_pos = 0usize;
    let mut i = 0usize;

    while i < input.len() {
        let control = input[i];
        i += 1;
        match decode_run_command(control, input, &mut i)? {
            RunOp::Literal(len) => {
                if i + len > input.len() {
                    return Err("literal run exceeds line input");
                }
                if out_pos + len > expected_len {
                    return Err("literal run exceeds line width");
                }
                output[out_pos..out_pos + len].copy_from_slice(&input[i..i + len]);
                i += len;
                out_pos += len;
            }
            RunOp::Repeat { len, byte } => {
                if out_pos + len > expected_len {
                    return Err("repeat run exceeds line width");
                }
                output[out_pos..out_pos + len].fill(byte);
                out_pos += len;
            }
            RunOp::Skip => {}
        }
    }

    if out_pos != expected_len {
        return Err("line output shorter than width");
    }
    Ok(())
}

/// Decodes consecutive scanlines from `payload` into `dest`.
///
/// `lengths[k]` is the compressed size of line `first_line + k`; each line
/// writes `width` bytes of `dest`.
///
/// # Errors
///
/// Returns [`Error::MalformedRun`] naming the first line whose runs do not
/// fit its compressed bytes or its width.
#[cfg_attr(feature = "hotpath", hotpath::measure)]
pub fn decode_lines(
    dest: &mut [u8],
    payload: &[u8],
    lengths: &[usize],
    width: usize,
    first_line: usize,
) -> Result<()> {
    let mut offset = 0usize;
    for (k, &len) in lengths.iter().enumerate() {
        let section = Section::Line {
            index: first_line + k,
        };
        let Some(input) = payload.get(offset..offset + len) else {
            return Err(Error::MalformedRun {
                section,
                details: Cow::Borrowed("declared length exceeds compressed payload"),
            });
        };
        let Some(output) = dest.get_mut(k * width..(k + 1) * width) else {
            return Err(Error::MalformedRun {
                section,
                details: Cow::Borrowed("line falls outside the destination buffer"),
            });
        };
        unpack_line(input, output).map_err(|details| Error::MalformedRun {
            section,
            details: Cow::Borrowed(details),
        })?;
        offset += len;
    }
    Ok(())
}
