//! SCPI message helpers for the analyzer protocol.
//!
//! Binary sweep data arrives as an IEEE 488.2 definite-length block,
//! `#<d><len><payload>`, where `d` is the number of decimal digits of `len`.
//! The payload holds interleaved real/imaginary `f64` values, least
//! significant byte first (`FORM:BORD SWAP`).

use crate::error::SweepError;
use crate::trace::TraceSelector;
use faer::complex_native::c64;

pub const F64_BYTES: usize = 8;

/// Name under which a trace is defined on the analyzer, e.g. `CH1_S21`
pub fn measurement_name(channel: u8, trace: TraceSelector) -> String {
    format!("CH{}_{}", channel, trace)
}

/// Payload length announced by a definite-length block header.
///
/// `header` must start with `#` followed by the digit count; returns the
/// number of header bytes and the payload length. `#0` (indefinite length)
/// yields `None` for the payload length.
pub fn parse_block_header(header: &[u8]) -> Result<(usize, Option<usize>), SweepError> {
    if header.len() < 2 || header[0] != b'#' {
        return Err(SweepError::TransportError(
            "binary block must start with '#'".to_string(),
        ));
    }
    let ndigits = match (header[1] as char).to_digit(10) {
        Some(d) => d as usize,
        None => {
            return Err(SweepError::TransportError(format!(
                "invalid block digit count '{}'",
                header[1] as char
            )))
        }
    };
    if ndigits == 0 {
        return Ok((2, None));
    }
    if header.len() < 2 + ndigits {
        return Err(SweepError::TransportError(
            "binary block header truncated".to_string(),
        ));
    }
    let len = std::str::from_utf8(&header[2..2 + ndigits])
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| {
            SweepError::TransportError("binary block length is not a number".to_string())
        })?;
    Ok((2 + ndigits, Some(len)))
}

/// Strips the block header and the optional trailing newline
pub fn parse_block(raw: &[u8]) -> Result<&[u8], SweepError> {
    let (start, len) = parse_block_header(raw)?;
    let body = &raw[start..];
    match len {
        Some(len) => {
            if body.len() < len {
                return Err(SweepError::MalformedSweepData {
                    expected: len,
                    found: body.len(),
                });
            }
            Ok(&body[..len])
        }
        None => Ok(body.strip_suffix(b"\n").unwrap_or(body)),
    }
}

/// Wraps a payload in a definite-length block
pub fn encode_block(payload: &[u8]) -> Vec<u8> {
    let len = payload.len().to_string();
    let mut out = format!("#{}{}", len.len(), len).into_bytes();
    out.extend_from_slice(payload);
    out.push(b'\n');
    out
}

pub fn encode_f64_le(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Decodes `2 * npts` little-endian `f64` values into `npts` complex samples.
///
/// Any other value count, or a byte count that is not a whole number of
/// values, is reported as `MalformedSweepData` in units of values.
pub fn decode_complex_le(payload: &[u8], npts: usize) -> Result<Vec<c64>, SweepError> {
    let expected = 2 * npts;
    if payload.len() % F64_BYTES != 0 {
        return Err(SweepError::MalformedSweepData {
            expected,
            found: payload.len() / F64_BYTES,
        });
    }
    let found = payload.len() / F64_BYTES;
    if found != expected {
        return Err(SweepError::MalformedSweepData { expected, found });
    }
    let values: Vec<f64> = payload
        .chunks_exact(F64_BYTES)
        .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
        .collect();
    decode_interleaved(&values, npts)
}

/// `complex[k] = values[2k] + i * values[2k + 1]`
pub fn decode_interleaved(values: &[f64], npts: usize) -> Result<Vec<c64>, SweepError> {
    if values.len() != 2 * npts {
        return Err(SweepError::MalformedSweepData {
            expected: 2 * npts,
            found: values.len(),
        });
    }
    Ok(values
        .chunks_exact(2)
        .map(|pair| c64 {
            re: pair[0],
            im: pair[1],
        })
        .collect())
}
