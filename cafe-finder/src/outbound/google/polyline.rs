//! Decoder for the encoded polyline format at 1e-5 precision.

use thiserror::Error;

use crate::domain::{Coordinate, CoordinateValidationError};

const PRECISION: f64 = 1e5;

/// Failure while decoding an encoded polyline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    /// A byte outside the encoding alphabet.
    #[error("invalid polyline byte {byte:#04x} at offset {offset}")]
    InvalidByte {
        /// Offending byte.
        byte: u8,
        /// Byte offset into the input.
        offset: usize,
    },
    /// The input ended inside a value or after a lone latitude.
    #[error("polyline truncated at offset {offset}")]
    Truncated {
        /// Byte offset where input ran out.
        offset: usize,
    },
    /// A decoded point fell outside WGS84 ranges.
    #[error("polyline point {index} out of range: {source}")]
    OutOfRange {
        /// Zero-based point index.
        index: usize,
        /// Validation failure.
        source: CoordinateValidationError,
    },
}

/// Decode an encoded polyline into coordinates.
///
/// # Examples
/// ```
/// use cafe_finder::outbound::google::decode_polyline;
///
/// let path = decode_polyline("_p~iF~ps|U_ulLnnqC").expect("valid polyline");
/// assert_eq!(path.len(), 2);
/// assert!((path[1].latitude() - 40.7).abs() < 1e-9);
/// ```
///
/// # Errors
/// Returns [`PolylineError`] for bytes outside the alphabet, truncated input,
/// or points outside latitude/longitude ranges.
pub fn decode_polyline(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut offset = 0;
    let (mut latitude, mut longitude) = (0_i64, 0_i64);
    let mut path = Vec::new();

    while offset < bytes.len() {
        latitude += next_delta(bytes, &mut offset)?;
        if offset >= bytes.len() {
            return Err(PolylineError::Truncated { offset });
        }
        longitude += next_delta(bytes, &mut offset)?;

        let point = Coordinate::new(to_degrees(latitude), to_degrees(longitude)).map_err(
            |source| PolylineError::OutOfRange {
                index: path.len(),
                source,
            },
        )?;
        path.push(point);
    }
    Ok(path)
}

#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "accumulated values stay far below 2^52 and scale by a fixed factor"
)]
fn to_degrees(value: i64) -> f64 {
    value as f64 / PRECISION
}

fn next_delta(bytes: &[u8], offset: &mut usize) -> Result<i64, PolylineError> {
    let mut result = 0_i64;
    let mut shift = 0_u32;
    loop {
        let Some(&byte) = bytes.get(*offset) else {
            return Err(PolylineError::Truncated { offset: *offset });
        };
        if !(63..=126).contains(&byte) || shift > 60 {
            return Err(PolylineError::InvalidByte {
                byte,
                offset: *offset,
            });
        }
        *offset += 1;
        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }
    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}
