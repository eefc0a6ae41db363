//! Arbitrary-precision numeric bridge (spec §4.6, C5).
//!
//! Integer literals are parsed with `num-bigint` so a literal of any length can be
//! range-checked against its target native width before narrowing. Floating literals are
//! assembled from their three decimal parts into a single decimal string and range-checked
//! before being parsed to `f32`/`f64`; this keeps the expensive bignum arithmetic out of the
//! common path while still avoiding the naive "parse each part as a machine float and
//! combine" approach, which can overflow/underflow before the final range check runs.
//!
//! All fixed-width output uses the host's native byte order (spec §1, §6.2: the binary format
//! does not negotiate endianness).

use crate::ir::FloatingLiteral;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::convert::TryInto;

#[derive(Debug)]
pub enum NumericError {
    OutOfRange,
    Malformed,
}

/// (min, max) inclusive bounds for an integer of `bit_size` bits, signed or not (spec §4.6).
pub fn int_bounds(bit_size: u32, signed: bool) -> (BigInt, BigInt) {
    let max: BigInt = BigInt::from(2).pow(if signed { bit_size - 1 } else { bit_size }) - 1;
    let min = if signed {
        -max.clone() - 1
    } else {
        BigInt::from(0)
    };
    (min, max)
}

/// Parse a signed decimal integer literal into a `BigInt`. The grammar guarantees the
/// representation is well-formed, so this only fails if called on malformed input directly.
pub fn parse_int(repr: &str) -> Result<BigInt, NumericError> {
    BigInt::parse_bytes(repr.as_bytes(), 10).ok_or(NumericError::Malformed)
}

/// Range-check `value` against a native integer kind and encode it in the host's native byte
/// order, `bit_size / 8` bytes wide.
pub fn int_to_bytes(value: &BigInt, bit_size: u32, signed: bool) -> Result<Vec<u8>, NumericError> {
    let (min, max) = int_bounds(bit_size, signed);
    if *value < min || *value > max {
        return Err(NumericError::OutOfRange);
    }
    let width = (bit_size / 8) as usize;
    let bytes = if signed {
        let v = value.to_i64().ok_or(NumericError::OutOfRange)?;
        v.to_ne_bytes().to_vec()
    } else {
        let v = value.to_u64().ok_or(NumericError::OutOfRange)?;
        v.to_ne_bytes().to_vec()
    };
    // `i64`/`u64::to_ne_bytes` always yields 8 bytes; narrow to the target width, keeping
    // whichever end holds the significant byte for the host's order.
    if cfg!(target_endian = "little") {
        Ok(bytes[..width].to_vec())
    } else {
        Ok(bytes[8 - width..].to_vec())
    }
}

/// Assemble a floating literal's three decimal parts into a canonical decimal string
/// (spec §4.6: `sign * (integer_part + decimal_part * 10^-len(decimal_part)) * 10^exponent`).
fn assemble_decimal_string(lit: &FloatingLiteral) -> String {
    let mut s = String::new();
    if lit.negative {
        s.push('-');
    }
    if lit.integer_part.is_empty() {
        s.push('0');
    } else {
        s.push_str(&lit.integer_part);
    }
    if !lit.decimal_part.is_empty() {
        s.push('.');
        s.push_str(&lit.decimal_part);
    }
    if !lit.exponent.is_empty() {
        s.push('e');
        s.push_str(&lit.exponent);
    }
    s
}

/// Parse and range-check a floating literal for a target width (32 or 64 bits), returning the
/// bytes to write.
pub fn float_to_bytes(lit: &FloatingLiteral, bit_size: u32) -> Result<Vec<u8>, NumericError> {
    let decimal = assemble_decimal_string(lit);
    match bit_size {
        32 => {
            let v: f32 = decimal.parse().map_err(|_| NumericError::Malformed)?;
            if !v.is_finite() {
                return Err(NumericError::OutOfRange);
            }
            Ok(v.to_ne_bytes().to_vec())
        }
        64 => {
            let v: f64 = decimal.parse().map_err(|_| NumericError::Malformed)?;
            if !v.is_finite() {
                return Err(NumericError::OutOfRange);
            }
            Ok(v.to_ne_bytes().to_vec())
        }
        _ => panic!("unsupported float width {}", bit_size),
    }
}

/// Parse a bare signed-integer literal (no '.'/'e') as a floating literal too, used when a
/// `double`/`float` member is assigned an integer-shaped literal (e.g. `d = 3;`).
pub fn int_repr_to_float_bytes(repr: &str, bit_size: u32) -> Result<Vec<u8>, NumericError> {
    let lit = FloatingLiteral {
        negative: repr.starts_with('-'),
        integer_part: repr.trim_start_matches('-').to_string(),
        decimal_part: String::new(),
        exponent: String::new(),
    };
    float_to_bytes(&lit, bit_size)
}

/// Decode `bytes` (exactly `bit_size / 8` long, host byte order) back into an integer, for the
/// decompiler.
pub fn bytes_to_int(bytes: &[u8], signed: bool) -> BigInt {
    let width = bytes.len();
    let mut buf = [0u8; 8];
    if cfg!(target_endian = "little") {
        buf[..width].copy_from_slice(bytes);
        if signed && width < 8 && bytes[width - 1] & 0x80 != 0 {
            for b in buf[width..].iter_mut() {
                *b = 0xff;
            }
        }
    } else {
        buf[8 - width..].copy_from_slice(bytes);
        if signed && width < 8 && bytes[0] & 0x80 != 0 {
            for b in buf[..8 - width].iter_mut() {
                *b = 0xff;
            }
        }
    }
    if signed {
        BigInt::from(i64::from_ne_bytes(buf))
    } else {
        BigInt::from(u64::from_ne_bytes(buf))
    }
}

/// Decode a canonical decimal string for `bytes` (host byte order), for the decompiler.
pub fn bytes_to_decimal_string(bytes: &[u8]) -> String {
    if bytes.len() == 4 {
        let v = f32::from_ne_bytes(bytes.try_into().unwrap());
        format!("{}", v)
    } else {
        let v = f64::from_ne_bytes(bytes.try_into().unwrap());
        format!("{}", v)
    }
}
