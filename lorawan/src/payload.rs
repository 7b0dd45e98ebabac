//! Uplink payloads
//!
//! An uplink is either raw bytes or a scalar that is encoded as exactly one
//! byte. The scalar encoding only covers 0..=255; anything else is rejected
//! instead of being truncated.

/// Scalar uplink value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    /// Integer value
    Int(i64),
    /// Floating point value; must be integral
    Float(f32),
    /// Decimal integer text, e.g. `"42"`
    Text(&'a str),
}

/// Uplink payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload<'a> {
    /// Raw bytes, sent unchanged
    Bytes(&'a [u8]),
    /// Scalar, sent as a single byte
    Scalar(Scalar<'a>),
}

/// Scalar does not fit in a single byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange;

/// Encode a scalar as a single byte
///
/// Accepts integers in 0..=255, integral floats in the same range, and
/// decimal text parsing to such an integer.
pub fn encode_scalar(value: Scalar<'_>) -> Result<u8, OutOfRange> {
    match value {
        Scalar::Int(v) => u8::try_from(v).map_err(|_| OutOfRange),
        Scalar::Float(v) => {
            if v.is_finite() && v >= 0.0 && v <= 255.0 && v == (v as u8) as f32 {
                Ok(v as u8)
            } else {
                Err(OutOfRange)
            }
        }
        Scalar::Text(s) => s.trim().parse::<u8>().map_err(|_| OutOfRange),
    }
}

impl<'a> From<&'a [u8]> for Payload<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Payload::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Payload<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Payload::Bytes(bytes)
    }
}

impl<'a> From<Scalar<'a>> for Payload<'a> {
    fn from(value: Scalar<'a>) -> Self {
        Payload::Scalar(value)
    }
}

impl From<u8> for Payload<'_> {
    fn from(value: u8) -> Self {
        Payload::Scalar(Scalar::Int(value as i64))
    }
}

impl From<i32> for Payload<'_> {
    fn from(value: i32) -> Self {
        Payload::Scalar(Scalar::Int(value as i64))
    }
}

impl From<i64> for Payload<'_> {
    fn from(value: i64) -> Self {
        Payload::Scalar(Scalar::Int(value))
    }
}

impl From<f32> for Payload<'_> {
    fn from(value: f32) -> Self {
        Payload::Scalar(Scalar::Float(value))
    }
}

impl<'a> From<&'a str> for Payload<'a> {
    fn from(value: &'a str) -> Self {
        Payload::Scalar(Scalar::Text(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_bounds() {
        assert_eq!(encode_scalar(Scalar::Int(0)), Ok(0));
        assert_eq!(encode_scalar(Scalar::Int(255)), Ok(255));
        assert_eq!(encode_scalar(Scalar::Int(256)), Err(OutOfRange));
        assert_eq!(encode_scalar(Scalar::Int(-1)), Err(OutOfRange));
    }

    #[test]
    fn test_float_must_be_integral() {
        assert_eq!(encode_scalar(Scalar::Float(42.0)), Ok(42));
        assert_eq!(encode_scalar(Scalar::Float(42.5)), Err(OutOfRange));
        assert_eq!(encode_scalar(Scalar::Float(f32::NAN)), Err(OutOfRange));
        assert_eq!(encode_scalar(Scalar::Float(300.0)), Err(OutOfRange));
    }

    #[test]
    fn test_text_is_decimal() {
        assert_eq!(encode_scalar(Scalar::Text("7")), Ok(7));
        assert_eq!(encode_scalar(Scalar::Text(" 200 ")), Ok(200));
        assert_eq!(encode_scalar(Scalar::Text("abc")), Err(OutOfRange));
        assert_eq!(encode_scalar(Scalar::Text("999")), Err(OutOfRange));
    }

    #[test]
    fn test_conversions() {
        let data = [1u8, 2, 3];
        assert_eq!(Payload::from(&data), Payload::Bytes(&[1, 2, 3]));
        assert_eq!(Payload::from(9u8), Payload::Scalar(Scalar::Int(9)));
        assert_eq!(Payload::from(-3), Payload::Scalar(Scalar::Int(-3)));
        assert_eq!(Payload::from("9"), Payload::Scalar(Scalar::Text("9")));
    }
}
