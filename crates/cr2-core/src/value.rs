/// A decoded IFD entry value. Consumers pattern-match on the variant
/// rather than introspecting a dynamic value, per the dynamic-typed-EXIF
/// redesign: the source language returns a heterogeneous value per tag,
/// this is its tagged-variant equivalent.
#[derive(Debug, Clone, PartialEq)]
pub enum ExifValue {
    Byte(u8),
    Ascii(String),
    Short(u16),
    Long(u32),
    /// `nan = true` is the zero-denominator sentinel; a zero numerator
    /// with a nonzero denominator is just the integer 0, not nan.
    Rational { num: u32, den: u32, nan: bool },
    SignedByte(i8),
    /// Undefined-type values carry only their count and inner offset —
    /// this is what lets the container parser chase a MakerNote tag's
    /// inner offset without materializing its bytes up front.
    Undefined { count: u32, offset: u32 },
    SignedShort(i16),
    SignedLong(i32),
    SignedRational { num: i32, den: i32, nan: bool },
    Float(f32),
    Double(f64),
    List(Vec<ExifValue>),
}

impl ExifValue {
    pub fn rational(num: u32, den: u32) -> Self {
        ExifValue::Rational {
            num,
            den,
            nan: den == 0,
        }
    }

    pub fn signed_rational(num: i32, den: i32) -> Self {
        ExifValue::SignedRational {
            num,
            den,
            nan: den == 0,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            ExifValue::Byte(b) => Some(*b as u32),
            ExifValue::Short(s) => Some(*s as u32),
            ExifValue::Long(l) => Some(*l),
            ExifValue::List(items) => items.first().and_then(ExifValue::as_u32),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ExifValue::Ascii(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Unwraps a `SignedShort` or a `List` of them, as produced by
    /// decoding a maker-note array tag (e.g. Canon `SensorInfo`).
    pub fn as_i16_vec(&self) -> Option<Vec<i16>> {
        match self {
            ExifValue::SignedShort(s) => Some(vec![*s]),
            ExifValue::List(items) => items
                .iter()
                .map(|item| match item {
                    ExifValue::SignedShort(s) => Some(*s),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    /// Unwraps a `Short` or a `List` of them, as produced by decoding a
    /// `CR2_SLICE`-shaped tag.
    pub fn as_u16_vec(&self) -> Option<Vec<u16>> {
        match self {
            ExifValue::Short(s) => Some(vec![*s]),
            ExifValue::List(items) => items
                .iter()
                .map(|item| match item {
                    ExifValue::Short(s) => Some(*s),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ExifValue::Rational { num, den, nan } => {
                if *nan {
                    Some(f64::NAN)
                } else {
                    Some(*num as f64 / *den as f64)
                }
            }
            ExifValue::SignedRational { num, den, nan } => {
                if *nan {
                    Some(f64::NAN)
                } else {
                    Some(*num as f64 / *den as f64)
                }
            }
            ExifValue::Float(f) => Some(*f as f64),
            ExifValue::Double(d) => Some(*d),
            _ => self.as_u32().map(|v| v as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominator_is_nan() {
        let v = ExifValue::rational(3, 0);
        assert!(matches!(v, ExifValue::Rational { nan: true, .. }));
        assert!(v.as_f64().unwrap().is_nan());
    }

    #[test]
    fn zero_numerator_is_not_nan() {
        let v = ExifValue::rational(0, 5);
        assert!(matches!(v, ExifValue::Rational { nan: false, .. }));
        assert_eq!(v.as_f64(), Some(0.0));
    }

    #[test]
    fn as_u32_unwraps_singleton_list() {
        let v = ExifValue::List(vec![ExifValue::Short(42)]);
        assert_eq!(v.as_u32(), Some(42));
    }

    #[test]
    fn as_i16_vec_unwraps_list() {
        let v = ExifValue::List(vec![ExifValue::SignedShort(-1), ExifValue::SignedShort(2)]);
        assert_eq!(v.as_i16_vec(), Some(vec![-1, 2]));
    }
}
