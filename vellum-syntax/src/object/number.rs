//! Numbers.

use std::fmt;

/// A PDF number.
///
/// The distinction between integers and reals is kept, since some operators
/// only accept integer operands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// An integer.
    Integer(i64),
    /// A real number.
    Real(f64),
}

impl Number {
    /// Returns the number as a `f64`.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Integer(i) => i as f64,
            Self::Real(r) => r,
        }
    }

    /// Returns the number as a `f32`.
    #[inline]
    pub fn as_f32(&self) -> f32 {
        self.as_f64() as f32
    }

    /// Returns the number as an `i64`, truncating reals.
    #[inline]
    pub fn as_i64(&self) -> i64 {
        match *self {
            Self::Integer(i) => i,
            Self::Real(r) => r as i64,
        }
    }

    /// Whether the number was written as an integer.
    #[inline]
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(_))
    }

    /// Parse a number token. Accepts the sloppy forms found in the wild, like `--5`,
    /// `5.` and `.5`.
    pub(crate) fn parse(token: &[u8]) -> Option<Self> {
        let mut idx = 0;
        let mut negative = false;

        while let Some(&b) = token.get(idx) {
            match b {
                b'-' => negative = !negative,
                b'+' => {}
                _ => break,
            }

            idx += 1;
        }

        let digits = &token[idx..];

        if digits.is_empty() {
            return None;
        }

        if !digits.contains(&b'.') {
            if !digits.iter().all(u8::is_ascii_digit) {
                return None;
            }

            let mut value: i64 = 0;

            for d in digits {
                value = value.saturating_mul(10).saturating_add((d - b'0') as i64);
            }

            return Some(Self::Integer(if negative { -value } else { value }));
        }

        let mut seen_dot = false;
        // Stray characters after the number, like the `-2` in `0.5-2`, are ignored.
        let end = digits
            .iter()
            .position(|&d| match d {
                b'0'..=b'9' => false,
                b'.' if !seen_dot => {
                    seen_dot = true;
                    false
                }
                _ => true,
            })
            .unwrap_or(digits.len());

        let value = std::str::from_utf8(&digits[..end])
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0);

        Some(Self::Real(if negative { -value } else { value }))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Real(r) => write!(f, "{r}"),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::Integer(value as i64)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<f32> for Number {
    fn from(value: f32) -> Self {
        Self::Real(value as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::Number;

    #[test]
    fn integers() {
        assert_eq!(Number::parse(b"42"), Some(Number::Integer(42)));
        assert_eq!(Number::parse(b"-17"), Some(Number::Integer(-17)));
        assert_eq!(Number::parse(b"+3"), Some(Number::Integer(3)));
        assert_eq!(Number::parse(b"--4"), Some(Number::Integer(4)));
    }

    #[test]
    fn reals() {
        assert_eq!(Number::parse(b"0.5"), Some(Number::Real(0.5)));
        assert_eq!(Number::parse(b"-.25"), Some(Number::Real(-0.25)));
        assert_eq!(Number::parse(b"4."), Some(Number::Real(4.0)));
        assert_eq!(Number::parse(b"."), Some(Number::Real(0.0)));
    }

    #[test]
    fn invalid() {
        assert_eq!(Number::parse(b"-"), None);
        assert_eq!(Number::parse(b"12a"), None);
    }

    #[test]
    fn conversions() {
        assert_eq!(Number::Real(2.9).as_i64(), 2);
        assert!(Number::Integer(1).is_integer());
        assert_eq!(Number::Integer(3).as_f32(), 3.0);
    }
}
