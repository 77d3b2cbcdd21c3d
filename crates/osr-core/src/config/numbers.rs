use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Invariant numeric text format.
///
/// Numbers inside the life curve and the frame payload are always written with
/// `.` as the decimal point and without grouping separators, whatever the host
/// locale. Every numeric parse and format call in the codec goes through a
/// `NumberFormat` value handed down from [`CodecOptions`](super::CodecOptions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    /// Accept leading and trailing ASCII whitespace around numbers on read.
    pub allow_whitespace: bool,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::INVARIANT
    }
}

impl NumberFormat {
    /// The format used by every known producer.
    pub const INVARIANT: Self = Self {
        allow_whitespace: true,
    };

    fn prepare<'a>(&self, text: &'a str, field: &'static str) -> Result<&'a str> {
        let text = if self.allow_whitespace {
            text.trim_matches(|c: char| c.is_ascii_whitespace())
        } else {
            text
        };
        // Grouping separators and locale decimal commas are never valid here
        if text.is_empty() || text.contains([',', '_', ' ']) {
            return Err(Error::numeric(field, text));
        }
        Ok(text)
    }

    /// Parses a decimal integer.
    pub fn parse_int<T: FromStr>(&self, text: &str, field: &'static str) -> Result<T> {
        let trimmed = self.prepare(text, field)?;
        trimmed.parse().map_err(|_| Error::numeric(field, text))
    }

    /// Parses a real number with `.` as the decimal point.
    pub fn parse_float(&self, text: &str, field: &'static str) -> Result<f64> {
        let trimmed = self.prepare(text, field)?;
        trimmed
            .parse::<f64>()
            .map_err(|_| Error::numeric(field, text))
    }

    /// Formats a real number as the shortest text that parses back to the same value.
    pub fn format_float(&self, value: f64) -> String {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int() {
        let fmt = NumberFormat::INVARIANT;
        assert_eq!(fmt.parse_int::<i64>("-12345", "delta").unwrap(), -12345);
        assert_eq!(fmt.parse_int::<i32>(" 42 ", "time").unwrap(), 42);
        assert_eq!(fmt.parse_int::<u32>("+7", "keys").unwrap(), 7);
    }

    #[test]
    fn test_parse_int_rejects_grouping() {
        let fmt = NumberFormat::INVARIANT;
        assert!(fmt.parse_int::<i32>("1,000", "time").is_err());
        assert!(fmt.parse_int::<i32>("1 000", "time").is_err());
        assert!(fmt.parse_int::<i32>("", "time").is_err());
    }

    #[test]
    fn test_parse_float_uses_decimal_point() {
        let fmt = NumberFormat::INVARIANT;
        assert_eq!(fmt.parse_float("0.5", "x").unwrap(), 0.5);
        assert_eq!(fmt.parse_float("-256.25", "x").unwrap(), -256.25);
        assert_eq!(fmt.parse_float("1E-05", "x").unwrap(), 0.00001);
        assert!(fmt.parse_float("0,5", "x").is_err());
    }

    #[test]
    fn test_strict_whitespace() {
        let fmt = NumberFormat {
            allow_whitespace: false,
        };
        assert!(fmt.parse_int::<i32>(" 1", "time").is_err());
        assert_eq!(fmt.parse_int::<i32>("1", "time").unwrap(), 1);
    }

    #[test]
    fn test_format_float_round_trips() {
        let fmt = NumberFormat::INVARIANT;
        for value in [0.0, 256.0, 0.1, -12.375, 1.0 / 3.0, 511.99999] {
            let text = fmt.format_float(value);
            assert!(!text.contains(','));
            assert_eq!(fmt.parse_float(&text, "x").unwrap(), value);
        }
        assert_eq!(fmt.format_float(256.0), "256");
    }

    #[test]
    fn test_malformed_error_names_field() {
        let err = NumberFormat::INVARIANT
            .parse_float("abc", "cursor x")
            .unwrap_err();
        assert_eq!(err.to_string(), "Malformed cursor x value: \"abc\"");
    }
}
