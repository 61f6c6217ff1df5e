//! Length values used in configuration (`"20%"`, `"30px"`, `"30"`).

use crate::{Error, Result};

/// Resolve a length against `total` pixels
///
/// Percentages are relative to `total`; bare numbers and `px` are absolute.
pub fn parse_length(value: &str, total: f64) -> Result<f64> {
    let value = value.trim();
    let (number, scale) = if let Some(n) = value.strip_suffix('%') {
        (n, total / 100.0)
    } else if let Some(n) = value.strip_suffix("px") {
        (n, 1.0)
    } else {
        (value, 1.0)
    };

    let n: f64 = number
        .trim()
        .parse()
        .map_err(|_| Error::InvalidLength(value.to_string()))?;
    if !n.is_finite() {
        return Err(Error::InvalidLength(value.to_string()));
    }
    Ok(n * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert!((parse_length("20%", 200.0).unwrap() - 40.0).abs() < 1e-9);
        assert!((parse_length("30px", 200.0).unwrap() - 30.0).abs() < 1e-9);
        assert!((parse_length(" 12.5 ", 200.0).unwrap() - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_invalid() {
        assert!(parse_length("abc", 100.0).is_err());
        assert!(parse_length("%", 100.0).is_err());
        assert!(parse_length("inf", 100.0).is_err());
    }
}
