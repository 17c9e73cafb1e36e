//! Human-readable spans ("15m", "3d") to whole seconds

/// Used when the unit is missing or unknown, and when the magnitude does not parse
pub const DEFAULT_SECONDS: u64 = 7 * 24 * 60 * 60;

/// Convert a span like `"5m"` or `"3d"` to seconds.
///
/// The last character picks the multiplier (`s`, `m`, `h`, `d`), the rest is
/// the magnitude. Anything else yields [`DEFAULT_SECONDS`].
///
/// ```rust
/// use platform::duration::convert_to_seconds;
///
/// assert_eq!(convert_to_seconds("15m"), 900);
/// assert_eq!(convert_to_seconds("3d"), 259_200);
/// assert_eq!(convert_to_seconds("2w"), 604_800);
/// ```
pub fn convert_to_seconds(span: &str) -> u64 {
    let span = span.trim();
    let Some(unit) = span.chars().last() else {
        return DEFAULT_SECONDS;
    };

    let multiplier = match unit {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 24 * 60 * 60,
        _ => return DEFAULT_SECONDS,
    };

    let magnitude = &span[..span.len() - unit.len_utf8()];
    match magnitude.trim().parse::<u64>() {
        Ok(value) => value.saturating_mul(multiplier),
        Err(_) => DEFAULT_SECONDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_units() {
        assert_eq!(convert_to_seconds("30s"), 30);
        assert_eq!(convert_to_seconds("15m"), 900);
        assert_eq!(convert_to_seconds("2h"), 7_200);
        assert_eq!(convert_to_seconds("3d"), 259_200);
    }

    #[test]
    fn test_unknown_or_missing_unit_falls_back() {
        assert_eq!(convert_to_seconds("2w"), DEFAULT_SECONDS);
        assert_eq!(convert_to_seconds("100"), DEFAULT_SECONDS);
        assert_eq!(convert_to_seconds(""), DEFAULT_SECONDS);
    }

    #[test]
    fn test_bad_magnitude_falls_back() {
        assert_eq!(convert_to_seconds("m"), DEFAULT_SECONDS);
        assert_eq!(convert_to_seconds("xm"), DEFAULT_SECONDS);
        assert_eq!(convert_to_seconds("-5m"), DEFAULT_SECONDS);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(convert_to_seconds(" 5m \n"), 300);
    }
}
