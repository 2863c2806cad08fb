//! Degree-minute-second coordinate parsing
//!
//! Accepts both description dialects found in photo metadata: the symbol
//! form (`40° 26' 46.00"`) and the word form (`40 deg 26 min 46 sec`).

use std::sync::LazyLock;

use regex::Regex;

static DMS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(-?\d+(?:\.\d+)?)\s*(?:°|deg)\s*(\d+(?:\.\d+)?)\s*(?:'|′|min)\s*(\d+(?:\.\d+)?)\s*(?:"|″|''|sec)"#,
    )
    .expect("DMS pattern is valid")
});

static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("number pattern is valid")
});

/// Parse a DMS description into decimal degrees.
///
/// Returns `None` when the text does not contain a DMS triple. A leading
/// minus sign on the degrees applies to the whole coordinate.
pub fn parse_dms(text: &str) -> Option<f64> {
    let caps = DMS_PATTERN.captures(text)?;
    let degrees: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;

    let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
    if caps[1].starts_with('-') {
        Some(-magnitude)
    } else {
        Some(magnitude)
    }
}

/// Like [`parse_dms`], but yields `0.0` (with a warning) for unparseable text.
pub fn parse_dms_or_zero(text: &str) -> f64 {
    parse_dms(text).unwrap_or_else(|| {
        tracing::warn!(text = %text, "Unparseable DMS coordinate, defaulting to 0.0");
        0.0
    })
}

/// Extract the first signed decimal number in an altitude description
/// (e.g. `"123.4 m"`).
pub fn extract_altitude(text: &str) -> Option<f64> {
    NUMBER_PATTERN
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Like [`extract_altitude`], but yields `0.0` (with a warning) when no
/// number is present.
pub fn extract_altitude_or_zero(text: &str) -> f64 {
    extract_altitude(text).unwrap_or_else(|| {
        tracing::warn!(text = %text, "Unparseable altitude, defaulting to 0.0");
        0.0
    })
}

/// Format a degree/minute/second triple the way [`parse_dms`] reads it.
///
/// Values are written at full precision so parsing the text back is lossless.
pub fn describe_dms(degrees: f64, minutes: f64, seconds: f64) -> String {
    format!("{}° {}' {}\"", degrees, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbol_form() {
        let value = parse_dms("40° 26' 46.00\"").unwrap();
        assert!((value - 40.446111).abs() < 1e-6);
    }

    #[test]
    fn test_parse_prime_symbols() {
        let value = parse_dms("79° 58′ 56″").unwrap();
        assert!((value - 79.982222).abs() < 1e-6);
    }

    #[test]
    fn test_parse_word_form() {
        let value = parse_dms("51 deg 30 min 26.5 sec").unwrap();
        assert!((value - 51.507361).abs() < 1e-6);
    }

    #[test]
    fn test_parse_negative_degrees() {
        let value = parse_dms("-33° 51' 21.91\"").unwrap();
        assert!((value + 33.856086).abs() < 1e-6);
    }

    #[test]
    fn test_parse_genuine_zero() {
        assert_eq!(parse_dms("0° 0' 0\""), Some(0.0));
    }

    #[test]
    fn test_non_matching_text() {
        assert_eq!(parse_dms("north-ish"), None);
        assert_eq!(parse_dms(""), None);
        assert_eq!(parse_dms_or_zero("north-ish"), 0.0);
    }

    #[test]
    fn test_extract_altitude() {
        assert_eq!(extract_altitude("123.4 m"), Some(123.4));
        assert_eq!(extract_altitude("Below sea level -12 metres"), Some(-12.0));
        assert_eq!(extract_altitude("unknown"), None);
        assert_eq!(extract_altitude_or_zero("unknown"), 0.0);
    }

    #[test]
    fn test_extract_altitude_number_forms() {
        assert_eq!(extract_altitude(".5 m"), Some(0.5));
        assert_eq!(extract_altitude("-.25 m"), Some(-0.25));
        assert_eq!(extract_altitude("+42 m"), Some(42.0));
        assert_eq!(extract_altitude("1e3 m"), Some(1000.0));
        assert_eq!(extract_altitude("2.5E-1 m"), Some(0.25));
        assert_eq!(extract_altitude("12. m"), Some(12.0));
    }

    #[test]
    fn test_describe_round_trips() {
        let text = describe_dms(40.0, 26.0, 46.0);
        assert_eq!(text, "40° 26' 46\"");
        assert!((parse_dms(&text).unwrap() - 40.446111).abs() < 1e-6);
    }

    #[test]
    fn test_describe_keeps_sub_centisecond_precision() {
        let text = describe_dms(40.0, 26.0, 29.4567);
        let expected = 40.0 + 26.0 / 60.0 + 29.4567 / 3600.0;
        assert!((parse_dms(&text).unwrap() - expected).abs() < 1e-12);
    }
}
