//! Leading-prefix number parsing for raw price attributes.
//!
//! Mirrors the browser `parseFloat`: leading whitespace is skipped, the longest
//! numeric prefix is converted and anything after it is ignored. Text with no
//! numeric prefix has no value.

const INFINITY_LITERAL: &str = "Infinity";

/// Parses the numeric prefix of `raw`, or `None` when there is none.
pub fn parse_price(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start_matches(is_js_whitespace);
    let bytes = trimmed.as_bytes();

    let (negative, sign_len) = match bytes.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };
    if trimmed[sign_len..].starts_with(INFINITY_LITERAL) {
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let mut literal = String::with_capacity(trimmed.len());
    if negative {
        literal.push('-');
    }

    let mut end = sign_len;
    let int_digits = count_digits(&bytes[end..]);
    if int_digits == 0 {
        literal.push('0');
    } else {
        literal.push_str(&trimmed[end..end + int_digits]);
    }
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            if frac_digits > 0 {
                literal.push_str(&trimmed[end..end + 1 + frac_digits]);
            }
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut cursor = end + 1;
        if matches!(bytes.get(cursor), Some(b'+' | b'-')) {
            cursor += 1;
        }
        let exp_digits = count_digits(&bytes[cursor..]);
        if exp_digits > 0 {
            literal.push('e');
            literal.push_str(&trimmed[end + 1..cursor + exp_digits]);
        }
    }

    literal.parse::<f64>().ok()
}

/// Parses an optional attribute value, mapping anything unparsable to NaN.
pub fn parse_float(raw: Option<&str>) -> f64 {
    raw.and_then(parse_price).unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn is_js_whitespace(ch: char) -> bool {
    ch == '\u{feff}' || (ch.is_whitespace() && ch != '\u{85}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_decimals() {
        assert_eq!(parse_price("1234.5"), Some(1234.5));
        assert_eq!(parse_price("0"), Some(0.0));
        assert_eq!(parse_price(".5"), Some(0.5));
        assert_eq!(parse_price("-3.25"), Some(-3.25));
        assert_eq!(parse_price("+7"), Some(7.0));
    }

    #[test]
    fn ignores_trailing_garbage() {
        assert_eq!(parse_price("19.99 USD"), Some(19.99));
        assert_eq!(parse_price("5."), Some(5.0));
        assert_eq!(parse_price("5.x"), Some(5.0));
        assert_eq!(parse_price("5.e3"), Some(5000.0));
        assert_eq!(parse_price("1e"), Some(1.0));
        assert_eq!(parse_price("1e+"), Some(1.0));
        assert_eq!(parse_price("2e3kg"), Some(2000.0));
        assert_eq!(parse_price("0x10"), Some(0.0));
        assert_eq!(parse_price("1,234.50"), Some(1.0));
    }

    #[test]
    fn skips_leading_whitespace() {
        assert_eq!(parse_price("  \n\t42"), Some(42.0));
        assert_eq!(parse_price("\u{a0}\u{feff}8"), Some(8.0));
        assert_eq!(parse_price("\u{85}8"), None);
    }

    #[test]
    fn recognises_infinity() {
        assert_eq!(parse_price("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_price("-Infinityx"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_price("infinity"), None);
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("."), None);
        assert_eq!(parse_price("-"), None);
        assert_eq!(parse_price("$12"), None);
        assert_eq!(parse_price("NaN"), None);
        assert!(parse_float(None).is_nan());
        assert!(parse_float(Some("abc")).is_nan());
    }
}
