/// Parses a whole token as a finite number. Surrounding whitespace is ignored.
pub fn parse_strict(input: &str) -> Option<f64> {
    input.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parses the longest numeric prefix of `input`, the same way a browser's
/// `parseFloat` does: leading whitespace is skipped and trailing garbage is
/// ignored, so `"12abc"` is 12 and `"abc"` is nothing.
pub fn parse_leading(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - (end + 1);
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return None;
    }

    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parses the leading integer of `input` like `parseInt`: an optional sign
/// and the digits after it. `"5pcs"` is 5 and `"2.5"` is 2.
pub fn parse_leading_integer(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    s[..end].parse::<f64>().ok().filter(|value| value.is_finite())
}

/// `parse_leading`, with anything unparseable counted as zero.
pub fn lenient_number(input: &str) -> f64 {
    parse_leading(input).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("100", Some(100.0))]
    #[case(" 2.5 ", Some(2.5))]
    #[case("1e3", Some(1000.0))]
    #[case("abc", None)]
    #[case("12abc", None)]
    #[case("inf", None)]
    #[case("NaN", None)]
    #[case("", None)]
    fn strict_parsing(#[case] input: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_strict(input), expected);
    }

    #[rstest]
    #[case("12abc", Some(12.0))]
    #[case("  7", Some(7.0))]
    #[case("-3.5kg", Some(-3.5))]
    #[case(".5", Some(0.5))]
    #[case("5.", Some(5.0))]
    #[case("2e", Some(2.0))]
    #[case("2e2x", Some(200.0))]
    #[case("abc", None)]
    #[case(".", None)]
    #[case("-", None)]
    #[case("", None)]
    fn leading_prefix_parsing(#[case] input: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_leading(input), expected);
    }

    #[rstest]
    #[case("5", Some(5.0))]
    #[case("5pcs", Some(5.0))]
    #[case("2.5", Some(2.0))]
    #[case(" -3x", Some(-3.0))]
    #[case("1e3", Some(1.0))]
    #[case("pcs5", None)]
    #[case("-", None)]
    #[case("", None)]
    fn leading_integer_parsing(#[case] input: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_leading_integer(input), expected);
    }

    #[test]
    fn lenient_number_defaults_to_zero() {
        assert_eq!(lenient_number("abc"), 0.0);
        assert_eq!(lenient_number("18"), 18.0);
    }
}
