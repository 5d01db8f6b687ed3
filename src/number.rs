//! Locale-tolerant decimal parsing and the canonical decimal encoding.
//!
//! Users type prices the way their keyboard and habits dictate: `12,5`,
//! `1.234,56`, `1,234.56`. [`parse_decimal`] accepts all of them without
//! knowing the active locale. [`format_decimal`] writes numbers back in the
//! active locale's notation; its output always parses back.

use thiserror::Error;

use crate::locale::Locale;

/// Failure to read a number out of user or persisted text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("no numeric value in {0:?}")]
    NotANumber(String),
    #[error("{0:?} does not fit in a finite number")]
    OutOfRange(String),
}

/// Parse free-form decimal text where either `,` or `.` may be the decimal
/// separator.
///
/// The separator that ends the first numeric run decides the interpretation:
/// with `,` every `.` is grouping and gets stripped; with `.` every `,` is.
/// The result is then read like a browser `parseFloat`: the longest numeric
/// prefix wins and trailing text, including anything after a space, is
/// ignored.
pub fn parse_decimal(input: &str) -> Result<f64, ParseError> {
    let normalized = match decimal_separator(input) {
        Some(',') => input.replace('.', "").replace(',', "."),
        Some(_) => input.replace(',', ""),
        None => input.to_string(),
    };

    match float_prefix(&normalized) {
        Some(value) if value.is_finite() => Ok(value),
        Some(_) => Err(ParseError::OutOfRange(input.to_string())),
        None => Err(ParseError::NotANumber(input.to_string())),
    }
}

/// Last `,`/`.` of the first `[0-9,.]` run that contains one.
fn decimal_separator(s: &str) -> Option<char> {
    let mut last = None;
    for c in s.chars() {
        match c {
            ',' | '.' => last = Some(c),
            '0'..='9' => {}
            _ if last.is_some() => return last,
            _ => {}
        }
    }
    last
}

/// Longest `[+-]digits[.digits][e[+-]digits]` prefix, parsed.
fn float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = match bytes.first() {
        Some(b'+' | b'-') => 1,
        _ => 0,
    };
    let int_end = digits_from(end);
    let mut digit_count = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        digit_count += frac_end - (end + 1);
        if digit_count > 0 {
            end = frac_end;
        }
    }
    if digit_count == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Canonical encoding used for persisted scalars: 0–2 fraction digits,
/// the locale's decimal separator, no grouping.
///
/// No grouping: `1.234` in a comma-decimal locale reads back as 1.234.
pub fn format_decimal(value: f64, locale: &Locale) -> String {
    let (negative, int_part, frac) = match split_rounded(value) {
        Some(parts) => parts,
        None => return value.to_string(),
    };
    let mut out = String::with_capacity(int_part.len() + frac.len() + 2);
    if negative {
        out.push('-');
    }
    out.push_str(&int_part);
    if !frac.is_empty() {
        out.push(locale.decimal_separator);
        out.push_str(&frac);
    }
    out
}

/// Display form: like [`format_decimal`] but with the locale's digit grouping.
pub fn format_grouped(value: f64, locale: &Locale) -> String {
    let (negative, int_part, frac) = match split_rounded(value) {
        Some(parts) => parts,
        None => return value.to_string(),
    };
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(&int_part, locale));
    if !frac.is_empty() {
        out.push(locale.decimal_separator);
        out.push_str(&frac);
    }
    out
}

/// Sign, integer digits and trimmed fraction digits of `value` rounded to
/// two places. `None` for NaN and infinities.
fn split_rounded(value: f64) -> Option<(bool, String, String)> {
    if !value.is_finite() {
        return None;
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');
    let nonzero = int_part.bytes().chain(frac.bytes()).any(|b| b != b'0');
    Some((
        value.is_sign_negative() && nonzero,
        int_part.to_string(),
        frac.to_string(),
    ))
}

fn group_digits(digits: &str, locale: &Locale) -> String {
    if digits.len() < 3 + locale.min_grouping_digits {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(locale.group_separator);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::LOCALES;

    fn locale(code: &str) -> Locale {
        Locale::find(code).unwrap()
    }

    #[test]
    fn comma_decimal_with_dot_grouping() {
        assert_eq!(parse_decimal("1.234,56"), Ok(1234.56));
        assert_eq!(parse_decimal("1.000,00"), Ok(1000.0));
        assert_eq!(parse_decimal("12,5"), Ok(12.5));
    }

    #[test]
    fn dot_decimal_with_comma_grouping() {
        assert_eq!(parse_decimal("1,234.56"), Ok(1234.56));
        assert_eq!(parse_decimal("1,000,000.5"), Ok(1_000_000.5));
        assert_eq!(parse_decimal("0.25"), Ok(0.25));
    }

    #[test]
    fn last_separator_decides() {
        // both present: the later one is the decimal separator
        assert_eq!(parse_decimal("1.2,3"), Ok(12.3));
        assert_eq!(parse_decimal("1,2.3"), Ok(12.3));
        // only grouping-looking dots: still read as decimal
        assert_eq!(parse_decimal("1.234"), Ok(1.234));
    }

    #[test]
    fn plain_integers_pass_through() {
        assert_eq!(parse_decimal("42"), Ok(42.0));
        assert_eq!(parse_decimal("-7"), Ok(-7.0));
        assert_eq!(parse_decimal("  8"), Ok(8.0));
    }

    #[test]
    fn trailing_text_is_ignored() {
        assert_eq!(parse_decimal("12,5 $"), Ok(12.5));
        assert_eq!(parse_decimal("3abc"), Ok(3.0));
        assert_eq!(parse_decimal("1e3"), Ok(1000.0));
        assert_eq!(parse_decimal("2e"), Ok(2.0));
    }

    #[test]
    fn whitespace_ends_the_number() {
        assert_eq!(parse_decimal("12 5"), Ok(12.0));
        assert_eq!(parse_decimal("1,5 2.5"), Ok(1.5));
        assert_eq!(parse_decimal("1\u{202f}234,5"), Ok(1.0));
        assert_eq!(parse_decimal(" 7,25 "), Ok(7.25));
    }

    #[test]
    fn rejects_non_numbers() {
        assert!(matches!(parse_decimal(""), Err(ParseError::NotANumber(_))));
        assert!(matches!(parse_decimal("abc"), Err(ParseError::NotANumber(_))));
        assert!(matches!(parse_decimal(","), Err(ParseError::NotANumber(_))));
        assert!(matches!(parse_decimal("-"), Err(ParseError::NotANumber(_))));
        assert!(matches!(parse_decimal("1e999"), Err(ParseError::OutOfRange(_))));
    }

    #[test]
    fn leading_separator_reads_as_fraction() {
        assert_eq!(parse_decimal(",5"), Ok(0.5));
        assert_eq!(parse_decimal(".75"), Ok(0.75));
    }

    #[test]
    fn format_trims_fraction_digits() {
        let de = locale("de");
        assert_eq!(format_decimal(2.5, &de), "2,5");
        assert_eq!(format_decimal(3.0, &de), "3");
        assert_eq!(format_decimal(1.239, &de), "1,24");
        assert_eq!(format_decimal(1234.5, &locale("en")), "1234.5");
    }

    #[test]
    fn format_drops_negative_zero() {
        let en = locale("en");
        assert_eq!(format_decimal(-0.001, &en), "0");
        assert_eq!(format_decimal(-1.5, &en), "-1.5");
    }

    #[test]
    fn grouped_display_follows_locale() {
        assert_eq!(format_grouped(1234.5, &locale("en")), "1,234.5");
        assert_eq!(format_grouped(1234.5, &locale("de")), "1.234,5");
        assert_eq!(format_grouped(1234.5, &locale("fr")), "1\u{202f}234,5");
        // minimum grouping of two: four-digit numbers stay ungrouped
        assert_eq!(format_grouped(1234.0, &locale("es")), "1234");
        assert_eq!(format_grouped(12345.0, &locale("es")), "12.345");
        assert_eq!(format_grouped(1234567.0, &locale("en")), "1,234,567");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the canonical encoding always reads back as the
            /// value rounded to two places, in every locale.
            #[test]
            fn canonical_encoding_reads_back(
                cents in -100_000_000i64..100_000_000i64,
                idx in 0..LOCALES.len(),
            ) {
                let value = cents as f64 / 100.0;
                let text = format_decimal(value, &LOCALES[idx]);
                let parsed = parse_decimal(&text).unwrap();
                prop_assert!((parsed - value).abs() < 1e-9, "{} -> {} -> {}", value, text, parsed);
            }

            /// Property: comma-decimal text with dot grouping parses to the
            /// same value as the plain dot-decimal spelling.
            #[test]
            fn dot_grouped_comma_decimal(int in 1_000u64..1_000_000_000u64, frac in 0u32..100u32) {
                let de = Locale::find("de").unwrap();
                let text = format!("{},{:02}", format_grouped(int as f64, &de), frac);
                let expected: f64 = format!("{}.{:02}", int, frac).parse().unwrap();
                prop_assert_eq!(parse_decimal(&text).unwrap(), expected);
            }

            /// Property: the parser never panics, whatever the user types.
            #[test]
            fn parse_never_panics(s in "\\PC*") {
                let _ = parse_decimal(&s);
            }
        }
    }
}
