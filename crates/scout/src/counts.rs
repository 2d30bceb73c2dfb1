// ABOUTME: Count normalization for like/comment text shown on note listings.
// ABOUTME: Expands unit-suffixed counts such as "1.2w" or "3.5k" into plain integers.

/// A multiplier marker found in displayed count text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    TenThousand,
    Thousand,
}

impl Unit {
    fn of(c: char) -> Option<Unit> {
        match c {
            'w' | 'W' | '万' => Some(Unit::TenThousand),
            'k' | 'K' | '千' => Some(Unit::Thousand),
            _ => None,
        }
    }

    fn multiplier(self) -> f64 {
        match self {
            Unit::TenThousand => 10_000.0,
            Unit::Thousand => 1_000.0,
        }
    }
}

/// Parses displayed count text into an integer.
///
/// - One unit marker (`w`/`万` = ×10,000, `k`/`K` = ×1,000): the digits and
///   decimal points in the text are read as a float prefix and scaled.
/// - No marker: the digits in the text are read as an integer.
/// - Empty text, text without digits, more than one unit marker, or a prefix
///   that is not a valid number all yield 0.
pub fn parse_count(text: &str) -> u64 {
    let text = text.trim();
    if text.is_empty() {
        return 0;
    }

    let units: Vec<Unit> = text.chars().filter_map(Unit::of).collect();
    match units.as_slice() {
        [] => parse_plain(text),
        [unit] => parse_scaled(text, *unit),
        _ => 0,
    }
}

fn parse_plain(text: &str) -> u64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

fn parse_scaled(text: &str, unit: Unit) -> u64 {
    let prefix: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value: f64 = match prefix.parse() {
        Ok(v) => v,
        Err(_) => return 0,
    };

    // 2.3 * 10000.0 is 22999.999..., so round before truncating.
    let scaled = (value * unit.multiplier()).round();
    if scaled.is_finite() && scaled >= 0.0 {
        scaled as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_thousand_suffix() {
        assert_eq!(parse_count("1.2w"), 12_000);
        assert_eq!(parse_count("2.3w"), 23_000);
        assert_eq!(parse_count("10w+"), 100_000);
        assert_eq!(parse_count("1.5万"), 15_000);
        assert_eq!(parse_count("3W"), 30_000);
    }

    #[test]
    fn thousand_suffix_any_case() {
        assert_eq!(parse_count("3.5k"), 3_500);
        assert_eq!(parse_count("3.5K"), 3_500);
        assert_eq!(parse_count("12k"), 12_000);
        assert_eq!(parse_count("0.1k"), 100);
    }

    #[test]
    fn plain_digits() {
        assert_eq!(parse_count("128"), 128);
        assert_eq!(parse_count("  42 "), 42);
        assert_eq!(parse_count("1,024"), 1_024);
        assert_eq!(parse_count("赞 77"), 77);
    }

    #[test]
    fn empty_and_garbage_are_zero() {
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("   "), 0);
        assert_eq!(parse_count("赞"), 0);
        assert_eq!(parse_count("--"), 0);
    }

    #[test]
    fn unit_without_number_is_zero() {
        assert_eq!(parse_count("w"), 0);
        assert_eq!(parse_count("k"), 0);
    }

    #[test]
    fn multiple_unit_markers_are_unparseable() {
        assert_eq!(parse_count("1.2wk"), 0);
        assert_eq!(parse_count("1w2w"), 0);
    }

    #[test]
    fn malformed_decimal_prefix_is_zero() {
        assert_eq!(parse_count("1.2.3w"), 0);
    }

    #[test]
    fn leading_decimal_point() {
        assert_eq!(parse_count(".5w"), 5_000);
    }

    #[test]
    fn overflowing_plain_digits_are_zero() {
        assert_eq!(parse_count("99999999999999999999999"), 0);
    }
}
