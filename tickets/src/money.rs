//! Money formatting from integer minor units.

/// Format `cents` as `{symbol}1,234.50`. Negative amounts lead with `-`.
#[must_use]
pub fn format_money(cents: i64, symbol: &str) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let whole = group_thousands(abs / 100);
    let frac = abs % 100;
    format!("{sign}{symbol}{whole}.{frac:02}")
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_small_amounts() {
        assert_eq!(format_money(0, "$"), "$0.00");
        assert_eq!(format_money(5, "$"), "$0.05");
        assert_eq!(format_money(250, "$"), "$2.50");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_money(123_450, "$"), "$1,234.50");
        assert_eq!(format_money(100_000_000, "$"), "$1,000,000.00");
        assert_eq!(format_money(99_999, "$"), "$999.99");
    }

    #[test]
    fn negative_amounts_lead_with_minus() {
        assert_eq!(format_money(-300, "$"), "-$3.00");
        assert_eq!(format_money(-123_456, "€"), "-€1,234.56");
    }

    #[test]
    fn handles_extreme_values() {
        assert_eq!(format_money(i64::MIN, ""), "-92,233,720,368,547,758.08");
    }
}
