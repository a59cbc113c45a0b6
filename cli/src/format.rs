/// Formats a yen amount with thousands separators, the way the dashboard
/// shows money everywhere (no decimal places, amounts are whole yen).
pub fn yen(amount: f64) -> String {
    let negative = amount < 0.0;
    let rounded = amount.abs().round() as u64;
    let digits = rounded.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if negative {
        format!("-{}", out)
    } else {
        out
    }
}

pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yen_groups_thousands() {
        assert_eq!(yen(0.0), "0");
        assert_eq!(yen(999.0), "999");
        assert_eq!(yen(1_000.0), "1,000");
        assert_eq!(yen(15_000_000.0), "15,000,000");
        assert_eq!(yen(-1_234_567.0), "-1,234,567");
    }

    #[test]
    fn percent_one_decimal() {
        assert_eq!(percent(40.0), "40.0%");
        assert_eq!(percent(12.34), "12.3%");
    }
}
