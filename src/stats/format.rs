//! Number formatting for KPIs and chart labels.

/// Format with a fixed number of decimals and `,` between thousands,
/// e.g. `1234567.891` with 2 decimals is `1,234,567.89`.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 2);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.');
    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Two significant digits with a k/M/B/T suffix, for bar labels.
pub fn format_compact(value: f64) -> String {
    const SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "k")];

    for (scale, suffix) in SUFFIXES {
        if value.abs() >= scale {
            return format!("{}{suffix}", two_significant(value / scale));
        }
    }
    two_significant(value)
}

fn two_significant(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (1 - magnitude).max(0) as usize;
    let text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_thousands(2.0, 0), "2");
        assert_eq!(format_thousands(150.0, 0), "150");
        assert_eq!(format_thousands(1500.0, 2), "1,500.00");
        assert_eq!(format_thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_thousands(999999.6, 0), "1,000,000");
        assert_eq!(format_thousands(-12345.0, 0), "-12,345");
        assert_eq!(format_thousands(-0.001, 2), "0.00");
    }

    #[test]
    fn compact_labels() {
        assert_eq!(format_compact(15.0), "15");
        assert_eq!(format_compact(1500.0), "1.5k");
        assert_eq!(format_compact(2_340_000.0), "2.3M");
        assert_eq!(format_compact(0.0), "0");
    }
}
