//! Number and duration formatting helpers

use std::time::Duration;

/// Format an integer with comma thousands separators
///
/// ```
/// use loadpace_report::format_number;
///
/// assert_eq!(format_number(999), "999");
/// assert_eq!(format_number(1_234_567), "1,234,567");
/// ```
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Share of `part` in `whole`, in percent; zero when `whole` is zero
pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Render a duration rounded to the millisecond, e.g. `1m 02.500s`
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    let minutes = millis / 60_000;
    let secs = (millis % 60_000) as f64 / 1000.0;

    if minutes == 0 {
        format!("{secs:.3}s")
    } else if minutes < 60 {
        format!("{minutes}m {secs:06.3}s")
    } else {
        format!("{}h {:02}m {secs:06.3}s", minutes / 60, minutes % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(99_999), "99,999");
        assert_eq!(format_number(100_000), "100,000");
        assert_eq!(format_number(12_345_678), "12,345,678");
        assert_eq!(format_number(u64::MAX), "18,446,744,073,709,551,615");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 4), 25.0);
        assert_eq!(percent(3, 0), 0.0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(2_003)), "2.003s");
        assert_eq!(format_duration(Duration::from_micros(1_500_400)), "1.500s");
        assert_eq!(format_duration(Duration::from_millis(62_500)), "1m 02.500s");
        assert_eq!(format_duration(Duration::from_secs(3_725)), "1h 02m 05.000s");
    }
}
