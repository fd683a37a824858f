/// Time-of-day parsing for check-in rows.
///
/// Three shapes are accepted, all hand-entered:
/// - `HH:MM` 24-hour clock ("08:30" -> 8.5)
/// - legacy comma decimal, one digit before the comma ("8,50" -> 8.5)
/// - plain decimal hours ("8.5" -> 8.5)
///
/// Anything else is unparseable and yields `None`; callers treat that as
/// "no value", never as an error.
pub fn parse_time_to_hours(input: &str) -> Option<f64> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Some((hh, mm)) = s.split_once(':') {
        if hh.is_empty() || hh.len() > 2 || mm.len() != 2 {
            return None;
        }
        if !all_digits(hh) || !all_digits(mm) {
            return None;
        }
        let h: u32 = hh.parse().ok()?;
        let m: u32 = mm.parse().ok()?;
        if h >= 24 || m >= 60 {
            return None;
        }
        return Some(f64::from(h) + f64::from(m) / 60.0);
    }

    if let Some((whole, frac)) = s.split_once(',') {
        if whole.len() != 1 || frac.is_empty() || frac.len() > 2 {
            return None;
        }
        if !all_digits(whole) || !all_digits(frac) {
            return None;
        }
        return format!("{whole}.{frac}").parse().ok();
    }

    // Plain decimal: digits with at most one interior dot.
    if !s.starts_with(|c: char| c.is_ascii_digit()) || s.ends_with('.') {
        return None;
    }
    if !s.chars().all(|c| c.is_ascii_digit() || c == '.') || s.matches('.').count() > 1 {
        return None;
    }
    s.parse().ok()
}

fn all_digits(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit())
}

/// Elapsed hours between two time-of-day strings.
///
/// Unparseable input or an end at/before the start both yield 0; overnight
/// shifts are not supported.
pub fn span_hours(start: &str, end: &str) -> f64 {
    match (parse_time_to_hours(start), parse_time_to_hours(end)) {
        (Some(a), Some(b)) if b > a => b - a,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn parses_hh_mm() {
        assert!((parse_time_to_hours("08:30").unwrap() - 8.5).abs() < EPS);
        assert!((parse_time_to_hours("0:00").unwrap() - 0.0).abs() < EPS);
        assert!((parse_time_to_hours("23:59").unwrap() - (23.0 + 59.0 / 60.0)).abs() < EPS);
    }

    #[test]
    fn parses_legacy_comma_decimal() {
        assert!((parse_time_to_hours("8,50").unwrap() - 8.5).abs() < EPS);
        assert!((parse_time_to_hours("8,5").unwrap() - 8.5).abs() < EPS);
        // more than one digit before the comma is not the legacy shape
        assert_eq!(parse_time_to_hours("12,5"), None);
    }

    #[test]
    fn parses_plain_decimal() {
        assert!((parse_time_to_hours("8.5").unwrap() - 8.5).abs() < EPS);
        assert!((parse_time_to_hours("9").unwrap() - 9.0).abs() < EPS);
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        assert_eq!(parse_time_to_hours("25:00"), None);
        assert_eq!(parse_time_to_hours("08:60"), None);
        assert_eq!(parse_time_to_hours("8:5"), None);
        assert_eq!(parse_time_to_hours("abc"), None);
        assert_eq!(parse_time_to_hours(""), None);
        assert_eq!(parse_time_to_hours("8."), None);
        assert_eq!(parse_time_to_hours(".5"), None);
    }

    #[test]
    fn span_basic() {
        assert!((span_hours("08:00", "17:00") - 9.0).abs() < EPS);
        assert!((span_hours("08:30", "12:00") - 3.5).abs() < EPS);
    }

    #[test]
    fn span_no_wraparound() {
        assert_eq!(span_hours("17:00", "08:00"), 0.0);
        assert_eq!(span_hours("09:00", "09:00"), 0.0);
    }

    #[test]
    fn span_unparseable_is_zero() {
        assert_eq!(span_hours("abc", "17:00"), 0.0);
        assert_eq!(span_hours("08:00", ""), 0.0);
    }
}
