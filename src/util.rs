/// Format a non-negative number of seconds as a zero-padded "MM:SS" string.
///
/// Minutes are not clamped, so durations over an hour render as e.g. "75:00".
pub fn format_mm_ss(secs: u64) -> String {
    let minutes = secs / 60;
    let seconds = secs % 60;

    format!("{:02}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_zero() {
        assert_eq!(format_mm_ss(0), "00:00");
    }

    #[test]
    fn test_format_under_a_minute() {
        assert_eq!(format_mm_ss(1), "00:01");
        assert_eq!(format_mm_ss(59), "00:59");
    }

    #[test]
    fn test_format_whole_minutes() {
        assert_eq!(format_mm_ss(60), "01:00");
        assert_eq!(format_mm_ss(600), "10:00");
    }

    #[test]
    fn test_format_mixed() {
        assert_eq!(format_mm_ss(599), "09:59");
        assert_eq!(format_mm_ss(1500), "25:00");
        assert_eq!(format_mm_ss(1337), "22:17");
    }

    #[test]
    fn test_format_over_an_hour() {
        assert_eq!(format_mm_ss(4500), "75:00");
    }
}
