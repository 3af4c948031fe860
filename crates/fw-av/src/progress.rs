//! Progress extraction from ffmpeg status lines.
//!
//! While encoding, ffmpeg rewrites a status line such as
//! `frame=  250 fps= 50 q=2.0 size= 1024kB time=00:00:10.00 bitrate= 838.9kbits/s`.
//! Older builds print `time=10.00` in plain seconds.

/// Parse the `time=` field of a status line into seconds.
///
/// Returns `None` when the line has no `time=` field or its value is not a
/// timestamp (e.g. `N/A`).
pub fn parse_progress_time(line: &str) -> Option<f64> {
    let start = line.rfind("time=")? + "time=".len();
    let value = line[start..].split_whitespace().next()?;
    parse_timestamp(value)
}

/// Fraction of `duration` reached by a status line, clamped to `[0, 1]`.
pub fn progress_fraction(line: &str, duration: Option<f64>) -> Option<f64> {
    let duration = duration.filter(|d| *d > 0.0)?;
    let time = parse_progress_time(line)?;
    Some((time / duration).clamp(0.0, 1.0))
}

/// `HH:MM:SS.xx`, `MM:SS.xx` or plain seconds.
fn parse_timestamp(value: &str) -> Option<f64> {
    let mut seconds = 0.0;
    for part in value.split(':') {
        if !part.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        let n: f64 = part.parse().ok()?;
        seconds = seconds * 60.0 + n;
    }
    Some(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str =
        "frame=  250 fps= 50 q=2.0 size=    1024kB time=00:01:10.50 bitrate= 838.9kbits/s    ";

    #[test]
    fn parses_clock_time() {
        assert_eq!(parse_progress_time(STATUS), Some(70.5));
    }

    #[test]
    fn parses_plain_seconds() {
        let line = "frame=   25 fps=  0 q=2.0 size=     120kB time=1.00 bitrate= 983.0kbits/s";
        assert_eq!(parse_progress_time(line), Some(1.0));
    }

    #[test]
    fn rejects_missing_or_unknown_time() {
        assert_eq!(parse_progress_time("Press [q] to stop encoding"), None);
        assert_eq!(parse_progress_time("size=N/A time=N/A bitrate=N/A"), None);
        assert_eq!(parse_progress_time("time="), None);
        assert_eq!(parse_progress_time("time=-00:00:01.00 "), None);
    }

    #[test]
    fn fraction_of_duration() {
        assert_eq!(progress_fraction(STATUS, Some(141.0)), Some(0.5));
    }

    #[test]
    fn fraction_is_clamped() {
        assert_eq!(progress_fraction(STATUS, Some(10.0)), Some(1.0));
    }

    #[test]
    fn fraction_needs_positive_duration() {
        assert_eq!(progress_fraction(STATUS, None), None);
        assert_eq!(progress_fraction(STATUS, Some(0.0)), None);
    }
}
