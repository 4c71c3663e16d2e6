//! Session name normalization and timestamp slugs.

use chrono::{DateTime, Local, SecondsFormat, Utc};

/// Normalize arbitrary text into a session identifier.
///
/// The result is lowercase, contains only `[a-z0-9._-]`, has every run of
/// other characters collapsed to a single `-`, and never starts or ends with
/// `-`. Input with no usable characters yields an empty string, which callers
/// must reject.
pub fn normalize_session_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_dash = false;

    for c in raw.trim().chars().flat_map(char::to_lowercase) {
        let allowed = c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_');
        if allowed {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            // '-' itself and anything disallowed both collapse into one dash.
            pending_dash = true;
        }
    }

    out
}

/// Minute-resolution local timestamp used in branch and squad names.
/// Format: `YYYYMMDD-HHMM`.
pub fn timestamp_slug() -> String {
    slug_for(&Local::now())
}

pub(crate) fn slug_for(time: &DateTime<Local>) -> String {
    time.format("%Y%m%d-%H%M").to_string()
}

/// ISO-8601 creation timestamp in UTC with millisecond precision.
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalize_creates_safe_slugs() {
        assert_eq!(normalize_session_name("  Bugfix Auth !!  "), "bugfix-auth");
        assert_eq!(normalize_session_name("A__B"), "a__b");
        assert_eq!(normalize_session_name("feature/Login Page"), "feature-login-page");
        assert_eq!(normalize_session_name("v1.2-release"), "v1.2-release");
    }

    #[test]
    fn test_normalize_collapses_dash_runs() {
        assert_eq!(normalize_session_name("a---b"), "a-b");
        assert_eq!(normalize_session_name("a - - b"), "a-b");
        assert_eq!(normalize_session_name("--lead-and-trail--"), "lead-and-trail");
    }

    #[test]
    fn test_normalize_empty_and_invalid() {
        assert_eq!(normalize_session_name(""), "");
        assert_eq!(normalize_session_name("   "), "");
        assert_eq!(normalize_session_name("!!!"), "");
        assert_eq!(normalize_session_name("---"), "");
    }

    #[test]
    fn test_normalize_non_ascii() {
        assert_eq!(normalize_session_name("café crème"), "caf-cr-me");
        assert_eq!(normalize_session_name("日本"), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "  Bugfix Auth !!  ",
            "A__B",
            "x--y",
            "-._-",
            "Ünïcödé Name",
            "tabs\tand\nnewlines",
            "..dots..",
            "MiXeD_123-abc",
        ];
        for input in inputs {
            let once = normalize_session_name(input);
            assert_eq!(normalize_session_name(&once), once, "input: {:?}", input);
            assert!(once
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "._-".contains(c)));
            assert!(!once.starts_with('-') && !once.ends_with('-'));
            assert!(!once.contains("--"));
        }
    }

    #[test]
    fn test_slug_format() {
        let time = Local.with_ymd_and_hms(2026, 2, 26, 22, 5, 59).unwrap();
        assert_eq!(slug_for(&time), "20260226-2205");
    }

    #[test]
    fn test_iso_timestamp_shape() {
        let ts = iso_timestamp();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2026-02-26T22:05:59.123Z".len());
    }
}
