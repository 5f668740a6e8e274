//! Heartbeat marker access
//!
//! The controlled service writes `<timestamp> | <payload>` lines. Only the
//! first field of the first line matters here.

use std::io;
use std::path::Path;

/// Field delimiter inside a marker record
pub const MARKER_DELIMITER: char = '|';

/// Read the whole marker file as text
pub fn read_marker(path: &Path) -> io::Result<String> {
    std::fs::read_to_string(path)
}

/// The candidate timestamp: first line, cut at the first `|`, trimmed.
pub fn timestamp_field(content: &str) -> &str {
    let first_line = content
        .trim_start_matches('\u{feff}')
        .lines()
        .next()
        .unwrap_or("");
    first_line
        .split(MARKER_DELIMITER)
        .next()
        .unwrap_or("")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_before_delimiter() {
        assert_eq!(
            timestamp_field("2024-01-01 12:00:00+0000|extra"),
            "2024-01-01 12:00:00+0000"
        );
    }

    #[test]
    fn field_is_trimmed() {
        assert_eq!(
            timestamp_field("  2024-01-01T12:00:00+00:00 | loop\n"),
            "2024-01-01T12:00:00+00:00"
        );
    }

    #[test]
    fn only_first_line_counts() {
        assert_eq!(
            timestamp_field("2024-01-01 12:00:00+0000\nsecond|line\n"),
            "2024-01-01 12:00:00+0000"
        );
    }

    #[test]
    fn no_delimiter_uses_whole_line() {
        assert_eq!(timestamp_field("2024-01-01 12:00:00+0000"), "2024-01-01 12:00:00+0000");
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(timestamp_field(""), "");
        assert_eq!(timestamp_field("|boot"), "");
        assert_eq!(timestamp_field("   \n"), "");
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        assert_eq!(timestamp_field("\u{feff}2024-01-01 12:00:00+0000|x"), "2024-01-01 12:00:00+0000");
    }

    #[test]
    fn read_marker_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_marker(&dir.path().join("heartbeat")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
