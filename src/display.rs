//! Text formatting for list rows and the pagination footer.

use crate::model::FileStatus;
use chrono::{DateTime, NaiveDateTime};

/// `512 B`, `1.5 KB`, `2.0 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

pub fn status_label(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Completed => "完了",
        FileStatus::Processing => "処理中",
        FileStatus::Failed => "失敗",
        FileStatus::Unknown => "不明",
    }
}

/// Seconds with two decimals, or `-` when unknown or zero.
pub fn format_processing_time(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) if s > 0.0 => format!("{s:.2}秒"),
        _ => "-".to_string(),
    }
}

/// First eight characters of an id followed by `...`.
pub fn short_id(id: &str) -> String {
    let head: String = id.chars().take(8).collect();
    format!("{head}...")
}

/// `YYYY/MM/DD HH:MM`. Unparseable input is returned unchanged.
pub fn format_datetime(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%Y/%m/%d %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// `YYYY/MM/DD HH:MM:SS`, as shown in the detail view.
pub fn format_datetime_seconds(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%Y/%m/%d %H:%M:%S").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Accepts RFC 3339 and naive ISO-8601 (with or without fractional seconds).
/// Offsets are dropped; the wall-clock time is shown as sent.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// `21-25件を表示（全25件中）`.
pub fn item_range_label(start: u64, end: u64, total: u64) -> String {
    format!("{start}-{end}件を表示（全{total}件中）")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2 * 1024 * 1024), "2.0 MB");
    }

    #[test]
    fn status_labels() {
        assert_eq!(status_label(FileStatus::Completed), "完了");
        assert_eq!(status_label(FileStatus::Processing), "処理中");
        assert_eq!(status_label(FileStatus::Failed), "失敗");
        assert_eq!(status_label(FileStatus::Unknown), "不明");
    }

    #[test]
    fn processing_time() {
        assert_eq!(format_processing_time(Some(1.234)), "1.23秒");
        assert_eq!(format_processing_time(Some(0.0)), "-");
        assert_eq!(format_processing_time(None), "-");
    }

    #[test]
    fn ids_are_shortened() {
        assert_eq!(short_id("0123456789abcdef"), "01234567...");
        assert_eq!(short_id("abc"), "abc...");
    }

    #[test]
    fn datetimes() {
        assert_eq!(format_datetime("2025-06-01T10:05:09.123456"), "2025/06/01 10:05");
        assert_eq!(format_datetime("2025-06-01T10:05:09+09:00"), "2025/06/01 10:05");
        assert_eq!(
            format_datetime_seconds("2025-06-01 10:05:09"),
            "2025/06/01 10:05:09"
        );
        assert_eq!(format_datetime("yesterday"), "yesterday");
    }

    #[test]
    fn range_label() {
        assert_eq!(item_range_label(21, 25, 25), "21-25件を表示（全25件中）");
    }
}
