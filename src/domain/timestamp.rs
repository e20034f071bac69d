//! Snapshot timestamps.

use serde::{Deserialize, Serialize};

/// A snapshot timestamp, `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`.
///
/// Ordering is plain string ordering, which is chronological for the
/// zero-padded formats the dashboard data uses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub String);

impl Timestamp {
    pub fn new(ts: impl Into<String>) -> Self {
        Timestamp(ts.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The calendar-date portion: everything before the first space.
    pub fn date_part(&self) -> &str {
        date_part(&self.0)
    }
}

/// Date-part of a raw timestamp string.
pub fn date_part(ts: &str) -> &str {
    match ts.split_once(' ') {
        Some((day, _)) => day,
        None => ts,
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Timestamp(s.to_string())
    }
}

impl From<String> for Timestamp {
    fn from(s: String) -> Self {
        Timestamp(s)
    }
}

impl std::borrow::Borrow<str> for Timestamp {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_part_with_time() {
        let ts = Timestamp::new("2024-01-02 10:30:00");
        assert_eq!(ts.date_part(), "2024-01-02");
    }

    #[test]
    fn test_date_part_without_time() {
        let ts = Timestamp::new("2024-01-02");
        assert_eq!(ts.date_part(), "2024-01-02");
    }

    #[test]
    fn test_ordering_is_chronological() {
        let mut dates = vec![
            Timestamp::new("2024-01-02"),
            Timestamp::new("2024-01-01 15:00:00"),
            Timestamp::new("2024-01-01"),
            Timestamp::new("2024-01-01 09:30:00"),
        ];
        dates.sort();
        let sorted: Vec<&str> = dates.iter().map(Timestamp::as_str).collect();
        assert_eq!(
            sorted,
            vec![
                "2024-01-01",
                "2024-01-01 09:30:00",
                "2024-01-01 15:00:00",
                "2024-01-02"
            ]
        );
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&Timestamp::new("2024-01-01")).unwrap();
        assert_eq!(json, "\"2024-01-01\"");
    }
}
