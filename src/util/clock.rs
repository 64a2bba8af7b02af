use chrono::{DateTime, Utc};

/// Wall-clock instant used for table and cell timestamps.
///
/// Serialized as RFC 3339 with nanosecond precision, which sorts
/// lexicographically and survives a save/load cycle unchanged.
pub type Timestamp = DateTime<Utc>;

pub fn now() -> Timestamp {
    Utc::now()
}

/// Timestamp for a new cell version that is never older than `previous`.
///
/// Version history must be non-decreasing even when the system clock steps
/// backwards between two puts.
pub fn next_timestamp(previous: Option<&Timestamp>) -> Timestamp {
    let current = now();
    match previous {
        Some(prev) if *prev > current => *prev,
        _ => current,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_next_timestamp_without_previous() {
        let before = now();
        let ts = next_timestamp(None);
        assert!(ts >= before);
    }

    #[test]
    fn test_next_timestamp_never_goes_backwards() {
        let future = now() + Duration::hours(1);
        assert_eq!(next_timestamp(Some(&future)), future);
    }

    #[test]
    fn test_next_timestamp_advances_past_old_previous() {
        let past = now() - Duration::hours(1);
        assert!(next_timestamp(Some(&past)) > past);
    }
}
