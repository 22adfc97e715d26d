//! Wall-clock helpers for record timestamps.

use chrono::Utc;

/// Current UTC time in whole seconds since the Unix epoch (truncated).
pub fn unix_seconds() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_seconds_is_after_2024() {
        // 2024-01-01T00:00:00Z
        assert!(unix_seconds() > 1_704_067_200);
    }
}
