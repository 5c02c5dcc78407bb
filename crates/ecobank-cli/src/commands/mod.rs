//! Command implementations

pub mod breakdown;
pub mod factors;
pub mod footprint;
pub mod history;
pub mod stats;

use anyhow::Context;
use chrono::{DateTime, FixedOffset, Utc};

/// Reference instant from `--at`, defaulting to now in UTC
pub fn reference_instant(at: Option<&str>) -> anyhow::Result<DateTime<FixedOffset>> {
    match at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("--at must be an RFC 3339 timestamp, got '{}'", raw)),
        None => Ok(Utc::now().fixed_offset()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_instant_keeps_offset() {
        let at = reference_instant(Some("2025-01-01T00:30:00+02:00")).unwrap();
        assert_eq!(at.offset().local_minus_utc(), 7200);
        assert!(reference_instant(Some("yesterday")).is_err());
    }
}
