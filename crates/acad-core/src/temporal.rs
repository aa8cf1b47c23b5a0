//! # Credential Dates
//!
//! Issuance, expiration and proof `created` values are written as
//! `YYYY-MM-DDTHH:MM:SSZ`: UTC, whole seconds. [`Timestamp`] produces that
//! form. Checks against a verifier's clock go through
//! [`Timestamp::parse_precise`], which accepts any RFC 3339 offset or
//! fraction so that credentials minted elsewhere
//! (e.g. `2026-01-15T12:00:00.000+01:00`) can be evaluated. The string
//! stored in a credential is never rewritten.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AcadError;

/// A whole-second UTC instant as written into credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current second.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// `at` with its fraction dropped.
    pub fn from_utc(at: DateTime<Utc>) -> Self {
        Self(at.trunc_subsecs(0))
    }

    /// Read a credential date at full precision, normalized to UTC.
    ///
    /// A credential issued 500ms ahead of the verifier's clock is in the
    /// future; fractions are not dropped here.
    pub fn parse_precise(s: &str) -> Result<DateTime<Utc>, AcadError> {
        DateTime::parse_from_rfc3339(s)
            .map(|at| at.with_timezone(&Utc))
            .map_err(|e| AcadError::Validation(format!("{s:?} is not an RFC 3339 date: {e}")))
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// The credential form, e.g. `2026-01-15T12:00:00Z`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn now_is_whole_seconds() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }

    #[test]
    fn fraction_is_dropped_when_writing() {
        let at = Utc
            .with_ymd_and_hms(2026, 1, 15, 12, 30, 45)
            .unwrap()
            .with_nanosecond(987_000_000)
            .unwrap();
        assert_eq!(Timestamp::from_utc(at).to_iso8601(), "2026-01-15T12:30:45Z");
    }

    #[test]
    fn offsets_normalize_to_utc() {
        let at = Timestamp::parse_precise("2026-01-15T17:00:00+05:00").unwrap();
        assert_eq!(Timestamp::from_utc(at).to_string(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn fraction_is_kept_when_reading() {
        let at = Timestamp::parse_precise("2026-01-15T12:00:00.500Z").unwrap();
        assert_eq!(at.nanosecond(), 500_000_000);
        assert!(at > Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn date_only_and_garbage_rejected() {
        for bad in ["2026-01-15", "15/01/2026", "", "2026-01-15 12:00:00"] {
            assert!(Timestamp::parse_precise(bad).is_err(), "{bad:?}");
        }
    }
}
