//! Display-time projection of class schedules.
//!
//! Classes are stored as a naive date + start time in the studio's own
//! timezone. Listing endpoints may ask for a different zone; the projector
//! reshapes the output only and never touches stored values.

use chrono::{Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::CoreError;

/// Zone used when no studio zone is configured.
pub const DEFAULT_STUDIO_TIMEZONE: &str = "Asia/Kolkata";

/// Resolve an IANA zone name (e.g. `"Europe/Berlin"`) against the zone registry.
///
/// Names are matched case-sensitively.
pub fn parse_zone(name: &str) -> Result<Tz, CoreError> {
    name.parse::<Tz>()
        .map_err(|_| CoreError::InvalidTimezone(name.to_string()))
}

/// Converts studio-local schedules into a requested zone.
#[derive(Debug, Clone, Copy)]
pub struct TimezoneProjector {
    source: Tz,
}

impl TimezoneProjector {
    pub fn new(source: Tz) -> Self {
        Self { source }
    }

    /// The studio's authoritative zone.
    pub fn source(&self) -> Tz {
        self.source
    }

    /// Project a studio-local date and time into the zone named `target`.
    pub fn project(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        target: &str,
    ) -> Result<(NaiveDate, NaiveTime), CoreError> {
        let target = parse_zone(target)?;
        Ok(self.project_to(date, time, target))
    }

    /// Project a studio-local date and time into an already resolved zone.
    pub fn project_to(&self, date: NaiveDate, time: NaiveTime, target: Tz) -> (NaiveDate, NaiveTime) {
        project_between(date, time, self.source, target)
    }

    /// Today's date on the studio's wall clock.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.source).date_naive()
    }
}

/// Project a naive `date`/`time` observed in `source` into `target`.
pub fn project_between(
    date: NaiveDate,
    time: NaiveTime,
    source: Tz,
    target: Tz,
) -> (NaiveDate, NaiveTime) {
    let instant = localize(source, date.and_time(time));
    let projected = instant.with_timezone(&target);
    (projected.date_naive(), projected.time())
}

/// Attach `zone` to a naive wall-clock value.
///
/// A repeated wall-clock time (DST fall-back) resolves to the earlier
/// instant. A skipped wall-clock time (DST spring-forward) is read with the
/// offset that was in effect before the transition.
fn localize(zone: Tz, local: NaiveDateTime) -> chrono::DateTime<Tz> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let before = zone
                .offset_from_utc_datetime(&(local - Duration::days(1)))
                .fix();
            let utc = local - Duration::seconds(i64::from(before.local_minus_utc()));
            Utc.from_utc_datetime(&utc).with_timezone(&zone)
        }
    }
}
