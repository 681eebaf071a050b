// Copyright (c) 2026 rezky_nightky

use std::fmt;

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

pub const DEFAULT_START: &str = "2025-08-24T10:00:00";
pub const DEFAULT_START_ZONE: &str = "Europe/Zurich";
pub const DEFAULT_TARGET: &str = "2025-12-20T16:00:00";
pub const DEFAULT_TARGET_ZONE: &str = "America/Toronto";

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

const CLOCK_PATTERN: &str = "%A %d %b %Y -  %H:%M:%S GMT%:z";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TripError {
    #[error("trip window is empty: start {start} is not before target {end}")]
    EmptyWindow { start: String, end: String },
    #[error("invalid timestamp {0:?} (expected YYYY-MM-DDTHH:MM[:SS])")]
    InvalidTimestamp(String),
    #[error("unknown time zone {0:?}")]
    UnknownZone(String),
    #[error("local time {time} does not exist in {zone}")]
    NonexistentLocalTime { time: String, zone: String },
    #[error("local time {time} is ambiguous in {zone}")]
    AmbiguousLocalTime { time: String, zone: String },
}

pub fn parse_zone(name: &str) -> Result<Tz, TripError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| TripError::UnknownZone(name.to_string()))
}

pub fn parse_local(timestamp: &str, zone: &str) -> Result<DateTime<Tz>, TripError> {
    let tz = parse_zone(zone)?;
    let ts = timestamp.trim();
    let naive = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M"))
        .map_err(|_| TripError::InvalidTimestamp(timestamp.to_string()))?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(_, _) => Err(TripError::AmbiguousLocalTime {
            time: ts.to_string(),
            zone: tz.name().to_string(),
        }),
        LocalResult::None => Err(TripError::NonexistentLocalTime {
            time: ts.to_string(),
            zone: tz.name().to_string(),
        }),
    }
}

pub fn format_in_zone(now: DateTime<Utc>, zone: Tz) -> String {
    now.with_timezone(&zone).format(CLOCK_PATTERN).to_string()
}

#[derive(Clone, Debug, PartialEq)]
pub struct TripWindow {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    total_ms: i64,
}

impl TripWindow {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self, TripError> {
        let total_ms = (end.with_timezone(&Utc) - start.with_timezone(&Utc)).num_milliseconds();
        if total_ms <= 0 {
            return Err(TripError::EmptyWindow {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self {
            start,
            end,
            total_ms,
        })
    }

    pub fn from_local(
        start: &str,
        start_zone: &str,
        end: &str,
        end_zone: &str,
    ) -> Result<Self, TripError> {
        Self::new(parse_local(start, start_zone)?, parse_local(end, end_zone)?)
    }

    pub fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    pub fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    pub fn total_seconds(&self) -> f64 {
        self.total_ms as f64 / 1000.0
    }

    pub fn remaining_ms(&self, now: DateTime<Utc>) -> i64 {
        (self.end.with_timezone(&Utc) - now).num_milliseconds()
    }

    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> i64 {
        (now - self.start.with_timezone(&Utc)).num_milliseconds()
    }

    /// Remaining time split into calendar units, each clamped at zero.
    pub fn countdown(&self, now: DateTime<Utc>) -> Countdown {
        let ms = self.remaining_ms(now);
        let days = ms / MS_PER_DAY;
        let hours = (ms % MS_PER_DAY) / MS_PER_HOUR;
        let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
        let seconds = ((ms % MS_PER_MINUTE) as f64 / MS_PER_SECOND as f64).floor() as i64;
        Countdown {
            days: days.max(0),
            hours: hours.max(0),
            minutes: minutes.max(0),
            seconds: seconds.max(0),
            remaining_seconds: ms as f64 / MS_PER_SECOND as f64,
        }
    }

    pub fn progress(&self, now: DateTime<Utc>) -> Progress {
        let total = self.total_seconds();
        let elapsed = self.elapsed_ms(now) as f64 / MS_PER_SECOND as f64;
        Progress {
            percent: (elapsed / total * 100.0).clamp(0.0, 100.0),
            hours_left: ((total - elapsed) / 3600.0).floor().max(0.0) as i64,
        }
    }

    pub fn remaining_fraction(&self, now: DateTime<Utc>) -> f64 {
        self.remaining_ms(now).max(0) as f64 / self.total_ms as f64
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub remaining_seconds: f64,
}

impl Countdown {
    pub fn is_complete(&self) -> bool {
        self.remaining_seconds <= 0.0
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} jours {} h {} min {} s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    pub percent: f64,
    pub hours_left: i64,
}

impl Progress {
    pub fn label(&self) -> String {
        format!(
            "Progression: {:.1}% — ~{} h restantes",
            self.percent, self.hours_left
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub countdown: Countdown,
    pub progress: Progress,
    /// True on the single reading where the countdown first reaches zero.
    pub completed_now: bool,
}

/// Countdown with a completion latch: the first reading at or past the target
/// reports `completed_now`, later ones never do.
#[derive(Clone, Debug)]
pub struct CountdownClock {
    window: TripWindow,
    completed: bool,
}

impl CountdownClock {
    pub fn new(window: TripWindow) -> Self {
        Self {
            window,
            completed: false,
        }
    }

    pub fn window(&self) -> &TripWindow {
        &self.window
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> Reading {
        let countdown = self.window.countdown(now);
        let completed_now = countdown.is_complete() && !self.completed;
        if completed_now {
            self.completed = true;
        }
        Reading {
            countdown,
            progress: self.window.progress(now),
            completed_now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn window() -> TripWindow {
        TripWindow::from_local(
            DEFAULT_START,
            DEFAULT_START_ZONE,
            DEFAULT_TARGET,
            DEFAULT_TARGET_ZONE,
        )
        .unwrap()
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn default_window_resolves_zones() {
        let w = window();
        assert_eq!(w.start().with_timezone(&Utc), utc("2025-08-24T08:00:00Z"));
        assert_eq!(w.end().with_timezone(&Utc), utc("2025-12-20T21:00:00Z"));
    }

    #[test]
    fn empty_or_inverted_window_is_rejected() {
        let err = TripWindow::from_local(
            "2025-12-20T16:00:00",
            "America/Toronto",
            "2025-12-20T16:00:00",
            "America/Toronto",
        )
        .unwrap_err();
        assert!(matches!(err, TripError::EmptyWindow { .. }));

        let err =
            TripWindow::from_local(DEFAULT_TARGET, DEFAULT_TARGET_ZONE, DEFAULT_START, "UTC")
                .unwrap_err();
        assert!(matches!(err, TripError::EmptyWindow { .. }));
    }

    #[test]
    fn bad_inputs_are_described() {
        assert_eq!(
            parse_zone("Mars/Olympus").unwrap_err(),
            TripError::UnknownZone("Mars/Olympus".into())
        );
        assert!(matches!(
            parse_local("20/12/2025", "UTC"),
            Err(TripError::InvalidTimestamp(_))
        ));
        // Spring-forward gap in Zurich.
        assert!(matches!(
            parse_local("2025-03-30T02:30", "Europe/Zurich"),
            Err(TripError::NonexistentLocalTime { .. })
        ));
        assert!(matches!(
            parse_local("2025-10-26T02:30", "Europe/Zurich"),
            Err(TripError::AmbiguousLocalTime { .. })
        ));
    }

    #[test]
    fn countdown_breaks_remaining_time_into_units() {
        let w = window();
        let now = utc("2025-12-19T19:58:30.250Z");
        let c = w.countdown(now);
        assert_eq!((c.days, c.hours, c.minutes, c.seconds), (1, 1, 1, 29));
        assert_eq!(c.to_string(), "1 jours 1 h 1 min 29 s");
        assert!(!c.is_complete());
    }

    #[test]
    fn countdown_is_all_zero_at_and_after_target() {
        let w = window();
        let end = w.end().with_timezone(&Utc);
        for offset in [0i64, 1, 500, 61_000, 90_061_500, 400 * 86_400_000] {
            let c = w.countdown(end + Duration::milliseconds(offset));
            assert_eq!((c.days, c.hours, c.minutes, c.seconds), (0, 0, 0, 0));
            assert!(c.is_complete());
        }
    }

    #[test]
    fn progress_is_clamped_before_start() {
        let w = window();
        let start = w.start().with_timezone(&Utc);
        for offset in [1i64, 3_600_000, 365 * 86_400_000] {
            let p = w.progress(start - Duration::milliseconds(offset));
            assert_eq!(p.percent, 0.0);
        }
    }

    #[test]
    fn progress_is_monotonic_and_hits_100_at_target() {
        let w = window();
        let start = w.start().with_timezone(&Utc);
        let end = w.end().with_timezone(&Utc);
        let mut prev = -1.0;
        let mut t = start - Duration::days(2);
        while t <= end + Duration::days(2) {
            let p = w.progress(t).percent;
            assert!(p >= prev);
            prev = p;
            t += Duration::hours(7);
        }
        assert_eq!(w.progress(end).percent, 100.0);
        assert_eq!(w.progress(end).hours_left, 0);
        assert_eq!(w.progress(end + Duration::days(3)).percent, 100.0);
    }

    #[test]
    fn progress_label_and_hours_left() {
        let w = window();
        let end = w.end().with_timezone(&Utc);
        let p = w.progress(end - Duration::minutes(150));
        assert_eq!(p.hours_left, 2);
        assert!(p.label().starts_with("Progression: 99.9% — ~2 h restantes"));
    }

    #[test]
    fn clock_reports_completion_once() {
        let mut clock = CountdownClock::new(window());
        let end = clock.window().end().with_timezone(&Utc);
        assert!(!clock.tick(end - Duration::seconds(1)).completed_now);
        assert!(clock.tick(end).completed_now);
        assert!(!clock.tick(end + Duration::seconds(1)).completed_now);
        assert!(!clock.tick(end + Duration::days(1)).completed_now);
    }

    #[test]
    fn zoned_clock_format() {
        let now = utc("2025-12-20T21:00:00Z");
        assert_eq!(
            format_in_zone(now, chrono_tz::America::Toronto),
            "Saturday 20 Dec 2025 -  16:00:00 GMT-05:00"
        );
        assert_eq!(
            format_in_zone(now, chrono_tz::Europe::Zurich),
            "Saturday 20 Dec 2025 -  22:00:00 GMT+01:00"
        );
    }
}
