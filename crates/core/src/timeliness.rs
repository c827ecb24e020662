//! Checkpoint timeliness classification.
//!
//! A checkpoint expects a check-in at most every `normal` minutes. A further
//! `pass` minutes of overrun are tolerated as `LATE`; beyond that the patrol is
//! `MISSED`. The windows are cumulative:
//!
//! ```text
//! elapsed:  0 ........ normal ........ normal + pass ........
//! status:   ON_TIME    | LATE          | MISSED
//! ```
//!
//! Everything here is pure: callers pass `now` explicitly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

pub const STATUS_ON_TIME: &str = "ON_TIME";
pub const STATUS_LATE: &str = "LATE";
pub const STATUS_MISSED: &str = "MISSED";

/// Default grace period before a check-in is late, in minutes.
pub const DEFAULT_NORMAL_MINUTES: i32 = 10;

/// Default extra grace period before a late checkpoint is missed, in minutes.
pub const DEFAULT_PASS_MINUTES: i32 = 5;

/// Status recorded on every monitoring log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckpointStatus {
    OnTime,
    Late,
    Missed,
}

impl CheckpointStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckpointStatus::OnTime => STATUS_ON_TIME,
            CheckpointStatus::Late => STATUS_LATE,
            CheckpointStatus::Missed => STATUS_MISSED,
        }
    }

    /// Ordering used by the sweeper: it only ever moves a checkpoint to a
    /// strictly higher severity.
    pub fn severity(self) -> u8 {
        match self {
            CheckpointStatus::OnTime => 0,
            CheckpointStatus::Late => 1,
            CheckpointStatus::Missed => 2,
        }
    }
}

impl fmt::Display for CheckpointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckpointStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_ON_TIME => Ok(CheckpointStatus::OnTime),
            STATUS_LATE => Ok(CheckpointStatus::Late),
            STATUS_MISSED => Ok(CheckpointStatus::Missed),
            other => Err(CoreError::Validation(format!(
                "Unknown checkpoint status '{other}'"
            ))),
        }
    }
}

/// Per-checkpoint thresholds, both strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    normal_minutes: i64,
    pass_minutes: i64,
}

impl Thresholds {
    pub fn new(normal_minutes: i32, pass_minutes: i32) -> Result<Self, CoreError> {
        if normal_minutes <= 0 {
            return Err(CoreError::Validation(format!(
                "normal time must be positive, got {normal_minutes}"
            )));
        }
        if pass_minutes <= 0 {
            return Err(CoreError::Validation(format!(
                "pass time must be positive, got {pass_minutes}"
            )));
        }
        Ok(Self {
            normal_minutes: normal_minutes.into(),
            pass_minutes: pass_minutes.into(),
        })
    }

    pub fn normal_minutes(&self) -> i64 {
        self.normal_minutes
    }

    pub fn pass_minutes(&self) -> i64 {
        self.pass_minutes
    }

    /// Map whole elapsed minutes onto the cumulative windows.
    pub fn status_for(&self, elapsed_minutes: i64) -> CheckpointStatus {
        if elapsed_minutes < self.normal_minutes {
            CheckpointStatus::OnTime
        } else if elapsed_minutes < self.normal_minutes + self.pass_minutes {
            CheckpointStatus::Late
        } else {
            CheckpointStatus::Missed
        }
    }
}

/// Whole minutes from `since` to `now`, floored.
///
/// Negative when `now` precedes `since` (clock skew between writers).
pub fn elapsed_minutes(since: Timestamp, now: Timestamp) -> i64 {
    (now - since).num_seconds().div_euclid(60)
}

/// Classify a new check-in from the checkpoint's previous event.
///
/// The first check-in at a checkpoint is always `ON_TIME`.
pub fn classify(
    last_event_at: Option<Timestamp>,
    now: Timestamp,
    thresholds: Thresholds,
) -> CheckpointStatus {
    match last_event_at {
        None => CheckpointStatus::OnTime,
        Some(at) => thresholds.status_for(elapsed_minutes(at, now)),
    }
}

/// Decide whether a silent checkpoint has decayed since its latest log.
///
/// Returns the status to append, or `None` when nothing changed. A `LATE`
/// anchor is taken to mark the start of the late window, so its elapsed time
/// is shifted by `normal` before classifying and `MISSED` follows `pass`
/// minutes after it. For a `LATE` row the sweeper wrote itself this puts
/// `MISSED` at `normal + pass` after the last on-time event. The ledger does
/// not record who wrote a row, so a `LATE` row from a late check-in is
/// treated the same way, even though [`classify`] would call a check-in made
/// less than `normal` minutes after it `ON_TIME`.
///
/// Only strict escalations are returned: a sweep never writes `ON_TIME` or
/// repeats a status, and it stops at `MISSED`.
pub fn sweep_transition(
    latest_status: CheckpointStatus,
    latest_at: Timestamp,
    now: Timestamp,
    thresholds: Thresholds,
) -> Option<CheckpointStatus> {
    let elapsed = elapsed_minutes(latest_at, now);
    let effective = match latest_status {
        CheckpointStatus::OnTime => elapsed,
        CheckpointStatus::Late => elapsed + thresholds.normal_minutes,
        CheckpointStatus::Missed => return None,
    };

    let candidate = thresholds.status_for(effective);
    (candidate.severity() > latest_status.severity()).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
    }

    fn at_minutes(m: i64) -> Timestamp {
        t0() + Duration::minutes(m)
    }

    fn thresholds(normal: i32, pass: i32) -> Thresholds {
        Thresholds::new(normal, pass).unwrap()
    }

    #[test]
    fn first_check_in_is_on_time_for_any_thresholds() {
        for (n, p) in [(1, 1), (10, 5), (60, 30), (1440, 1)] {
            assert_eq!(
                classify(None, at_minutes(100_000), thresholds(n, p)),
                CheckpointStatus::OnTime
            );
        }
    }

    #[test]
    fn scenario_normal_ten_pass_five() {
        let th = thresholds(10, 5);
        assert_eq!(classify(Some(t0()), at_minutes(9), th), CheckpointStatus::OnTime);
        assert_eq!(classify(Some(t0()), at_minutes(12), th), CheckpointStatus::Late);
        assert_eq!(classify(Some(t0()), at_minutes(16), th), CheckpointStatus::Missed);
    }

    #[test]
    fn window_boundaries_hold_for_varied_thresholds() {
        for (n, p) in [(1, 1), (3, 7), (10, 5), (45, 15)] {
            let th = thresholds(n, p);
            let (n, p) = (i64::from(n), i64::from(p));
            assert_eq!(th.status_for(n - 1), CheckpointStatus::OnTime);
            assert_eq!(th.status_for(n), CheckpointStatus::Late);
            assert_eq!(th.status_for(n + p - 1), CheckpointStatus::Late);
            assert_eq!(th.status_for(n + p), CheckpointStatus::Missed);
        }
    }

    #[test]
    fn elapsed_minutes_floors_partial_minutes() {
        let now = t0() + Duration::seconds(9 * 60 + 59);
        assert_eq!(elapsed_minutes(t0(), now), 9);
        assert_eq!(
            classify(Some(t0()), now, thresholds(10, 5)),
            CheckpointStatus::OnTime
        );
    }

    #[test]
    fn clock_skew_classifies_on_time() {
        let now = t0() - Duration::seconds(30);
        assert_eq!(elapsed_minutes(t0(), now), -1);
        assert_eq!(
            classify(Some(t0()), now, thresholds(10, 5)),
            CheckpointStatus::OnTime
        );
    }

    #[test]
    fn non_positive_thresholds_are_rejected() {
        assert!(Thresholds::new(0, 5).is_err());
        assert!(Thresholds::new(10, 0).is_err());
        assert!(Thresholds::new(-1, -1).is_err());
    }

    #[test]
    fn sweep_leaves_fresh_on_time_alone() {
        let th = thresholds(10, 5);
        assert_eq!(
            sweep_transition(CheckpointStatus::OnTime, t0(), at_minutes(9), th),
            None
        );
    }

    #[test]
    fn sweep_escalates_on_time_to_late_then_missed() {
        let th = thresholds(10, 5);
        assert_eq!(
            sweep_transition(CheckpointStatus::OnTime, t0(), at_minutes(10), th),
            Some(CheckpointStatus::Late)
        );
        // Sweeper wrote LATE at T+10; MISSED is due at T+15 overall.
        let late_at = at_minutes(10);
        assert_eq!(
            sweep_transition(CheckpointStatus::Late, late_at, at_minutes(14), th),
            None
        );
        assert_eq!(
            sweep_transition(CheckpointStatus::Late, late_at, at_minutes(15), th),
            Some(CheckpointStatus::Missed)
        );
    }

    #[test]
    fn sweep_jumps_straight_to_missed_after_long_silence() {
        let th = thresholds(10, 5);
        assert_eq!(
            sweep_transition(CheckpointStatus::OnTime, t0(), at_minutes(90), th),
            Some(CheckpointStatus::Missed)
        );
    }

    #[test]
    fn sweep_never_moves_past_missed() {
        let th = thresholds(10, 5);
        assert_eq!(
            sweep_transition(CheckpointStatus::Missed, t0(), at_minutes(10_000), th),
            None
        );
    }

    #[test]
    fn sweep_never_repeats_late() {
        let th = thresholds(10, 5);
        // A LATE anchor with little elapsed time stays LATE and is not rewritten.
        assert_eq!(
            sweep_transition(CheckpointStatus::Late, t0(), at_minutes(1), th),
            None
        );
    }

    #[test]
    fn sweep_treats_check_in_late_row_as_start_of_late_window() {
        let th = thresholds(10, 5);
        // A guard checked in late at T. A follow-up check-in at T+5 would
        // still be on time, but the sweeper cannot tell this row from one it
        // wrote itself and escalates after `pass` minutes.
        assert_eq!(classify(Some(t0()), at_minutes(5), th), CheckpointStatus::OnTime);
        assert_eq!(
            sweep_transition(CheckpointStatus::Late, t0(), at_minutes(4), th),
            None
        );
        assert_eq!(
            sweep_transition(CheckpointStatus::Late, t0(), at_minutes(5), th),
            Some(CheckpointStatus::Missed)
        );
    }

    #[test]
    fn status_parses_from_db_strings() {
        assert_eq!("LATE".parse::<CheckpointStatus>().unwrap(), CheckpointStatus::Late);
        assert!("late".parse::<CheckpointStatus>().is_err());
    }
}
