//! Instructor schedule conflict detection.
//!
//! Time slots are half-open intervals `[start, end)`: a class ending
//! exactly when another begins is not a conflict. Used by
//! course-assignment writes; payments are never gated on this.

use chrono::NaiveTime;
use thiserror::Error;

/// An existing assignment slot considered during conflict checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentSlot {
    /// Section label, for conflict messages.
    pub section: String,
    /// Day of week, lowercase (e.g. "monday").
    pub day: String,
    /// Class start time (inclusive).
    pub start_time: NaiveTime,
    /// Class end time (exclusive).
    pub end_time: NaiveTime,
}

/// Errors from schedule validation.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The candidate slot overlaps an existing assignment.
    #[error(
        "Schedule conflict with section {section} on {day} from {start_time} to {end_time}"
    )]
    Conflict {
        /// The conflicting assignment's section.
        section: String,
        /// The conflicting assignment's day.
        day: String,
        /// The conflicting assignment's start time.
        start_time: NaiveTime,
        /// The conflicting assignment's end time.
        end_time: NaiveTime,
    },

    /// The candidate slot's end does not come after its start.
    #[error("Invalid time range: start {start} must come before end {end}")]
    InvalidTimeRange {
        /// The candidate start time.
        start: NaiveTime,
        /// The candidate end time.
        end: NaiveTime,
    },
}

impl ScheduleError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        400
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Conflict { .. } => "SCHEDULE_CONFLICT",
            Self::InvalidTimeRange { .. } => "INVALID_TIME_RANGE",
        }
    }
}

/// Returns true when two half-open intervals `[a_start, a_end)` and
/// `[b_start, b_end)` have a non-empty intersection.
#[must_use]
pub fn overlaps(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Validates a candidate slot against a staff member's existing
/// assignments for the same day.
///
/// # Errors
///
/// Returns `ScheduleError::InvalidTimeRange` if the candidate interval
/// is empty or inverted, or `ScheduleError::Conflict` naming the first
/// overlapping assignment.
pub fn check_conflict(
    day: &str,
    start_time: NaiveTime,
    end_time: NaiveTime,
    existing: &[AssignmentSlot],
) -> Result<(), ScheduleError> {
    if start_time >= end_time {
        return Err(ScheduleError::InvalidTimeRange {
            start: start_time,
            end: end_time,
        });
    }

    let day = day.to_lowercase();
    for slot in existing {
        if slot.day.eq_ignore_ascii_case(&day)
            && overlaps(start_time, end_time, slot.start_time, slot.end_time)
        {
            return Err(ScheduleError::Conflict {
                section: slot.section.clone(),
                day: slot.day.clone(),
                start_time: slot.start_time,
                end_time: slot.end_time,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn slot(section: &str, day: &str, start: NaiveTime, end: NaiveTime) -> AssignmentSlot {
        AssignmentSlot {
            section: section.to_string(),
            day: day.to_string(),
            start_time: start,
            end_time: end,
        }
    }

    #[test]
    fn test_back_to_back_is_not_a_conflict() {
        // [08:00, 09:30) then [09:30, 11:00): legal.
        assert!(!overlaps(t(8, 0), t(9, 30), t(9, 30), t(11, 0)));
        let existing = vec![slot("BSIT-2A", "monday", t(8, 0), t(9, 30))];
        assert!(check_conflict("monday", t(9, 30), t(11, 0), &existing).is_ok());
    }

    #[test]
    fn test_partial_overlap_conflicts() {
        let existing = vec![slot("BSIT-2A", "monday", t(8, 0), t(9, 30))];
        let err = check_conflict("monday", t(9, 0), t(10, 30), &existing).unwrap_err();
        assert!(matches!(err, ScheduleError::Conflict { .. }));
        assert!(err.to_string().contains("BSIT-2A"));
    }

    #[test]
    fn test_containment_conflicts_both_ways() {
        let existing = vec![slot("BSCS-1B", "tuesday", t(9, 0), t(12, 0))];
        // Candidate inside existing.
        assert!(check_conflict("tuesday", t(10, 0), t(11, 0), &existing).is_err());
        // Candidate contains existing.
        assert!(check_conflict("tuesday", t(8, 0), t(13, 0), &existing).is_err());
    }

    #[test]
    fn test_different_day_never_conflicts() {
        let existing = vec![slot("BSIT-2A", "monday", t(8, 0), t(9, 30))];
        assert!(check_conflict("wednesday", t(8, 0), t(9, 30), &existing).is_ok());
    }

    #[test]
    fn test_day_comparison_is_case_insensitive() {
        let existing = vec![slot("BSIT-2A", "Monday", t(8, 0), t(9, 30))];
        assert!(check_conflict("MONDAY", t(8, 30), t(9, 0), &existing).is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = check_conflict("monday", t(10, 0), t(9, 0), &[]).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidTimeRange { .. }));
        let err = check_conflict("monday", t(10, 0), t(10, 0), &[]).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidTimeRange { .. }));
    }

    /// Strategy for an ordered (start, end) pair of minutes of the day.
    fn arb_minutes() -> impl Strategy<Value = (u32, u32)> {
        (0u32..1439).prop_flat_map(|a| (Just(a), (a + 1)..1440))
    }

    proptest! {
        /// Overlap is symmetric.
        #[test]
        fn prop_overlap_symmetric(
            (a1, a2) in arb_minutes(),
            (b1, b2) in arb_minutes()
        ) {
            let (a_start, a_end) = (t(a1 / 60, a1 % 60), t(a2 / 60, a2 % 60));
            let (b_start, b_end) = (t(b1 / 60, b1 % 60), t(b2 / 60, b2 % 60));
            prop_assert_eq!(
                overlaps(a_start, a_end, b_start, b_end),
                overlaps(b_start, b_end, a_start, a_end)
            );
        }

        /// A slot never conflicts with a slot ending at its start.
        #[test]
        fn prop_meeting_point_is_free((a1, a2) in arb_minutes(), len in 1u32..120) {
            let start = t(a1 / 60, a1 % 60);
            let end = t(a2 / 60, a2 % 60);
            let after_end_min = (a2 + len).min(1439);
            if after_end_min > a2 {
                let after = t(after_end_min / 60, after_end_min % 60);
                prop_assert!(!overlaps(start, end, end, after));
            }
        }
    }
}
