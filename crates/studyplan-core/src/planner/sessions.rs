//! Study session proposals.
//!
//! Greedy and calendar-blind: the top-ranked assignments each get
//! `max(1, effort / session_hours)` blocks, one per day starting tomorrow,
//! all at the same hour of day. Blocks are not checked against commitments
//! or against each other, so sessions of different assignments can collide.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use super::config::SessionConfig;
use super::PrioritizedAssignment;
use crate::academic::{Commitment, StudySession};

pub struct SessionScheduler {
    config: SessionConfig,
}

impl SessionScheduler {
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
        }
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Number of blocks an assignment of `effort_hours` receives.
    pub fn sessions_needed(&self, effort_hours: u32) -> u32 {
        (effort_hours / self.config.session_hours.max(1)).max(1)
    }

    /// Start of the `index`-th block (0-based): `index + 1` days after `now`,
    /// at `start_hour` UTC.
    pub fn session_start(&self, now: DateTime<Utc>, index: u32) -> DateTime<Utc> {
        let day = now.date_naive() + Duration::days(i64::from(index) + 1);
        day.and_time(NaiveTime::MIN).and_utc() + Duration::hours(i64::from(self.config.start_hour))
    }

    /// Propose sessions for the head of the prioritized list.
    ///
    /// `_commitments` is accepted so callers pass the full planning input;
    /// it does not influence placement.
    pub fn schedule(
        &self,
        prioritized: &[PrioritizedAssignment],
        _commitments: &[Commitment],
        now: DateTime<Utc>,
    ) -> Vec<StudySession> {
        let block = Duration::hours(i64::from(self.config.session_hours));

        prioritized
            .iter()
            .take(self.config.max_assignments)
            .flat_map(|entry| {
                (0..self.sessions_needed(entry.effort_hours())).map(move |i| {
                    let start_time = self.session_start(now, i);
                    StudySession {
                        assignment_id: entry.id().to_string(),
                        title: format!("Study: {}", entry.title()),
                        start_time,
                        end_time: start_time + block,
                        priority: entry.priority,
                    }
                })
            })
            .collect()
    }
}

impl Default for SessionScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::academic::{Assignment, Priority};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap()
    }

    fn entry(id: &str, hours: Option<u32>, priority: Priority) -> PrioritizedAssignment {
        let mut assignment = Assignment::new("u", id, "2025-03-10", hours);
        assignment.id = id.to_string();
        PrioritizedAssignment {
            assignment,
            priority,
            urgency_score: 5,
            days_until_due: 9,
            due_at: now(),
        }
    }

    #[test]
    fn session_count_is_half_effort_with_floor_of_one() {
        let s = SessionScheduler::new();
        assert_eq!(s.sessions_needed(0), 1);
        assert_eq!(s.sessions_needed(1), 1);
        assert_eq!(s.sessions_needed(2), 1);
        assert_eq!(s.sessions_needed(5), 2);
        assert_eq!(s.sessions_needed(6), 3);
    }

    #[test]
    fn blocks_start_on_following_days_at_fixed_hour() {
        let sessions = SessionScheduler::new().schedule(&[entry("a", Some(6), Priority::High)], &[], now());
        assert_eq!(sessions.len(), 3);
        for (i, s) in sessions.iter().enumerate() {
            let expected = Utc
                .with_ymd_and_hms(2025, 3, 2 + i as u32, 14, 0, 0)
                .unwrap();
            assert_eq!(s.start_time, expected);
            assert_eq!(s.duration_minutes(), 120);
            assert_eq!(s.priority, Priority::High);
            assert_eq!(s.title, "Study: a");
        }
    }

    #[test]
    fn only_first_five_assignments_are_scheduled() {
        let entries: Vec<_> = (0..7)
            .map(|i| entry(&format!("a{i}"), Some(2), Priority::Medium))
            .collect();
        let sessions = SessionScheduler::new().schedule(&entries, &[], now());
        assert_eq!(sessions.len(), 5);
        assert_eq!(sessions.last().unwrap().assignment_id, "a4");
    }

    #[test]
    fn order_is_assignment_then_index() {
        let entries = vec![
            entry("first", Some(4), Priority::High),
            entry("second", None, Priority::Low),
        ];
        let sessions = SessionScheduler::new().schedule(&entries, &[], now());
        let ids: Vec<_> = sessions.iter().map(|s| s.assignment_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "first", "second"]);
        // different assignments may share the same slot
        assert_eq!(sessions[0].start_time, sessions[2].start_time);
    }

    #[test]
    fn commitments_do_not_move_sessions() {
        let start = Utc.with_ymd_and_hms(2025, 3, 2, 13, 0, 0).unwrap();
        let busy = Commitment::new("u", "Shift", start, start + Duration::hours(4));
        let with = SessionScheduler::new().schedule(&[entry("a", Some(2), Priority::Low)], &[busy], now());
        let without = SessionScheduler::new().schedule(&[entry("a", Some(2), Priority::Low)], &[], now());
        assert_eq!(with, without);
    }

    #[test]
    fn custom_config_changes_hour_and_length() {
        let scheduler = SessionScheduler::with_config(SessionConfig {
            max_assignments: 1,
            session_hours: 3,
            start_hour: 8,
        });
        let sessions = scheduler.schedule(&[entry("a", Some(9), Priority::Medium)], &[], now());
        assert_eq!(sessions.len(), 3);
        assert_eq!(sessions[0].start_time, Utc.with_ymd_and_hms(2025, 3, 2, 8, 0, 0).unwrap());
        assert_eq!(sessions[0].duration_minutes(), 180);
    }
}
