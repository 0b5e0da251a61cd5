//! Recommendation rules.
//!
//! Each rule inspects the prioritized assignments and proposed sessions and
//! either fires one [`Recommendation`] or stays silent. Rules are independent
//! and are emitted in table order; callers sort by priority for display.

use super::analyzer::pending_hours;
use super::config::RecommendationConfig;
use super::PrioritizedAssignment;
use crate::academic::{Priority, Recommendation, RecommendationType, StudySession, TaskSummary};

/// Everything a rule may look at.
pub struct RuleContext<'a> {
    pub assignments: &'a [PrioritizedAssignment],
    pub sessions: &'a [StudySession],
    pub config: &'a RecommendationConfig,
}

/// A trigger in the recommendation table.
pub struct RecommendationRule {
    pub kind: RecommendationType,
    pub priority: u8,
    evaluate: fn(&RecommendationRule, &RuleContext<'_>) -> Option<Recommendation>,
}

impl RecommendationRule {
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Recommendation> {
        (self.evaluate)(self, ctx)
    }

    fn recommend(&self, title: &str, message: String) -> Recommendation {
        Recommendation {
            kind: self.kind,
            title: title.to_string(),
            message,
            priority: self.priority,
            tasks: Vec::new(),
            sessions: Vec::new(),
        }
    }
}

pub const RECOMMENDATION_RULES: [RecommendationRule; 4] = [
    RecommendationRule {
        kind: RecommendationType::UrgentTasks,
        priority: 10,
        evaluate: urgent_tasks,
    },
    RecommendationRule {
        kind: RecommendationType::StudySchedule,
        priority: 8,
        evaluate: study_schedule,
    },
    RecommendationRule {
        kind: RecommendationType::WorkloadWarning,
        priority: 9,
        evaluate: workload_warning,
    },
    RecommendationRule {
        kind: RecommendationType::DeadlineAlert,
        priority: 10,
        evaluate: deadline_alert,
    },
];

fn summarize(entry: &PrioritizedAssignment) -> TaskSummary {
    TaskSummary {
        title: entry.title().to_string(),
        due_date: entry.assignment.due_date.clone().unwrap_or_default(),
    }
}

fn urgent_tasks(rule: &RecommendationRule, ctx: &RuleContext<'_>) -> Option<Recommendation> {
    let high: Vec<_> = ctx
        .assignments
        .iter()
        .filter(|a| a.priority == Priority::High)
        .collect();
    if high.is_empty() {
        return None;
    }

    let mut rec = rule.recommend(
        "High Priority Tasks Require Attention",
        format!(
            "You have {} high-priority assignments due soon. Focus on these first.",
            high.len()
        ),
    );
    rec.tasks = high
        .into_iter()
        .take(ctx.config.urgent_task_limit)
        .map(summarize)
        .collect();
    Some(rec)
}

fn study_schedule(rule: &RecommendationRule, ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if ctx.sessions.is_empty() {
        return None;
    }

    let mut rec = rule.recommend(
        "Suggested Study Schedule",
        format!(
            "We've created {} study sessions to help you stay on track.",
            ctx.sessions.len()
        ),
    );
    rec.sessions = ctx
        .sessions
        .iter()
        .take(ctx.config.session_preview_limit)
        .cloned()
        .collect();
    Some(rec)
}

fn workload_warning(rule: &RecommendationRule, ctx: &RuleContext<'_>) -> Option<Recommendation> {
    let total = pending_hours(ctx.assignments.iter().map(|a| &a.assignment));
    if total <= ctx.config.workload_warning_hours {
        return None;
    }

    Some(rule.recommend(
        "Heavy Workload Detected",
        format!(
            "You have {total} hours of pending work. Consider extending some deadlines or seeking help."
        ),
    ))
}

fn deadline_alert(rule: &RecommendationRule, ctx: &RuleContext<'_>) -> Option<Recommendation> {
    let due_soon: Vec<TaskSummary> = ctx
        .assignments
        .iter()
        .filter(|a| a.days_until_due <= 1)
        .map(summarize)
        .collect();
    if due_soon.is_empty() {
        return None;
    }

    let mut rec = rule.recommend(
        "Assignments Due Tomorrow",
        format!("{} assignment(s) due within 24 hours!", due_soon.len()),
    );
    rec.tasks = due_soon;
    Some(rec)
}

pub struct RecommendationGenerator {
    config: RecommendationConfig,
    rules: &'static [RecommendationRule],
}

impl RecommendationGenerator {
    pub fn new() -> Self {
        Self::with_config(RecommendationConfig::default())
    }

    pub fn with_config(config: RecommendationConfig) -> Self {
        Self {
            config,
            rules: &RECOMMENDATION_RULES,
        }
    }

    pub fn generate(
        &self,
        assignments: &[PrioritizedAssignment],
        sessions: &[StudySession],
    ) -> Vec<Recommendation> {
        let ctx = RuleContext {
            assignments,
            sessions,
            config: &self.config,
        };
        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(&ctx))
            .collect()
    }
}

impl Default for RecommendationGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::academic::Assignment;
    use chrono::{Duration, TimeZone, Utc};

    fn entry(id: &str, priority: Priority, days: i64, hours: Option<u32>) -> PrioritizedAssignment {
        let mut assignment = Assignment::new("u", id, "2025-03-05T23:59:00Z", hours);
        assignment.id = id.to_string();
        PrioritizedAssignment {
            assignment,
            priority,
            urgency_score: 5,
            days_until_due: days,
            due_at: Utc.with_ymd_and_hms(2025, 3, 5, 23, 59, 0).unwrap(),
        }
    }

    fn session(id: &str) -> StudySession {
        let start = Utc.with_ymd_and_hms(2025, 3, 2, 14, 0, 0).unwrap();
        StudySession {
            assignment_id: id.to_string(),
            title: format!("Study: {id}"),
            start_time: start,
            end_time: start + Duration::hours(2),
            priority: Priority::Medium,
        }
    }

    fn kinds(recs: &[Recommendation]) -> Vec<RecommendationType> {
        recs.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn nothing_fires_on_empty_input() {
        assert!(RecommendationGenerator::new().generate(&[], &[]).is_empty());
    }

    #[test]
    fn all_rules_fire_in_table_order() {
        let assignments = vec![
            entry("a", Priority::High, 0, Some(30)),
            entry("b", Priority::Medium, 5, Some(20)),
        ];
        let recs = RecommendationGenerator::new().generate(&assignments, &[session("a")]);
        assert_eq!(
            kinds(&recs),
            vec![
                RecommendationType::UrgentTasks,
                RecommendationType::StudySchedule,
                RecommendationType::WorkloadWarning,
                RecommendationType::DeadlineAlert,
            ]
        );
        let priorities: Vec<_> = recs.iter().map(|r| r.priority).collect();
        assert_eq!(priorities, vec![10, 8, 9, 10]);
        assert!(recs[2].message.contains("50 hours"));
    }

    #[test]
    fn urgent_tasks_lists_at_most_three() {
        let assignments: Vec<_> = (0..5)
            .map(|i| entry(&format!("h{i}"), Priority::High, 3, Some(6)))
            .collect();
        let recs = RecommendationGenerator::new().generate(&assignments, &[]);
        assert_eq!(kinds(&recs), vec![RecommendationType::UrgentTasks]);
        assert_eq!(recs[0].tasks.len(), 3);
        assert!(recs[0].message.contains("5 high-priority"));
        assert_eq!(recs[0].tasks[0].due_date, "2025-03-05T23:59:00Z");
    }

    #[test]
    fn study_schedule_embeds_first_five_sessions() {
        let sessions: Vec<_> = (0..8).map(|i| session(&format!("s{i}"))).collect();
        let recs = RecommendationGenerator::new().generate(&[], &sessions);
        assert_eq!(recs[0].sessions.len(), 5);
        assert!(recs[0].message.contains("8 study sessions"));
    }

    #[test]
    fn workload_warning_needs_more_than_forty_hours() {
        let at_limit = vec![entry("a", Priority::Low, 10, Some(40))];
        assert!(RecommendationGenerator::new().generate(&at_limit, &[]).is_empty());

        let over = vec![entry("a", Priority::Low, 10, Some(41))];
        assert_eq!(
            kinds(&RecommendationGenerator::new().generate(&over, &[])),
            vec![RecommendationType::WorkloadWarning]
        );
    }

    #[test]
    fn deadline_alert_lists_every_match() {
        let assignments: Vec<_> = (0..6)
            .map(|i| entry(&format!("d{i}"), Priority::Medium, 1 - i, Some(1)))
            .collect();
        let recs = RecommendationGenerator::new().generate(&assignments, &[]);
        assert_eq!(kinds(&recs), vec![RecommendationType::DeadlineAlert]);
        assert_eq!(recs[0].tasks.len(), 6);
        assert_eq!(recs[0].message, "6 assignment(s) due within 24 hours!");
    }
}
