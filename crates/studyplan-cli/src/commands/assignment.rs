//! Assignment management commands for CLI.

use chrono::Utc;
use clap::Subcommand;
use studyplan_core::{Assignment, AssignmentStatus};

use super::{print_json, CmdResult, Context};

/// Statuses accepted from the command line.
const STATUSES: [&str; 3] = ["pending", "in_progress", "completed"];

#[derive(Subcommand)]
pub enum AssignmentAction {
    /// Create a new pending assignment
    Create {
        /// Assignment title
        title: String,
        /// Due date (RFC 3339, "YYYY-MM-DD HH:MM" or "YYYY-MM-DD"; naive values are UTC)
        #[arg(long)]
        due: String,
        /// Estimated effort in hours
        #[arg(long)]
        hours: Option<u32>,
        /// Course ID to associate with
        #[arg(long)]
        course: Option<String>,
        /// Assignment description
        #[arg(long)]
        description: Option<String>,
    },
    /// List assignments, soonest due first
    List {
        /// Filter by status
        #[arg(long, value_parser = STATUSES)]
        status: Option<String>,
    },
    /// Get assignment details
    Get {
        /// Assignment ID
        id: String,
    },
    /// Update an assignment
    Update {
        /// Assignment ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New due date
        #[arg(long)]
        due: Option<String>,
        /// New effort estimate in hours
        #[arg(long)]
        hours: Option<u32>,
        /// New course ID
        #[arg(long)]
        course: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
    },
    /// Change an assignment's status
    Status {
        /// Assignment ID
        id: String,
        /// New status
        #[arg(value_parser = STATUSES)]
        status: String,
    },
    /// Delete an assignment
    Delete {
        /// Assignment ID
        id: String,
    },
    /// Counts by status
    Stats,
}

pub fn run(ctx: &Context, action: AssignmentAction) -> CmdResult {
    match action {
        AssignmentAction::Create {
            title,
            due,
            hours,
            course,
            description,
        } => {
            let mut assignment = Assignment::new(&ctx.user, &title, &due, hours);
            assignment.due_at()?;
            assignment.course_id = course;
            assignment.description = description.unwrap_or_default();
            ctx.db.create_assignment(&assignment)?;
            eprintln!("Assignment created: {}", assignment.id);
            print_json(&assignment)?;
        }
        AssignmentAction::List { status } => {
            let wanted = status.map(AssignmentStatus::from);
            let assignments: Vec<_> = ctx
                .db
                .list_assignments(&ctx.user)?
                .into_iter()
                .filter(|a| wanted.as_ref().map_or(true, |s| &a.status == s))
                .collect();
            print_json(&assignments)?;
        }
        AssignmentAction::Get { id } => {
            let assignment = ctx
                .db
                .get_assignment(&id)?
                .ok_or(format!("Assignment not found: {id}"))?;
            print_json(&assignment)?;
        }
        AssignmentAction::Update {
            id,
            title,
            due,
            hours,
            course,
            description,
        } => {
            let mut assignment = ctx
                .db
                .get_assignment(&id)?
                .ok_or(format!("Assignment not found: {id}"))?;

            if let Some(t) = title {
                assignment.title = t;
            }
            if let Some(d) = due {
                assignment.due_date = Some(d);
                assignment.due_at()?;
            }
            if let Some(h) = hours {
                assignment.estimated_hours = Some(h);
            }
            if let Some(c) = course {
                assignment.course_id = Some(c);
            }
            if let Some(d) = description {
                assignment.description = d;
            }

            ctx.db.update_assignment(&assignment)?;
            eprintln!("Assignment updated: {id}");
            print_json(&assignment)?;
        }
        AssignmentAction::Status { id, status } => {
            let assignment =
                ctx.db
                    .set_assignment_status(&id, AssignmentStatus::from(status), Utc::now())?;
            print_json(&assignment)?;
        }
        AssignmentAction::Delete { id } => {
            ctx.db.delete_assignment(&id)?;
            eprintln!("Assignment deleted: {id}");
        }
        AssignmentAction::Stats => {
            print_json(&ctx.db.assignment_stats(&ctx.user)?)?;
        }
    }
    Ok(())
}
