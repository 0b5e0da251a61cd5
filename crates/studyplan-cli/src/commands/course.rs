use clap::Subcommand;
use studyplan_core::academic::{CourseMeeting, DEFAULT_COURSE_CREDITS};
use studyplan_core::Course;

use super::{print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum CourseAction {
    /// Enroll in a course
    Create {
        /// Course code (e.g. "CS101")
        code: String,
        /// Course name
        name: String,
        /// Semester label
        #[arg(long, default_value = "")]
        semester: String,
        /// Credit weight
        #[arg(long, default_value_t = DEFAULT_COURSE_CREDITS)]
        credits: u32,
        /// Instructor name
        #[arg(long)]
        instructor: Option<String>,
        /// Weekly meeting as DAY@HH:MM-HH:MM (repeatable)
        #[arg(long = "meets", value_parser = parse_meeting)]
        meetings: Vec<CourseMeeting>,
    },
    /// List courses
    List,
}

fn parse_meeting(raw: &str) -> Result<CourseMeeting, String> {
    let (day, times) = raw
        .split_once('@')
        .ok_or_else(|| format!("expected DAY@HH:MM-HH:MM, got '{raw}'"))?;
    let (start, end) = times
        .split_once('-')
        .ok_or_else(|| format!("expected HH:MM-HH:MM after '@', got '{times}'"))?;
    Ok(CourseMeeting {
        day: day.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
    })
}

pub fn run(ctx: &Context, action: CourseAction) -> CmdResult {
    match action {
        CourseAction::Create {
            code,
            name,
            semester,
            credits,
            instructor,
            meetings,
        } => {
            let mut course = Course::new(&ctx.user, &code, &name, &semester);
            course.credits = Some(credits);
            course.instructor = instructor.unwrap_or_default();
            course.schedule = meetings;
            ctx.db.create_course(&course)?;
            eprintln!("Course created: {}", course.id);
            print_json(&course)?;
        }
        CourseAction::List => {
            print_json(&ctx.db.list_courses(&ctx.user)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeting_flag_parses() {
        let m = parse_meeting("Monday@09:00-10:30").unwrap();
        assert_eq!(m.day, "Monday");
        assert_eq!(m.start_time, "09:00");
        assert_eq!(m.end_time, "10:30");
        assert!(parse_meeting("Monday 09:00").is_err());
    }
}
