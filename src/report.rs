use std::fmt::{self, Write};

use chrono::NaiveDate;

use crate::models::{Average, CourseSummary, Lecturer, Member, Reviewer, Student};
use crate::roster::{ImportOutcome, Roster};
use crate::stats;

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Average::Value(value) => write!(f, "{value:.1}"),
            Average::NoData => write!(f, "No grades"),
        }
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Surname: {}", self.surname)?;
        writeln!(f, "Average homework grade: {}", self.average_grade())?;
        writeln!(f, "Courses in progress: {}", self.courses_in_progress.join(", "))?;
        write!(f, "Finished courses: {}", self.finished_courses.join(", "))
    }
}

impl fmt::Display for Lecturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.profile.name)?;
        writeln!(f, "Surname: {}", self.profile.surname)?;
        write!(f, "Average lecture grade: {}", self.average_grade())
    }
}

impl fmt::Display for Reviewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.profile.name)?;
        write!(f, "Surname: {}", self.profile.surname)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Student(s) => fmt::Display::fmt(s, f),
            Member::Lecturer(l) => fmt::Display::fmt(l, f),
            Member::Reviewer(r) => fmt::Display::fmt(r, f),
        }
    }
}

fn outcome_label(outcome: &Result<Average, String>) -> String {
    match outcome {
        Ok(average) => average.to_string(),
        Err(reason) => format!("error ({reason})"),
    }
}

pub fn course_summary(roster: &Roster, course: &str) -> CourseSummary {
    let (students, lecturers) = roster.course_participants(course);
    CourseSummary {
        course: course.to_string(),
        students: stats::students_avg_course_rate(&students, course).map_err(|e| e.to_string()),
        lecturers: stats::lecturers_avg_course_rate(&lecturers, course).map_err(|e| e.to_string()),
    }
}

/// Plain-text listing of every member followed by the course averages.
pub fn build_summary(roster: &Roster, course: &str) -> String {
    let mut output = String::new();

    for member in &roster.members {
        let _ = writeln!(output, "{member}");
        let _ = writeln!(output);
    }

    let summary = course_summary(roster, course);
    let _ = writeln!(
        output,
        "Average student grade for {}: {}",
        summary.course,
        outcome_label(&summary.students)
    );
    let _ = writeln!(
        output,
        "Average lecturer grade for {}: {}",
        summary.course,
        outcome_label(&summary.lecturers)
    );

    output
}

pub fn build_report(
    roster: &Roster,
    course: &str,
    imported: Option<&ImportOutcome>,
    generated_on: NaiveDate,
) -> String {
    let summary = course_summary(roster, course);
    let ranking = stats::rank_members(&roster.members);

    let mut output = String::new();

    let _ = writeln!(output, "# Coursework Ratings Report");
    let _ = writeln!(
        output,
        "Generated on {} for course {} ({} members)",
        generated_on,
        course,
        roster.members.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Course Averages");
    let _ = writeln!(output, "- Students: {}", outcome_label(&summary.students));
    let _ = writeln!(output, "- Lecturers: {}", outcome_label(&summary.lecturers));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Rankings");

    if ranking.is_empty() {
        let _ = writeln!(output, "No members on the roster.");
    } else {
        for entry in &ranking {
            if let Some(average) = entry.average {
                let _ = writeln!(output, "- {} ({}): {}", entry.name, entry.role, average);
            }
        }
    }

    if let Some(imported) = imported {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Refused Ratings");

        if imported.refused.is_empty() {
            let _ = writeln!(
                output,
                "All {} imported ratings were applied.",
                imported.applied
            );
        } else {
            for refused in &imported.refused {
                let _ = writeln!(
                    output,
                    "- line {}: {} → {} on {} ({}): {}",
                    refused.line,
                    refused.row.rater,
                    refused.row.ratee,
                    refused.row.course,
                    refused.row.grade,
                    refused.reason
                );
            }
        }
    }

    output
}
