use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{Lecturer, Member, Reviewer, Student};
use crate::rating::RatingError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RatingRow {
    pub rater: String,
    pub ratee: String,
    pub course: String,
    pub grade: i32,
}

#[derive(Debug, Clone)]
pub struct RefusedRating {
    pub line: usize,
    pub row: RatingRow,
    pub reason: RatingError,
}

#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub applied: usize,
    pub refused: Vec<RefusedRating>,
}

pub fn load_roster(path: &Path) -> anyhow::Result<Roster> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster {}", path.display()))?;
    let roster: Roster = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse roster {}", path.display()))?;

    let mut seen = HashSet::new();
    for member in &roster.members {
        if !seen.insert(member.id()) {
            bail!("duplicate member id {} in {}", member.id(), path.display());
        }
    }

    info!(members = roster.members.len(), path = %path.display(), "roster loaded");
    Ok(roster)
}

impl Roster {
    /// Finds a member by uuid or by an unambiguous "Name Surname".
    pub fn resolve(&self, reference: &str) -> anyhow::Result<usize> {
        let reference = reference.trim();
        if let Ok(id) = Uuid::parse_str(reference) {
            return self
                .members
                .iter()
                .position(|m| m.id() == id)
                .with_context(|| format!("no member with id {id}"));
        }

        let matches: Vec<usize> = self
            .members
            .iter()
            .enumerate()
            .filter(|(_, m)| m.full_name() == reference)
            .map(|(idx, _)| idx)
            .collect();

        match matches.as_slice() {
            [idx] => Ok(*idx),
            [] => bail!("no member named {reference:?}"),
            _ => bail!("{} members are named {reference:?}, use an id", matches.len()),
        }
    }

    pub fn rate(
        &mut self,
        rater: usize,
        ratee: usize,
        course: &str,
        grade: i32,
    ) -> Result<(), RatingError> {
        let rater = self.members[rater].clone();
        rater.rate(&mut self.members[ratee], course, grade)
    }

    /// Applies every row of a `rater,ratee,course,grade` CSV. Rows the rating
    /// rules refuse are collected; unknown members or malformed rows abort.
    pub fn import_ratings<R: Read>(&mut self, reader: R) -> anyhow::Result<ImportOutcome> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut outcome = ImportOutcome::default();

        for (idx, record) in csv_reader.deserialize::<RatingRow>().enumerate() {
            // header is line 1
            let line = idx + 2;
            let row = record.with_context(|| format!("invalid rating on line {line}"))?;
            let rater = self
                .resolve(&row.rater)
                .with_context(|| format!("unknown rater on line {line}"))?;
            let ratee = self
                .resolve(&row.ratee)
                .with_context(|| format!("unknown ratee on line {line}"))?;

            match self.rate(rater, ratee, &row.course, row.grade) {
                Ok(()) => outcome.applied += 1,
                Err(reason) => {
                    warn!(line, %reason, "rating refused");
                    outcome.refused.push(RefusedRating { line, row, reason });
                }
            }
        }

        info!(
            applied = outcome.applied,
            refused = outcome.refused.len(),
            "ratings imported"
        );
        Ok(outcome)
    }

    pub fn import_ratings_file(&mut self, path: &Path) -> anyhow::Result<ImportOutcome> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open ratings {}", path.display()))?;
        self.import_ratings(file)
            .with_context(|| format!("failed to import ratings from {}", path.display()))
    }

    pub fn students(&self) -> Vec<&Student> {
        self.members.iter().filter_map(Member::as_student).collect()
    }

    pub fn lecturers(&self) -> Vec<&Lecturer> {
        self.members.iter().filter_map(Member::as_lecturer).collect()
    }

    /// Students taking `course` and lecturers attached to it.
    pub fn course_participants(&self, course: &str) -> (Vec<Member>, Vec<Member>) {
        let students = self
            .members
            .iter()
            .filter(|m| matches!(m, Member::Student(s) if s.is_enrolled(course)))
            .cloned()
            .collect();
        let lecturers = self
            .members
            .iter()
            .filter(|m| matches!(m, Member::Lecturer(l) if l.profile.is_attached(course)))
            .cloned()
            .collect();
        (students, lecturers)
    }
}

/// Two students, one reviewer and two lecturers on the Python course, with
/// every grade already given.
pub fn demo_roster() -> Result<Roster, RatingError> {
    let mut best_student = Student::new("Ruoy", "Eman", "man");
    best_student.enroll("Python");
    best_student.enroll("Git");
    best_student.add_course("Introduction to programming");
    let mut other_student = Student::new("Mark", "Smit", "man");
    other_student.enroll("Python");
    other_student.enroll("Git");
    other_student.add_course("Introduction to programming");

    let mut reviewer = Reviewer::new("Some", "Buddy");
    reviewer.attach_course("Python");
    let mut cool_lecturer = Lecturer::new("Oleg", "Bulygin");
    cool_lecturer.attach_course("Python");
    let mut other_lecturer = Lecturer::new("Elena", "Nikitina");
    other_lecturer.attach_course("Python");

    let mut best_student = Member::from(best_student);
    let mut other_student = Member::from(other_student);
    for grade in [8, 9, 9] {
        reviewer.rate_hw(&mut best_student, "Python", grade)?;
    }
    for grade in [10, 9, 9] {
        reviewer.rate_hw(&mut other_student, "Python", grade)?;
    }

    let mut cool_lecturer = Member::from(cool_lecturer);
    let mut other_lecturer = Member::from(other_lecturer);
    best_student.rate(&mut cool_lecturer, "Python", 10)?;
    other_student.rate(&mut cool_lecturer, "Python", 10)?;
    best_student.rate(&mut other_lecturer, "Python", 10)?;
    other_student.rate(&mut other_lecturer, "Python", 9)?;

    Ok(Roster {
        members: vec![
            reviewer.into(),
            cool_lecturer,
            other_lecturer,
            best_student,
            other_student,
        ],
    })
}
