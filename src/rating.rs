use thiserror::Error;
use tracing::debug;

use crate::models::{Member, Reviewer, Student};

/// Why a grade was refused or an aggregation aborted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingError {
    #[error("{name} is not a student")]
    NotAStudent { name: String },

    #[error("{name} is not a lecturer")]
    NotALecturer { name: String },

    #[error("{mentor} is not attached to course {course}")]
    CourseNotAttached { mentor: String, course: String },

    #[error("{student} is not taking course {course}")]
    CourseNotInProgress { student: String, course: String },

    #[error("{name} cannot rate anyone")]
    CannotRate { name: String },
}

impl Student {
    /// Grades a lecturer on a course both of them are part of.
    pub fn rate_mentor(
        &self,
        target: &mut Member,
        course: &str,
        grade: i32,
    ) -> Result<(), RatingError> {
        let lecturer = match target {
            Member::Lecturer(lecturer) => lecturer,
            other => {
                return Err(RatingError::NotALecturer {
                    name: other.full_name(),
                })
            }
        };

        if !lecturer.profile.is_attached(course) {
            return Err(RatingError::CourseNotAttached {
                mentor: lecturer.profile.full_name(),
                course: course.to_string(),
            });
        }
        if !self.is_enrolled(course) {
            return Err(RatingError::CourseNotInProgress {
                student: self.full_name(),
                course: course.to_string(),
            });
        }

        lecturer
            .grades
            .entry(course.to_string())
            .or_default()
            .push(grade);
        debug!(
            student = %self.full_name(),
            lecturer = %lecturer.profile.full_name(),
            course,
            grade,
            "lecture grade recorded"
        );
        Ok(())
    }
}

impl Reviewer {
    /// Grades a student's homework on a course this reviewer is attached to.
    pub fn rate_hw(&self, target: &mut Member, course: &str, grade: i32) -> Result<(), RatingError> {
        let student = match target {
            Member::Student(student) => student,
            other => {
                return Err(RatingError::NotAStudent {
                    name: other.full_name(),
                })
            }
        };

        if !self.profile.is_attached(course) {
            return Err(RatingError::CourseNotAttached {
                mentor: self.profile.full_name(),
                course: course.to_string(),
            });
        }
        if !student.is_enrolled(course) {
            return Err(RatingError::CourseNotInProgress {
                student: student.full_name(),
                course: course.to_string(),
            });
        }

        student
            .grades
            .entry(course.to_string())
            .or_default()
            .push(grade);
        debug!(
            reviewer = %self.profile.full_name(),
            student = %student.full_name(),
            course,
            grade,
            "homework grade recorded"
        );
        Ok(())
    }
}

impl Member {
    /// Applies whichever rating this member's role allows against `target`.
    pub fn rate(&self, target: &mut Member, course: &str, grade: i32) -> Result<(), RatingError> {
        match self {
            Member::Student(student) => student.rate_mentor(target, course, grade),
            Member::Reviewer(reviewer) => reviewer.rate_hw(target, course, grade),
            Member::Lecturer(lecturer) => Err(RatingError::CannotRate {
                name: lecturer.profile.full_name(),
            }),
        }
    }
}
