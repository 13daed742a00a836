use std::cmp::Ordering;

use crate::models::{Average, GradeBook, Lecturer, Member, MemberSummary, Student};
use crate::rating::RatingError;

/// Half away from zero, so 9.75 becomes 9.8.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn average_of<'a, I>(grades: I) -> Average
where
    I: IntoIterator<Item = &'a i32>,
{
    let (sum, count) = grades
        .into_iter()
        .fold((0i64, 0usize), |(sum, count), grade| (sum + i64::from(*grade), count + 1));

    if count == 0 {
        return Average::NoData;
    }
    Average::Value(round_one_decimal(sum as f64 / count as f64))
}

fn grade_book_average(grades: &GradeBook) -> Average {
    average_of(grades.values().flatten())
}

impl Average {
    /// `NoData` ranks below every numeric average.
    pub fn compare(&self, other: &Average) -> Ordering {
        match (self, other) {
            (Average::Value(a), Average::Value(b)) => a.total_cmp(b),
            (Average::Value(_), Average::NoData) => Ordering::Greater,
            (Average::NoData, Average::Value(_)) => Ordering::Less,
            (Average::NoData, Average::NoData) => Ordering::Equal,
        }
    }
}

impl Student {
    /// Mean over every homework grade on every course.
    pub fn average_grade(&self) -> Average {
        grade_book_average(&self.grades)
    }

    pub fn compare_average(&self, other: &Student) -> Ordering {
        self.average_grade().compare(&other.average_grade())
    }

    pub fn is_better_than(&self, other: &Student) -> bool {
        self.compare_average(other) == Ordering::Greater
    }
}

impl Lecturer {
    /// Mean over every lecture grade on every course.
    pub fn average_grade(&self) -> Average {
        grade_book_average(&self.grades)
    }

    pub fn compare_average(&self, other: &Lecturer) -> Ordering {
        self.average_grade().compare(&other.average_grade())
    }

    pub fn is_better_than(&self, other: &Lecturer) -> bool {
        self.compare_average(other) == Ordering::Greater
    }
}

/// Mean homework grade on `course` across `members`.
///
/// Every entry has to be a student taking the course. The first entry that
/// isn't aborts the whole computation, even if valid entries follow it.
pub fn students_avg_course_rate(members: &[Member], course: &str) -> Result<Average, RatingError> {
    let mut grades: Vec<i32> = Vec::new();

    for member in members {
        let student = match member {
            Member::Student(student) => student,
            other => {
                return Err(RatingError::NotAStudent {
                    name: other.full_name(),
                })
            }
        };
        if !student.is_enrolled(course) {
            return Err(RatingError::CourseNotInProgress {
                student: student.full_name(),
                course: course.to_string(),
            });
        }
        if let Some(course_grades) = student.grades.get(course) {
            grades.extend(course_grades);
        }
    }

    Ok(average_of(&grades))
}

/// Mean lecture grade on `course` across `members`, with the same
/// abort-on-first-mismatch rule as [`students_avg_course_rate`].
pub fn lecturers_avg_course_rate(members: &[Member], course: &str) -> Result<Average, RatingError> {
    let mut grades: Vec<i32> = Vec::new();

    for member in members {
        let lecturer = match member {
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
        if let Some(course_grades) = lecturer.grades.get(course) {
            grades.extend(course_grades);
        }
    }

    Ok(average_of(&grades))
}

/// Graded members first, highest average first. Reviewers carry no average
/// and sort last.
pub fn rank_members(members: &[Member]) -> Vec<MemberSummary> {
    let mut summaries: Vec<MemberSummary> = members
        .iter()
        .map(|member| MemberSummary {
            id: member.id(),
            name: member.full_name(),
            role: member.role(),
            average: match member {
                Member::Student(s) => Some(s.average_grade()),
                Member::Lecturer(l) => Some(l.average_grade()),
                Member::Reviewer(_) => None,
            },
        })
        .collect();

    summaries.sort_by(|a, b| match (&a.average, &b.average) {
        (Some(x), Some(y)) => y.compare(x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reviewer;

    fn graded_student(name: &str, grades: &[i32]) -> Member {
        let mut student = Student::new(name, "Test", "woman");
        student.enroll("Python");
        let mut student: Member = student.into();
        let mut reviewer = Reviewer::new("Some", "Buddy");
        reviewer.attach_course("Python");
        for grade in grades {
            reviewer.rate_hw(&mut student, "Python", *grade).unwrap();
        }
        student
    }

    fn graded_lecturer(name: &str, grades: &[i32]) -> Member {
        let mut lecturer = Lecturer::new(name, "Test");
        lecturer.attach_course("Python");
        lecturer.grades.insert("Python".to_string(), grades.to_vec());
        lecturer.into()
    }

    #[test]
    fn rounding_goes_half_away_from_zero() {
        assert_eq!(round_one_decimal(9.75), 9.8);
        assert_eq!(round_one_decimal(26.0 / 3.0), 8.7);
        assert_eq!(round_one_decimal(28.0 / 3.0), 9.3);
    }

    #[test]
    fn average_covers_every_course() {
        let mut student = Student::new("Mark", "Smit", "man");
        student.grades.insert("Python".to_string(), vec![10, 8]);
        student.grades.insert("Git".to_string(), vec![6]);
        assert_eq!(student.average_grade(), Average::Value(8.0));
    }

    #[test]
    fn no_grades_is_no_data() {
        let student = Student::new("Mark", "Smit", "man");
        assert_eq!(student.average_grade(), Average::NoData);
        assert_eq!(Lecturer::new("Elena", "Nikitina").average_grade(), Average::NoData);
    }

    #[test]
    fn scenario_student_averages() {
        let a = graded_student("A", &[8, 9, 9]);
        let b = graded_student("B", &[10, 9, 9]);

        assert_eq!(a.as_student().unwrap().average_grade(), Average::Value(8.7));
        assert_eq!(b.as_student().unwrap().average_grade(), Average::Value(9.3));
        assert_eq!(
            students_avg_course_rate(&[a, b], "Python"),
            Ok(Average::Value(9.0))
        );
    }

    #[test]
    fn scenario_lecturer_averages() {
        let first = graded_lecturer("Oleg", &[10, 10]);
        let second = graded_lecturer("Elena", &[10, 9]);

        let (l1, l2) = (first.as_lecturer().unwrap(), second.as_lecturer().unwrap());
        assert_eq!(l1.average_grade(), Average::Value(10.0));
        assert_eq!(l2.average_grade(), Average::Value(9.5));
        assert!(l1.is_better_than(l2));
        assert!(!l2.is_better_than(l1));
        assert_eq!(
            lecturers_avg_course_rate(&[first.clone(), second.clone()], "Python"),
            Ok(Average::Value(9.8))
        );
    }

    #[test]
    fn no_data_ranks_lowest() {
        let graded = graded_student("A", &[1]);
        let ungraded = Student::new("B", "Test", "man");
        let graded = graded.as_student().unwrap();

        assert!(graded.is_better_than(&ungraded));
        assert!(!ungraded.is_better_than(graded));
        assert_eq!(ungraded.compare_average(&ungraded.clone()), Ordering::Equal);
    }

    #[test]
    fn empty_or_ungraded_course_is_no_data() {
        assert_eq!(students_avg_course_rate(&[], "X"), Ok(Average::NoData));
        assert_eq!(lecturers_avg_course_rate(&[], "X"), Ok(Average::NoData));

        let ungraded = graded_student("A", &[]);
        assert_eq!(
            students_avg_course_rate(&[ungraded], "Python"),
            Ok(Average::NoData)
        );
    }

    #[test]
    fn aggregation_stops_at_first_mismatch() {
        let valid = graded_student("A", &[10]);
        let lecturer = graded_lecturer("Oleg", &[10]);
        let mut outsider = Student::new("C", "Test", "man");
        outsider.enroll("Git");

        let result = students_avg_course_rate(
            &[valid.clone(), lecturer.clone(), valid.clone()],
            "Python",
        );
        assert_eq!(
            result,
            Err(RatingError::NotAStudent {
                name: "Oleg Test".to_string()
            })
        );

        let result = students_avg_course_rate(&[Member::from(outsider), valid.clone()], "Python");
        assert!(matches!(result, Err(RatingError::CourseNotInProgress { .. })));

        let result = lecturers_avg_course_rate(&[lecturer, valid], "Python");
        assert!(matches!(result, Err(RatingError::NotALecturer { .. })));
    }

    #[test]
    fn lecturer_aggregation_requires_attached_course() {
        let teaches_python = graded_lecturer("Oleg", &[10]);
        let mut teaches_git = Lecturer::new("Elena", "Nikitina");
        teaches_git.attach_course("Git");

        let result = lecturers_avg_course_rate(&[teaches_python, Member::from(teaches_git)], "Python");
        assert_eq!(
            result,
            Err(RatingError::CourseNotAttached {
                mentor: "Elena Nikitina".to_string(),
                course: "Python".to_string()
            })
        );
    }

    #[test]
    fn ranking_puts_best_first_and_reviewers_last() {
        let members = vec![
            Member::from(Reviewer::new("Some", "Buddy")),
            graded_student("Low", &[5]),
            Member::from(Student::new("None", "Test", "man")),
            graded_lecturer("High", &[10]),
        ];

        let names: Vec<String> = rank_members(&members).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["High Test", "Low Test", "None Test", "Some Buddy"]);
    }
}
