use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Course name → grades in the order they were given.
pub type GradeBook = BTreeMap<String, Vec<i32>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub gender: String,
    #[serde(default)]
    pub finished_courses: Vec<String>,
    #[serde(default)]
    pub courses_in_progress: Vec<String>,
    /// Homework grades received from reviewers.
    #[serde(default)]
    pub grades: GradeBook,
}

impl Student {
    pub fn new(name: &str, surname: &str, gender: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            surname: surname.to_string(),
            gender: gender.to_string(),
            finished_courses: Vec::new(),
            courses_in_progress: Vec::new(),
            grades: GradeBook::new(),
        }
    }

    pub fn add_course(&mut self, course_name: &str) {
        self.finished_courses.push(course_name.to_string());
    }

    pub fn enroll(&mut self, course_name: &str) {
        self.courses_in_progress.push(course_name.to_string());
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    pub fn is_enrolled(&self, course: &str) -> bool {
        self.courses_in_progress.iter().any(|c| c == course)
    }
}

/// Identity and attached courses shared by lecturers and reviewers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorProfile {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub courses_attached: Vec<String>,
}

impl MentorProfile {
    pub fn new(name: &str, surname: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            surname: surname.to_string(),
            courses_attached: Vec::new(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    pub fn is_attached(&self, course: &str) -> bool {
        self.courses_attached.iter().any(|c| c == course)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecturer {
    #[serde(flatten)]
    pub profile: MentorProfile,
    /// Lecture grades received from students.
    #[serde(default)]
    pub grades: GradeBook,
}

impl Lecturer {
    pub fn new(name: &str, surname: &str) -> Self {
        Self {
            profile: MentorProfile::new(name, surname),
            grades: GradeBook::new(),
        }
    }

    pub fn attach_course(&mut self, course_name: &str) {
        self.profile.courses_attached.push(course_name.to_string());
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reviewer {
    #[serde(flatten)]
    pub profile: MentorProfile,
}

impl Reviewer {
    pub fn new(name: &str, surname: &str) -> Self {
        Self {
            profile: MentorProfile::new(name, surname),
        }
    }

    pub fn attach_course(&mut self, course_name: &str) {
        self.profile.courses_attached.push(course_name.to_string());
    }
}

/// Every kind of person on the platform. Rating rules dispatch on the variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Member {
    Student(Student),
    Lecturer(Lecturer),
    Reviewer(Reviewer),
}

impl Member {
    pub fn id(&self) -> Uuid {
        match self {
            Member::Student(s) => s.id,
            Member::Lecturer(l) => l.profile.id,
            Member::Reviewer(r) => r.profile.id,
        }
    }

    pub fn full_name(&self) -> String {
        match self {
            Member::Student(s) => s.full_name(),
            Member::Lecturer(l) => l.profile.full_name(),
            Member::Reviewer(r) => r.profile.full_name(),
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            Member::Student(_) => "student",
            Member::Lecturer(_) => "lecturer",
            Member::Reviewer(_) => "reviewer",
        }
    }

    pub fn as_student(&self) -> Option<&Student> {
        match self {
            Member::Student(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_lecturer(&self) -> Option<&Lecturer> {
        match self {
            Member::Lecturer(l) => Some(l),
            _ => None,
        }
    }
}

impl From<Student> for Member {
    fn from(student: Student) -> Self {
        Member::Student(student)
    }
}

impl From<Lecturer> for Member {
    fn from(lecturer: Lecturer) -> Self {
        Member::Lecturer(lecturer)
    }
}

impl From<Reviewer> for Member {
    fn from(reviewer: Reviewer) -> Self {
        Member::Reviewer(reviewer)
    }
}

/// Mean grade rounded to one decimal, or the marker for "nothing graded yet".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Average {
    Value(f64),
    NoData,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberSummary {
    pub id: Uuid,
    pub name: String,
    pub role: &'static str,
    pub average: Option<Average>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseSummary {
    pub course: String,
    pub students: Result<Average, String>,
    pub lecturers: Result<Average, String>,
}
