//! Local mirror of the student and course lists the console last fetched.

use shared::types::{Course, Student};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: u32,
    pub page_size: u32,
    pub total_students: u64,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self {
            current_page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            total_students: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    students: Vec<Student>,
    courses: Vec<Course>,
    page: PageInfo,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn page(&self) -> PageInfo {
        self.page
    }

    pub fn set_students(&mut self, students: Vec<Student>) {
        self.students = students;
    }

    pub fn add_student(&mut self, student: Student) {
        self.students.push(student);
    }

    /// Replace the student with the same id. Returns false when none matched.
    pub fn update_student(&mut self, student: Student) -> bool {
        match self
            .students
            .iter_mut()
            .find(|s| s.id.is_some() && s.id == student.id)
        {
            Some(slot) => {
                *slot = student;
                true
            }
            None => false,
        }
    }

    pub fn remove_student(&mut self, id: i64) -> bool {
        let before = self.students.len();
        self.students.retain(|s| s.id != Some(id));
        self.students.len() != before
    }

    pub fn set_courses(&mut self, courses: Vec<Course>) {
        self.courses = courses;
    }

    pub fn set_page_info(&mut self, page: PageInfo) {
        self.page = page;
    }
}
