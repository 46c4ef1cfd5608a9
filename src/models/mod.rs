pub mod course;
pub mod student;

pub use course::{Course, CourseFields, NewCourseRequest, UpdateCourseRequest};
pub use student::{
    CourseSummary, NewStudentRequest, Student, StudentCourseRow, StudentFields,
    StudentWithCourse, UpdateStudentRequest,
};

use serde::{Deserialize, Serialize};

/// Body returned by delete endpoints and the root health message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
