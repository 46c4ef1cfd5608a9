use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use crate::models::course::required_text;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub course_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// The subset of a course embedded in student responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: String,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentWithCourse {
    #[serde(flatten)]
    pub student: Student,
    pub course: Option<CourseSummary>,
}

/// Row shape of `students LEFT JOIN courses`.
#[derive(Debug, FromRow)]
pub struct StudentCourseRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub course_id: String,
    pub created_at: String,
    pub updated_at: String,
    pub course_name: Option<String>,
    pub course_code: Option<String>,
}

impl From<StudentCourseRow> for StudentWithCourse {
    fn from(row: StudentCourseRow) -> Self {
        let course = match (row.course_name, row.course_code) {
            (Some(name), Some(code)) => Some(CourseSummary {
                id: row.course_id.clone(),
                name,
                code,
            }),
            _ => None,
        };

        StudentWithCourse {
            student: Student {
                id: row.id,
                name: row.name,
                email: row.email,
                course_id: row.course_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            course,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub course_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentFields {
    pub name: String,
    pub email: String,
    pub course_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub course_id: Option<String>,
}

impl NewStudentRequest {
    pub fn validate(self) -> Result<StudentFields, AppError> {
        Ok(StudentFields {
            name: required_text("name", self.name)?,
            email: required_text("email", self.email)?,
            course_id: required_text("courseId", self.course_id)?,
        })
    }
}

impl UpdateStudentRequest {
    /// Trims supplied fields, rejecting blank ones. `None` means "leave unchanged".
    pub fn validate(self) -> Result<Self, AppError> {
        Ok(UpdateStudentRequest {
            name: self.name.map(|v| required_text("name", Some(v))).transpose()?,
            email: self.email.map(|v| required_text("email", Some(v))).transpose()?,
            course_id: self
                .course_id
                .map(|v| required_text("courseId", Some(v)))
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(course_name: Option<&str>, course_code: Option<&str>) -> StudentCourseRow {
        StudentCourseRow {
            id: "s1".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            course_id: "c1".to_string(),
            created_at: "2025-01-01T00:00:00.000000Z".to_string(),
            updated_at: "2025-01-01T00:00:00.000000Z".to_string(),
            course_name: course_name.map(str::to_string),
            course_code: course_code.map(str::to_string),
        }
    }

    #[test]
    fn test_annotated_student_json_shape() {
        let student: StudentWithCourse = row(Some("Intro to CS"), Some("CS101")).into();
        let value = serde_json::to_value(&student).unwrap();

        assert_eq!(value["id"], "s1");
        assert_eq!(value["courseId"], "c1");
        assert_eq!(value["course"]["name"], "Intro to CS");
        assert_eq!(value["course"]["code"], "CS101");
        assert_eq!(value["course"]["id"], "c1");
    }

    #[test]
    fn test_missing_course_is_null() {
        let student: StudentWithCourse = row(None, None).into();
        assert!(student.course.is_none());

        let value = serde_json::to_value(&student).unwrap();
        assert!(value["course"].is_null());
    }

    #[test]
    fn test_new_student_validation() {
        let req = NewStudentRequest {
            name: Some(" Jane ".to_string()),
            email: Some(" jane@example.com ".to_string()),
            course_id: Some("c1".to_string()),
        };
        let fields = req.validate().expect("valid student");
        assert_eq!(fields.name, "Jane");
        assert_eq!(fields.email, "jane@example.com");

        let req = NewStudentRequest {
            name: Some("Jane".to_string()),
            email: Some("jane@example.com".to_string()),
            course_id: None,
        };
        match req.validate() {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "courseId is required"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_update_student_validation() {
        let req = UpdateStudentRequest {
            email: Some("  new@example.com".to_string()),
            ..Default::default()
        };
        let req = req.validate().expect("valid update");
        assert_eq!(req.email.as_deref(), Some("new@example.com"));
        assert!(req.name.is_none());
        assert!(req.course_id.is_none());

        let req = UpdateStudentRequest {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_deserialize_camel_case_request() {
        let req: NewStudentRequest =
            serde_json::from_str(r#"{"name":"A","email":"a@x.com","courseId":"c1"}"#).unwrap();
        assert_eq!(req.course_id.as_deref(), Some("c1"));
    }
}
