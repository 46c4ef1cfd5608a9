use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::db::repository;
use crate::error::AppError;
use crate::models::{NewStudentRequest, StudentWithCourse, UpdateStudentRequest};

pub struct StudentService {
    db: SqlitePool,
}

impl StudentService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<StudentWithCourse>, AppError> {
        Ok(repository::fetch_students(&self.db).await?)
    }

    pub async fn get(&self, id: &str) -> Result<StudentWithCourse, AppError> {
        repository::find_student_by_id(&self.db, id)
            .await?
            .ok_or_else(AppError::student_not_found)
    }

    pub async fn create(&self, req: NewStudentRequest) -> Result<StudentWithCourse, AppError> {
        let fields = req.validate()?;

        self.ensure_course_exists(&fields.course_id).await?;

        if repository::student_email_taken(&self.db, &fields.email, None).await? {
            return Err(AppError::duplicate_student_email());
        }

        let student = repository::insert_student(&self.db, fields)
            .await
            .map_err(|e| AppError::from_unique_violation(e, AppError::duplicate_student_email))?;

        info!("enrolled student {} in course {}", student.id, student.course_id);
        self.get(&student.id).await
    }

    pub async fn update(
        &self,
        id: &str,
        req: UpdateStudentRequest,
    ) -> Result<StudentWithCourse, AppError> {
        let mut student = self.get(id).await?.student;
        let req = req.validate()?;

        if let Some(course_id) = req.course_id {
            self.ensure_course_exists(&course_id).await?;
            student.course_id = course_id;
        }
        if let Some(name) = req.name {
            student.name = name;
        }
        if let Some(email) = req.email {
            student.email = email;
        }

        if repository::student_email_taken(&self.db, &student.email, Some(id)).await? {
            return Err(AppError::duplicate_student_email());
        }

        student.updated_at = repository::timestamp();
        let updated = repository::update_student(&self.db, &student)
            .await
            .map_err(|e| AppError::from_unique_violation(e, AppError::duplicate_student_email))?;
        if !updated {
            return Err(AppError::student_not_found());
        }

        debug!("updated student {}", id);
        self.get(id).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        if !repository::delete_student(&self.db, id).await? {
            return Err(AppError::student_not_found());
        }

        info!("unenrolled student {}", id);
        Ok(())
    }

    /// An unknown course on a student write is a bad request, not a 404.
    async fn ensure_course_exists(&self, course_id: &str) -> Result<(), AppError> {
        match repository::find_course_by_id(&self.db, course_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::Validation("Course not found".to_string())),
        }
    }
}
