use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::db::repository;
use crate::error::AppError;
use crate::models::{Course, NewCourseRequest, UpdateCourseRequest};

pub struct CourseService {
    db: SqlitePool,
}

impl CourseService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<Course>, AppError> {
        Ok(repository::fetch_courses(&self.db).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Course, AppError> {
        repository::find_course_by_id(&self.db, id)
            .await?
            .ok_or_else(AppError::course_not_found)
    }

    pub async fn create(&self, req: NewCourseRequest) -> Result<Course, AppError> {
        let fields = req.validate()?;

        if repository::course_code_taken(&self.db, &fields.code, None).await? {
            return Err(AppError::duplicate_course_code());
        }

        let course = repository::insert_course(&self.db, fields)
            .await
            .map_err(|e| AppError::from_unique_violation(e, AppError::duplicate_course_code))?;

        info!("created course {} ({})", course.code, course.id);
        Ok(course)
    }

    pub async fn update(&self, id: &str, req: UpdateCourseRequest) -> Result<Course, AppError> {
        let mut course = self.get(id).await?;
        req.apply_to(&mut course)?;

        if repository::course_code_taken(&self.db, &course.code, Some(id)).await? {
            return Err(AppError::duplicate_course_code());
        }

        course.updated_at = repository::timestamp();
        let updated = repository::update_course(&self.db, &course)
            .await
            .map_err(|e| AppError::from_unique_violation(e, AppError::duplicate_course_code))?;
        if !updated {
            return Err(AppError::course_not_found());
        }

        debug!("updated course {}", id);
        Ok(course)
    }

    /// Removes the course and every student enrolled in it.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let removed = repository::delete_course_cascade(&self.db, id)
            .await?
            .ok_or_else(AppError::course_not_found)?;

        info!("deleted course {} and {} enrolled student(s)", id, removed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::CourseFields;

    async fn setup() -> CourseService {
        let pool = db::connect("sqlite::memory:", 1)
            .await
            .expect("Failed to create test db");
        CourseService::new(pool)
    }

    fn new_course(code: &str) -> NewCourseRequest {
        NewCourseRequest {
            name: Some("CS101 Intro".to_string()),
            code: Some(code.to_string()),
            instructor: Some("Dr. X".to_string()),
            credits: Some(3),
        }
    }

    #[tokio::test]
    async fn test_duplicate_code_conflicts_after_normalisation() {
        let service = setup().await;
        service.create(new_course("CS101")).await.expect("first create");

        for code in ["CS101", " CS101 ", "cs101", "  Cs101"] {
            let err = service.create(new_course(code)).await.unwrap_err();
            assert!(matches!(err, AppError::Conflict(_)), "code {:?}", code);
        }
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_index_violation_maps_to_conflict() {
        let service = setup().await;
        let fields = |code: &str| CourseFields {
            name: "Intro".to_string(),
            code: code.to_string(),
            instructor: "Dr. X".to_string(),
            credits: 3,
        };

        // Writes straight through the repository skip the pre-check, as a
        // concurrent writer would.
        repository::insert_course(&service.db, fields("CS101"))
            .await
            .unwrap();
        let err = repository::insert_course(&service.db, fields("cs101"))
            .await
            .map_err(|e| AppError::from_unique_violation(e, AppError::duplicate_course_code))
            .unwrap_err();
        match err {
            AppError::Conflict(msg) => assert_eq!(msg, "Course code already exists"),
            other => panic!("unexpected error: {:?}", other),
        }

        let mut math = repository::insert_course(&service.db, fields("MATH101"))
            .await
            .unwrap();
        math.code = "Cs101".to_string();
        let err = repository::update_course(&service.db, &math)
            .await
            .map_err(|e| AppError::from_unique_violation(e, AppError::duplicate_course_code))
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(service.get(&math.id).await.unwrap().code, "MATH101");
    }

    #[tokio::test]
    async fn test_get_missing_course() {
        let service = setup().await;
        let err = service.get("does-not-exist").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_applies_only_supplied_fields() {
        let service = setup().await;
        let course = service.create(new_course("CS101")).await.unwrap();

        let updated = service
            .update(
                &course.id,
                UpdateCourseRequest {
                    credits: Some(4),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.credits, 4);
        assert_eq!(updated.name, course.name);
        assert_eq!(updated.code, course.code);
        assert_eq!(updated.instructor, course.instructor);
        assert_eq!(updated.created_at, course.created_at);

        let stored = service.get(&course.id).await.unwrap();
        assert_eq!(stored.credits, 4);

        let unchanged = service
            .update(&course.id, UpdateCourseRequest::default())
            .await
            .unwrap();
        assert_eq!(unchanged.credits, 4);
        assert_eq!(unchanged.name, course.name);
    }

    #[tokio::test]
    async fn test_update_to_taken_code_conflicts() {
        let service = setup().await;
        service.create(new_course("CS101")).await.unwrap();
        let math = service.create(new_course("MATH101")).await.unwrap();

        let err = service
            .update(
                &math.id,
                UpdateCourseRequest {
                    code: Some("cs101".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Re-saving its own code is not a conflict.
        let same = service
            .update(
                &math.id,
                UpdateCourseRequest {
                    code: Some("math101".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same.code, "math101");
    }

    #[tokio::test]
    async fn test_update_missing_course() {
        let service = setup().await;
        let err = service
            .update("nope", UpdateCourseRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let service = setup().await;
        let course = service.create(new_course("CS101")).await.unwrap();

        service.delete(&course.id).await.unwrap();
        let err = service.delete(&course.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
