use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::error::AppError;
use crate::models::{Course, MessageResponse, NewCourseRequest, UpdateCourseRequest};
use crate::services::CourseService;
use crate::state::AppState;

pub(super) async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = CourseService::new(state.db.clone()).list().await?;
    Ok(Json(courses))
}

pub(super) async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::new(state.db.clone()).get(&id).await?;
    Ok(Json(course))
}

pub(super) async fn create_course(
    State(state): State<AppState>,
    payload: Result<Json<NewCourseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let Json(req) = payload?;
    let course = CourseService::new(state.db.clone()).create(req).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub(super) async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCourseRequest>, JsonRejection>,
) -> Result<Json<Course>, AppError> {
    let Json(req) = payload?;
    let course = CourseService::new(state.db.clone()).update(&id, req).await?;
    Ok(Json(course))
}

pub(super) async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    CourseService::new(state.db.clone()).delete(&id).await?;
    Ok(Json(MessageResponse::new("Course deleted successfully")))
}
