use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::error::AppError;
use crate::models::{MessageResponse, NewStudentRequest, StudentWithCourse, UpdateStudentRequest};
use crate::services::StudentService;
use crate::state::AppState;

pub(super) async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentWithCourse>>, AppError> {
    let students = StudentService::new(state.db.clone()).list().await?;
    Ok(Json(students))
}

pub(super) async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StudentWithCourse>, AppError> {
    let student = StudentService::new(state.db.clone()).get(&id).await?;
    Ok(Json(student))
}

pub(super) async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<NewStudentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StudentWithCourse>), AppError> {
    let Json(req) = payload?;
    let student = StudentService::new(state.db.clone()).create(req).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

pub(super) async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStudentRequest>, JsonRejection>,
) -> Result<Json<StudentWithCourse>, AppError> {
    let Json(req) = payload?;
    let student = StudentService::new(state.db.clone()).update(&id, req).await?;
    Ok(Json(student))
}

pub(super) async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    StudentService::new(state.db.clone()).delete(&id).await?;
    Ok(Json(MessageResponse::new("Student unenrolled successfully")))
}
