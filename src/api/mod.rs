mod courses;
mod students;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::models::MessageResponse;
use crate::state::AppState;

pub const SERVICE_MESSAGE: &str = "College Course Enrollment System API";

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(
            "/api/courses",
            get(courses::list_courses).post(courses::create_course),
        )
        .route(
            "/api/courses/{id}",
            get(courses::get_course)
                .put(courses::update_course)
                .delete(courses::delete_course),
        )
        .route(
            "/api/students",
            get(students::list_students).post(students::create_student),
        )
        .route(
            "/api/students/{id}",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new(SERVICE_MESSAGE))
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}
