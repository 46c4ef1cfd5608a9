use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

pub const MIN_CREDITS: i64 = 1;
pub const MAX_CREDITS: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    pub code: String,
    pub instructor: String,
    pub credits: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Every field is optional on the wire so that a missing field surfaces as a
/// validation message instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourseRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub instructor: Option<String>,
    pub credits: Option<i64>,
}

/// Course fields after trimming and bounds checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseFields {
    pub name: String,
    pub code: String,
    pub instructor: String,
    pub credits: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub instructor: Option<String>,
    pub credits: Option<i64>,
}

impl NewCourseRequest {
    pub fn validate(self) -> Result<CourseFields, AppError> {
        let credits = self
            .credits
            .ok_or_else(|| AppError::Validation("credits is required".to_string()))?;

        Ok(CourseFields {
            name: required_text("name", self.name)?,
            code: required_text("code", self.code)?,
            instructor: required_text("instructor", self.instructor)?,
            credits: check_credits(credits)?,
        })
    }
}

impl UpdateCourseRequest {
    /// Applies the supplied fields onto `current`; omitted fields keep their value.
    pub fn apply_to(self, current: &mut Course) -> Result<(), AppError> {
        if let Some(name) = self.name {
            current.name = required_text("name", Some(name))?;
        }
        if let Some(code) = self.code {
            current.code = required_text("code", Some(code))?;
        }
        if let Some(instructor) = self.instructor {
            current.instructor = required_text("instructor", Some(instructor))?;
        }
        if let Some(credits) = self.credits {
            current.credits = check_credits(credits)?;
        }
        Ok(())
    }
}

fn check_credits(credits: i64) -> Result<i64, AppError> {
    if !(MIN_CREDITS..=MAX_CREDITS).contains(&credits) {
        return Err(AppError::Validation(format!(
            "credits must be between {} and {}",
            MIN_CREDITS, MAX_CREDITS
        )));
    }
    Ok(credits)
}

/// Trims `value` and rejects it when absent or blank.
pub(crate) fn required_text(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(AppError::Validation(format!("{} is required", field))),
    }
}
