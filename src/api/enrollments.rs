use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::auth::CurrentUser;
use super::error::ApiError;
use crate::store::{CourseProgress, Enrollment};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub progress: CourseProgress,
    pub token_balance: u64,
    /// False when the course had already been completed
    pub reward_granted: bool,
}

/// List the current user's enrollments
///
/// GET /api/enrollments
pub async fn list_enrollments(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Json<Vec<Enrollment>> {
    Json(state.enrollments.enrollments_for(&user.id))
}

/// Enroll the current user in a course
///
/// POST /api/courses/:id/enroll
pub async fn enroll(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(course_id): Path<String>,
) -> Result<(StatusCode, Json<Enrollment>), ApiError> {
    let course = state
        .catalog
        .get(&course_id)
        .ok_or_else(|| ApiError::not_found(format!("Course '{}' not found", course_id)))?;

    let newly_enrolled = state.users.enroll_in_course(&user.id, &course.id)?;
    let enrollment = state.enrollments.enroll(&user.id, &course.id);

    if newly_enrolled {
        info!(course = %course.slug, user = %user.email, "Enrolled in course");
    }
    let status = if newly_enrolled {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(enrollment)))
}

/// Progress for a course, created zeroed on first read
///
/// GET /api/courses/:id/progress
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(course_id): Path<String>,
) -> Result<Json<CourseProgress>, ApiError> {
    if state.catalog.get(&course_id).is_none() {
        return Err(ApiError::not_found(format!(
            "Course '{}' not found",
            course_id
        )));
    }
    Ok(Json(state.enrollments.course_progress(&user.id, &course_id)))
}

/// Mark a lesson complete. Lesson ids are not checked against the course
/// content; the progress math is driven purely by the completed set.
///
/// POST /api/courses/:id/lessons/:lesson_id/complete
pub async fn complete_lesson(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path((course_id, lesson_id)): Path<(String, String)>,
) -> Result<Json<CourseProgress>, ApiError> {
    if state.catalog.get(&course_id).is_none() {
        return Err(ApiError::not_found(format!(
            "Course '{}' not found",
            course_id
        )));
    }
    Ok(Json(state.enrollments.mark_lesson_complete(
        &user.id, &course_id, &lesson_id,
    )))
}

/// Complete a course: force progress to 100 and credit the token reward
/// (once per course)
///
/// POST /api/courses/:id/complete
pub async fn complete_course(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(course_id): Path<String>,
) -> Result<Json<CompletionResponse>, ApiError> {
    let course = state
        .catalog
        .get(&course_id)
        .ok_or_else(|| ApiError::not_found(format!("Course '{}' not found", course_id)))?;

    let reward_granted = state.users.complete_course(&user.id, &course.id)?;
    let progress = state.enrollments.mark_course_complete(&user.id, &course.id);
    let token_balance = state
        .users
        .get(&user.id)
        .map(|u| u.token_balance)
        .unwrap_or(user.token_balance);

    if reward_granted {
        info!(course = %course.slug, user = %user.email, "Course completed");
    }
    Ok(Json(CompletionResponse {
        progress,
        token_balance,
        reward_granted,
    }))
}
