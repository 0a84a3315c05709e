use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::auth::CurrentUser;
use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{
    validate_category, validate_course_title, validate_price, validate_review_rating,
    validate_slug,
};
use crate::store::{Course, CoursePage, CourseQuery, CourseUpdate, Difficulty, Module, Review};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub price_eth: f64,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub modules: Vec<Module>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: u8,
    pub comment: String,
}

fn validate_create_request(req: &CreateCourseRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_slug(&req.slug) {
        errors.add("slug", e);
    }
    if let Err(e) = validate_course_title(&req.title) {
        errors.add("title", e);
    }
    if let Err(e) = validate_price(req.price_eth) {
        errors.add("price_eth", e);
    }
    if let Err(e) = validate_category(&req.category) {
        errors.add("category", e);
    }

    errors.finish()
}

/// Browse the catalog with filters, sort, and pagination
///
/// GET /api/courses
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CourseQuery>,
) -> Json<CoursePage> {
    Json(state.catalog.query(&query))
}

/// Fetch one course by slug (or id, for older clients)
///
/// GET /api/courses/:slug
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Course>, ApiError> {
    state
        .catalog
        .get_by_slug(&slug)
        .or_else(|| state.catalog.get(&slug))
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Course '{}' not found", slug)))
}

/// Add a course to the catalog (instructors and admins only)
///
/// POST /api/courses
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Course>), ApiError> {
    if !user.role.can_manage_courses() {
        return Err(ApiError::forbidden("Only instructors can manage courses"));
    }
    validate_create_request(&request)?;

    let course = Course {
        id: uuid::Uuid::new_v4().to_string(),
        slug: request.slug,
        title: request.title,
        description: request.description,
        price_eth: request.price_eth,
        rating: 0.0,
        students: 0,
        category: request.category,
        difficulty: request.difficulty,
        modules: request.modules,
        reviews: Vec::new(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    let course = state.catalog.create(course)?;
    info!(slug = %course.slug, instructor = %user.email, "Course created");
    Ok((StatusCode::CREATED, Json(course)))
}

/// Edit an existing course (instructors and admins only)
///
/// PUT /api/courses/:id
pub async fn update_course(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(update): Json<CourseUpdate>,
) -> Result<Json<Course>, ApiError> {
    if !user.role.can_manage_courses() {
        return Err(ApiError::forbidden("Only instructors can manage courses"));
    }

    let mut errors = ValidationErrorBuilder::new();
    if let Some(ref title) = update.title {
        if let Err(e) = validate_course_title(title) {
            errors.add("title", e);
        }
    }
    if let Some(price_eth) = update.price_eth {
        if let Err(e) = validate_price(price_eth) {
            errors.add("price_eth", e);
        }
    }
    if let Some(ref category) = update.category {
        if let Err(e) = validate_category(category) {
            errors.add("category", e);
        }
    }
    errors.finish()?;

    let course = state.catalog.update(&id, update)?;
    Ok(Json(course))
}

/// Leave a review on a course
///
/// POST /api/courses/:id/reviews
pub async fn add_review(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<Course>), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_review_rating(request.rating) {
        errors.add("rating", e);
    }
    if request.comment.trim().is_empty() {
        errors.add("comment", "Comment is required");
    }
    errors.finish()?;

    let course = state.catalog.add_review(
        &id,
        Review {
            rating: request.rating,
            comment: request.comment,
            date: chrono::Utc::now().to_rfc3339(),
        },
    )?;
    Ok((StatusCode::CREATED, Json(course)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ErrorCode;
    use crate::config::Config;
    use crate::store::{Documents, Role};

    fn test_state() -> (Arc<AppState>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let docs = Documents::open(dir.path()).unwrap();
        let mut config = Config::default();
        config.chain.connect_delay_ms = 0;
        config.chain.call_delay_ms = 0;
        (Arc::new(AppState::with_documents(config, docs)), dir)
    }

    fn instructor(state: &AppState) -> CurrentUser {
        let (user, _) = state
            .users
            .sign_up_with_role("Ada", "ada@test.com", "pw", Role::Instructor)
            .unwrap();
        CurrentUser(user)
    }

    fn learner(state: &AppState) -> CurrentUser {
        let (user, _) = state.users.sign_up("Jane", "jane@test.com", "pw").unwrap();
        CurrentUser(user)
    }

    #[tokio::test]
    async fn test_list_courses_paginates() {
        let (state, _dir) = test_state();
        let Json(page) = list_courses(State(state), Query(CourseQuery::default())).await;
        assert!(!page.courses.is_empty());
        assert!(page.total_pages >= 1);
    }

    #[tokio::test]
    async fn test_get_course_by_slug_and_id() {
        let (state, _dir) = test_state();
        let Json(by_slug) = get_course(State(state.clone()), Path("blockchain-fundamentals".into()))
            .await
            .unwrap();
        assert_eq!(by_slug.id, "1");

        let Json(by_id) = get_course(State(state), Path("1".into())).await.unwrap();
        assert_eq!(by_id.slug, "blockchain-fundamentals");
    }

    #[tokio::test]
    async fn test_get_unknown_course_not_found() {
        let (state, _dir) = test_state();
        let err = get_course(State(state), Path("missing".into()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_create_course_requires_instructor_role() {
        let (state, _dir) = test_state();
        let request = CreateCourseRequest {
            slug: "layer-two-scaling".to_string(),
            title: "Layer Two Scaling".to_string(),
            description: "Rollups and channels".to_string(),
            price_eth: 0.1,
            category: "blockchain".to_string(),
            difficulty: Difficulty::Intermediate,
            modules: Vec::new(),
        };

        let err = create_course(State(state.clone()), learner(&state), Json(request))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn test_create_and_update_course_as_instructor() {
        let (state, _dir) = test_state();
        let who = instructor(&state);

        let (status, Json(course)) = create_course(
            State(state.clone()),
            who,
            Json(CreateCourseRequest {
                slug: "layer-two-scaling".to_string(),
                title: "Layer Two Scaling".to_string(),
                description: "Rollups and channels".to_string(),
                price_eth: 0.1,
                category: "blockchain".to_string(),
                difficulty: Difficulty::Intermediate,
                modules: Vec::new(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(updated) = update_course(
            State(state.clone()),
            instructor_by_email(&state, "ada@test.com"),
            Path(course.id.clone()),
            Json(CourseUpdate {
                price_eth: Some(0.2),
                ..CourseUpdate::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.price_eth, 0.2);
    }

    fn instructor_by_email(state: &AppState, email: &str) -> CurrentUser {
        CurrentUser(state.users.get_by_email(email).unwrap())
    }

    #[tokio::test]
    async fn test_add_review_validates_rating() {
        let (state, _dir) = test_state();
        let err = add_review(
            State(state.clone()),
            learner(&state),
            Path("1".into()),
            Json(ReviewRequest {
                rating: 6,
                comment: "Too good".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }
}
