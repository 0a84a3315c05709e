pub mod auth;
mod certificates;
mod courses;
mod enrollments;
pub mod error;
mod validation;
mod wallet;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login));

    // Auth routes requiring a session
    let session_routes = Router::new()
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    // Catalog browsing is public
    let catalog_routes = Router::new()
        .route("/courses", get(courses::list_courses))
        .route("/courses/:id", get(courses::get_course));

    // Protected API routes
    let api_routes = Router::new()
        // Catalog management
        .route("/courses", post(courses::create_course))
        .route("/courses/:id", put(courses::update_course))
        .route("/courses/:id/reviews", post(courses::add_review))
        // Enrollment and progress
        .route("/courses/:id/enroll", post(enrollments::enroll))
        .route("/courses/:id/progress", get(enrollments::get_progress))
        .route(
            "/courses/:id/lessons/:lesson_id/complete",
            post(enrollments::complete_lesson),
        )
        .route("/courses/:id/complete", post(enrollments::complete_course))
        .route("/enrollments", get(enrollments::list_enrollments))
        // Wallet
        .route("/wallet", get(wallet::get_wallet))
        .route("/wallet/connect", post(wallet::connect))
        .route("/wallet/disconnect", post(wallet::disconnect))
        .route("/wallet/network", post(wallet::switch_network))
        .route("/wallet/transactions", get(wallet::transactions))
        .route("/wallet/invest", post(wallet::invest))
        .route("/wallet/yield", post(wallet::generate_yield))
        .route("/wallet/quiz", post(wallet::submit_quiz))
        .route("/wallet/claim", post(wallet::claim_reward))
        // Certificates
        .route("/certificates/mint", post(certificates::mint))
        .route("/certificates", get(certificates::list_certificates))
        .route("/certificates/:id", get(certificates::get_certificate))
        // Protected by auth
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes.merge(session_routes))
        .nest("/api", catalog_routes.merge(api_routes))
        .layer(TraceLayer::new_for_http())
        // The browser client is served from another origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
