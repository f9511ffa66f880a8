// src/routes.rs

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{attempt, quiz},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Mounts the quiz and attempt endpoints under /api/quizzes.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool, config, identity client).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "https://quickquizfrontend.vercel.app".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    // Static segments ('my', 'my-results', 'attempts') must be declared so
    // they are not swallowed by the '{id}' capture.
    let quiz_routes = Router::new()
        .route(
            "/",
            get(quiz::list_public_quizzes).post(quiz::create_quiz),
        )
        .route("/my", get(quiz::list_my_quizzes))
        .route("/my-results", get(attempt::my_results))
        .route("/attempts/{id}", get(attempt::attempt_detail))
        .route(
            "/{id}",
            get(quiz::get_quiz)
                .put(quiz::update_quiz)
                .delete(quiz::delete_quiz),
        )
        .route("/{id}/submit", post(attempt::submit_quiz))
        .route("/{id}/my-latest-attempt", get(attempt::my_latest_attempt));

    Router::new()
        .nest("/api/quizzes", quiz_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
