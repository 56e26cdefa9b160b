mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use cadence_core::repository::SqliteRepository;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn create_router(repo: SqliteRepository) -> Router {
    let api = Router::new()
        // Calendar events
        .route("/calendar-events", post(handlers::create_calendar_event))
        .route("/calendar-events/range", get(handlers::get_range))
        .route("/calendar-events/{id}", get(handlers::get_calendar_event))
        .route("/calendar-events/action/{action_id}", put(handlers::update_action))
        // Actions
        .route("/actions", get(handlers::list_actions))
        .route("/actions", post(handlers::create_action))
        .route("/actions/{id}", get(handlers::get_action))
        .route("/actions/{id}", put(handlers::update_action))
        .route("/actions/{id}", delete(handlers::delete_action))
        .route("/actions/{id}/occurrences", get(handlers::list_action_occurrences))
        .route("/actions/{id}/materialize", post(handlers::materialize_action))
        .route("/actions/{id}/exceptions", get(handlers::list_exceptions))
        .route("/actions/{id}/exceptions", post(handlers::add_exception))
        .route("/actions/{id}/exceptions/{date}", delete(handlers::remove_exception))
        // Occurrences and their notes
        .route("/occurrences/{id}", put(handlers::update_occurrence))
        .route("/occurrences/{id}/notes", get(handlers::list_notes))
        .route("/occurrences/{id}/notes", post(handlers::add_note))
        .route("/notes/{id}", delete(handlers::delete_note))
        // Categories
        .route("/categories", get(handlers::list_categories))
        .route("/categories", post(handlers::create_category))
        .route("/categories/{id}", delete(handlers::delete_category))
        // Maintenance
        .route("/repair", post(handlers::repair))
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(repo)
}
