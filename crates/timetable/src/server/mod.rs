use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::server::endpoints::{saved, status, timetable};
use crate::types::AppState;

mod endpoints;
mod types;
mod util;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Working timetables, held in memory until closed
    let timetable_router = Router::new()
        .route("/timetables/draft", post(timetable::post_draft))
        .route("/timetables/generate", post(timetable::post_generate))
        .route(
            "/timetables/:id",
            get(timetable::get_timetable).delete(timetable::delete_timetable),
        )
        .route("/timetables/:id/save", post(timetable::post_save))
        .route("/timetables/:id/export", get(timetable::get_export))
        .route(
            "/timetables/:id/days/:day/entries",
            post(timetable::post_entry),
        )
        .route(
            "/timetables/:id/days/:day/entries/:entry_id",
            put(timetable::put_entry).delete(timetable::delete_entry),
        );

    // Saved timetable list
    let saved_router = Router::new()
        .route("/saved", get(saved::get_saved))
        .route("/saved/:id", delete(saved::delete_saved))
        .route("/saved/:id/load", post(saved::post_load_saved));

    Router::new()
        .route("/health", get(status::get_health))
        .merge(timetable_router)
        .merge(saved_router)
        .with_state(app_state)
}
