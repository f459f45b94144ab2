use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::server::util::store_error_to_response;
use crate::types::{AppState, Workspace};

/// GET /saved
/// Returns every saved timetable, newest first
pub async fn get_saved(State(s): State<Arc<AppState>>) -> Response {
    info!("GET /saved");

    match s.store.list() {
        Ok(saved) => (StatusCode::OK, Json(saved)).into_response(),
        Err(e) => store_error_to_response(e),
    }
}

/// POST /saved/:id/load
/// Opens a new working timetable from a saved snapshot
pub async fn post_load_saved(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("POST /saved/{}/load", id);

    match s.store.get(&id) {
        Ok(saved) => {
            let workspace = Workspace::new(saved.constraints, saved.subjects, saved.data);
            (StatusCode::CREATED, Json(s.open_workspace(workspace))).into_response()
        }
        Err(e) => store_error_to_response(e),
    }
}

/// DELETE /saved/:id
pub async fn delete_saved(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("DELETE /saved/{}", id);

    match s.store.delete(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => store_error_to_response(e),
    }
}
