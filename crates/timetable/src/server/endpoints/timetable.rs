//! API endpoints for building and editing timetables.
//!
//! A timetable is opened by drafting, generating or loading a saved one and
//! lives in memory under its workspace id until it is closed or evicted by
//! newer ones.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rand::Rng;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::display::{export_file_name, render_timetable};
use crate::planner;
use crate::server::util::{
    edit_error_to_response, planner_error_to_response, store_error_to_response, workspace_not_found,
};
use crate::timetable::{Constraints, SavedTimetable, ScheduleEntry, Subject};
use crate::types::{AppState, Workspace};

/// Body for `POST /timetables/draft`.
#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    /// Reuse a seed to reproduce an earlier draft
    pub seed: Option<u64>,
}

/// Body for `POST /timetables/generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

/// POST /timetables/draft
///
/// Builds a quick local draft. The seed used is returned with the timetable.
pub async fn post_draft(State(s): State<Arc<AppState>>, Json(req): Json<DraftRequest>) -> Response {
    let seed = req.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("POST /timetables/draft (seed={})", seed);

    let document = s.drafter.draft(&req.constraints, &req.subjects, seed);
    let mut workspace = Workspace::new(req.constraints, req.subjects, document);
    workspace.seed = Some(seed);

    (StatusCode::CREATED, Json(s.open_workspace(workspace))).into_response()
}

/// POST /timetables/generate
///
/// Requests an AI-optimized timetable. Failures carry the user-facing
/// message for their category and are never retried here.
pub async fn post_generate(
    State(s): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Response {
    info!("POST /timetables/generate ({} subjects)", req.subjects.len());

    match planner::generate_optimized(&s.planner, &req.constraints, &req.subjects).await {
        Ok(document) => {
            let workspace = Workspace::new(req.constraints, req.subjects, document);
            (StatusCode::CREATED, Json(s.open_workspace(workspace))).into_response()
        }
        Err(e) => {
            error!("AI generation failed: {:?}", e);
            planner_error_to_response(e)
        }
    }
}

/// GET /timetables/:id
pub async fn get_timetable(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("GET /timetables/{}", id);

    match s.workspaces.get(&id) {
        Some(workspace) => (StatusCode::OK, Json(workspace.value().clone())).into_response(),
        None => workspace_not_found(&id),
    }
}

/// DELETE /timetables/:id
///
/// Closes an open timetable. Saved copies are not affected.
pub async fn delete_timetable(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("DELETE /timetables/{}", id);

    if s.close_workspace(&id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        workspace_not_found(&id)
    }
}

/// POST /timetables/:id/days/:day/entries
pub async fn post_entry(
    Path((id, day)): Path<(String, String)>,
    State(s): State<Arc<AppState>>,
    Json(entry): Json<ScheduleEntry>,
) -> Response {
    info!("POST /timetables/{}/days/{}/entries", id, day);

    let Some(mut workspace) = s.workspaces.get_mut(&id) else {
        return workspace_not_found(&id);
    };

    match workspace.timetable.add_entry(&day, entry) {
        Ok(entry_id) => (
            StatusCode::CREATED,
            Json(json!({ "id": entry_id, "day": workspace.timetable.day(&day) })),
        )
            .into_response(),
        Err(e) => edit_error_to_response(e),
    }
}

/// PUT /timetables/:id/days/:day/entries/:entry_id
///
/// Replaces the entry wholesale; the id in the path wins over the body.
pub async fn put_entry(
    Path((id, day, entry_id)): Path<(String, String, String)>,
    State(s): State<Arc<AppState>>,
    Json(mut entry): Json<ScheduleEntry>,
) -> Response {
    info!("PUT /timetables/{}/days/{}/entries/{}", id, day, entry_id);

    let Some(mut workspace) = s.workspaces.get_mut(&id) else {
        return workspace_not_found(&id);
    };

    entry.id = entry_id;
    match workspace.timetable.update_entry(&day, entry) {
        Ok(()) => (StatusCode::OK, Json(workspace.timetable.day(&day).cloned())).into_response(),
        Err(e) => edit_error_to_response(e),
    }
}

/// DELETE /timetables/:id/days/:day/entries/:entry_id
///
/// Returns the removed entry.
pub async fn delete_entry(
    Path((id, day, entry_id)): Path<(String, String, String)>,
    State(s): State<Arc<AppState>>,
) -> Response {
    info!("DELETE /timetables/{}/days/{}/entries/{}", id, day, entry_id);

    let Some(mut workspace) = s.workspaces.get_mut(&id) else {
        return workspace_not_found(&id);
    };

    match workspace.timetable.delete_entry(&day, &entry_id) {
        Ok(removed) => (StatusCode::OK, Json(removed)).into_response(),
        Err(e) => edit_error_to_response(e),
    }
}

/// POST /timetables/:id/save
///
/// Snapshots the timetable into the saved list, newest first.
pub async fn post_save(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("POST /timetables/{}/save", id);

    let saved = match s.workspaces.get(&id) {
        Some(workspace) => SavedTimetable::snapshot(
            workspace.timetable.clone(),
            workspace.constraints.clone(),
            workspace.subjects.clone(),
        ),
        None => return workspace_not_found(&id),
    };

    match s.store.save(&saved) {
        Ok(()) => (StatusCode::CREATED, Json(saved)).into_response(),
        Err(e) => store_error_to_response(e),
    }
}

/// GET /timetables/:id/export
///
/// Plain-text rendering with 12-hour times, sent as a file attachment.
pub async fn get_export(Path(id): Path<String>, State(s): State<Arc<AppState>>) -> Response {
    info!("GET /timetables/{}/export", id);

    let Some(workspace) = s.workspaces.get(&id) else {
        return workspace_not_found(&id);
    };

    let text = render_timetable(&workspace.constraints, &workspace.timetable);
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(&workspace.constraints.college_name)
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        text,
    )
        .into_response()
}
