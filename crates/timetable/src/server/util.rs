use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::db::StoreError;
use crate::planner::PlannerError;
use crate::server::types::ApiErrorType;
use crate::timetable::EditError;

/// Converts a PlannerError to an API response. The error text is the
/// user-facing message for its category.
pub fn planner_error_to_response(error: PlannerError) -> Response {
    let status = match &error {
        PlannerError::InvalidInput => StatusCode::BAD_REQUEST,
        PlannerError::Authentication => StatusCode::BAD_GATEWAY,
        PlannerError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        PlannerError::ContentPolicy => StatusCode::UNPROCESSABLE_ENTITY,
        PlannerError::ServiceOverloaded => StatusCode::SERVICE_UNAVAILABLE,
        PlannerError::MalformedOutput => StatusCode::BAD_GATEWAY,
        PlannerError::Connectivity => StatusCode::GATEWAY_TIMEOUT,
        PlannerError::Unclassified { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let context = error
        .is_retryable()
        .then(|| "This request can be retried".to_string());

    ApiErrorType::from((status, error.to_string(), context)).into_response()
}

pub fn edit_error_to_response(error: EditError) -> Response {
    let (status, message) = match &error {
        EditError::MissingField(_) => (StatusCode::BAD_REQUEST, "Invalid timetable entry"),
        EditError::DayNotFound(_) => (StatusCode::NOT_FOUND, "Day not found"),
        EditError::EntryNotFound(_) => (StatusCode::NOT_FOUND, "Entry not found"),
    };

    ApiErrorType::from((status, message, Some(error.to_string()))).into_response()
}

pub fn store_error_to_response(error: StoreError) -> Response {
    match error {
        StoreError::NotFound(_) => ApiErrorType::from((
            StatusCode::NOT_FOUND,
            "Saved timetable not found",
            Some(error.to_string()),
        ))
        .into_response(),
        _ => {
            error!("Timetable store failure: {}", error);
            ApiErrorType::from((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to access saved timetables",
                Some(error.to_string()),
            ))
            .into_response()
        }
    }
}

pub fn workspace_not_found(id: &str) -> Response {
    ApiErrorType::from((
        StatusCode::NOT_FOUND,
        "Timetable not found",
        Some(format!("No open timetable with id {:?}", id)),
    ))
    .into_response()
}
