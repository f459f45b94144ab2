//! AI-optimized timetable generation through a remote generative model.
mod client;
mod error;
mod prompt;

pub use client::{PlannerClient, PlannerConfig};
pub use error::PlannerError;

use crate::timetable::{Constraints, ScheduleDocument, Subject};
use tracing::warn;

/// Generates a timetable through the planner.
///
/// Fails fast with [`PlannerError::InvalidInput`] when there is nothing to
/// schedule; the remote service is not contacted in that case.
pub async fn generate_optimized(
    client: &PlannerClient,
    constraints: &Constraints,
    subjects: &[Subject],
) -> Result<ScheduleDocument, PlannerError> {
    if subjects.is_empty() {
        warn!("AI generation requested without any subjects");
        return Err(PlannerError::InvalidInput);
    }

    client.request_schedule(constraints, subjects).await
}
