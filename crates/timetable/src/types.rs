use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::TimetableDbManager;
use crate::planner::PlannerClient;
use crate::timetable::{Constraints, DraftScheduler, ScheduleDocument, Subject};

/// A timetable being worked on: the document plus the inputs it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    pub constraints: Constraints,
    pub subjects: Vec<Subject>,
    pub timetable: ScheduleDocument,
    /// Seed the draft was built from; absent for AI and loaded timetables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Workspace {
    pub fn new(constraints: Constraints, subjects: Vec<Subject>, timetable: ScheduleDocument) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            constraints,
            subjects,
            timetable,
            seed: None,
        }
    }
}

/// Shared state handed to every request handler.
pub struct AppState {
    pub config: AppConfig,
    pub store: TimetableDbManager,
    pub planner: PlannerClient,
    pub drafter: DraftScheduler,
    /// Open timetables by workspace id
    pub workspaces: DashMap<String, Workspace>,
    /// Workspace ids, oldest first
    open_order: Mutex<VecDeque<String>>,
}

impl AppState {
    pub fn new(config: AppConfig, store: TimetableDbManager, planner: PlannerClient) -> Self {
        let drafter = DraftScheduler::new(config.draft_window);
        Self {
            config,
            store,
            planner,
            drafter,
            workspaces: DashMap::new(),
            open_order: Mutex::new(VecDeque::new()),
        }
    }

    /// Registers `workspace` and returns a copy of it.
    ///
    /// Beyond `max_open_timetables` the oldest open timetables are closed.
    pub fn open_workspace(&self, workspace: Workspace) -> Workspace {
        let mut order = match self.open_order.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        self.workspaces.insert(workspace.id.clone(), workspace.clone());
        order.push_back(workspace.id.clone());

        let limit = self.config.max_open_timetables.max(1);
        while order.len() > limit {
            if let Some(oldest) = order.pop_front() {
                self.workspaces.remove(&oldest);
                debug!("Evicted open timetable {}", oldest);
            }
        }

        workspace
    }

    /// Closes an open timetable. Returns false if it was not open.
    pub fn close_workspace(&self, id: &str) -> bool {
        let mut order = match self.open_order.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        order.retain(|open| open != id);
        self.workspaces.remove(id).is_some()
    }
}
