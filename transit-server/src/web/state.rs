//! Application state for the web layer.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::plan::Plan;
use crate::planner::SearchConfig;

/// Locations of the data files backing the plan.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub network: PathBuf,
    pub timetable: PathBuf,
}

/// Shared application state.
///
/// Exactly one plan is shared process-wide. Requests read it under the
/// lock just long enough to take a snapshot; an administrative reload
/// swaps the whole plan under the same lock. Neither ever waits on an
/// in-flight search, because every search runs on its own copy.
#[derive(Clone)]
pub struct AppState {
    plan: Arc<RwLock<Arc<Plan>>>,

    /// Routing engine configuration.
    pub config: Arc<SearchConfig>,

    /// Data files for reloads.
    pub paths: Arc<DataPaths>,
}

impl AppState {
    /// Create the app state around an initial plan.
    pub fn new(plan: Plan, config: SearchConfig, paths: DataPaths) -> Self {
        Self {
            plan: Arc::new(RwLock::new(Arc::new(plan))),
            config: Arc::new(config),
            paths: Arc::new(paths),
        }
    }

    /// A shared snapshot of the current plan, for read-only operations.
    pub fn snapshot(&self) -> Arc<Plan> {
        self.plan.read().expect("plan lock poisoned").clone()
    }

    /// A private deep copy of the current plan, for a route search.
    pub fn plan_copy(&self) -> Plan {
        self.snapshot().as_ref().clone()
    }

    /// Replace the shared plan.
    pub fn replace(&self, plan: Plan) {
        *self.plan.write().expect("plan lock poisoned") = Arc::new(plan);
    }
}
