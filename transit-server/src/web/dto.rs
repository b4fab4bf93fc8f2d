//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::planner::{Departure, Route, StationSuggestion, Step};

/// Query parameters for a route search.
#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    /// Start station name or `"(x,y)"` coordinate token.
    pub start: String,

    /// Arrival station name or `"(x,y)"` coordinate token.
    pub arrival: String,

    /// Departure time in HH:MM:SS (optional).
    pub departure: Option<String>,

    /// `"time"` (default) or `"distance"`.
    pub optimize: Option<String>,

    /// Allow walking transfers between nearby stations.
    pub foot: Option<bool>,
}

/// One traversed edge of a journey.
#[derive(Debug, Serialize)]
pub struct StepResult {
    pub from: String,
    pub to: String,

    /// Line spelling, absent for a walking edge.
    pub line: Option<String>,
    pub walk: bool,

    pub distance_m: f64,
    pub duration_secs: u64,

    /// Resolved traversal start, when a timetable applied.
    pub departs: Option<String>,
    pub arrives: Option<String>,
}

impl StepResult {
    pub fn from_step(step: &Step) -> Self {
        Self {
            from: step.section.start().name().to_string(),
            to: step.section.arrival().name().to_string(),
            line: step.section.line().map(|l| l.to_string()),
            walk: step.section.is_walk(),
            distance_m: step.section.distance_m(),
            duration_secs: step.section.duration_secs(),
            departs: step.departs.map(|t| t.to_string()),
            arrives: step.arrives.map(|t| t.to_string()),
        }
    }
}

/// Response for a route search.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub steps: Vec<StepResult>,
    pub total_distance_m: f64,
    pub arrival_time: Option<String>,
}

impl RouteResponse {
    pub fn from_route(route: &Route) -> Self {
        Self {
            steps: route.steps.iter().map(StepResult::from_step).collect(),
            total_distance_m: route.total_distance_m(),
            arrival_time: route.arrival_time().map(|t| t.to_string()),
        }
    }
}

/// Query parameters for station suggestions.
#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    pub prefix: String,

    /// `"departure"` (default) or `"arrival"`.
    pub kind: Option<String>,
}

/// One suggested station.
#[derive(Debug, Serialize)]
pub struct SuggestionResult {
    pub name: String,
    pub lines: Vec<String>,
}

impl SuggestionResult {
    pub fn from_suggestion(suggestion: StationSuggestion) -> Self {
        Self {
            name: suggestion.name,
            lines: suggestion.lines,
        }
    }
}

/// Response for station suggestions.
#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub kind: String,
    pub stations: Vec<SuggestionResult>,
}

/// Query parameters for a departure board.
#[derive(Debug, Deserialize)]
pub struct DeparturesQuery {
    pub station: String,

    /// Earliest time to list, HH:MM:SS (defaults to midnight).
    pub after: Option<String>,
}

/// One departure board row.
#[derive(Debug, Serialize)]
pub struct DepartureResult {
    pub line: String,
    pub terminus: String,
    pub time: String,
}

impl DepartureResult {
    pub fn from_departure(departure: &Departure) -> Self {
        Self {
            line: departure.line.to_string(),
            terminus: departure.terminus.clone(),
            time: departure.time.to_string(),
        }
    }
}

/// Response for a departure board.
#[derive(Debug, Serialize)]
pub struct DeparturesResponse {
    pub station: String,
    pub departures: Vec<DepartureResult>,
}

/// Query parameters for an administrative reload.
#[derive(Debug, Deserialize)]
pub struct ReloadQuery {
    /// Re-ingest only the timetable file, keeping the topology.
    pub timetable_only: Option<bool>,
}

/// Response for an administrative reload.
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub stations: usize,
    pub sections: usize,
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
