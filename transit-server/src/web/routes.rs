//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};

use crate::domain::Time;
use crate::ingest;
use crate::planner::{
    RouteRequest, SearchError, SuggestKind, next_departures, plan_route, suggest_stations,
};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/route", get(route))
        .route("/stations/suggest", get(suggest))
        .route("/departures", get(departures))
        .route("/admin/reload", post(reload))
        .with_state(state)
}

/// Error response for the web layer.
#[derive(Debug)]
enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Compute a journey between two endpoints.
async fn route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RouteResponse>, AppError> {
    let departure = parse_optional_time(query.departure.as_deref())?;

    let distance_optimized = match query.optimize.as_deref() {
        None | Some("time") => false,
        Some("distance") => true,
        Some(other) => {
            return Err(AppError::BadRequest {
                message: format!("unknown optimize mode {other:?}, expected time or distance"),
            });
        }
    };

    let request = RouteRequest {
        start: query.start,
        arrival: query.arrival,
        departure,
        distance_optimized,
        allow_foot: query.foot.unwrap_or(false),
    };

    // Each search owns a private deep copy: virtual endpoints and resolved
    // times never touch the shared plan.
    let plan = state.plan_copy();
    match plan_route(plan, &state.config, &request) {
        Ok(found) => Ok(Json(RouteResponse::from_route(&found))),
        Err(err @ SearchError::PathNotFound { .. }) => Err(AppError::NotFound {
            message: err.to_string(),
        }),
        Err(err @ SearchError::InvalidEndpoint(_)) => Err(AppError::BadRequest {
            message: err.to_string(),
        }),
    }
}

/// Autocomplete station names.
async fn suggest(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> Result<Json<SuggestResponse>, AppError> {
    let kind = match query.kind.as_deref() {
        None | Some("departure") => SuggestKind::Departure,
        Some("arrival") => SuggestKind::Arrival,
        Some(other) => {
            return Err(AppError::BadRequest {
                message: format!("unknown suggestion kind {other:?}, expected departure or arrival"),
            });
        }
    };

    let plan = state.snapshot();
    let stations = suggest_stations(&plan, &query.prefix, kind)
        .into_iter()
        .map(SuggestionResult::from_suggestion)
        .collect();

    Ok(Json(SuggestResponse {
        kind: match kind {
            SuggestKind::Departure => "departure".to_string(),
            SuggestKind::Arrival => "arrival".to_string(),
        },
        stations,
    }))
}

/// Departure board for a station.
async fn departures(
    State(state): State<AppState>,
    Query(query): Query<DeparturesQuery>,
) -> Result<Json<DeparturesResponse>, AppError> {
    let after = parse_optional_time(query.after.as_deref())?
        .unwrap_or_else(|| Time::new(0, 0, 0).expect("midnight is valid"));

    let plan = state.snapshot();
    let departures = next_departures(&plan, &query.station, after)
        .iter()
        .map(DepartureResult::from_departure)
        .collect();

    Ok(Json(DeparturesResponse {
        station: query.station,
        departures,
    }))
}

/// Rebuild or refresh the shared plan from the data files.
async fn reload(
    State(state): State<AppState>,
    Query(query): Query<ReloadQuery>,
) -> Result<Json<ReloadResponse>, AppError> {
    let timetable_only = query.timetable_only.unwrap_or(false);

    let result = if timetable_only {
        let current = state.snapshot();
        ingest::reload_timetable(&current, &state.paths.timetable)
    } else {
        ingest::load(&state.paths.network, &state.paths.timetable)
    };

    let plan = result.map_err(|err| {
        warn!(error = %err, timetable_only, "reload failed");
        AppError::Internal {
            message: err.to_string(),
        }
    })?;

    let response = ReloadResponse {
        stations: plan.station_count(),
        sections: plan.section_count(),
    };
    state.replace(plan);
    info!(
        stations = response.stations,
        sections = response.sections,
        timetable_only,
        "plan reloaded"
    );
    Ok(Json(response))
}

fn parse_optional_time(value: Option<&str>) -> Result<Option<Time>, AppError> {
    value
        .map(|s| {
            Time::parse(s).map_err(|e| AppError::BadRequest {
                message: format!("bad time {s:?}: {e}"),
            })
        })
        .transpose()
}
