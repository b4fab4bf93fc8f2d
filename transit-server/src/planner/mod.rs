//! Journey planning over a plan snapshot.
//!
//! The time-dependent shortest-path engine and the thin operations built
//! on it: route search, station-name suggestion and departure boards.

mod config;
mod departures;
mod search;
mod suggest;

#[cfg(test)]
mod search_tests;

pub use config::SearchConfig;
pub use departures::{DEPARTURE_BOARD_LIMIT, Departure, next_departures};
pub use search::{
    ARRIVAL_POINT, DEPARTURE_POINT, Route, RouteRequest, SearchError, Step, plan_route,
};
pub use suggest::{StationSuggestion, SuggestKind, suggest_stations};
