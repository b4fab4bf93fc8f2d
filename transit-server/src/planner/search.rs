//! Time-dependent shortest-path search.
//!
//! A Dijkstra variant over a private `Plan` copy. The usable weight of a
//! scheduled edge depends on when its line next departs after the traveller
//! arrives, so edges are resolved against the timetable during relaxation
//! rather than carrying a static weight. Walking transfers are synthesized
//! lazily per visited vertex, and raw coordinate endpoints are injected as
//! virtual stations before the search starts.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::domain::{Section, Time};
use crate::plan::Plan;

use super::config::SearchConfig;

/// Name of the virtual vertex injected for a coordinate start token.
pub const DEPARTURE_POINT: &str = "Departure";

/// Name of the virtual vertex injected for a coordinate arrival token.
pub const ARRIVAL_POINT: &str = "Arrival";

/// Error from route search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// No journey connects the two endpoints.
    ///
    /// A normal outcome of a disconnected or time-infeasible query, not a
    /// defect.
    #[error("no path from {start} to {arrival}")]
    PathNotFound { start: String, arrival: String },

    /// A parenthesised endpoint token was not a valid coordinate pair.
    #[error("invalid coordinate endpoint {0:?}")]
    InvalidEndpoint(String),
}

/// A validated route query.
///
/// `start` and `arrival` are either station names or coordinate tokens of
/// the form `"(x,y)"`.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: String,
    pub arrival: String,
    /// Time the traveller is ready to leave; `None` makes scheduled edges
    /// unusable in time-optimised mode.
    pub departure: Option<Time>,
    /// Optimise total distance instead of arrival time.
    pub distance_optimized: bool,
    /// Allow synthesized walking transfers between nearby stations.
    pub allow_foot: bool,
}

/// One traversed edge of a computed journey, with its resolved times.
#[derive(Debug, Clone)]
pub struct Step {
    pub section: Section,
    /// Absolute time the traversal begins, when a timetable applied.
    pub departs: Option<Time>,
    /// Absolute time the traversal ends.
    pub arrives: Option<Time>,
}

/// An ordered journey from start to arrival.
#[derive(Debug, Clone)]
pub struct Route {
    pub steps: Vec<Step>,
}

impl Route {
    /// Total length of the journey in metres.
    pub fn total_distance_m(&self) -> f64 {
        self.steps.iter().map(|s| s.section.distance_m()).sum()
    }

    /// Arrival time at the final station, when timetables applied.
    pub fn arrival_time(&self) -> Option<Time> {
        self.steps.last().and_then(|s| s.arrives)
    }
}

/// Compute the optimal journey for `request` over a private plan copy.
///
/// The plan is taken by value: coordinate endpoints mutate it, and the
/// caller's shared graph must never observe those virtual vertices.
pub fn plan_route(
    mut plan: Plan,
    config: &SearchConfig,
    request: &RouteRequest,
) -> Result<Route, SearchError> {
    let start = resolve_endpoint(&mut plan, &request.start, Endpoint::Start, config)?;
    let arrival = resolve_endpoint(&mut plan, &request.arrival, Endpoint::Arrival, config)?;

    Search {
        plan: &plan,
        config,
        request,
        start: &start,
        arrival: &arrival,
    }
    .run()
}

/// Which end of the journey a token names.
enum Endpoint {
    Start,
    Arrival,
}

/// Substitute a coordinate token with an injected virtual station.
fn resolve_endpoint(
    plan: &mut Plan,
    token: &str,
    endpoint: Endpoint,
    config: &SearchConfig,
) -> Result<String, SearchError> {
    let Some(pos) = parse_coordinate(token)? else {
        return Ok(token.to_string());
    };

    let radius = config.virtual_endpoint_radius_m;
    let name = match endpoint {
        Endpoint::Start => {
            plan.add_departure_point(DEPARTURE_POINT, pos, radius, config.walk_speed_m_s);
            DEPARTURE_POINT
        }
        Endpoint::Arrival => {
            plan.add_arrival_point(ARRIVAL_POINT, pos, radius, config.walk_speed_m_s);
            ARRIVAL_POINT
        }
    };
    Ok(name.to_string())
}

/// Parse a `"(x,y)"` token into planar coordinates.
///
/// Returns `Ok(None)` for tokens that are not parenthesised (station
/// names); a parenthesised token that fails to parse is an error.
fn parse_coordinate(token: &str) -> Result<Option<(f64, f64)>, SearchError> {
    let trimmed = token.trim();
    let Some(inner) = trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return Ok(None);
    };

    let err = || SearchError::InvalidEndpoint(token.to_string());
    let (x, y) = inner.split_once(',').ok_or_else(err)?;
    let x: f64 = x.trim().parse().map_err(|_| err())?;
    let y: f64 = y.trim().parse().map_err(|_| err())?;
    Ok(Some((x, y)))
}

/// One search invocation over an immutable plan snapshot.
struct Search<'a> {
    plan: &'a Plan,
    config: &'a SearchConfig,
    request: &'a RouteRequest,
    start: &'a str,
    arrival: &'a str,
}

impl Search<'_> {
    fn run(&self) -> Result<Route, SearchError> {
        // Best known cost per vertex: metres (distance mode) or seconds
        // (time mode).
        let mut dist: HashMap<String, u64> = HashMap::new();
        // The edge that reached each vertex, with its resolved times. This
        // is the search-local side map: the shared graph is never written.
        let mut prev: HashMap<String, Step> = HashMap::new();
        // Min-heap via Reverse; stale entries are skipped on pop instead of
        // decreased in place.
        let mut heap: BinaryHeap<Reverse<(u64, String)>> = BinaryHeap::new();

        dist.insert(self.start.to_string(), 0);
        heap.push(Reverse((0, self.start.to_string())));

        while let Some(Reverse((cost, u))) = heap.pop() {
            if cost > dist.get(&u).copied().unwrap_or(u64::MAX) {
                continue; // stale
            }

            if u == self.arrival {
                return self.reconstruct(&prev);
            }

            // Time at which the traveller stands at `u`.
            let reference = if u == self.start {
                self.request.departure
            } else {
                prev.get(&u).and_then(|step| step.arrives)
            };

            for &id in self.plan.outgoing(&u) {
                let section = self.plan.section(id);
                let resolved = self.plan.resolve_section_time(id, reference);
                self.relax(section, resolved, reference, cost, &mut dist, &mut prev, &mut heap);
            }

            if self.request.allow_foot {
                self.relax_foot_transfers(&u, reference, cost, &mut dist, &mut prev, &mut heap);
            }
        }

        Err(SearchError::PathNotFound {
            start: self.start.to_string(),
            arrival: self.arrival.to_string(),
        })
    }

    /// Synthesize walking edges from `u` to every station in foot range.
    ///
    /// Computed lazily per visited vertex; the quadratic all-pairs edge set
    /// is never materialized in the graph.
    #[allow(clippy::too_many_arguments)]
    fn relax_foot_transfers(
        &self,
        u: &str,
        reference: Option<Time>,
        cost: u64,
        dist: &mut HashMap<String, u64>,
        prev: &mut HashMap<String, Step>,
        heap: &mut BinaryHeap<Reverse<(u64, String)>>,
    ) {
        let Some(here) = self.plan.station(u) else {
            return;
        };

        for (target, distance) in self
            .plan
            .stations_within(here, self.config.max_foot_distance_m)
        {
            let section = Section::walk(here.clone(), target, distance, self.config.walk_speed_m_s);
            self.relax(&section, reference, reference, cost, dist, prev, heap);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn relax(
        &self,
        section: &Section,
        resolved: Option<Time>,
        reference: Option<Time>,
        cost: u64,
        dist: &mut HashMap<String, u64>,
        prev: &mut HashMap<String, Step>,
        heap: &mut BinaryHeap<Reverse<(u64, String)>>,
    ) {
        let time_optimized = !self.request.distance_optimized;

        // A scheduled edge with no applicable departure is unusable when
        // optimising for time.
        if time_optimized && resolved.is_none() {
            return;
        }

        let raw_weight = if self.request.distance_optimized {
            section.distance_m()
        } else {
            let wait = match (reference, resolved) {
                (Some(reference), Some(resolved)) => reference.seconds_until(resolved),
                _ => 0,
            };
            (wait + section.duration_secs()) as f64
        };

        let weight = if section.is_walk() {
            (raw_weight * self.config.walk_penalty).round() as u64
        } else {
            raw_weight.round() as u64
        };

        let target = section.arrival().name();
        let candidate = cost.saturating_add(weight);
        if candidate < dist.get(target).copied().unwrap_or(u64::MAX) {
            dist.insert(target.to_string(), candidate);
            prev.insert(
                target.to_string(),
                Step {
                    section: section.clone(),
                    departs: resolved,
                    arrives: resolved.map(|t| t.add_seconds(section.duration_secs())),
                },
            );
            heap.push(Reverse((candidate, target.to_string())));
        }
    }

    /// Walk the predecessor map backwards from the arrival.
    fn reconstruct(&self, prev: &HashMap<String, Step>) -> Result<Route, SearchError> {
        let mut steps = Vec::new();
        let mut current = self.arrival.to_string();

        while current != self.start {
            let step = prev.get(&current).ok_or_else(|| SearchError::PathNotFound {
                start: self.start.to_string(),
                arrival: self.arrival.to_string(),
            })?;
            current = step.section.start().name().to_string();
            steps.push(step.clone());
        }

        steps.reverse();
        Ok(Route { steps })
    }
}
