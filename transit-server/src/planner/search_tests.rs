//! Scenario tests for the routing engine.

use crate::domain::{LineId, Time};
use crate::plan::Plan;

use super::config::SearchConfig;
use super::search::{RouteRequest, SearchError, plan_route};

fn time(h: u32, m: u32, s: u32) -> Time {
    Time::new(h, m, s).unwrap()
}

fn request(start: &str, arrival: &str) -> RouteRequest {
    RouteRequest {
        start: start.to_string(),
        arrival: arrival.to_string(),
        departure: Some(time(6, 0, 0)),
        distance_optimized: false,
        allow_foot: false,
    }
}

/// A single line A -> B with hourly departures from 06:00 to 09:00.
fn single_edge_plan() -> Plan {
    let mut plan = Plan::new();
    let line = LineId::new("1", 1);
    plan.add_section("A", (0.0, 0.0), "B", (1000.0, 0.0), line.clone(), 600, 1.0)
        .unwrap();
    for hour in 6..10 {
        plan.add_departure_time(&line, "A", time(hour, 0, 0)).unwrap();
    }
    plan.update_sections_time();
    plan
}

#[test]
fn single_edge_route() {
    let route = plan_route(single_edge_plan(), &SearchConfig::default(), &request("A", "B")).unwrap();

    assert_eq!(route.steps.len(), 1);
    let step = &route.steps[0];
    assert_eq!(step.section.start().name(), "A");
    assert_eq!(step.section.arrival().name(), "B");
    assert_eq!(step.departs, Some(time(6, 0, 0)));
    assert_eq!(step.arrives, Some(time(6, 10, 0)));
}

#[test]
fn same_endpoint_is_empty_route() {
    let route = plan_route(single_edge_plan(), &SearchConfig::default(), &request("A", "A")).unwrap();
    assert!(route.steps.is_empty());
}

#[test]
fn unknown_station_is_no_path() {
    let err =
        plan_route(single_edge_plan(), &SearchConfig::default(), &request("A", "Nowhere"))
            .unwrap_err();
    assert!(matches!(err, SearchError::PathNotFound { .. }));
}

#[test]
fn disconnected_components_are_no_path() {
    let mut plan = Plan::new();
    let l1 = LineId::new("1", 1);
    let l2 = LineId::new("2", 1);
    plan.add_section("A", (0.0, 0.0), "B", (1000.0, 0.0), l1.clone(), 300, 1.0)
        .unwrap();
    plan.add_section("C", (50_000.0, 0.0), "D", (51_000.0, 0.0), l2.clone(), 300, 1.0)
        .unwrap();
    plan.add_departure_time(&l1, "A", time(6, 0, 0)).unwrap();
    plan.add_departure_time(&l2, "C", time(6, 0, 0)).unwrap();
    plan.update_sections_time();

    let err = plan_route(plan, &SearchConfig::default(), &request("A", "D")).unwrap_err();
    assert!(matches!(err, SearchError::PathNotFound { .. }));
}

#[test]
fn time_mode_without_departure_time_cannot_board() {
    let mut req = request("A", "B");
    req.departure = None;

    let err = plan_route(single_edge_plan(), &SearchConfig::default(), &req).unwrap_err();
    assert!(matches!(err, SearchError::PathNotFound { .. }));
}

#[test]
fn distance_mode_works_without_any_timetable() {
    let mut plan = Plan::new();
    plan.add_section("A", (0.0, 0.0), "B", (1000.0, 0.0), LineId::new("1", 1), 600, 1.0)
        .unwrap();

    let mut req = request("A", "B");
    req.departure = None;
    req.distance_optimized = true;

    let route = plan_route(plan, &SearchConfig::default(), &req).unwrap();
    assert_eq!(route.steps.len(), 1);
    assert_eq!(route.steps[0].departs, None);
    assert_eq!(route.steps[0].arrives, None);
}

/// Two ways from A to B: a direct slow line and a short two-leg line via C.
///
/// The direct line is 1 km in 600 s boarding immediately; the two-leg line
/// is 400 m total but its first departure is half an hour later.
fn two_route_plan() -> Plan {
    let mut plan = Plan::new();
    let direct = LineId::new("direct", 1);
    let detour = LineId::new("detour", 1);

    plan.add_section("A", (0.0, 0.0), "B", (1000.0, 0.0), direct.clone(), 600, 1.0)
        .unwrap();
    plan.add_section("A", (0.0, 0.0), "C", (100.0, 100.0), detour.clone(), 300, 0.2)
        .unwrap();
    plan.add_section("C", (100.0, 100.0), "B", (1000.0, 0.0), detour.clone(), 300, 0.2)
        .unwrap();

    plan.add_departure_time(&direct, "A", time(6, 0, 0)).unwrap();
    plan.add_departure_time(&detour, "A", time(6, 30, 0)).unwrap();
    plan.update_sections_time();
    plan
}

#[test]
fn time_mode_prefers_earliest_arrival() {
    let route =
        plan_route(two_route_plan(), &SearchConfig::default(), &request("A", "B")).unwrap();

    assert_eq!(route.steps.len(), 1);
    assert_eq!(route.steps[0].section.line().unwrap().name(), "direct");
    assert_eq!(route.arrival_time(), Some(time(6, 10, 0)));
}

#[test]
fn distance_mode_prefers_shortest_path() {
    let mut req = request("A", "B");
    req.distance_optimized = true;

    let route = plan_route(two_route_plan(), &SearchConfig::default(), &req).unwrap();

    let lines: Vec<_> = route
        .steps
        .iter()
        .map(|s| s.section.line().unwrap().name().to_string())
        .collect();
    assert_eq!(lines, vec!["detour".to_string(), "detour".to_string()]);
    assert_eq!(route.total_distance_m(), 400.0);
}

#[test]
fn schedule_wait_is_part_of_the_cost() {
    // Same two routes, but now the detour departs first: the engine must
    // weigh waiting for the direct line against leaving sooner.
    let mut plan = Plan::new();
    let direct = LineId::new("direct", 1);
    let detour = LineId::new("detour", 1);

    plan.add_section("A", (0.0, 0.0), "B", (1000.0, 0.0), direct.clone(), 600, 1.0)
        .unwrap();
    plan.add_section("A", (0.0, 0.0), "C", (100.0, 100.0), detour.clone(), 300, 0.2)
        .unwrap();
    plan.add_section("C", (100.0, 100.0), "B", (1000.0, 0.0), detour.clone(), 300, 0.2)
        .unwrap();

    // Direct departs 06:30; detour departs 06:00 and arrives 06:10:20.
    plan.add_departure_time(&direct, "A", time(6, 30, 0)).unwrap();
    plan.add_departure_time(&detour, "A", time(6, 0, 0)).unwrap();
    plan.update_sections_time();

    let route = plan_route(plan, &SearchConfig::default(), &request("A", "B")).unwrap();

    assert_eq!(route.steps.len(), 2);
    assert_eq!(route.steps[0].section.line().unwrap().name(), "detour");
    // A -> C: 06:00 + 300 s; C -> B boards at 06:00 + 320 s offset.
    assert_eq!(route.steps[1].departs, Some(time(6, 5, 20)));
    assert_eq!(route.arrival_time(), Some(time(6, 10, 20)));
}

#[test]
fn departure_after_last_service_wraps_to_next_day() {
    let mut req = request("A", "B");
    req.departure = Some(time(23, 0, 0)); // all departures have passed

    let route = plan_route(single_edge_plan(), &SearchConfig::default(), &req).unwrap();

    // Boards tomorrow's 06:00.
    assert_eq!(route.steps[0].departs, Some(time(6, 0, 0)));
    assert_eq!(route.arrival_time(), Some(time(6, 10, 0)));
}

/// Two separate lines whose ends are 300 m apart: A -> B, then C -> D.
fn footbridge_plan() -> Plan {
    let mut plan = Plan::new();
    let l1 = LineId::new("1", 1);
    let l2 = LineId::new("2", 1);

    plan.add_section("A", (0.0, 0.0), "B", (300.0, 0.0), l1.clone(), 300, 0.3)
        .unwrap();
    plan.add_section("C", (300.0, 300.0), "D", (300.0, 900.0), l2.clone(), 300, 0.6)
        .unwrap();

    plan.add_departure_time(&l1, "A", time(6, 0, 0)).unwrap();
    plan.add_departure_time(&l2, "C", time(6, 10, 0)).unwrap();
    plan.update_sections_time();
    plan
}

fn foot_config() -> SearchConfig {
    SearchConfig {
        max_foot_distance_m: 350.0,
        ..SearchConfig::default()
    }
}

#[test]
fn foot_transfer_bridges_lines_when_enabled() {
    let mut req = request("A", "D");
    req.allow_foot = true;

    let route = plan_route(footbridge_plan(), &foot_config(), &req).unwrap();

    assert_eq!(route.steps.len(), 3);
    assert!(!route.steps[0].section.is_walk());
    assert!(route.steps[1].section.is_walk());
    assert_eq!(route.steps[1].section.start().name(), "B");
    assert_eq!(route.steps[1].section.arrival().name(), "C");
    assert!(!route.steps[2].section.is_walk());

    // Arrive B 06:05, walk 300 m in 215 s, board C's 06:10 departure.
    assert_eq!(route.steps[1].arrives, Some(time(6, 8, 35)));
    assert_eq!(route.steps[2].departs, Some(time(6, 10, 0)));
    assert_eq!(route.arrival_time(), Some(time(6, 15, 0)));
}

#[test]
fn foot_transfer_disabled_leaves_components_apart() {
    let err = plan_route(footbridge_plan(), &foot_config(), &request("A", "D")).unwrap_err();
    assert!(matches!(err, SearchError::PathNotFound { .. }));
}

#[test]
fn walking_carries_a_penalty_over_transit() {
    // A direct 500 m transit edge against a 400 m walk: the penalty
    // (400 * 1.8 = 720) keeps the traveller on the train.
    let mut plan = Plan::new();
    plan.add_section("A", (0.0, 0.0), "B", (400.0, 0.0), LineId::new("1", 1), 120, 0.5)
        .unwrap();

    let mut req = request("A", "B");
    req.distance_optimized = true;
    req.allow_foot = true;

    let route = plan_route(plan.clone(), &SearchConfig::default(), &req).unwrap();
    assert!(!route.steps[0].section.is_walk());

    // A 1500 m transit edge loses to the penalised walk.
    let mut plan = Plan::new();
    plan.add_section("A", (0.0, 0.0), "B", (400.0, 0.0), LineId::new("1", 1), 120, 1.5)
        .unwrap();

    let route = plan_route(plan, &SearchConfig::default(), &req).unwrap();
    assert!(route.steps[0].section.is_walk());
}

#[test]
fn coordinate_start_is_injected_as_virtual_station() {
    let mut req = request("(10,0)", "B");
    req.distance_optimized = true;

    let route = plan_route(single_edge_plan(), &SearchConfig::default(), &req).unwrap();

    // Walk to A (10 m, penalised to 18) plus the 1000 m line beats the
    // direct 990 m walk at 1782.
    assert_eq!(route.steps.len(), 2);
    assert!(route.steps[0].section.is_walk());
    assert_eq!(route.steps[0].section.start().name(), "Departure");
    assert_eq!(route.steps[0].section.arrival().name(), "A");
    assert!(!route.steps[1].section.is_walk());
}

#[test]
fn coordinate_arrival_is_injected_as_virtual_station() {
    let mut req = request("A", "(1000,10)");
    req.distance_optimized = true;

    let route = plan_route(single_edge_plan(), &SearchConfig::default(), &req).unwrap();

    let last = route.steps.last().unwrap();
    assert!(last.section.is_walk());
    assert_eq!(last.section.arrival().name(), "Arrival");
}

#[test]
fn malformed_coordinate_token_is_rejected() {
    let err = plan_route(
        single_edge_plan(),
        &SearchConfig::default(),
        &request("(not,numbers)", "B"),
    )
    .unwrap_err();
    assert!(matches!(err, SearchError::InvalidEndpoint(_)));
}

#[test]
fn searches_on_independent_copies_do_not_interfere() {
    let shared = two_route_plan();

    let early = request("A", "B");
    let mut late = request("A", "B");
    late.departure = Some(time(6, 25, 0));

    // Interleave searches over fresh copies of the shared plan; results
    // must match a clean run regardless of what ran in between.
    let first = plan_route(shared.clone(), &SearchConfig::default(), &early).unwrap();
    let late_route = plan_route(shared.clone(), &SearchConfig::default(), &late).unwrap();
    let second = plan_route(shared.clone(), &SearchConfig::default(), &early).unwrap();

    assert_eq!(first.steps.len(), second.steps.len());
    for (a, b) in first.steps.iter().zip(&second.steps) {
        assert_eq!(a.section, b.section);
        assert_eq!(a.departs, b.departs);
        assert_eq!(a.arrives, b.arrives);
    }

    // The 06:25 traveller misses nothing on the direct line at 06:00: the
    // detour's 06:30 start now wins.
    assert_eq!(
        late_route.steps[0].section.line().unwrap().name(),
        "detour"
    );
    // And the shared plan never grew any virtual vertices.
    assert!(shared.station("Departure").is_none());
}
