//! Journey planner for a scheduled transit network.
//!
//! Answers routing queries over a station/section/line graph: shortest
//! distance or earliest arrival against the timetable, optionally with
//! walking transfers, from a named stop or a raw coordinate.

pub mod domain;
pub mod ingest;
pub mod plan;
pub mod planner;
pub mod web;
