//! CSV ingestion: building a plan from network and timetable files.
//!
//! Two files describe a network. The network file carries one scheduled
//! section per record; the timetable file carries one line start per
//! record with its departure times. Build order is fixed: every section
//! first, then every departure time, then a single cumulative-duration
//! propagation pass.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::domain::{LineId, Time};
use crate::plan::{Plan, PlanError};

/// Error from loading a data file.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The file could not be opened or read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: csv::Error,
    },

    /// A record did not match the expected format.
    #[error("{}: record {record}: {message}", path.display())]
    Format {
        path: PathBuf,
        record: u64,
        message: String,
    },

    /// A record was well-formed but inconsistent with the graph.
    #[error("{}: record {record}: {source}", path.display())]
    Plan {
        path: PathBuf,
        record: u64,
        source: PlanError,
    },
}

/// One scheduled section of the network file.
#[derive(Debug, Deserialize)]
struct SectionRecord {
    start_name: String,
    start_x: f64,
    start_y: f64,
    arrival_name: String,
    arrival_x: f64,
    arrival_y: f64,
    /// Composite line spelling, e.g. `"8 variant 1"`.
    line: String,
    duration_secs: u64,
    distance_km: f64,
}

/// One line start of the timetable file.
#[derive(Debug, Deserialize)]
struct TimetableRecord {
    line: String,
    start_station: String,
    /// Semicolon-separated departure times, e.g. `"06:30:00;15:20:00"`.
    departures: String,
}

/// Build a plan from a network file and a timetable file.
pub fn load(network: &Path, timetable: &Path) -> Result<Plan, IngestError> {
    let mut plan = load_network(network)?;
    load_timetable(&mut plan, timetable)?;
    Ok(plan)
}

/// Build the topology of a plan from a network file.
pub fn load_network(path: &Path) -> Result<Plan, IngestError> {
    let mut plan = Plan::new();
    let mut reader = open(path)?;

    for (index, result) in reader.deserialize::<SectionRecord>().enumerate() {
        let record_no = index as u64 + 1;
        let record = result.map_err(|e| format_error(path, record_no, e))?;

        let line_id = LineId::parse(&record.line).map_err(|e| IngestError::Format {
            path: path.to_path_buf(),
            record: record_no,
            message: e.to_string(),
        })?;

        plan.add_section(
            &record.start_name,
            (record.start_x, record.start_y),
            &record.arrival_name,
            (record.arrival_x, record.arrival_y),
            line_id,
            record.duration_secs,
            record.distance_km,
        )
        .map_err(|source| IngestError::Plan {
            path: path.to_path_buf(),
            record: record_no,
            source,
        })?;
    }

    info!(
        stations = plan.station_count(),
        sections = plan.section_count(),
        file = %path.display(),
        "network loaded"
    );
    Ok(plan)
}

/// Wire a timetable file onto an already-built plan and propagate.
pub fn load_timetable(plan: &mut Plan, path: &Path) -> Result<(), IngestError> {
    let mut reader = open(path)?;
    let mut departures = 0usize;

    for (index, result) in reader.deserialize::<TimetableRecord>().enumerate() {
        let record_no = index as u64 + 1;
        let record = result.map_err(|e| format_error(path, record_no, e))?;

        let line_id = LineId::parse(&record.line).map_err(|e| IngestError::Format {
            path: path.to_path_buf(),
            record: record_no,
            message: e.to_string(),
        })?;

        for token in record.departures.split(';').filter(|t| !t.trim().is_empty()) {
            let time = Time::parse(token.trim()).map_err(|e| IngestError::Format {
                path: path.to_path_buf(),
                record: record_no,
                message: e.to_string(),
            })?;
            plan.add_departure_time(&line_id, &record.start_station, time)
                .map_err(|source| IngestError::Plan {
                    path: path.to_path_buf(),
                    record: record_no,
                    source,
                })?;
            departures += 1;
        }
    }

    plan.update_sections_time();
    info!(departures, file = %path.display(), "timetable loaded");
    Ok(())
}

/// A fresh plan with `base`'s topology and a newly ingested timetable.
///
/// The cheap reload path: the network file is not re-parsed.
pub fn reload_timetable(base: &Plan, path: &Path) -> Result<Plan, IngestError> {
    let mut plan = base.reset_lines_sections();
    load_timetable(&mut plan, path)?;
    Ok(plan)
}

fn open(path: &Path) -> Result<csv::Reader<std::fs::File>, IngestError> {
    csv::Reader::from_path(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn format_error(path: &Path, record: u64, error: csv::Error) -> IngestError {
    IngestError::Format {
        path: path.to_path_buf(),
        record,
        message: error.to_string(),
    }
}
