//! The routing graph: stations, sections, lines and their indices.
//!
//! A `Plan` owns every edge in an arena and exposes adjacency by station
//! name. Lines partition the scheduled edges; walking edges synthesized
//! around virtual coordinate endpoints belong to no line. All mutation
//! happens here: growing the graph at ingest time, injecting virtual
//! endpoints for one search, and resetting schedule state on reload.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{Line, LineError, LineId, Section, SectionId, Station, Time};

/// Error from building the graph or wiring schedule data onto it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// A timetable entry referenced a line that was never defined.
    #[error("undefined line {0}")]
    UndefinedLine(LineId),

    /// Schedule data was inconsistent with the line's topology.
    #[error(transparent)]
    Line(#[from] LineError),

    /// A station name was reused with different coordinates.
    #[error("station {name} already exists at a different position")]
    StationCoordinateMismatch { name: String },
}

/// The full routing graph plus line and station-name indices.
///
/// Cloning a plan is a deep copy: a routing request takes its own copy
/// before injecting virtual endpoints, so concurrent searches and an
/// in-flight reload never observe each other's mutations.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    stations: HashMap<String, Station>,
    /// Edge arena; `SectionId` indexes into this.
    sections: Vec<Section>,
    /// Station name to outbound section ids, in insertion order.
    adjacency: HashMap<String, Vec<SectionId>>,
    lines: HashMap<LineId, Line>,
    /// Station name to the names of the lines serving it.
    station_lines: HashMap<String, BTreeSet<String>>,
}

impl Plan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one scheduled edge to the graph.
    ///
    /// Both endpoint stations are created on first sight and reused
    /// afterwards; reusing a name with different coordinates is rejected.
    /// The line for `line_id` is created on first sight and the section
    /// registered on it. `distance_km` is stored as metres.
    pub fn add_section(
        &mut self,
        start_name: &str,
        start_pos: (f64, f64),
        arrival_name: &str,
        arrival_pos: (f64, f64),
        line_id: LineId,
        duration_secs: u64,
        distance_km: f64,
    ) -> Result<SectionId, PlanError> {
        let start = self.intern_station(start_name, start_pos)?;
        let arrival = self.intern_station(arrival_name, arrival_pos)?;

        let section = Section::new(
            start,
            arrival,
            line_id.clone(),
            distance_km * 1000.0,
            duration_secs,
        );
        let id = SectionId(self.sections.len());
        self.sections.push(section);

        self.adjacency
            .entry(start_name.to_string())
            .or_default()
            .push(id);
        // The arrival station is a vertex even with no outbound edges yet.
        self.adjacency.entry(arrival_name.to_string()).or_default();

        self.lines
            .entry(line_id.clone())
            .or_insert_with(|| Line::new(line_id.clone()))
            .register_section(id);

        for name in [start_name, arrival_name] {
            self.station_lines
                .entry(name.to_string())
                .or_default()
                .insert(line_id.name().to_string());
        }

        Ok(id)
    }

    /// Register a scheduled departure on a line, designating its start.
    ///
    /// The first call for a line fixes its start station; later calls must
    /// name the same station.
    pub fn add_departure_time(
        &mut self,
        line_id: &LineId,
        station_name: &str,
        time: Time,
    ) -> Result<(), PlanError> {
        let line = self
            .lines
            .get_mut(line_id)
            .ok_or_else(|| PlanError::UndefinedLine(line_id.clone()))?;

        line.set_start(station_name, &self.sections)?;
        line.add_departure(time);
        Ok(())
    }

    /// Propagate cumulative durations on every line.
    ///
    /// Called once per reload, after all departure times are ingested.
    pub fn update_sections_time(&mut self) {
        let arena = &self.sections;
        for line in self.lines.values_mut() {
            line.update_sections_time(arena);
        }
    }

    /// The absolute time at which traversal of `section` can begin, given
    /// the traveller is ready at `reference`.
    ///
    /// A scheduled edge consults its line's timetable; a walking edge is
    /// always immediately available and echoes the reference back.
    pub fn resolve_section_time(&self, section: SectionId, reference: Option<Time>) -> Option<Time> {
        match self.sections[section.0].line() {
            Some(line_id) => self
                .lines
                .get(line_id)
                .and_then(|line| line.next_time(section, &self.sections, reference)),
            None => reference,
        }
    }

    /// Materialize a virtual departure station at a raw coordinate.
    ///
    /// Synthesizes outgoing walking edges to every real station within
    /// `max_distance_m`. Returns the number of connections made.
    pub fn add_departure_point(
        &mut self,
        name: &str,
        pos: (f64, f64),
        max_distance_m: f64,
        walk_speed_m_s: f64,
    ) -> usize {
        let virtual_station = Station::new(name, pos.0, pos.1);
        let near = self.stations_within(&virtual_station, max_distance_m);

        self.stations.insert(name.to_string(), virtual_station.clone());
        self.adjacency.entry(name.to_string()).or_default();

        let count = near.len();
        for (target, distance) in near {
            let id = SectionId(self.sections.len());
            self.sections.push(Section::walk(
                virtual_station.clone(),
                target,
                distance,
                walk_speed_m_s,
            ));
            self.adjacency
                .entry(name.to_string())
                .or_default()
                .push(id);
        }
        count
    }

    /// Materialize a virtual arrival station at a raw coordinate.
    ///
    /// Synthesizes incoming walking edges from every real station within
    /// `max_distance_m`. Returns the number of connections made.
    pub fn add_arrival_point(
        &mut self,
        name: &str,
        pos: (f64, f64),
        max_distance_m: f64,
        walk_speed_m_s: f64,
    ) -> usize {
        let virtual_station = Station::new(name, pos.0, pos.1);
        let near = self.stations_within(&virtual_station, max_distance_m);

        self.stations.insert(name.to_string(), virtual_station.clone());
        self.adjacency.entry(name.to_string()).or_default();

        let count = near.len();
        for (source, distance) in near {
            let id = SectionId(self.sections.len());
            let source_name = source.name().to_string();
            self.sections.push(Section::walk(
                source,
                virtual_station.clone(),
                distance,
                walk_speed_m_s,
            ));
            self.adjacency.entry(source_name).or_default().push(id);
        }
        count
    }

    /// Real stations within `max_distance_m` of `from`, with distances.
    pub fn stations_within(&self, from: &Station, max_distance_m: f64) -> Vec<(Station, f64)> {
        let mut near: Vec<(Station, f64)> = self
            .stations
            .values()
            .filter(|s| s.name() != from.name())
            .map(|s| (s.clone(), from.distance_to(s)))
            .filter(|(_, d)| *d <= max_distance_m)
            .collect();
        // Deterministic order regardless of map iteration.
        near.sort_by(|(a, da), (b, db)| {
            da.partial_cmp(db)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name().cmp(b.name()))
        });
        near
    }

    /// A new plan with the same topology but all schedule state dropped.
    ///
    /// The cheap path for reloading timetable data: stations, sections and
    /// line membership survive; starts, cumulative durations and departure
    /// times are cleared on every line.
    pub fn reset_lines_sections(&self) -> Plan {
        let mut plan = self.clone();
        for line in plan.lines.values_mut() {
            line.reset_schedule();
        }
        plan
    }

    /// Look up a station by name.
    pub fn station(&self, name: &str) -> Option<&Station> {
        self.stations.get(name)
    }

    /// Iterate over all stations.
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    /// Borrow a section from the arena.
    pub fn section(&self, id: SectionId) -> &Section {
        &self.sections[id.0]
    }

    /// Borrow the whole edge arena.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Outbound section ids of a station, in insertion order.
    pub fn outgoing(&self, station_name: &str) -> &[SectionId] {
        self.adjacency
            .get(station_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Look up a line by identity.
    pub fn line(&self, id: &LineId) -> Option<&Line> {
        self.lines.get(id)
    }

    /// Iterate over all lines.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    /// The names of the lines serving a station.
    pub fn lines_at(&self, station_name: &str) -> Option<&BTreeSet<String>> {
        self.station_lines.get(station_name)
    }

    /// Iterate over the station index: (station name, line names).
    pub fn station_index(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.station_lines.iter()
    }

    /// Number of stations in the graph.
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Number of edges in the graph, walking edges included.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn intern_station(&mut self, name: &str, pos: (f64, f64)) -> Result<Station, PlanError> {
        if let Some(existing) = self.stations.get(name) {
            if existing.x().to_bits() == pos.0.to_bits() && existing.y().to_bits() == pos.1.to_bits()
            {
                return Ok(existing.clone());
            }
            return Err(PlanError::StationCoordinateMismatch {
                name: name.to_string(),
            });
        }
        let station = Station::new(name, pos.0, pos.1);
        self.stations.insert(name.to_string(), station.clone());
        Ok(station)
    }
}
