//! Directed, line-tagged edges of the routing graph.

use std::fmt;

use super::line::LineId;
use super::station::Station;

/// Index of a section in the plan's edge arena.
///
/// Graph-owned sections are addressed by this id; it is what per-search
/// bookkeeping (resolved times, predecessors) keys on instead of mutating
/// the shared edge itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub usize);

/// A directed edge between two stations.
///
/// A section tagged with a line identity is a scheduled transit hop; a
/// section with no line (`line() == None`) is a walking edge, synthesized
/// either around a virtual coordinate endpoint or lazily during a
/// foot-enabled search.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    start: Station,
    arrival: Station,
    line: Option<LineId>,
    distance_m: f64,
    duration_secs: u64,
}

impl Section {
    /// Create a scheduled transit section.
    pub fn new(
        start: Station,
        arrival: Station,
        line: LineId,
        distance_m: f64,
        duration_secs: u64,
    ) -> Self {
        Self {
            start,
            arrival,
            line: Some(line),
            distance_m,
            duration_secs,
        }
    }

    /// Create a walking section between two stations.
    ///
    /// Duration is derived from the distance at the given walking speed.
    pub fn walk(start: Station, arrival: Station, distance_m: f64, walk_speed_m_s: f64) -> Self {
        let duration_secs = (distance_m / walk_speed_m_s).ceil() as u64;
        Self {
            start,
            arrival,
            line: None,
            distance_m,
            duration_secs,
        }
    }

    /// Returns the departure station.
    pub fn start(&self) -> &Station {
        &self.start
    }

    /// Returns the arrival station.
    pub fn arrival(&self) -> &Station {
        &self.arrival
    }

    /// Returns the line this section belongs to, or `None` for a walk.
    pub fn line(&self) -> Option<&LineId> {
        self.line.as_ref()
    }

    /// True when this is a walking edge.
    pub fn is_walk(&self) -> bool {
        self.line.is_none()
    }

    /// Returns the edge length in metres.
    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    /// Returns the traversal duration in seconds.
    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.line {
            Some(line) => write!(f, "{} -> {} [{}]", self.start, self.arrival, line),
            None => write!(f, "{} -> {} [walk]", self.start, self.arrival),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(name: &str, x: f64, y: f64) -> Station {
        Station::new(name, x, y)
    }

    #[test]
    fn transit_section_carries_line() {
        let s = Section::new(
            station("A", 0.0, 0.0),
            station("B", 100.0, 0.0),
            LineId::new("8", 1),
            100.0,
            60,
        );

        assert!(!s.is_walk());
        assert_eq!(s.line().unwrap(), &LineId::new("8", 1));
        assert_eq!(s.duration_secs(), 60);
    }

    #[test]
    fn walk_section_has_no_line() {
        let s = Section::walk(station("A", 0.0, 0.0), station("B", 140.0, 0.0), 140.0, 1.4);

        assert!(s.is_walk());
        assert!(s.line().is_none());
        // 140 m at 1.4 m/s
        assert_eq!(s.duration_secs(), 100);
    }

    #[test]
    fn walk_duration_rounds_up() {
        let s = Section::walk(station("A", 0.0, 0.0), station("B", 10.0, 0.0), 10.0, 1.4);
        // 10 / 1.4 = 7.14..., agents never arrive early
        assert_eq!(s.duration_secs(), 8);
    }

    #[test]
    fn display() {
        let s = Section::new(
            station("A", 0.0, 0.0),
            station("B", 1.0, 0.0),
            LineId::new("8", 1),
            1.0,
            60,
        );
        assert_eq!(s.to_string(), "A -> B [8 variant 1]");

        let w = Section::walk(station("A", 0.0, 0.0), station("B", 1.0, 0.0), 1.0, 1.4);
        assert_eq!(w.to_string(), "A -> B [walk]");
    }
}
