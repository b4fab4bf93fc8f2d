//! Lines: ordered chains of sections plus their timetable.
//!
//! A line variant is one directional service pattern. Departure times are
//! registered at the line's designated start; the time at which a vehicle
//! reaches any later section is derived by walking the chain and summing
//! durations plus a fixed dwell at each stop.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::section::{Section, SectionId};
use super::time::Time;

/// Seconds a vehicle waits at each intermediate stop.
pub const DWELL_SECONDS: u64 = 20;

/// Error from wiring schedule data onto a line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    /// No section of the line starts at the named station.
    #[error("line {line} has no section starting at {station}")]
    StationNotFound { line: LineId, station: String },

    /// The line already has a different start station.
    #[error("line {line} already starts at {existing}, cannot restart at {requested}")]
    DifferentStart {
        line: LineId,
        existing: String,
        requested: String,
    },
}

/// Error returned when parsing a malformed line identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid line identifier {input:?}: expected \"<name> variant <n>\"")]
pub struct InvalidLineId {
    input: String,
}

/// Identity of a line variant: a (name, variant) pair.
///
/// The pair is the key everywhere in the graph; the composite
/// `"<name> variant <n>"` spelling only exists at the data-file boundary.
///
/// # Examples
///
/// ```
/// use transit_server::domain::LineId;
///
/// let id = LineId::parse("8 variant 1").unwrap();
/// assert_eq!(id, LineId::new("8", 1));
/// assert_eq!(id.to_string(), "8 variant 1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId {
    name: String,
    variant: u32,
}

impl LineId {
    /// Create a line identity from its parts.
    pub fn new(name: impl Into<String>, variant: u32) -> Self {
        Self {
            name: name.into(),
            variant,
        }
    }

    /// Parse the composite `"<name> variant <n>"` spelling used by the
    /// network files.
    pub fn parse(s: &str) -> Result<Self, InvalidLineId> {
        let err = || InvalidLineId {
            input: s.to_string(),
        };

        let (name, variant) = s.rsplit_once(" variant ").ok_or_else(err)?;
        if name.is_empty() {
            return Err(err());
        }
        let variant: u32 = variant.trim().parse().map_err(|_| err())?;

        Ok(Self::new(name, variant))
    }

    /// Returns the line name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the variant number.
    pub fn variant(&self) -> u32 {
        self.variant
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} variant {}", self.name, self.variant)
    }
}

/// One line variant: its sections, designated start and timetable.
///
/// Sections are held by arena id; every operation that needs the edges
/// themselves borrows the plan's section arena.
#[derive(Debug, Clone)]
pub struct Line {
    id: LineId,
    sections: Vec<SectionId>,
    start: Option<SectionId>,
    last: Option<SectionId>,
    /// Derived seconds from the line start to the *end* of each section.
    cumulative: HashMap<SectionId, u64>,
    departures: BTreeSet<Time>,
}

impl Line {
    /// Create an empty line with the given identity.
    pub fn new(id: LineId) -> Self {
        Self {
            id,
            sections: Vec::new(),
            start: None,
            last: None,
            cumulative: HashMap::new(),
            departures: BTreeSet::new(),
        }
    }

    /// Returns the line identity.
    pub fn id(&self) -> &LineId {
        &self.id
    }

    /// Returns the ids of the sections registered on this line.
    pub fn sections(&self) -> &[SectionId] {
        &self.sections
    }

    /// Returns the designated start section, if set.
    pub fn start(&self) -> Option<SectionId> {
        self.start
    }

    /// Returns the last section reached by schedule propagation, if any.
    pub fn last(&self) -> Option<SectionId> {
        self.last
    }

    /// Returns the registered departure times, ascending.
    pub fn departures(&self) -> impl Iterator<Item = Time> + '_ {
        self.departures.iter().copied()
    }

    /// Register a section as belonging to this line.
    pub fn register_section(&mut self, id: SectionId) {
        self.sections.push(id);
    }

    /// Designate the section departing from `station_name` as the line start.
    ///
    /// Re-setting the same start is idempotent; naming a different station
    /// once a start exists is an error.
    pub fn set_start(&mut self, station_name: &str, arena: &[Section]) -> Result<(), LineError> {
        if let Some(existing) = self.start {
            let existing_name = arena[existing.0].start().name();
            if existing_name == station_name {
                return Ok(());
            }
            return Err(LineError::DifferentStart {
                line: self.id.clone(),
                existing: existing_name.to_string(),
                requested: station_name.to_string(),
            });
        }

        let found = self
            .sections
            .iter()
            .copied()
            .find(|id| arena[id.0].start().name() == station_name)
            .ok_or_else(|| LineError::StationNotFound {
                line: self.id.clone(),
                station: station_name.to_string(),
            })?;

        self.start = Some(found);
        Ok(())
    }

    /// Register a scheduled departure from the line start.
    pub fn add_departure(&mut self, time: Time) {
        self.departures.insert(time);
    }

    /// Derive cumulative durations by walking the chain from the start.
    ///
    /// The start section's cumulative value is its own duration; each
    /// successor adds the dwell plus its duration. Propagation stops at a
    /// dead end or at a section already assigned, so a looping line
    /// terminates after one lap.
    pub fn update_sections_time(&mut self, arena: &[Section]) {
        let Some(start) = self.start else {
            return;
        };
        // Already propagated; re-running would reset `last` to the start.
        if !self.cumulative.is_empty() {
            return;
        }

        let mut current = start;
        let mut total = arena[start.0].duration_secs();
        self.cumulative.insert(start, total);
        self.last = Some(start);

        loop {
            let arrival = arena[current.0].arrival();
            let next = self
                .sections
                .iter()
                .copied()
                .find(|id| arena[id.0].start() == arrival);

            match next {
                Some(id) if !self.cumulative.contains_key(&id) => {
                    total += DWELL_SECONDS + arena[id.0].duration_secs();
                    self.cumulative.insert(id, total);
                    self.last = Some(id);
                    current = id;
                }
                _ => break,
            }
        }
    }

    /// Seconds from the line start to the end of `section`, if propagated.
    pub fn cumulative_secs(&self, section: SectionId) -> Option<u64> {
        self.cumulative.get(&section).copied()
    }

    /// Earliest scheduled time at which `section` can be boarded at-or-after
    /// `after`.
    ///
    /// Returns `None` when the section has no cumulative duration, no
    /// reference time is given, or the line has no departures. When every
    /// departure of the day has passed, wraps to the first departure of the
    /// next day.
    pub fn next_time(&self, section: SectionId, arena: &[Section], after: Option<Time>) -> Option<Time> {
        let offset = self.boarding_offset(section, arena)?;
        let after = after?;

        for departure in &self.departures {
            let candidate = departure.add_seconds(offset);
            if candidate >= after {
                return Some(candidate);
            }
        }

        // All of today's departures have passed: first one tomorrow.
        self.departures
            .first()
            .map(|earliest| earliest.add_seconds(offset))
    }

    /// Every scheduled boarding time at `section`, in departure order.
    pub fn departure_times(&self, section: SectionId, arena: &[Section]) -> Vec<Time> {
        match self.boarding_offset(section, arena) {
            Some(offset) => self
                .departures
                .iter()
                .map(|d| d.add_seconds(offset))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Seconds from the line start to the *beginning* of `section`.
    fn boarding_offset(&self, section: SectionId, arena: &[Section]) -> Option<u64> {
        let cumulative = self.cumulative_secs(section)?;
        Some(cumulative - arena[section.0].duration_secs())
    }

    /// Drop all derived schedule state: start, propagated durations and
    /// departures. The section chain itself is kept.
    pub fn reset_schedule(&mut self) {
        self.start = None;
        self.last = None;
        self.cumulative.clear();
        self.departures.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Station;

    fn time(h: u32, m: u32, s: u32) -> Time {
        Time::new(h, m, s).unwrap()
    }

    fn section(from: &str, to: &str, duration: u64) -> Section {
        Section::new(
            Station::new(from, 0.0, 0.0),
            Station::new(to, 0.0, 0.0),
            LineId::new("T", 1),
            100.0,
            duration,
        )
    }

    /// Build a line over the given sections, registering each in order.
    fn line_over(arena: &[Section]) -> Line {
        let mut line = Line::new(LineId::new("T", 1));
        for i in 0..arena.len() {
            line.register_section(SectionId(i));
        }
        line
    }

    #[test]
    fn parse_line_id() {
        assert_eq!(LineId::parse("8 variant 1").unwrap(), LineId::new("8", 1));
        assert_eq!(
            LineId::parse("Nord Sud variant 12").unwrap(),
            LineId::new("Nord Sud", 12)
        );

        assert!(LineId::parse("8").is_err());
        assert!(LineId::parse(" variant 1").is_err());
        assert!(LineId::parse("8 variant x").is_err());
    }

    #[test]
    fn set_start_finds_section() {
        let arena = vec![section("A", "B", 10), section("B", "C", 15)];
        let mut line = line_over(&arena);

        line.set_start("A", &arena).unwrap();
        assert_eq!(line.start(), Some(SectionId(0)));
    }

    #[test]
    fn set_start_unknown_station() {
        let arena = vec![section("A", "B", 10)];
        let mut line = line_over(&arena);

        let err = line.set_start("Z", &arena).unwrap_err();
        assert!(matches!(err, LineError::StationNotFound { .. }));
    }

    #[test]
    fn set_start_idempotent_but_not_movable() {
        let arena = vec![section("A", "B", 10), section("B", "C", 15)];
        let mut line = line_over(&arena);

        line.set_start("A", &arena).unwrap();
        line.set_start("A", &arena).unwrap(); // same station: fine

        let err = line.set_start("B", &arena).unwrap_err();
        assert!(matches!(err, LineError::DifferentStart { .. }));
    }

    #[test]
    fn propagation_sums_durations_and_dwell() {
        let arena = vec![section("A", "B", 10), section("B", "C", 15)];
        let mut line = line_over(&arena);

        line.set_start("A", &arena).unwrap();
        line.update_sections_time(&arena);

        assert_eq!(line.cumulative_secs(SectionId(0)), Some(10));
        // 10 + dwell 20 + 15
        assert_eq!(line.cumulative_secs(SectionId(1)), Some(45));
        assert_eq!(line.last(), Some(SectionId(1)));
    }

    #[test]
    fn propagation_without_start_is_noop() {
        let arena = vec![section("A", "B", 10)];
        let mut line = line_over(&arena);

        line.update_sections_time(&arena);
        assert_eq!(line.cumulative_secs(SectionId(0)), None);
        assert_eq!(line.last(), None);
    }

    #[test]
    fn propagation_is_idempotent() {
        let arena = vec![section("A", "B", 10), section("B", "C", 15)];
        let mut line = line_over(&arena);

        line.set_start("A", &arena).unwrap();
        line.update_sections_time(&arena);
        // A repeat run must not move `last` back to the start section.
        line.update_sections_time(&arena);

        assert_eq!(line.cumulative_secs(SectionId(0)), Some(10));
        assert_eq!(line.cumulative_secs(SectionId(1)), Some(45));
        assert_eq!(line.last(), Some(SectionId(1)));
    }

    #[test]
    fn propagation_terminates_on_loop() {
        // A -> B -> C -> A: the chain closes on itself.
        let arena = vec![
            section("A", "B", 10),
            section("B", "C", 15),
            section("C", "A", 5),
        ];
        let mut line = line_over(&arena);

        line.set_start("A", &arena).unwrap();
        line.update_sections_time(&arena);

        assert_eq!(line.cumulative_secs(SectionId(0)), Some(10));
        assert_eq!(line.cumulative_secs(SectionId(1)), Some(45));
        assert_eq!(line.cumulative_secs(SectionId(2)), Some(70));
        assert_eq!(line.last(), Some(SectionId(2)));
    }

    /// Fixture for the timetable queries: A -> B (10 s), B -> C, with the
    /// boarding offset at B -> C equal to 10 + 20 = 30 s.
    fn scheduled_line() -> (Vec<Section>, Line) {
        let arena = vec![section("A", "B", 10), section("B", "C", 15)];
        let mut line = line_over(&arena);

        line.set_start("A", &arena).unwrap();
        line.update_sections_time(&arena);
        line.add_departure(time(6, 30, 0));
        line.add_departure(time(15, 20, 0));
        line.add_departure(time(15, 30, 0));

        (arena, line)
    }

    #[test]
    fn next_time_at_or_after() {
        let (arena, line) = scheduled_line();
        let bc = SectionId(1);

        assert_eq!(
            line.next_time(bc, &arena, Some(time(15, 20, 0))),
            Some(time(15, 20, 30))
        );
        assert_eq!(
            line.next_time(bc, &arena, Some(time(15, 21, 0))),
            Some(time(15, 30, 30))
        );
    }

    #[test]
    fn next_time_wraps_to_next_day() {
        let (arena, line) = scheduled_line();

        assert_eq!(
            line.next_time(SectionId(1), &arena, Some(time(16, 0, 0))),
            Some(time(6, 30, 30))
        );
    }

    #[test]
    fn next_time_unset_cases() {
        let (arena, line) = scheduled_line();

        // No reference time.
        assert_eq!(line.next_time(SectionId(1), &arena, None), None);

        // No propagation at all.
        let unpropagated = line_over(&arena);
        assert_eq!(
            unpropagated.next_time(SectionId(1), &arena, Some(time(10, 0, 0))),
            None
        );

        // Propagated but no departures.
        let mut quiet = line_over(&arena);
        quiet.set_start("A", &arena).unwrap();
        quiet.update_sections_time(&arena);
        assert_eq!(quiet.next_time(SectionId(1), &arena, Some(time(10, 0, 0))), None);
    }

    #[test]
    fn departure_times_apply_offset_to_all() {
        let (arena, line) = scheduled_line();

        assert_eq!(
            line.departure_times(SectionId(1), &arena),
            vec![time(6, 30, 30), time(15, 20, 30), time(15, 30, 30)]
        );
        assert_eq!(
            line.departure_times(SectionId(0), &arena),
            vec![time(6, 30, 0), time(15, 20, 0), time(15, 30, 0)]
        );
    }

    #[test]
    fn reset_schedule_clears_derived_state() {
        let (arena, mut line) = scheduled_line();

        line.reset_schedule();

        assert_eq!(line.start(), None);
        assert_eq!(line.last(), None);
        assert_eq!(line.cumulative_secs(SectionId(0)), None);
        assert_eq!(line.departures().count(), 0);
        // The chain itself survives.
        assert_eq!(line.sections().len(), 2);
        let _ = arena;
    }
}
