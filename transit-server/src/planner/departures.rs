//! Next-departures board for a station.

use crate::domain::{LineId, Time};
use crate::plan::Plan;

/// Maximum number of rows on a departure board.
pub const DEPARTURE_BOARD_LIMIT: usize = 20;

/// One departure board row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub line: LineId,
    /// Arrival station of the line's last propagated section.
    pub terminus: String,
    pub time: Time,
}

/// Up to [`DEPARTURE_BOARD_LIMIT`] departures from `station_name` at or
/// after `min_time`.
///
/// Rows are ordered by time starting at `min_time`; when today's remaining
/// departures do not fill the board, earlier times wrap around as the next
/// day's.
pub fn next_departures(plan: &Plan, station_name: &str, min_time: Time) -> Vec<Departure> {
    let mut today: Vec<Departure> = Vec::new();
    let mut tomorrow: Vec<Departure> = Vec::new();

    for line in plan.lines() {
        let terminus = line
            .last()
            .map(|id| plan.section(id).arrival().name().to_string());

        for &id in line.sections() {
            let section = plan.section(id);
            if section.start().name() != station_name {
                continue;
            }

            let terminus = terminus
                .clone()
                .unwrap_or_else(|| section.arrival().name().to_string());

            for time in line.departure_times(id, plan.sections()) {
                let row = Departure {
                    line: line.id().clone(),
                    terminus: terminus.clone(),
                    time,
                };
                if time >= min_time {
                    today.push(row);
                } else {
                    tomorrow.push(row);
                }
            }
        }
    }

    let by_time_then_line = |a: &Departure, b: &Departure| {
        a.time.cmp(&b.time).then_with(|| a.line.cmp(&b.line))
    };
    today.sort_by(by_time_then_line);
    tomorrow.sort_by(by_time_then_line);

    today.extend(tomorrow);
    today.truncate(DEPARTURE_BOARD_LIMIT);
    today
}
