//! Domain types for the transit journey planner.
//!
//! The core routing graph model: clock values, stations, line-tagged
//! sections and lines with their timetables. All types enforce their
//! invariants at construction time, so code that receives these types can
//! trust their validity.

mod line;
mod section;
mod station;
mod time;

pub use line::{DWELL_SECONDS, InvalidLineId, Line, LineError, LineId};
pub use section::{Section, SectionId};
pub use station::Station;
pub use time::{InvalidTime, Time};
