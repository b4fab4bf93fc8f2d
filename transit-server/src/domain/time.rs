//! Clock values for timetabled services.
//!
//! The network only models the time of day: a journey that runs past
//! 23:59:59 wraps back to 00:00:00 and the caller reads the result as
//! "tomorrow". This module provides a seconds-resolution wall-clock type
//! with exactly that wrapping arithmetic.

use std::fmt;

use chrono::{Duration, NaiveTime, Timelike};

/// Error returned when constructing or parsing an invalid time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct InvalidTime {
    reason: &'static str,
}

impl InvalidTime {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A wall-clock time of day with seconds resolution.
///
/// Ordering is the plain lexicographic order on (hour, minute, second);
/// there is no date component. Duration arithmetic wraps past midnight
/// and discards the overflowed days.
///
/// # Examples
///
/// ```
/// use transit_server::domain::Time;
///
/// let t = Time::new(23, 59, 30).unwrap();
/// assert_eq!(t.add_seconds(45).to_string(), "00:00:15");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Time(NaiveTime);

impl Time {
    /// Create a time from hour, minute and second components.
    ///
    /// Fails when any component is out of range (hour > 23, minute or
    /// second > 59).
    pub fn new(hour: u32, minute: u32, second: u32) -> Result<Self, InvalidTime> {
        if hour > 23 {
            return Err(InvalidTime::new("hour must be 0-23"));
        }
        if minute > 59 {
            return Err(InvalidTime::new("minute must be 0-59"));
        }
        if second > 59 {
            return Err(InvalidTime::new("second must be 0-59"));
        }
        let inner = NaiveTime::from_hms_opt(hour, minute, second)
            .ok_or_else(|| InvalidTime::new("invalid time"))?;
        Ok(Self(inner))
    }

    /// Parse a time from "HH:MM:SS" format.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::Time;
    ///
    /// assert!(Time::parse("06:30:00").is_ok());
    /// assert!(Time::parse("24:00:00").is_err());
    /// assert!(Time::parse("6:30:00").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, InvalidTime> {
        // Must be exactly 8 characters: HH:MM:SS
        if s.len() != 8 {
            return Err(InvalidTime::new("expected HH:MM:SS format"));
        }

        let bytes = s.as_bytes();
        if bytes[2] != b':' || bytes[5] != b':' {
            return Err(InvalidTime::new("expected colons at positions 2 and 5"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| InvalidTime::new("invalid hour digits"))?;
        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| InvalidTime::new("invalid minute digits"))?;
        let second = parse_two_digits(&bytes[6..8])
            .ok_or_else(|| InvalidTime::new("invalid second digits"))?;

        Self::new(hour, minute, second)
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Returns the second (0-59).
    pub fn second(&self) -> u32 {
        self.0.second()
    }

    /// Add a duration in seconds, wrapping past midnight.
    ///
    /// Whole days of overflow are discarded; only the time of day remains.
    ///
    /// # Examples
    ///
    /// ```
    /// use transit_server::domain::Time;
    ///
    /// let t = Time::new(0, 59, 59).unwrap();
    /// assert_eq!(t.add_seconds(3601), Time::new(2, 0, 0).unwrap());
    /// ```
    pub fn add_seconds(&self, seconds: u64) -> Self {
        let (wrapped, _days) = self
            .0
            .overflowing_add_signed(Duration::seconds((seconds % 86_400) as i64));
        Self(wrapped)
    }

    /// Seconds from `self` forward to `other`, wrapping past midnight.
    ///
    /// The result is always in `0..86_400`: when `other` is earlier in the
    /// day than `self`, it is read as tomorrow.
    pub fn seconds_until(&self, other: Self) -> u64 {
        let diff = other.0.signed_duration_since(self.0).num_seconds();
        diff.rem_euclid(86_400) as u64
    }
}

impl fmt::Debug for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time({self})")
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}
