//! Station vertices of the routing graph.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A named stop at a fixed position.
///
/// Coordinates are planar metres (the network files are pre-projected).
/// Identity is structural over all three fields: two stations sharing a
/// name but not a position are distinct vertices, which is what lets a
/// virtual coordinate endpoint coexist with the real network.
///
/// # Examples
///
/// ```
/// use transit_server::domain::Station;
///
/// let a = Station::new("Gare du Nord", 0.0, 0.0);
/// let b = Station::new("Gare du Nord", 3.0, 4.0);
/// assert_ne!(a, b);
/// assert_eq!(a.distance_to(&b), 5.0);
/// ```
#[derive(Debug, Clone)]
pub struct Station {
    name: String,
    x: f64,
    y: f64,
}

impl Station {
    /// Create a station at the given planar position.
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }

    /// Returns the station name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the x coordinate in metres.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Returns the y coordinate in metres.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance to another station, in metres.
    pub fn distance_to(&self, other: &Station) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.x.to_bits() == other.x.to_bits()
            && self.y.to_bits() == other.y.to_bits()
    }
}

impl Eq for Station {}

impl Hash for Station {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
