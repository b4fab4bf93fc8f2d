//! Search configuration for the routing engine.

/// Configuration parameters for route search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Multiplier applied to the raw weight of walking edges (> 1).
    ///
    /// The raw weight is metres when distance-optimising and seconds when
    /// time-optimising; the same unitless factor disfavours walking in both
    /// modes.
    pub walk_penalty: f64,

    /// Maximum distance (metres) for a walking transfer between stations.
    /// Walks longer than this are never synthesized.
    pub max_foot_distance_m: f64,

    /// Assumed pedestrian speed (metres per second).
    pub walk_speed_m_s: f64,

    /// Radius (metres) within which a raw coordinate endpoint is connected
    /// to real stations.
    pub virtual_endpoint_radius_m: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            walk_penalty: 1.8,
            max_foot_distance_m: 500.0,
            walk_speed_m_s: 1.4,
            virtual_endpoint_radius_m: 1000.0,
        }
    }
}
