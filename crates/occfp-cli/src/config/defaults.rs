use occupancy_fingerprinter::core::models::topology::Topology;

pub struct DefaultsConfig {
    pub tasks: i64,
    pub default_radius: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            tasks: std::thread::available_parallelism().map_or(1, |n| n.get() as i64),
            default_radius: Topology::DEFAULT_RADIUS,
        }
    }
}
