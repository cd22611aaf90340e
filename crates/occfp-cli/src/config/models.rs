use occupancy_fingerprinter::core::models::site::BindingSite;
use occupancy_fingerprinter::engine::config as core_config;
use std::path::PathBuf;

pub struct AppConfig {
    pub trajectory_path: PathBuf,
    pub summary_path: Option<PathBuf>,
    pub sites: Vec<BindingSite>,
    pub default_radius: f64,
    pub core_config: core_config::FingerprintConfig,
}
