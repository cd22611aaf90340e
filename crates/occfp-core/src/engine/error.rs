use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::store::StoreError;
use crate::core::models::site::GeometryError;
use crate::core::trajectory::TrajectoryError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid binding-site geometry: {0}")]
    InvalidGeometry(#[from] GeometryError),

    #[error("Failed to read trajectory frame {frame}: {source}")]
    TrajectoryRead {
        frame: usize,
        #[source]
        source: TrajectoryError,
    },

    #[error("Radius table has {n_radii} entries but the frame has {n_atoms} atoms")]
    RadiiMismatch { n_atoms: usize, n_radii: usize },

    #[error("Fingerprint store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal logic error: {0}")]
    Internal(String),
}
