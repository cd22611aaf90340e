mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_config, load_sites};
pub use models::AppConfig;
