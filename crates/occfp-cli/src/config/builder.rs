use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::ComputeArgs;
use crate::error::{CliError, Result};
use occupancy_fingerprinter::core::io::sites::SiteFile;
use occupancy_fingerprinter::core::models::site::BindingSite;
use occupancy_fingerprinter::engine::config as core_config;
use std::path::Path;
use tracing::warn;

pub fn build_config(args: &ComputeArgs, threads: Option<usize>) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = FileConfig::from_file(&args.sites)?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let fingerprint_file = file_config.fingerprint.take().unwrap_or_default();
    let tasks = args
        .tasks
        .or(fingerprint_file.tasks)
        .or(threads.map(|n| n as i64))
        .unwrap_or(defaults.tasks);
    let default_radius = args
        .default_radius
        .or(fingerprint_file.default_radius)
        .unwrap_or(defaults.default_radius);
    if !default_radius.is_finite() || default_radius <= 0.0 {
        return Err(CliError::Config(format!(
            "`default-radius` must be a positive number of Angstroms (got {})",
            default_radius
        )));
    }

    let sites = to_binding_sites(&file_config, &args.sites)?;
    if sites.is_empty() {
        warn!("Sites file {:?} defines no [[site]] entries.", &args.sites);
    }

    let core_config = core_config::FingerprintConfigBuilder::new()
        .output_path(args.output.clone())
        .n_tasks(tasks)
        .return_array(args.summary.is_some())
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        trajectory_path: args.trajectory.clone(),
        summary_path: args.summary.clone(),
        sites,
        default_radius,
        core_config,
    })
}

/// Loads the binding sites of a sites file, in file order.
///
/// Only the `[[site]]` tables are read; settings sections are ignored.
pub fn load_sites(path: &Path) -> Result<Vec<BindingSite>> {
    let file = SiteFile::load(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    file.binding_sites()
        .map_err(|e| CliError::Config(format!("{:?}: {}", path, e)))
}

fn to_binding_sites(config: &FileConfig, path: &Path) -> Result<Vec<BindingSite>> {
    config
        .sites
        .iter()
        .enumerate()
        .map(|(index, def)| {
            def.to_binding_site().map_err(|e| {
                CliError::Config(format!(
                    "Site #{} in {:?} is invalid: {}",
                    index,
                    path,
                    e
                ))
            })
        })
        .collect()
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "fingerprint.tasks" => {
                config
                    .fingerprint
                    .get_or_insert_with(Default::default)
                    .tasks = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                })?);
            }
            "fingerprint.default-radius" => {
                config
                    .fingerprint
                    .get_or_insert_with(Default::default)
                    .default_radius = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
                })?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
