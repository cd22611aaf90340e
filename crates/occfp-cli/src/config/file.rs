use crate::error::{CliError, Result};
use occupancy_fingerprinter::core::io::sites::SiteDefinition;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileFingerprintConfig {
    pub tasks: Option<i64>,
    pub default_radius: Option<f64>,
}

/// A sites file: optional `[fingerprint]` settings plus the `[[site]]` list.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub fingerprint: Option<FileFingerprintConfig>,
    #[serde(default, rename = "site")]
    pub sites: Vec<SiteDefinition>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading sites file from {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_settings_and_sites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sites.toml");
        fs::write(
            &path,
            r#"
            [fingerprint]
            tasks = 4
            default-radius = 1.6

            [[site]]
            center = [58.0, 73.0, 27.0]
            radius = 3.0
            spacing = [1.0, 1.0, 1.0]
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        let fingerprint = config.fingerprint.unwrap();
        assert_eq!(fingerprint.tasks, Some(4));
        assert_eq!(fingerprint.default_radius, Some(1.6));
        assert_eq!(config.sites.len(), 1);
        assert_eq!(config.sites[0].radius, 3.0);
    }

    #[test]
    fn unknown_sections_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sites.toml");
        fs::write(&path, "[optimization]\nmax-iterations = 3\n").unwrap();

        assert!(matches!(
            FileConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn snake_case_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sites.toml");
        fs::write(&path, "[fingerprint]\ndefault_radius = 1.6\n").unwrap();

        assert!(FileConfig::from_file(&path).is_err());
    }
}
