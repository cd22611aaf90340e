use crate::core::models::site::{BindingSite, GeometryError};
use nalgebra::{Point3, Vector3};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteFileError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid geometry for site #{index}: {source}")]
    Geometry {
        index: usize,
        source: GeometryError,
    },
}

/// One `[[site]]` table of a site-definition file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SiteDefinition {
    pub center: [f64; 3],
    pub radius: f64,
    #[serde(default = "default_spacing")]
    pub spacing: [f64; 3],
}

fn default_spacing() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

impl SiteDefinition {
    pub fn to_binding_site(&self) -> Result<BindingSite, GeometryError> {
        BindingSite::new(
            Point3::from(self.center),
            self.radius,
            Vector3::from(self.spacing),
        )
    }
}

/// The `[[site]]` list of a TOML file, in file order.
///
/// Other top-level tables are ignored here so front ends can keep their own
/// settings in the same file.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct SiteFile {
    #[serde(default, rename = "site")]
    pub sites: Vec<SiteDefinition>,
}

impl SiteFile {
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, SiteFileError> {
        toml::from_str(content).map_err(|e| SiteFileError::Toml {
            path: origin.to_string(),
            source: e,
        })
    }

    pub fn load(path: &Path) -> Result<Self, SiteFileError> {
        let content = std::fs::read_to_string(path).map_err(|e| SiteFileError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content, &path.to_string_lossy())
    }

    /// Validates every definition, reporting the first invalid one by position.
    pub fn binding_sites(&self) -> Result<Vec<BindingSite>, SiteFileError> {
        self.sites
            .iter()
            .enumerate()
            .map(|(index, def)| {
                def.to_binding_site()
                    .map_err(|source| SiteFileError::Geometry { index, source })
            })
            .collect()
    }
}
