use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// Settings of one fingerprint computation.
#[derive(Debug, Clone, PartialEq)]
pub struct FingerprintConfig {
    /// Where to persist the matrix, if anywhere.
    pub output_path: Option<PathBuf>,
    /// Requested parallelism; values `<= 1` run sequentially.
    pub n_tasks: i64,
    /// Whether the caller wants the matrix back in memory.
    pub return_array: bool,
}

#[derive(Default)]
pub struct FingerprintConfigBuilder {
    output_path: Option<PathBuf>,
    n_tasks: Option<i64>,
    return_array: Option<bool>,
}

impl FingerprintConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_path(mut self, path: PathBuf) -> Self {
        self.output_path = Some(path);
        self
    }
    pub fn n_tasks(mut self, n_tasks: i64) -> Self {
        self.n_tasks = Some(n_tasks);
        self
    }
    pub fn return_array(mut self, return_array: bool) -> Self {
        self.return_array = Some(return_array);
        self
    }

    pub fn build(self) -> Result<FingerprintConfig, ConfigError> {
        Ok(FingerprintConfig {
            output_path: self.output_path,
            n_tasks: self
                .n_tasks
                .ok_or(ConfigError::MissingParameter("n_tasks"))?,
            return_array: self
                .return_array
                .ok_or(ConfigError::MissingParameter("return_array"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_with_all_parameters() {
        let config = FingerprintConfigBuilder::new()
            .output_path(PathBuf::from("out.npz"))
            .n_tasks(4)
            .return_array(true)
            .build()
            .unwrap();

        assert_eq!(config.output_path, Some(PathBuf::from("out.npz")));
        assert_eq!(config.n_tasks, 4);
        assert!(config.return_array);
    }

    #[test]
    fn output_path_is_optional() {
        let config = FingerprintConfigBuilder::new()
            .n_tasks(0)
            .return_array(true)
            .build()
            .unwrap();
        assert_eq!(config.output_path, None);
    }

    #[test]
    fn missing_task_count_is_reported() {
        let result = FingerprintConfigBuilder::new().return_array(false).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("n_tasks")));
    }

    #[test]
    fn missing_return_flag_is_reported() {
        let result = FingerprintConfigBuilder::new().n_tasks(1).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("return_array")));
    }
}
