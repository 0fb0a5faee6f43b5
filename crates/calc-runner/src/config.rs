//! Runner configuration
//!
//! Settings are layered, later sources overriding earlier ones:
//! 1. Built-in defaults
//! 2. `calc-runner.toml` in the working directory, or the file given with `--config`
//! 3. Environment variables (`CALC_RUNNER_*`, `NO_COLOR`)
//! 4. CLI flags (applied by the caller)

use crate::suites::DEFAULT_SUITE;
use crate::testing::OutputFormat;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "calc-runner.toml";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// On-disk configuration (`calc-runner.toml`)
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub runner: Option<RunnerSection>,
    pub output: Option<OutputSection>,
}

/// `[runner]` table
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunnerSection {
    /// Suite to run when none is given on the command line
    pub suite: Option<String>,
    /// Run tests on the rayon pool
    pub parallel: Option<bool>,
}

/// `[output]` table
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    pub format: Option<OutputFormat>,
    pub color: Option<bool>,
}

impl ConfigFile {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })
    }
}

/// Effective runner configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Suite to run
    pub suite: String,
    /// Output format
    pub format: OutputFormat,
    /// Run tests in parallel
    pub parallel: bool,
    /// Disable colored output
    pub no_color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            suite: DEFAULT_SUITE.to_string(),
            format: OutputFormat::Plain,
            parallel: false,
            no_color: false,
        }
    }
}

impl Config {
    /// Load configuration from a file and the process environment.
    ///
    /// An explicit `config_path` must exist. Otherwise `calc-runner.toml` in
    /// `working_dir` is used when present.
    pub fn load(config_path: Option<&Path>, working_dir: &Path) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        let file = match config_path {
            Some(path) => Some(ConfigFile::load_from_file(path)?),
            None => {
                let candidate = working_dir.join(CONFIG_FILE_NAME);
                if candidate.exists() {
                    Some(ConfigFile::load_from_file(&candidate)?)
                } else {
                    None
                }
            }
        };

        if let Some(file) = file {
            config.apply_file(&file);
        }

        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Apply values present in a configuration file
    pub fn apply_file(&mut self, file: &ConfigFile) {
        if let Some(runner) = &file.runner {
            if let Some(suite) = &runner.suite {
                self.suite = suite.clone();
            }
            if let Some(parallel) = runner.parallel {
                self.parallel = parallel;
            }
        }

        if let Some(output) = &file.output {
            if let Some(format) = output.format {
                self.format = format;
            }
            if let Some(color) = output.color {
                self.no_color = !color;
            }
        }
    }

    /// Apply environment overrides, reading variables through `lookup`
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(suite) = lookup("CALC_RUNNER_SUITE") {
            if !suite.is_empty() {
                self.suite = suite;
            }
        }

        if let Some(format) = lookup("CALC_RUNNER_FORMAT") {
            self.format = format.parse().map_err(|reason| ConfigError::InvalidValue {
                field: "CALC_RUNNER_FORMAT".to_string(),
                reason,
            })?;
        }

        if let Some(parallel) = lookup("CALC_RUNNER_PARALLEL") {
            self.parallel = parse_flag("CALC_RUNNER_PARALLEL", &parallel)?;
        }

        if lookup("NO_COLOR").is_some() || lookup("CALC_RUNNER_NO_COLOR").is_some() {
            self.no_color = true;
        }

        Ok(())
    }
}

fn parse_flag(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("expected a boolean, got '{}'", value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.suite, "MathApplicationTesterWithInjectMocks");
        assert_eq!(config.format, OutputFormat::Plain);
        assert!(!config.parallel);
        assert!(!config.no_color);
    }

    #[test]
    fn test_parse_config_file() {
        let file: ConfigFile = toml::from_str(
            r#"
[runner]
suite = "MathApplicationTesterWithMock"
parallel = true

[output]
format = "json"
color = false
"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(&file);

        assert_eq!(
            config,
            Config {
                suite: "MathApplicationTesterWithMock".to_string(),
                format: OutputFormat::Json,
                parallel: true,
                no_color: true,
            }
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ConfigFile, _> = toml::from_str("[runner]\nretries = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(env_of(&[
                ("CALC_RUNNER_SUITE", "MathApplicationTesterWithCalculator"),
                ("CALC_RUNNER_FORMAT", "verbose"),
                ("CALC_RUNNER_PARALLEL", "yes"),
                ("NO_COLOR", "1"),
            ]))
            .unwrap();

        assert_eq!(config.suite, "MathApplicationTesterWithCalculator");
        assert_eq!(config.format, OutputFormat::Verbose);
        assert!(config.parallel);
        assert!(config.no_color);
    }

    #[test]
    fn test_env_invalid_values() {
        let mut config = Config::default();
        let err = config
            .apply_env(env_of(&[("CALC_RUNNER_FORMAT", "xml")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "CALC_RUNNER_FORMAT"));

        let err = config
            .apply_env(env_of(&[("CALC_RUNNER_PARALLEL", "sometimes")]))
            .unwrap_err();
        assert!(err.to_string().contains("expected a boolean"));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");

        let err = Config::load(Some(&missing), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_invalid_toml_reports_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[runner\nsuite = ").unwrap();

        let err = ConfigFile::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParseError { .. }));
    }

    #[test]
    #[serial]
    fn test_load_from_working_dir_and_env() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[runner]\nsuite = \"FromFile\"\n",
        )
        .unwrap();

        env::remove_var("CALC_RUNNER_SUITE");
        let config = Config::load(None, dir.path()).unwrap();
        assert_eq!(config.suite, "FromFile");

        env::set_var("CALC_RUNNER_SUITE", "FromEnv");
        let config = Config::load(None, dir.path()).unwrap();
        assert_eq!(config.suite, "FromEnv");
        env::remove_var("CALC_RUNNER_SUITE");
    }
}
