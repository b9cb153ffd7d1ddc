//! Configuration loading and validation.
//!
//! The file is read as an untyped TOML table first so that structural checks
//! can report every missing section at once; [`Settings`] then resolves the
//! typed values the pipeline needs.

mod settings;

pub use settings::Settings;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::error;

use crate::os_error;

/// Parsed configuration document, kept verbatim.
pub type Config = toml::Table;

/// Accepted names of the section holding the catalogue URLs. The first one is
/// the current name, the second is still accepted for older files.
pub const URL_GROUPS: &[&str] = &["image_urls", "urls"];

/// Section holding output paths.
pub const FILES_GROUP: &str = "files";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("Permission denied to read configuration file: {}", path.display())]
    PermissionDenied { path: PathBuf },
    #[error("Failed to decode TOML file: {} ({source})", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to open configuration file: {} - {code}: {message}", path.display())]
    Io {
        path: PathBuf,
        code: String,
        message: String,
    },
    #[error("Missing required section(s) in configuration file: {}", missing.join(", "))]
    Validation { missing: Vec<String> },
    #[error("Missing configuration key: {key}")]
    MissingKey { key: String },
    #[error("Configuration key {key} must be {expected}")]
    InvalidValue { key: String, expected: &'static str },
    #[error("Invalid URL in {key}: {value} ({source})")]
    InvalidUrl {
        key: String,
        value: String,
        #[source]
        source: url::ParseError,
    },
}

impl ConfigError {
    /// Whether the file itself could not be obtained or parsed, as opposed to
    /// its content being incomplete.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            ConfigError::NotFound { .. }
                | ConfigError::PermissionDenied { .. }
                | ConfigError::Parse { .. }
                | ConfigError::Io { .. }
        )
    }
}

/// Load the TOML document at `path`. The file is only opened once it is known
/// to exist. Failures are logged before being returned.
pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let result = read_config(path);
    if let Err(err) = &result {
        error!("❌ {err}");
    }
    result
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let io_error = |err: std::io::Error| match err.kind() {
        ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => ConfigError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => {
            let (code, message) = os_error::describe(&err);
            ConfigError::Io {
                path: path.to_path_buf(),
                code,
                message,
            }
        }
    };

    fs::metadata(path).map_err(io_error)?;
    let text = fs::read_to_string(path).map_err(io_error)?;

    toml::from_str::<Config>(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Required sections absent from `config`, in a stable order.
pub fn missing_groups(config: &Config) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if !URL_GROUPS.iter().any(|group| config.contains_key(*group)) {
        missing.push(URL_GROUPS[0]);
    }
    if !config.contains_key(FILES_GROUP) {
        missing.push(FILES_GROUP);
    }
    missing
}

/// Check that every required section is present, logging each missing one.
pub fn validate(config: &Config) -> bool {
    let missing = missing_groups(config);
    for group in &missing {
        error!("❌ Missing required section in configuration file: {group}");
    }
    missing.is_empty()
}
