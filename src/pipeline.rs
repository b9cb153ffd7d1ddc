//! The whole run: configuration, one fetch, extraction, one write.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{debug, info};

use crate::cloud::Catalog;
use crate::config::{self, ConfigError, Settings};
use crate::fetcher::{FetchError, MetadataSource};
use crate::writer::{MetadataSink, WriteError};

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

impl RunError {
    /// Process exit status for this failure class.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Config(err) if err.is_load_failure() => 2,
            RunError::Config(_) => 3,
            RunError::Fetch(_) => 4,
            RunError::Write(_) => 5,
        }
    }
}

impl From<&RunError> for ExitCode {
    fn from(err: &RunError) -> Self {
        ExitCode::from(err.exit_code())
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_file: PathBuf,
    pub images: usize,
}

/// Execute the pipeline described by the configuration at `config_path`.
///
/// Stages run strictly in order and stop at the first failure, so nothing is
/// fetched for an invalid configuration and nothing is written unless the
/// catalogue was fetched and parsed.
pub async fn run<S, W>(config_path: &Path, source: &S, sink: &W) -> Result<RunSummary, RunError>
where
    S: MetadataSource + ?Sized,
    W: MetadataSink + ?Sized,
{
    let config = config::load(config_path)?;
    if !config::validate(&config) {
        let missing = config::missing_groups(&config)
            .into_iter()
            .map(str::to_string)
            .collect();
        return Err(ConfigError::Validation { missing }.into());
    }

    let settings = Settings::from_config(&config).inspect_err(|err| tracing::error!("❌ {err}"))?;
    debug!("resolved settings: {settings:?}");

    let document = source.fetch(settings.metadata_url()).await?;
    let images = Catalog::new(&document).extract(&settings.extract_options());

    sink.save(&images, settings.output_file())?;

    info!(
        "✅ Wrote {} {} images to {}",
        images.len(),
        settings.arch(),
        settings.output_file().display()
    );

    Ok(RunSummary {
        output_file: settings.output_file().to_path_buf(),
        images: images.len(),
    })
}
