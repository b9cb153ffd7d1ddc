use std::path::PathBuf;

use clap::Parser;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "./etc/config.toml";

/// Fetch and save Ubuntu cloud images metadata.
#[derive(Debug, Parser)]
#[command(name = "ubuntu-image-index", version)]
#[command(about = "Fetch and save Ubuntu cloud images metadata.", long_about = None)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}
