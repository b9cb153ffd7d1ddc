use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use ubuntu_image_index::cli::Cli;
use ubuntu_image_index::fetcher::HttpMetadataSource;
use ubuntu_image_index::writer::JsonFileSink;
use ubuntu_image_index::{logging, run};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = logging::init() {
        eprintln!("{err:#}");
    }

    info!("Starting ubuntu-image-index");
    let cli = Cli::parse();

    let source = match HttpMetadataSource::new() {
        Ok(source) => source,
        Err(err) => {
            error!("❌ Failed to build HTTP client: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli.config, &source, &JsonFileSink).await {
        Ok(summary) => {
            info!(
                "Done: {} images in {}",
                summary.images,
                summary.output_file.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => ExitCode::from(&err),
    }
}
