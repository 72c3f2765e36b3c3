//! rytmdl - Download songs and playlists as tagged audio files.
//!
//! Each URL is classified as a single track or an album. Tracks are
//! downloaded with yt-dlp, get the page's cover image embedded, and are
//! tagged with metadata the user picks from an iTunes catalog search.
//! Albums run every item through the same pipeline.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod cover;
pub mod error;
pub mod locale;
pub mod logging;
pub mod media;
pub mod pipeline;
pub mod select;
pub mod tags;
#[cfg(test)]
pub mod test_utils;
pub mod text;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // The log directory is the only startup failure that ends the process
    let log_dir = logging::log_dir();
    if let Err(e) = logging::init(&log_dir) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    tracing::info!("rytmdl {} started", env!("CARGO_PKG_VERSION"));

    cli::run(&args)
}
