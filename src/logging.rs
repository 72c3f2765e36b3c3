//! Append-only file logging.
//!
//! Every run appends to `<data dir>/rytmdl/logs/main.log`, one line per
//! event: `YYYY-MM-DD HH:MM:SS - LEVEL - message`. The level filter
//! honours `RUST_LOG` and defaults to debug output for this crate.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, prelude::*};

use crate::error::{Result, ResultExt};

const LOG_FILE_NAME: &str = "main.log";
const DEFAULT_DIRECTIVE: &str = "rytmdl=debug";

/// Directory holding the log file
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("rytmdl"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("logs")
}

/// `time - LEVEL - message` line format
struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        write!(writer, "{} - {} - ", now, event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn file_subscriber(file: File, filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .event_format(LineFormat)
            .with_ansi(false)
            .with_writer(Mutex::new(file)),
    )
}

fn open_log(dir: &Path) -> Result<File> {
    std::fs::create_dir_all(dir)
        .with_context(format!("creating log directory {}", dir.display()))?;

    let path = dir.join(LOG_FILE_NAME);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(format!("opening log file {}", path.display()))
}

/// Install the global subscriber writing to `dir`.
///
/// Fails when the directory cannot be created or the file cannot be opened;
/// the caller treats that as fatal.
pub fn init(dir: &Path) -> Result<()> {
    let file = open_log(dir)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    file_subscriber(file, filter)
        .try_init()
        .map_err(std::io::Error::other)
        .with_context("installing log subscriber")
}
