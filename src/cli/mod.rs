//! Command-line interface for rytmdl.
//!
//! Every positional argument is a URL to download; flags override the
//! values from the config file for this run.

mod commands;

pub use commands::{Cli, run};
