//! Keep a local JSON index of the newest Ubuntu cloud disk images.
//!
//! A run loads a TOML configuration, fetches one Simplestreams catalogue,
//! keeps the latest `disk1.img` build of every product for the configured
//! architecture and writes the result as indented JSON.

pub mod cli;
pub mod cloud;
pub mod config;
pub mod fetcher;
pub mod logging;
pub mod os_error;
pub mod pipeline;
pub mod writer;

pub use pipeline::{RunError, RunSummary, run};
