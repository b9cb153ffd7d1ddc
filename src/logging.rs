//! Logging init (stderr, `RUST_LOG`-driven) and an in-memory writer for
//! asserting on log output.

use anyhow::{Result, anyhow};
use std::io::{self, IsTerminal};
use std::sync::{Arc, Mutex, PoisonError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the process-wide subscriber writing human readable lines to stderr.
/// Fails if a global subscriber is already set.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}

/// Shared in-memory log sink.
#[derive(Debug, Clone, Default)]
pub struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl CaptureWriter {
    pub fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Subscriber recording debug level and above into the returned writer.
/// Scope it with `tracing::subscriber::with_default` or, for futures,
/// `tracing::instrument::WithSubscriber`.
pub fn capture_subscriber() -> (impl tracing::Subscriber + Send + Sync + 'static, CaptureWriter) {
    let writer = CaptureWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    (subscriber, writer)
}

/// Run `f` with a subscriber scoped to the current thread and return its
/// result together with everything logged at debug level or above.
pub fn capture<T>(f: impl FnOnce() -> T) -> (T, String) {
    let (subscriber, writer) = capture_subscriber();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, writer.contents())
}
