//! Process-wide logging for the server.
//!
//! Spans and events go through `tracing`; `log` records from the detection
//! crates are forwarded by `tracing-log`. The filter comes from `RUST_LOG`
//! and defaults to `info`.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(thiserror::Error, Debug)]
pub enum TelemetryError {
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
    #[error("failed to forward log records: {0}")]
    LogBridge(#[from] log::SetLoggerError),
}

pub fn init_telemetry(json: bool) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        let subscriber = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .flatten_event(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    tracing_log::LogTracer::init()?;
    Ok(())
}
