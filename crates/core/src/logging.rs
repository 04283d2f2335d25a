//! Logging and observability
//!
//! Structured logging via tracing-subscriber, with text or JSON formatting
//! selected at runtime. All log output goes to stderr so stdout stays
//! reserved for preview output and prompts.

use crate::errors::Result;
use std::{io, sync::Once};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the logging system with an optional format specification.
///
/// `format` accepts `"json"` for structured output; anything else (including
/// `None`) selects human-readable text. When `format` is `None` the
/// `POCKETROCKET_LOG_FORMAT` environment variable is consulted. Safe to call
/// more than once; subsequent calls are no-ops.
///
/// The filter level comes from `POCKETROCKET_LOG`, falling back to the
/// standard `RUST_LOG`, falling back to `info`.
pub fn init(format: Option<&str>) -> Result<()> {
    INIT.call_once(|| {
        let filter = create_env_filter();

        let env_format = std::env::var("POCKETROCKET_LOG_FORMAT").ok();
        let effective_format = format.or(env_format.as_deref()).unwrap_or("text");

        match effective_format {
            "json" => {
                tracing_subscriber::registry()
                    .with(
                        fmt::layer()
                            .json()
                            .with_target(true)
                            .with_writer(io::stderr),
                    )
                    .with(filter)
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(fmt::layer().with_target(true).with_writer(io::stderr))
                    .with(filter)
                    .init();
            }
        }

        tracing::debug!("Logging initialized with format: {}", effective_format);
    });

    Ok(())
}

/// Create an EnvFilter based on environment variables
fn create_env_filter() -> EnvFilter {
    if let Ok(spec) = std::env::var("POCKETROCKET_LOG") {
        EnvFilter::try_new(&spec).unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Check if logging has been initialized.
///
/// Primarily useful for tests that need to know whether the subscriber is
/// already installed.
pub fn is_initialized() -> bool {
    INIT.is_completed()
}
