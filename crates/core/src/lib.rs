//! Core library for the pocketrocket bootstrap CLI
//!
//! This crate contains the bootstrap decision engine and the stack lifecycle
//! state machine: resource resolution (reuse vs create), backend locator
//! building, the preview/confirm/execute gate, and the orchestration that
//! ties them together. The cloud provider, the IaC engine, and the
//! interactive surface are collaborators behind traits, each with a
//! CLI-backed implementation and a mock.

pub mod bootstrap;
pub mod engine;
pub mod errors;
pub mod lifecycle;
pub mod locator;
pub mod logging;
pub mod prompt;
pub mod provider;
pub mod resolver;
pub mod workspace;

/// Get the version of the core library
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let version = version();
        assert!(!version.is_empty());
        assert!(version.contains('.'));
    }
}
