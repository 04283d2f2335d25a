//! Error types and handling
//!
//! Domain-specific error enums for each component (resolver, locator,
//! lifecycle, provider) wrapped in the main [`PocketrocketError`] enum for
//! unified handling. The propagation policy is abort-upward: no component
//! retries, no partial-success reporting. A declined confirmation is modeled
//! as [`LifecycleError::Cancelled`]; it is a normal decline rather than a
//! bug, but it still fails the run so the exit code reflects that nothing
//! happened.

use thiserror::Error;

/// Resource resolution errors
#[derive(Error, Debug)]
pub enum ResolverError {
    /// Reuse was requested but the provider has nothing to offer
    #[error("no existing {kind} available to reuse")]
    NoCandidatesAvailable { kind: String },
}

/// Backend locator errors
#[derive(Error, Debug)]
pub enum LocatorError {
    /// Malformed locator input
    #[error("invalid backend locator: {reason}")]
    Invalid { reason: String },
}

/// Stack lifecycle errors
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Operator entered something other than launch/nuke
    #[error("not a valid action: {input:?}")]
    InvalidAction { input: String },

    /// Operator declined the confirmation gate
    #[error("process cancelled")]
    Cancelled,

    /// Dry run failed
    #[error("stack dry run failed: {message}")]
    Preview { message: String },

    /// Apply failed
    #[error("failed to update stack: {message}")]
    Apply { message: String },

    /// Destroy failed
    #[error("failed to destroy stack: {message}")]
    Destroy { message: String },
}

/// Cloud provider / engine plumbing errors
#[derive(Error, Debug)]
pub enum ProviderError {
    /// A collaborator call failed; `step` names the operation
    #[error("{step} failed: {message}")]
    Failure { step: String, message: String },
}

impl ProviderError {
    /// Wrap a collaborator failure with the step that produced it
    pub fn failure(step: impl Into<String>, message: impl std::fmt::Display) -> Self {
        ProviderError::Failure {
            step: step.into(),
            message: message.to_string(),
        }
    }
}

/// Main error enum wrapping all domain-specific errors
#[derive(Error, Debug)]
pub enum PocketrocketError {
    /// Resource resolution errors
    #[error("resolver error: {0}")]
    Resolver(#[from] ResolverError),

    /// Backend locator errors
    #[error("locator error: {0}")]
    Locator(#[from] LocatorError),

    /// Stack lifecycle errors
    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// Cloud provider / engine plumbing errors
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Interactive surface errors (terminal gone, prompt aborted)
    #[error("prompt error: {message}")]
    Prompt { message: String },

    /// I/O passthrough
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PocketrocketError {
    /// True when the run ended because the operator declined a gate
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            PocketrocketError::Lifecycle(LifecycleError::Cancelled)
        )
    }
}

/// Convenience type alias for Results with PocketrocketError
pub type Result<T> = std::result::Result<T, PocketrocketError>;
