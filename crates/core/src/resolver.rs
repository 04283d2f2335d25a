//! Resource resolution
//!
//! Decides "reuse existing" vs "create new" for each backend resource the
//! bootstrap needs (storage location, encryption key) and collects exactly
//! the parameters the chosen path requires. Resolution is side-effect-free:
//! the orchestrator owns the provider calls (listing candidates beforehand,
//! creating resources afterwards), so this module stays independently
//! testable with a scripted prompt.

use crate::errors::{ResolverError, Result};
use crate::prompt::Prompt;
use tracing::debug;

/// Baseline region used when the operator leaves the location hint blank
pub const DEFAULT_LOCATION_HINT: &str = "eu-central-1";

/// Kinds of backend resources the bootstrap resolves.
///
/// The per-kind knowledge (prompt wording, whether a location hint is
/// needed) lives here so adding a kind does not grow branching elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Storage location for stack state (an S3 bucket)
    Storage,
    /// Encryption key protecting sensitive stack state
    Key,
}

impl ResourceKind {
    /// Human label used in prompts and errors
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Storage => "s3 bucket",
            ResourceKind::Key => "secret",
        }
    }

    /// Whether creating this kind needs a location hint
    pub fn needs_location_hint(&self) -> bool {
        matches!(self, ResourceKind::Storage)
    }
}

/// An existing resource the operator may reuse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Provider identifier (bucket name, secret ARN)
    pub identifier: String,
}

impl Candidate {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

/// Caller intent for one resource, gathered before resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveIntent {
    /// Select among existing candidates
    Reuse,
    /// Collect creation parameters
    Create,
}

/// Outcome of resolving one resource. Consumed immediately, not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChoice {
    /// Reuse the existing resource with this identifier
    Reuse { identifier: String },
    /// Create a new resource; the provider is authoritative on naming, so
    /// the name passes through unvalidated (even empty)
    CreateNew {
        name: String,
        location_hint: Option<String>,
    },
}

/// Resolve one resource kind to a choice.
///
/// On the reuse path `candidates` must be non-empty; exactly one choice is
/// returned, drawn from the sequence (first match wins on duplicate
/// identifiers). On the creation path only the parameters the kind requires
/// are collected; no provider call happens here.
pub fn resolve(
    kind: ResourceKind,
    intent: ResolveIntent,
    candidates: &[Candidate],
    prompt: &mut dyn Prompt,
) -> Result<ResourceChoice> {
    match intent {
        ResolveIntent::Reuse => {
            if candidates.is_empty() {
                return Err(ResolverError::NoCandidatesAvailable {
                    kind: kind.label().to_string(),
                }
                .into());
            }
            let identifiers: Vec<String> = candidates
                .iter()
                .map(|candidate| candidate.identifier.clone())
                .collect();
            let index = prompt.select(&format!("Select {}", kind.label()), &identifiers)?;
            let identifier = identifiers[index].clone();
            debug!(kind = kind.label(), %identifier, "reusing existing resource");
            Ok(ResourceChoice::Reuse { identifier })
        }
        ResolveIntent::Create => {
            let name = prompt.input(&format!("Enter the {} name", kind.label()), None)?;
            let location_hint = if kind.needs_location_hint() {
                Some(prompt.input(
                    &format!("Enter the {} region", kind.label()),
                    Some(DEFAULT_LOCATION_HINT),
                )?)
            } else {
                None
            };
            debug!(kind = kind.label(), %name, "collected creation parameters");
            Ok(ResourceChoice::CreateNew {
                name,
                location_hint,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{PocketrocketError, ResolverError};
    use crate::prompt::mock::ScriptedPrompt;

    fn candidates(ids: &[&str]) -> Vec<Candidate> {
        ids.iter().copied().map(Candidate::new).collect()
    }

    #[test]
    fn test_reuse_returns_exactly_one_choice_from_sequence() {
        let pool = candidates(&["alpha", "beta", "gamma"]);
        let mut prompt = ScriptedPrompt::new(["beta"]);
        let choice =
            resolve(ResourceKind::Storage, ResolveIntent::Reuse, &pool, &mut prompt).unwrap();
        assert_eq!(
            choice,
            ResourceChoice::Reuse {
                identifier: "beta".to_string()
            }
        );
    }

    #[test]
    fn test_reuse_with_empty_candidates_fails() {
        let mut prompt = ScriptedPrompt::new(Vec::<String>::new());
        let err =
            resolve(ResourceKind::Key, ResolveIntent::Reuse, &[], &mut prompt).unwrap_err();
        assert!(matches!(
            err,
            PocketrocketError::Resolver(ResolverError::NoCandidatesAvailable { .. })
        ));
        // No prompt was consumed: failing fast leaves no side effect.
        assert_eq!(prompt.remaining(), 0);
        assert!(prompt.output().is_empty());
    }

    #[test]
    fn test_reuse_duplicate_identifiers_first_match_wins() {
        let pool = candidates(&["dup", "dup"]);
        let mut prompt = ScriptedPrompt::new(["dup"]);
        let choice =
            resolve(ResourceKind::Storage, ResolveIntent::Reuse, &pool, &mut prompt).unwrap();
        assert_eq!(
            choice,
            ResourceChoice::Reuse {
                identifier: "dup".to_string()
            }
        );
    }

    #[test]
    fn test_create_storage_collects_name_and_region() {
        let mut prompt = ScriptedPrompt::new(["state-bucket", "us-east-1"]);
        let choice =
            resolve(ResourceKind::Storage, ResolveIntent::Create, &[], &mut prompt).unwrap();
        assert_eq!(
            choice,
            ResourceChoice::CreateNew {
                name: "state-bucket".to_string(),
                location_hint: Some("us-east-1".to_string()),
            }
        );
    }

    #[test]
    fn test_create_storage_blank_region_defaults() {
        let mut prompt = ScriptedPrompt::new(["state-bucket", ""]);
        let choice =
            resolve(ResourceKind::Storage, ResolveIntent::Create, &[], &mut prompt).unwrap();
        assert_eq!(
            choice,
            ResourceChoice::CreateNew {
                name: "state-bucket".to_string(),
                location_hint: Some(DEFAULT_LOCATION_HINT.to_string()),
            }
        );
    }

    #[test]
    fn test_create_key_has_no_location_hint() {
        let mut prompt = ScriptedPrompt::new(["state-key"]);
        let choice =
            resolve(ResourceKind::Key, ResolveIntent::Create, &[], &mut prompt).unwrap();
        assert_eq!(
            choice,
            ResourceChoice::CreateNew {
                name: "state-key".to_string(),
                location_hint: None,
            }
        );
    }

    #[test]
    fn test_create_empty_name_passes_through() {
        // Naming rules belong to the provider; an empty name is not
        // rejected here.
        let mut prompt = ScriptedPrompt::new([""]);
        let choice =
            resolve(ResourceKind::Key, ResolveIntent::Create, &[], &mut prompt).unwrap();
        assert_eq!(
            choice,
            ResourceChoice::CreateNew {
                name: String::new(),
                location_hint: None,
            }
        );
    }
}
