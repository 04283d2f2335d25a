//! Bootstrap orchestration
//!
//! Top-level sequencing of one run: prompt for project identity, resolve the
//! storage and key resources (reuse or create), build the backend locator,
//! construct the workspace handle, and hand off to the lifecycle controller.
//! Any failure aborts the whole run; resources the provider already created
//! are deliberately not rolled back.

use crate::engine::StackEngine;
use crate::errors::Result;
use crate::lifecycle;
use crate::locator::BackendLocator;
use crate::prompt::Prompt;
use crate::provider::CloudProvider;
use crate::resolver::{self, ResolveIntent, ResourceChoice, ResourceKind};
use crate::workspace::WorkspaceHandle;
use tracing::{debug, info, instrument};

/// Run the full bootstrap sequence against injected collaborators.
#[instrument(skip_all)]
pub async fn run<P: CloudProvider, E: StackEngine>(
    provider: &P,
    engine: &E,
    prompt: &mut dyn Prompt,
) -> Result<()> {
    let project = prompt.input("Enter the project name", None)?;

    let (storage_id, path_prefix) = resolve_storage(provider, prompt).await?;
    let key_id = resolve_key(provider, prompt).await?;

    let locator = BackendLocator::build(&storage_id, &path_prefix, Some(&key_id))?;
    let workspace = WorkspaceHandle::new(project, &locator);
    info!(
        backend = workspace.backend_url(),
        "workspace handle constructed"
    );

    lifecycle::run(engine, &workspace, prompt).await
}

/// Ask the reuse/create question for one resource kind
fn intent_for(kind: ResourceKind, prompt: &mut dyn Prompt) -> Result<ResolveIntent> {
    let reuse = prompt.confirm(&format!(
        "Use existing {} for infra state? [y/N]",
        kind.label()
    ))?;
    Ok(if reuse {
        ResolveIntent::Reuse
    } else {
        ResolveIntent::Create
    })
}

/// Resolve the storage location; returns (storage id, path prefix).
///
/// The prefix is only asked for on the reuse path; a freshly created
/// location starts at its root.
async fn resolve_storage<P: CloudProvider>(
    provider: &P,
    prompt: &mut dyn Prompt,
) -> Result<(String, String)> {
    let kind = ResourceKind::Storage;
    let intent = intent_for(kind, prompt)?;
    let candidates = match intent {
        ResolveIntent::Reuse => provider.list_storage_locations().await?,
        ResolveIntent::Create => Vec::new(),
    };

    match resolver::resolve(kind, intent, &candidates, prompt)? {
        ResourceChoice::Reuse { identifier } => {
            let prefix = prompt.input("Specify bucket prefix", None)?;
            Ok((identifier, prefix))
        }
        ResourceChoice::CreateNew {
            name,
            location_hint,
        } => {
            let hint = location_hint.unwrap_or_else(|| resolver::DEFAULT_LOCATION_HINT.to_string());
            let storage_id = provider.create_storage_location(&name, &hint).await?;
            debug!(%storage_id, "storage location created");
            Ok((storage_id, String::new()))
        }
    }
}

/// Resolve the encryption key; returns its key id.
async fn resolve_key<P: CloudProvider>(provider: &P, prompt: &mut dyn Prompt) -> Result<String> {
    let kind = ResourceKind::Key;
    let intent = intent_for(kind, prompt)?;
    let candidates = match intent {
        ResolveIntent::Reuse => provider.list_keys().await?,
        ResolveIntent::Create => Vec::new(),
    };

    match resolver::resolve(kind, intent, &candidates, prompt)? {
        ResourceChoice::Reuse { identifier } => Ok(identifier),
        ResourceChoice::CreateNew { name, .. } => {
            let key_id = provider.create_key(&name).await?;
            debug!(%key_id, "key created");
            Ok(key_id)
        }
    }
}
