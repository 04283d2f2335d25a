//! Workspace handle and per-operation stack references

use crate::locator::BackendLocator;

/// Configured backend plus project identity for one run.
///
/// Built once by the orchestrator after every resource resolved, then
/// read-only: the lifecycle controller borrows it, never copies or mutates
/// it. It holds no local resources, so there is no explicit teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceHandle {
    project: String,
    backend_url: String,
    secrets_provider: Option<String>,
}

impl WorkspaceHandle {
    /// Bind a project identity to a built backend locator
    pub fn new(project: impl Into<String>, locator: &BackendLocator) -> Self {
        Self {
            project: project.into(),
            backend_url: locator.backend_url(),
            secrets_provider: locator.secrets_provider(),
        }
    }

    /// Project name the stacks belong to
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Backend URL handed to the IaC engine
    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Secrets-provider URI, when the backend state is key-encrypted
    pub fn secrets_provider(&self) -> Option<&str> {
        self.secrets_provider.as_deref()
    }
}

/// Reference to one named stack inside a workspace.
///
/// Ephemeral: constructed per lifecycle operation, never cached across
/// operations.
#[derive(Debug, Clone, Copy)]
pub struct StackRef<'a> {
    name: &'a str,
    workspace: &'a WorkspaceHandle,
}

impl<'a> StackRef<'a> {
    pub fn new(name: &'a str, workspace: &'a WorkspaceHandle) -> Self {
        Self { name, workspace }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn workspace(&self) -> &WorkspaceHandle {
        self.workspace
    }
}
