//! IaC execution engine integration
//!
//! The lifecycle controller drives stacks through the [`StackEngine`] trait.
//! The real implementation shells out to the `pulumi` CLI against the
//! backend URL carried by the workspace handle; tests use
//! [`mock::MockEngine`], which records every call so the preview/confirm
//! ordering invariants can be asserted.

use crate::errors::{LifecycleError, ProviderError, Result};
use crate::workspace::{StackRef, WorkspaceHandle};
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, instrument};

/// One stack known to the workspace backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSummary {
    pub name: String,
}

/// Captured output of a dry run.
///
/// `stdout` is surfaced to the operator verbatim; a non-empty `stderr` is
/// reported as an anomaly warning but never blocks the confirmation gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewReport {
    pub stdout: String,
    pub stderr: String,
}

impl PreviewReport {
    pub fn has_anomalies(&self) -> bool {
        !self.stderr.is_empty()
    }
}

/// Stack engine abstraction.
///
/// `upsert_stack` is an idempotent create-or-select; `select_stack` fails
/// when the stack does not exist. Previews never mutate.
#[allow(async_fn_in_trait)]
pub trait StackEngine {
    /// List all stacks known to the workspace
    async fn list_stacks(&self, workspace: &WorkspaceHandle) -> Result<Vec<StackSummary>>;

    /// Create the named stack if absent, select it if present
    async fn upsert_stack(&self, stack: &StackRef<'_>) -> Result<()>;

    /// Select an existing stack
    async fn select_stack(&self, stack: &StackRef<'_>) -> Result<()>;

    /// Dry-run deployment
    async fn preview(&self, stack: &StackRef<'_>) -> Result<PreviewReport>;

    /// Dry-run destruction
    async fn preview_destroy(&self, stack: &StackRef<'_>) -> Result<PreviewReport>;

    /// Apply the deployment
    async fn up(&self, stack: &StackRef<'_>) -> Result<()>;

    /// Destroy the stack
    async fn destroy(&self, stack: &StackRef<'_>) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct StackLsEntry {
    name: String,
}

/// Raw outcome of one engine CLI invocation
struct CliOutput {
    success: bool,
    stdout: String,
    stderr: String,
}

/// CLI-backed engine shelling out to the `pulumi` executable.
///
/// A minimal project file derived from the workspace handle is written into
/// the working directory before the first stack operation, mirroring what a
/// local automation workspace would set up.
#[derive(Debug, Clone)]
pub struct CliEngine {
    pulumi_path: String,
    work_dir: PathBuf,
}

impl CliEngine {
    pub fn new(pulumi_path: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            pulumi_path: pulumi_path.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Write the project file for this workspace if it is not there yet
    fn ensure_project_file(&self, workspace: &WorkspaceHandle) -> Result<()> {
        let path = self.work_dir.join("Pulumi.yaml");
        if path.exists() {
            return Ok(());
        }
        std::fs::create_dir_all(&self.work_dir)?;
        let contents = format!(
            "name: {}\nruntime: go\nbackend:\n  url: {}\n",
            workspace.project(),
            workspace.backend_url()
        );
        std::fs::write(&path, contents)?;
        debug!(path = %path.display(), "wrote project file");
        Ok(())
    }

    fn run(&self, workspace: &WorkspaceHandle, step: &str, args: &[&str]) -> Result<CliOutput> {
        self.ensure_project_file(workspace)?;
        debug!(step, ?args, "running pulumi CLI");
        let output = Command::new(&self.pulumi_path)
            .current_dir(&self.work_dir)
            .env("PULUMI_BACKEND_URL", workspace.backend_url())
            .args(args)
            .arg("--non-interactive")
            .output()
            .map_err(|err| ProviderError::failure(step, err))?;
        Ok(CliOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl StackEngine for CliEngine {
    #[instrument(skip(self, workspace))]
    async fn list_stacks(&self, workspace: &WorkspaceHandle) -> Result<Vec<StackSummary>> {
        let step = "list-stacks";
        let output = self.run(workspace, step, &["stack", "ls", "--json"])?;
        if !output.success {
            return Err(ProviderError::failure(step, output.stderr.trim()).into());
        }
        let entries: Vec<StackLsEntry> = serde_json::from_str(&output.stdout)
            .map_err(|err| ProviderError::failure(step, err))?;
        Ok(entries
            .into_iter()
            .map(|entry| StackSummary { name: entry.name })
            .collect())
    }

    #[instrument(skip(self, stack), fields(stack = stack.name()))]
    async fn upsert_stack(&self, stack: &StackRef<'_>) -> Result<()> {
        let workspace = stack.workspace();
        let select = self.run(workspace, "upsert-stack", &["stack", "select", stack.name()])?;
        if select.success {
            return Ok(());
        }
        let mut args = vec!["stack", "init", stack.name()];
        if let Some(secrets_provider) = workspace.secrets_provider() {
            args.push("--secrets-provider");
            args.push(secrets_provider);
        }
        let init = self.run(workspace, "upsert-stack", &args)?;
        if !init.success {
            return Err(ProviderError::failure("upsert-stack", init.stderr.trim()).into());
        }
        Ok(())
    }

    #[instrument(skip(self, stack), fields(stack = stack.name()))]
    async fn select_stack(&self, stack: &StackRef<'_>) -> Result<()> {
        let step = "select-stack";
        let output = self.run(stack.workspace(), step, &["stack", "select", stack.name()])?;
        if !output.success {
            return Err(ProviderError::failure(step, output.stderr.trim()).into());
        }
        Ok(())
    }

    #[instrument(skip(self, stack), fields(stack = stack.name()))]
    async fn preview(&self, stack: &StackRef<'_>) -> Result<PreviewReport> {
        let output = self.run(
            stack.workspace(),
            "preview",
            &["preview", "--stack", stack.name(), "--color", "always"],
        )?;
        if !output.success {
            return Err(LifecycleError::Preview {
                message: output.stderr.trim().to_string(),
            }
            .into());
        }
        Ok(PreviewReport {
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    #[instrument(skip(self, stack), fields(stack = stack.name()))]
    async fn preview_destroy(&self, stack: &StackRef<'_>) -> Result<PreviewReport> {
        let output = self.run(
            stack.workspace(),
            "preview-destroy",
            &[
                "destroy",
                "--preview-only",
                "--stack",
                stack.name(),
                "--color",
                "always",
            ],
        )?;
        if !output.success {
            return Err(LifecycleError::Preview {
                message: output.stderr.trim().to_string(),
            }
            .into());
        }
        Ok(PreviewReport {
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    #[instrument(skip(self, stack), fields(stack = stack.name()))]
    async fn up(&self, stack: &StackRef<'_>) -> Result<()> {
        let output = self.run(
            stack.workspace(),
            "up",
            &["up", "--yes", "--skip-preview", "--stack", stack.name()],
        )?;
        if !output.success {
            return Err(LifecycleError::Apply {
                message: output.stderr.trim().to_string(),
            }
            .into());
        }
        Ok(())
    }

    #[instrument(skip(self, stack), fields(stack = stack.name()))]
    async fn destroy(&self, stack: &StackRef<'_>) -> Result<()> {
        let output = self.run(
            stack.workspace(),
            "destroy",
            &["destroy", "--yes", "--skip-preview", "--stack", stack.name()],
        )?;
        if !output.success {
            return Err(LifecycleError::Destroy {
                message: output.stderr.trim().to_string(),
            }
            .into());
        }
        Ok(())
    }
}

pub mod mock {
    //! Mock stack engine for testing lifecycle flows
    //!
    //! Records every operation in order so tests can assert that previews
    //! strictly precede mutating calls and that a decline leaves the
    //! mutation count at zero.

    use super::{PreviewReport, StackEngine, StackSummary};
    use crate::errors::{LifecycleError, Result};
    use crate::workspace::{StackRef, WorkspaceHandle};
    use std::sync::{Arc, Mutex};

    /// Engine double with scripted stack lists and injectable failures
    #[derive(Debug, Default, Clone)]
    pub struct MockEngine {
        stacks: Vec<String>,
        preview: PreviewReport,
        destroy_preview: PreviewReport,
        fail_up: bool,
        fail_destroy_on: Option<String>,
        calls: Arc<Mutex<Vec<String>>>,
        backends: Arc<Mutex<Vec<String>>>,
    }

    impl MockEngine {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed the stacks `list_stacks` reports
        pub fn with_stacks(mut self, names: &[&str]) -> Self {
            self.stacks = names.iter().map(|name| name.to_string()).collect();
            self
        }

        /// Script the deployment preview output
        pub fn with_preview(mut self, stdout: &str, stderr: &str) -> Self {
            self.preview = PreviewReport {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            };
            self
        }

        /// Script the destruction preview output
        pub fn with_destroy_preview(mut self, stdout: &str, stderr: &str) -> Self {
            self.destroy_preview = PreviewReport {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            };
            self
        }

        /// Make `up` fail
        pub fn failing_up(mut self) -> Self {
            self.fail_up = true;
            self
        }

        /// Make `destroy` fail for the named stack
        pub fn failing_destroy_on(mut self, name: &str) -> Self {
            self.fail_destroy_on = Some(name.to_string());
            self
        }

        fn record(&self, op: &str, stack: &str) {
            self.calls.lock().unwrap().push(format!("{}:{}", op, stack));
        }

        /// Ordered log of every operation, as `op:stack` entries
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        /// Backend URLs observed by `list_stacks`
        pub fn backends(&self) -> Vec<String> {
            self.backends.lock().unwrap().clone()
        }

        fn count(&self, op: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|entry| entry.starts_with(&format!("{}:", op)))
                .count()
        }

        /// Number of `up` calls observed
        pub fn up_calls(&self) -> usize {
            self.count("up")
        }

        /// Number of `destroy` calls observed
        pub fn destroy_calls(&self) -> usize {
            self.count("destroy")
        }
    }

    impl StackEngine for MockEngine {
        async fn list_stacks(&self, workspace: &WorkspaceHandle) -> Result<Vec<StackSummary>> {
            self.record("list-stacks", "-");
            self.backends
                .lock()
                .unwrap()
                .push(workspace.backend_url().to_string());
            Ok(self
                .stacks
                .iter()
                .map(|name| StackSummary { name: name.clone() })
                .collect())
        }

        async fn upsert_stack(&self, stack: &StackRef<'_>) -> Result<()> {
            self.record("upsert", stack.name());
            Ok(())
        }

        async fn select_stack(&self, stack: &StackRef<'_>) -> Result<()> {
            self.record("select", stack.name());
            Ok(())
        }

        async fn preview(&self, stack: &StackRef<'_>) -> Result<PreviewReport> {
            self.record("preview", stack.name());
            Ok(self.preview.clone())
        }

        async fn preview_destroy(&self, stack: &StackRef<'_>) -> Result<PreviewReport> {
            self.record("preview-destroy", stack.name());
            Ok(self.destroy_preview.clone())
        }

        async fn up(&self, stack: &StackRef<'_>) -> Result<()> {
            self.record("up", stack.name());
            if self.fail_up {
                return Err(LifecycleError::Apply {
                    message: "injected failure".to_string(),
                }
                .into());
            }
            Ok(())
        }

        async fn destroy(&self, stack: &StackRef<'_>) -> Result<()> {
            self.record("destroy", stack.name());
            if self.fail_destroy_on.as_deref() == Some(stack.name()) {
                return Err(LifecycleError::Destroy {
                    message: "injected failure".to_string(),
                }
                .into());
            }
            Ok(())
        }
    }
}
