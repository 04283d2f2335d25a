//! Stack lifecycle controller
//!
//! Owns the state machine for stacks under one workspace: discover existing
//! stacks, dispatch to launch or nuke, and enforce the
//! preview → confirm → execute gate for both. The ordering is the core
//! safety invariant of the whole tool: a dry run always precedes any
//! mutating call, confirmation is always required, and a decline always
//! short-circuits with [`LifecycleError::Cancelled`] and zero mutations.

use crate::engine::StackEngine;
use crate::errors::{LifecycleError, Result};
use crate::prompt::Prompt;
use crate::workspace::{StackRef, WorkspaceHandle};
use tracing::{debug, info, instrument};

/// Default environment name for a launched stack
const DEFAULT_ENVIRONMENT: &str = "prod";

/// Actions the operator can take on a workspace with existing stacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Launch,
    Nuke,
}

/// Parse the operator's action answer, case-insensitively.
///
/// Anything other than a launch/nuke spelling aborts before any side
/// effect.
pub fn parse_action(input: &str) -> Result<Action> {
    match input.to_lowercase().as_str() {
        "l" | "launch" => Ok(Action::Launch),
        "n" | "nuke" => Ok(Action::Nuke),
        _ => Err(LifecycleError::InvalidAction {
            input: input.to_string(),
        }
        .into()),
    }
}

/// Discover the workspace's stacks and drive the chosen operation.
///
/// Zero discovered stacks auto-route to launch without an action prompt —
/// there is nothing to manage yet. With existing stacks the operator picks;
/// nuke iterates every discovered stack in order and halts at the first
/// decline or failure.
#[instrument(skip_all)]
pub async fn run<E: StackEngine>(
    engine: &E,
    workspace: &WorkspaceHandle,
    prompt: &mut dyn Prompt,
) -> Result<()> {
    let stacks = engine.list_stacks(workspace).await?;
    debug!(count = stacks.len(), "discovered stacks");

    if stacks.is_empty() {
        return launch(engine, workspace, prompt).await;
    }

    let answer = prompt.input("Enter action: [Launch/Nuke]", None)?;
    match parse_action(&answer)? {
        Action::Launch => launch(engine, workspace, prompt).await,
        Action::Nuke => {
            for stack in &stacks {
                nuke(engine, workspace, prompt, &stack.name).await?;
            }
            Ok(())
        }
    }
}

/// Deploy the operator stack: upsert, preview, confirm, apply.
#[instrument(skip_all)]
pub async fn launch<E: StackEngine>(
    engine: &E,
    workspace: &WorkspaceHandle,
    prompt: &mut dyn Prompt,
) -> Result<()> {
    let environment = prompt.input("Enter the environment", Some(DEFAULT_ENVIRONMENT))?;
    let stack = StackRef::new(&environment, workspace);
    engine.upsert_stack(&stack).await?;

    prompt.say("Loading deployment preview");
    let preview = engine.preview(&stack).await?;
    prompt.say(&preview.stdout);
    if preview.has_anomalies() {
        // Anomalies are surfaced, never blocking; proceeding stays the
        // operator's call.
        prompt.warn("Anomalies detected in deployment preview");
    }

    if !prompt.confirm("Deploy the operator? [y/N]")? {
        info!(stack = %environment, "launch declined");
        return Err(LifecycleError::Cancelled.into());
    }
    engine.up(&stack).await?;
    info!(stack = %environment, "stack deployed");
    Ok(())
}

/// Destroy one stack: select, preview destroy, confirm, destroy.
#[instrument(skip_all, fields(stack = stack_name))]
pub async fn nuke<E: StackEngine>(
    engine: &E,
    workspace: &WorkspaceHandle,
    prompt: &mut dyn Prompt,
    stack_name: &str,
) -> Result<()> {
    let stack = StackRef::new(stack_name, workspace);
    engine.select_stack(&stack).await?;

    prompt.say("Loading destruction preview");
    let preview = engine.preview_destroy(&stack).await?;
    prompt.say(&preview.stdout);
    if preview.has_anomalies() {
        prompt.warn("Anomalies detected in destruction preview");
    }

    if !prompt.confirm("Destroy the stack? [y/N]")? {
        info!(stack = stack_name, "nuke declined");
        return Err(LifecycleError::Cancelled.into());
    }
    engine.destroy(&stack).await?;
    info!(stack = stack_name, "stack destroyed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::mock::MockEngine;
    use crate::errors::PocketrocketError;
    use crate::locator::BackendLocator;
    use crate::prompt::mock::ScriptedPrompt;

    fn workspace() -> WorkspaceHandle {
        let locator = BackendLocator::build("bucket", "infra", None).unwrap();
        WorkspaceHandle::new("operator", &locator)
    }

    #[test]
    fn test_parse_action_spellings() {
        assert_eq!(parse_action("launch").unwrap(), Action::Launch);
        assert_eq!(parse_action("L").unwrap(), Action::Launch);
        assert_eq!(parse_action("Nuke").unwrap(), Action::Nuke);
        assert_eq!(parse_action("n").unwrap(), Action::Nuke);
    }

    #[test]
    fn test_parse_action_rejects_everything_else() {
        for input in ["", "destroy", "yes", "launch now"] {
            let err = parse_action(input).unwrap_err();
            assert!(matches!(
                err,
                PocketrocketError::Lifecycle(LifecycleError::InvalidAction { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_launch_decline_never_applies() {
        let engine = MockEngine::new();
        let workspace = workspace();
        // environment (default), decline
        let mut prompt = ScriptedPrompt::new(["", "n"]);

        let err = launch(&engine, &workspace, &mut prompt)
            .await
            .unwrap_err();
        assert!(err.is_cancellation());
        assert_eq!(engine.up_calls(), 0);
        // Preview still ran before the gate.
        assert_eq!(engine.calls(), vec!["upsert:prod", "preview:prod"]);
    }

    #[tokio::test]
    async fn test_launch_confirm_applies_once() {
        let engine = MockEngine::new().with_preview("+ 3 to create", "");
        let workspace = workspace();
        let mut prompt = ScriptedPrompt::new(["staging", "y"]);

        launch(&engine, &workspace, &mut prompt).await.unwrap();
        assert_eq!(engine.up_calls(), 1);
        assert_eq!(
            engine.calls(),
            vec!["upsert:staging", "preview:staging", "up:staging"]
        );
        // Preview output surfaced verbatim, no anomaly warning.
        assert!(prompt.output().contains(&"+ 3 to create".to_string()));
        assert!(prompt.warnings().is_empty());
    }

    #[tokio::test]
    async fn test_launch_anomalies_warn_but_do_not_block() {
        let engine = MockEngine::new().with_preview("plan", "warning: drift");
        let workspace = workspace();
        let mut prompt = ScriptedPrompt::new(["", "y"]);

        launch(&engine, &workspace, &mut prompt).await.unwrap();
        assert_eq!(engine.up_calls(), 1);
        assert_eq!(
            prompt.warnings(),
            ["Anomalies detected in deployment preview"]
        );
    }

    #[tokio::test]
    async fn test_launch_blank_environment_defaults_to_prod() {
        let engine = MockEngine::new();
        let workspace = workspace();
        let mut prompt = ScriptedPrompt::new(["", "y"]);

        launch(&engine, &workspace, &mut prompt).await.unwrap();
        assert_eq!(engine.calls()[0], "upsert:prod");
    }

    #[tokio::test]
    async fn test_zero_stacks_auto_route_to_launch() {
        let engine = MockEngine::new();
        let workspace = workspace();
        // Exactly the launch answers; an action prompt would exhaust the
        // script and fail.
        let mut prompt = ScriptedPrompt::new(["", "y"]);

        run(&engine, &workspace, &mut prompt).await.unwrap();
        assert_eq!(engine.up_calls(), 1);
        assert_eq!(prompt.remaining(), 0);
    }

    #[tokio::test]
    async fn test_invalid_action_aborts_without_side_effects() {
        let engine = MockEngine::new().with_stacks(&["prod"]);
        let workspace = workspace();
        let mut prompt = ScriptedPrompt::new(["detonate"]);

        let err = run(&engine, &workspace, &mut prompt).await.unwrap_err();
        assert!(matches!(
            err,
            PocketrocketError::Lifecycle(LifecycleError::InvalidAction { .. })
        ));
        assert_eq!(engine.up_calls(), 0);
        assert_eq!(engine.destroy_calls(), 0);
    }

    #[tokio::test]
    async fn test_nuke_iterates_all_stacks() {
        let engine = MockEngine::new().with_stacks(&["a", "b"]);
        let workspace = workspace();
        let mut prompt = ScriptedPrompt::new(["nuke", "y", "y"]);

        run(&engine, &workspace, &mut prompt).await.unwrap();
        assert_eq!(engine.destroy_calls(), 2);
        assert_eq!(
            engine.calls(),
            vec![
                "list-stacks:-",
                "select:a",
                "preview-destroy:a",
                "destroy:a",
                "select:b",
                "preview-destroy:b",
                "destroy:b",
            ]
        );
    }

    #[tokio::test]
    async fn test_nuke_decline_halts_remaining_stacks() {
        let engine = MockEngine::new().with_stacks(&["a", "b", "c"]);
        let workspace = workspace();
        // Destroy a, decline b; c must never be touched.
        let mut prompt = ScriptedPrompt::new(["n", "y", "n"]);

        let err = run(&engine, &workspace, &mut prompt).await.unwrap_err();
        assert!(err.is_cancellation());
        assert_eq!(engine.destroy_calls(), 1);
        assert!(!engine.calls().iter().any(|call| call.ends_with(":c")));
    }

    #[tokio::test]
    async fn test_nuke_failure_halts_remaining_stacks() {
        let engine = MockEngine::new()
            .with_stacks(&["a", "b", "c"])
            .failing_destroy_on("b");
        let workspace = workspace();
        let mut prompt = ScriptedPrompt::new(["n", "y", "y", "y"]);

        let err = run(&engine, &workspace, &mut prompt).await.unwrap_err();
        assert!(matches!(
            err,
            PocketrocketError::Lifecycle(LifecycleError::Destroy { .. })
        ));
        // b's destroy was attempted, c's never was.
        assert_eq!(engine.destroy_calls(), 2);
        assert!(!engine.calls().iter().any(|call| call.ends_with(":c")));
    }

    #[tokio::test]
    async fn test_apply_failure_surfaces() {
        let engine = MockEngine::new().failing_up();
        let workspace = workspace();
        let mut prompt = ScriptedPrompt::new(["", "y"]);

        let err = launch(&engine, &workspace, &mut prompt)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PocketrocketError::Lifecycle(LifecycleError::Apply { .. })
        ));
    }
}
