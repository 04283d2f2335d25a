//! Interactive surface abstraction
//!
//! The bootstrap flow is interactive end to end, but nothing in core talks
//! to a terminal directly. Every question goes through the [`Prompt`] trait,
//! which the binary implements with a real terminal and tests implement with
//! [`mock::ScriptedPrompt`]. This keeps the resolver and the lifecycle state
//! machine deterministic under test without a TTY.

use crate::errors::Result;

/// Abstract prompt surface injected through the orchestrator and the
/// lifecycle controller.
///
/// Implementations own the rendering and the blank-answer defaulting:
/// `input` returns `default` when the operator submits an empty line and a
/// default was supplied.
pub trait Prompt {
    /// Ask for a single line of text
    fn input(&mut self, label: &str, default: Option<&str>) -> Result<String>;

    /// Ask for a single choice among `items`; returns the chosen index
    fn select(&mut self, label: &str, items: &[String]) -> Result<usize>;

    /// Ask a yes/no question. Only an explicit affirmative returns `true`;
    /// any other answer is a decline.
    fn confirm(&mut self, label: &str) -> Result<bool>;

    /// Emit a plain text block (preview output, progress notes)
    fn say(&mut self, text: &str);

    /// Emit a warning
    fn warn(&mut self, text: &str);
}

pub mod mock {
    //! Scripted prompt for tests
    //!
    //! Pops pre-seeded answers in order and records everything the code
    //! under test emitted, so tests can assert on both sides of the
    //! conversation without a terminal.

    use super::Prompt;
    use crate::errors::{PocketrocketError, Result};
    use std::collections::VecDeque;

    /// Prompt implementation driven by a fixed answer script
    #[derive(Debug, Default)]
    pub struct ScriptedPrompt {
        answers: VecDeque<String>,
        output: Vec<String>,
        warnings: Vec<String>,
    }

    impl ScriptedPrompt {
        /// Create a scripted prompt that will answer with `answers` in order
        pub fn new<S: Into<String>, I: IntoIterator<Item = S>>(answers: I) -> Self {
            Self {
                answers: answers.into_iter().map(Into::into).collect(),
                output: Vec::new(),
                warnings: Vec::new(),
            }
        }

        fn next_answer(&mut self, label: &str) -> Result<String> {
            self.answers
                .pop_front()
                .ok_or_else(|| PocketrocketError::Prompt {
                    message: format!("script exhausted at prompt {:?}", label),
                })
        }

        /// Answers not yet consumed
        pub fn remaining(&self) -> usize {
            self.answers.len()
        }

        /// Everything emitted via `say`
        pub fn output(&self) -> &[String] {
            &self.output
        }

        /// Everything emitted via `warn`
        pub fn warnings(&self) -> &[String] {
            &self.warnings
        }
    }

    impl Prompt for ScriptedPrompt {
        fn input(&mut self, label: &str, default: Option<&str>) -> Result<String> {
            let answer = self.next_answer(label)?;
            if answer.is_empty() {
                if let Some(default) = default {
                    return Ok(default.to_string());
                }
            }
            Ok(answer)
        }

        fn select(&mut self, label: &str, items: &[String]) -> Result<usize> {
            let answer = self.next_answer(label)?;
            // Scripted answers select by exact item text (first match wins)
            // or by zero-based index.
            if let Some(position) = items.iter().position(|item| *item == answer) {
                return Ok(position);
            }
            answer
                .parse::<usize>()
                .ok()
                .filter(|index| *index < items.len())
                .ok_or_else(|| PocketrocketError::Prompt {
                    message: format!("scripted answer {:?} matches no item of {:?}", answer, label),
                })
        }

        fn confirm(&mut self, label: &str) -> Result<bool> {
            let answer = self.next_answer(label)?;
            Ok(answer.eq_ignore_ascii_case("y"))
        }

        fn say(&mut self, text: &str) {
            self.output.push(text.to_string());
        }

        fn warn(&mut self, text: &str) {
            self.warnings.push(text.to_string());
        }
    }
}
