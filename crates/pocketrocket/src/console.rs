//! Terminal prompt implementation and output rendering
//!
//! Implements the core `Prompt` trait on top of dialoguer widgets, plus the
//! welcome banner and the error banner. Everything terminal-specific lives
//! here; core never touches a TTY.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use pocketrocket_core::errors::{PocketrocketError, Result};
use pocketrocket_core::prompt::Prompt;

const BANNER_NARROW: &str = "🚀 Welcome to the pocketrocket bootstrap process";
const BANNER_WIDE: &str = r#"
        |
       / \
      / _ \
     |.o '.|
     |'._.'|
     |     |
   ,'|  |  |`.
  /  |  |  |  \
  |,-'--|--'-.|

🚀 Welcome to the pocketrocket bootstrap process 🚀
"#;

fn prompt_error(err: dialoguer::Error) -> PocketrocketError {
    PocketrocketError::Prompt {
        message: err.to_string(),
    }
}

/// Interactive terminal prompt
pub struct TermPrompt {
    theme: ColorfulTheme,
    term: Term,
}

impl TermPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
            term: Term::stdout(),
        }
    }

    /// Print the welcome banner, sized to the terminal
    pub fn print_banner(&self) {
        let (_, width) = self.term.size();
        if width >= 100 {
            println!("{}", BANNER_WIDE);
        } else {
            println!("{}", BANNER_NARROW);
        }
    }

    /// Print a progress note
    pub fn note(&self, text: &str) {
        println!("🔸 {}", text);
    }
}

impl Default for TermPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for TermPrompt {
    fn input(&mut self, label: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(label)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string()).show_default(true);
        }
        Ok(input.interact_text().map_err(prompt_error)?)
    }

    fn select(&mut self, label: &str, items: &[String]) -> Result<usize> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(label)
            .items(items)
            .default(0)
            .interact()
            .map_err(prompt_error)?)
    }

    fn confirm(&mut self, label: &str) -> Result<bool> {
        // Decline is the default; only an explicit affirmative proceeds.
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(label)
            .default(false)
            .interact()
            .map_err(prompt_error)?)
    }

    fn say(&mut self, text: &str) {
        println!("{}", text);
    }

    fn warn(&mut self, text: &str) {
        println!("⚠️  {}", style(text).yellow());
    }
}

/// Render a failed run
pub fn print_error_banner(err: &anyhow::Error) {
    eprintln!("❌ ========= ERROR =========");
    eprintln!();
    eprintln!("{}", style(err).red());
    eprintln!();
    eprintln!("❌ ========= ERROR =========");
}
