use anyhow::Result;
use clap::Parser;

mod cli;
mod console;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let parsed = cli::Cli::parse();

    // Hard interrupt contract: an operator interrupt terminates the process
    // immediately rather than unwinding in-flight provider calls. A
    // subsequent run re-discovers whatever state the engine was left in.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, aborting");
            std::process::exit(130);
        }
    });

    match parsed.dispatch().await {
        Ok(()) => Ok(()),
        Err(err) => {
            // A decline at a confirmation gate is a normal exit path for
            // the operator, but still a failed run: nothing happened.
            if let Some(core_err) = err.downcast_ref::<pocketrocket_core::errors::PocketrocketError>()
            {
                if core_err.is_cancellation() {
                    eprintln!("{}", core_err);
                    std::process::exit(1);
                }
            }
            console::print_error_banner(&err);
            std::process::exit(1);
        }
    }
}
