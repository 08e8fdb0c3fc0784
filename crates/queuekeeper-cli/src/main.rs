//! queuekeeper CLI
//!
//! Loads and validates the proxy configuration, then hands control to the
//! session subsystems while keeping the status dashboard up to date.

mod commands;
mod output;

use clap::Parser;
use queuekeeper_core::init_tracing;

#[derive(Parser)]
#[command(name = "queuekeeper")]
#[command(about = "queuekeeper: queue-waiting proxy with multi-instance coordination")]
#[command(version = queuekeeper_core::VERSION)]
#[command(
    long_about = "queuekeeper keeps a session queued on a remote server and lets a client take over.\n\
All settings live in config/config.json5 (override the path with QUEUEKEEPER_CONFIG).\n\
\n\
Examples:\n  \
queuekeeper                    # Validate config and start\n  \
queuekeeper --generate-docs    # Write docs/configuration.md and exit"
)]
struct Cli {
    /// Write the configuration reference to docs/configuration.md and exit
    #[arg(long)]
    generate_docs: bool,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    if cli.verbose > 0 {
        let log_level = match cli.verbose {
            1 => "queuekeeper=debug",
            _ => "queuekeeper=trace",
        };
        // SAFETY: single-threaded at this point, before any task is spawned
        unsafe {
            std::env::set_var("RUST_LOG", log_level);
        }
    }
    init_tracing();

    if cli.generate_docs {
        return commands::generate_docs();
    }

    commands::start().await
}
