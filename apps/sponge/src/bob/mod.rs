//! # The bob CLI
//!
//! `bob` is Sponge's scaffolding and server tool.
//!
//! ## Available Commands
//!
//! - `create` - Scaffold a new project directory
//! - `go` - Run the project in the current directory
//! - `start` - Scaffold a project and run it immediately

mod commands;

pub use commands::{cmd_create, cmd_go, cmd_start, default_settings};

use clap::{Parser, Subcommand};
use sponge_core::SpongeError;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Bob - the Sponge project tool
///
/// Scaffolds new Sponge projects and runs them from their settings.yml.
#[derive(Parser, Debug)]
#[command(name = "bob")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new project directory
    Create {
        /// Project name; the package name is its slug
        name: String,
    },

    /// Run the project in the current directory
    Go,

    /// Create a new project and run it immediately
    Start {
        /// Project name; the package name is its slug
        name: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), SpongeError> {
    let cwd = std::env::current_dir().map_err(|e| SpongeError::Io(e.to_string()))?;

    match cli.command {
        Commands::Create { name } => {
            let project = cmd_create(&cwd, &name)?;
            println!("created {}", project.display());
            Ok(())
        }
        Commands::Go => cmd_go(&cwd).await,
        Commands::Start { name } => cmd_start(&cwd, &name).await,
    }
}
