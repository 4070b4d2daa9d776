//! tagclone CLI
//!
//! Command-line interface for tag reconciliation

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tagclone_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "tagclone")]
#[command(about = "tagclone - Make one build tag see what another sees", long_about = None)]
struct Cli {
    /// Hub database
    #[arg(
        long,
        global = true,
        env = "TAGCLONE_DB",
        default_value = ".tagclone/hub.db"
    )]
    db: PathBuf,

    /// User the hub session acts as
    #[arg(long, global = true, env = "TAGCLONE_USER")]
    user: Option<String>,

    /// Emit logs on stderr as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Seed import operations
    Seed(commands::seed::SeedArgs),
    /// Copy packages, builds, groups and configuration from one tag to another
    CloneTag(commands::clone_tag::CloneTagArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init(if cli.log_json {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = match cli.command {
        Commands::Seed(args) => commands::seed::execute(args, &cli.db),
        Commands::CloneTag(args) => {
            commands::clone_tag::execute(args, &cli.db, cli.user.as_deref())
        }
    };

    match result {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("Error: {}", e);
            commands::Status::from_error(&e).into()
        }
    }
}
