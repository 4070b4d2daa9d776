//! Seed import command
//!
//! Usage: tagclone seed import <PATH>

use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use super::Status;
use tagclone_core::Result;
use tagclone_store::db::open_hub;
use tagclone_store::errors::io_error;
use tagclone_store::seed::import_seed;

#[derive(Debug, Args)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub command: SeedCommand,
}

#[derive(Debug, Subcommand)]
pub enum SeedCommand {
    /// Import a seed file (or every seed in a directory) into the hub
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path to seed YAML file or directory
    pub path: PathBuf,
}

pub fn execute(args: SeedArgs, db: &Path) -> Result<Status> {
    match args.command {
        SeedCommand::Import(import_args) => execute_import(import_args, db),
    }
}

fn execute_import(args: ImportArgs, db: &Path) -> Result<Status> {
    let mut conn = open_hub(db)?;

    let seed_files = if args.path.is_dir() {
        // sorted so later seeds can build on earlier ones
        let mut files: Vec<PathBuf> = std::fs::read_dir(&args.path)
            .map_err(|e| io_error("read_seed_dir", e))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        files
    } else {
        vec![args.path]
    };

    for seed_file in seed_files {
        let summary = import_seed(&seed_file, &mut conn)?;
        println!(
            "Imported {} at event {}: {} user(s), {} build(s), {} tag(s) (digest: {})",
            seed_file.display(),
            summary.event,
            summary.users,
            summary.builds,
            summary.tags,
            summary.digest
        );
    }

    Ok(Status::Success)
}
