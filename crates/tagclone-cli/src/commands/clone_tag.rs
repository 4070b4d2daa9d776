//! Clone-tag command
//!
//! Usage: tagclone clone-tag <SRC> <DST> [--config] [--pkgs] [--builds] [--groups] ...
//!
//! With no class flag every class is copied.

use clap::Args;
use std::path::Path;

use super::Status;
use tagclone_core::hub::{AsOf, CallFlags};
use tagclone_core::render::render_summary;
use tagclone_core::{ClassSelection, ExError, ExErrorKind, Result};
use tagclone_core_types::RequestContext;
use tagclone_engine::{
    apply_engine_command, CloneOptions, CloneOutcome, EngineCommand, EngineCommandResult,
};
use tagclone_store::SqliteHub;

#[derive(Debug, Args)]
pub struct CloneTagArgs {
    /// Tag to copy from
    pub src: String,

    /// Tag to copy into; created from the source when missing and
    /// configuration is copied
    pub dst: String,

    /// Copy tag configuration
    #[arg(long)]
    pub config: bool,

    /// Copy groups
    #[arg(long)]
    pub groups: bool,

    /// Copy package listings
    #[arg(long)]
    pub pkgs: bool,

    /// Copy tagged builds (needs --pkgs)
    #[arg(long)]
    pub builds: bool,

    /// Copy everything; the default when no class is named
    #[arg(long)]
    pub all: bool,

    /// Only the newest build of each package
    #[arg(long)]
    pub latest_only: bool,

    /// Include builds the source inherits
    #[arg(long)]
    pub inherit_builds: bool,

    /// Keep destination entries the source does not have
    #[arg(long)]
    pub no_delete: bool,

    /// Read the source as of this event
    #[arg(long, conflicts_with_all = ["ts", "repo"])]
    pub event: Option<i64>,

    /// Read the source as of this timestamp (seconds since the epoch)
    #[arg(long, conflicts_with = "repo")]
    pub ts: Option<f64>,

    /// Read the source as of this repo's creation
    #[arg(long)]
    pub repo: Option<i64>,

    /// Send tag/untag notifications
    #[arg(long)]
    pub notify: bool,

    /// Override locks and blocked-package checks
    #[arg(short, long)]
    pub force: bool,

    /// Print the planned changes
    #[arg(short, long)]
    pub verbose: bool,

    /// Plan only; write nothing
    #[arg(long = "test")]
    pub dry_run: bool,

    /// Calls per request; 0 sends every call on its own
    #[arg(long, default_value_t = 1000, allow_negative_numbers = true)]
    pub batch: i64,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

impl CloneTagArgs {
    fn selection(&self) -> ClassSelection {
        let named = self.config || self.groups || self.pkgs || self.builds;
        if self.all || !named {
            return ClassSelection::all();
        }
        ClassSelection {
            config: self.config,
            packages: self.pkgs,
            builds: self.builds,
            groups: self.groups,
        }
    }

    fn as_of(&self) -> Option<AsOf> {
        match (self.event, self.ts, self.repo) {
            (Some(id), _, _) => Some(AsOf::Event(id)),
            (_, Some(ts), _) => Some(AsOf::Timestamp(ts)),
            (_, _, Some(repo)) => Some(AsOf::Repo(repo)),
            _ => None,
        }
    }

    fn options(&self) -> CloneOptions {
        CloneOptions {
            selection: self.selection(),
            latest_only: self.latest_only,
            inherit_builds: self.inherit_builds,
            delete: !self.no_delete,
            as_of: self.as_of(),
            verbose: self.verbose,
            dry_run: self.dry_run,
            flags: CallFlags {
                force: self.force,
                notify: self.notify,
            },
            batch: self.batch,
            ..CloneOptions::new(self.src.as_str(), self.dst.as_str())
        }
    }
}

pub fn execute(args: CloneTagArgs, db: &Path, user: Option<&str>) -> Result<Status> {
    let user = user.ok_or_else(|| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op("clone_tag")
            .with_message("no user given; pass --user or set TAGCLONE_USER")
    })?;
    let mut hub = SqliteHub::open(db, user)?;
    tracing::debug!(db = %db.display(), user, "opened hub");

    let cmd = EngineCommand::CloneTag {
        options: args.options(),
        ctx: RequestContext::new(),
    };
    let EngineCommandResult::CloneTag(outcome) = apply_engine_command(cmd, &mut hub)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome, args.verbose);
    }

    if outcome.fault_count() > 0 {
        Ok(Status::Failure)
    } else {
        Ok(Status::Success)
    }
}

fn print_outcome(outcome: &CloneOutcome, verbose: bool) {
    if verbose {
        if let Some(event) = &outcome.event {
            println!("Cloning at event {} ({})", event.id, event.timestr());
        }
    }
    if let Some(report) = &outcome.report {
        print!("{}", report);
    }

    if outcome.dry_run {
        println!("Test mode, nothing written: {}", render_summary(&outcome.plan));
        return;
    }

    if let Some(applied) = &outcome.applied {
        println!(
            "Applied {} operation(s) to {} in {} request(s){}",
            applied.applied,
            outcome.dst.name,
            applied.round_trips,
            if applied.config_updated {
                ", config updated"
            } else {
                ""
            }
        );
        for failed in &applied.failed {
            eprintln!("Failed: {}: {}", failed.operation, failed.fault);
        }
    }
}
