//! Engine-level commands that talk to a hub.

#![allow(clippy::result_large_err)]

use crate::commands::clone_tag::{clone_tag_with_context, CloneOptions, CloneOutcome};
use tagclone_core::errors::Result;
use tagclone_core::hub::HubSession;
use tagclone_core_types::RequestContext;

#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Make one tag's packages, builds and groups match another's
    CloneTag {
        options: CloneOptions,
        ctx: RequestContext,
    },
}

#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    CloneTag(Box<CloneOutcome>),
}

pub fn apply_engine_command(
    cmd: EngineCommand,
    session: &mut dyn HubSession,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::CloneTag { options, ctx } => {
            let outcome = clone_tag_with_context(session, &options, &ctx)?;
            Ok(EngineCommandResult::CloneTag(Box::new(outcome)))
        }
    }
}
