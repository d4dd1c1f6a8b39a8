//! election command - Take part in a distributed leader election
//!
//! The candidate id is the session id, so `enter` only holds until the
//! command exits and its session closes.

use super::{create_primitive, delete_primitive, with_primitive};
use crate::cli::args::ElectionAction;
use crate::cli::Context;
use crate::primitive::Election;
use crate::ui::output;
use anyhow::Result;

/// Run an election subcommand; every verb but create/delete prints the term.
pub fn election(ctx: &Context, action: ElectionAction) -> Result<()> {
    let term = match action {
        ElectionAction::Create(target) => return create_primitive::<Election>(ctx, &target.name),
        ElectionAction::Delete(target) => return delete_primitive::<Election>(ctx, &target.name),
        ElectionAction::Enter(target) => {
            with_primitive::<Election, _, _, _>(ctx, &target.name, |election| async move {
                Ok(election.enter().await?)
            })?
        }
        ElectionAction::Leave(target) => {
            with_primitive::<Election, _, _, _>(ctx, &target.name, |election| async move {
                Ok(election.leave().await?)
            })?
        }
        ElectionAction::Get(target) => {
            with_primitive::<Election, _, _, _>(ctx, &target.name, |election| async move {
                Ok(election.term().await?)
            })?
        }
        ElectionAction::Promote { target, candidate } => {
            with_primitive::<Election, _, _, _>(ctx, &target.name, |election| async move {
                Ok(election.promote(candidate).await?)
            })?
        }
        ElectionAction::Evict { target, candidate } => {
            with_primitive::<Election, _, _, _>(ctx, &target.name, |election| async move {
                Ok(election.evict(candidate).await?)
            })?
        }
    };
    output::print(output::format_term(&term));
    Ok(())
}
