//! set command - Manage a distributed set

use super::{create_primitive, delete_primitive, with_primitive};
use crate::cli::args::SetAction;
use crate::cli::Context;
use crate::primitive::Set;
use crate::ui::output;
use anyhow::Result;

/// Run a set subcommand.
pub fn set(ctx: &Context, action: SetAction) -> Result<()> {
    match action {
        SetAction::Create(target) => create_primitive::<Set>(ctx, &target.name),
        SetAction::Add { target, value } => {
            let added = with_primitive::<Set, _, _, _>(ctx, &target.name, |set| async move {
                Ok(set.add(value).await?)
            })?;
            output::print(added);
            Ok(())
        }
        SetAction::Contains { target, value } => {
            let contains = with_primitive::<Set, _, _, _>(ctx, &target.name, |set| async move {
                Ok(set.contains(value).await?)
            })?;
            output::print(contains);
            Ok(())
        }
        SetAction::Remove { target, value } => {
            let removed = with_primitive::<Set, _, _, _>(ctx, &target.name, |set| async move {
                Ok(set.remove(value).await?)
            })?;
            output::print(removed);
            Ok(())
        }
        SetAction::Size(target) => {
            let size = with_primitive::<Set, _, _, _>(ctx, &target.name, |set| async move {
                Ok(set.size().await?)
            })?;
            output::print(size);
            Ok(())
        }
        SetAction::Clear(target) => with_primitive::<Set, _, _, _>(ctx, &target.name, |set| {
            async move { Ok(set.clear().await?) }
        }),
        SetAction::Delete(target) => delete_primitive::<Set>(ctx, &target.name),
    }
}
