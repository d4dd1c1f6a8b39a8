//! list command - Manage a distributed list

use super::{create_primitive, delete_primitive, with_primitive};
use crate::cli::args::ListAction;
use crate::cli::Context;
use crate::primitive::List;
use crate::ui::output;
use anyhow::Result;

/// Run a list subcommand.
pub fn list(ctx: &Context, action: ListAction) -> Result<()> {
    match action {
        ListAction::Create(target) => create_primitive::<List>(ctx, &target.name),
        ListAction::Append { target, value } => {
            with_primitive::<List, _, _, _>(ctx, &target.name, |list| async move {
                Ok(list.append(value).await?)
            })
        }
        ListAction::Insert {
            target,
            index,
            value,
        } => with_primitive::<List, _, _, _>(ctx, &target.name, |list| async move {
            Ok(list.insert(index, value).await?)
        }),
        ListAction::Get { target, index } => {
            let value = with_primitive::<List, _, _, _>(ctx, &target.name, |list| async move {
                Ok(list.get(index).await?)
            })?;
            output::print(value.unwrap_or_default());
            Ok(())
        }
        ListAction::Remove { target, index } => {
            let value = with_primitive::<List, _, _, _>(ctx, &target.name, |list| async move {
                Ok(list.remove(index).await?)
            })?;
            output::print(value.unwrap_or_default());
            Ok(())
        }
        ListAction::Items(target) => {
            let items = with_primitive::<List, _, _, _>(ctx, &target.name, |list| async move {
                Ok(list.items().await?)
            })?;
            output::print_lines(&items);
            Ok(())
        }
        ListAction::Size(target) => {
            let size = with_primitive::<List, _, _, _>(ctx, &target.name, |list| async move {
                Ok(list.size().await?)
            })?;
            output::print(size);
            Ok(())
        }
        ListAction::Clear(target) => with_primitive::<List, _, _, _>(ctx, &target.name, |list| {
            async move { Ok(list.clear().await?) }
        }),
        ListAction::Delete(target) => delete_primitive::<List>(ctx, &target.name),
    }
}
