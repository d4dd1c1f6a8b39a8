//! map command - Manage a distributed map

use super::{create_primitive, delete_primitive, with_primitive};
use crate::cli::args::MapAction;
use crate::cli::Context;
use crate::primitive::Map;
use crate::ui::output;
use anyhow::Result;

/// Run a map subcommand.
///
/// `put` prints the entry's new version; `get` and `remove` print the
/// value, or an empty line when the key is absent.
pub fn map(ctx: &Context, action: MapAction) -> Result<()> {
    match action {
        MapAction::Create(target) => create_primitive::<Map>(ctx, &target.name),
        MapAction::Put {
            target,
            key,
            value,
            version,
        } => {
            let entry = with_primitive::<Map, _, _, _>(ctx, &target.name, |map| async move {
                Ok(map.put(key, value, version).await?)
            })?;
            output::print(entry.version);
            Ok(())
        }
        MapAction::Get { target, key } => {
            let entry = with_primitive::<Map, _, _, _>(ctx, &target.name, |map| async move {
                Ok(map.get(key).await?)
            })?;
            output::print(entry.map(|e| e.value).unwrap_or_default());
            Ok(())
        }
        MapAction::Remove {
            target,
            key,
            version,
        } => {
            let entry = with_primitive::<Map, _, _, _>(ctx, &target.name, |map| async move {
                Ok(map.remove(key, version).await?)
            })?;
            output::print(entry.map(|e| e.value).unwrap_or_default());
            Ok(())
        }
        MapAction::Keys(target) => {
            let keys = with_primitive::<Map, _, _, _>(ctx, &target.name, |map| async move {
                Ok(map.keys().await?)
            })?;
            output::print_lines(&keys);
            Ok(())
        }
        MapAction::Size(target) => {
            let size = with_primitive::<Map, _, _, _>(ctx, &target.name, |map| async move {
                Ok(map.size().await?)
            })?;
            output::print(size);
            Ok(())
        }
        MapAction::Clear(target) => with_primitive::<Map, _, _, _>(ctx, &target.name, |map| {
            async move { Ok(map.clear().await?) }
        }),
        MapAction::Delete(target) => delete_primitive::<Map>(ctx, &target.name),
    }
}
