//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves names and groups through the context's resolver
//! 2. Issues its remote calls, each under its own timeout
//! 3. Prints the result to stdout
//!
//! Handlers are synchronous; the ones that talk to the cluster drive their
//! async body with [`Context::block_on`].

mod completion;
mod config_cmd;
mod counter;
mod election;
mod group;
mod list;
mod lock;
mod map;
mod primitives;
mod set;

pub use completion::completion;
pub use config_cmd::{delete as config_delete, get as config_get, set as config_set};
pub use counter::counter;
pub use election::election;
pub use group::{group, groups};
pub use list::list;
pub use lock::lock;
pub use map::map;
pub use primitives::primitives;
pub use set::set;

use crate::cli::args::{Command, ConfigAction};
use crate::cli::Context;
use crate::error::CliError;
use crate::primitive::{self, Primitive, PrimitiveHandle};
use crate::ui::output;
use anyhow::Result;
use std::future::Future;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Config { action } => match action {
            ConfigAction::Get { key } => config_get(ctx, key),
            ConfigAction::Set { key, value } => config_set(ctx, key, &value),
            ConfigAction::Delete { key } => config_delete(ctx, key),
        },
        Command::Group { action } => group(ctx, action),
        Command::Groups { no_headers } => groups(ctx, no_headers),
        Command::Primitives { kind, no_headers } => primitives(ctx, kind, no_headers),
        Command::Lock { action } => lock(ctx, action),
        Command::Set { action } => set(ctx, action),
        Command::Map { action } => map(ctx, action),
        Command::Counter { action } => counter(ctx, action),
        Command::List { action } => list(ctx, action),
        Command::Election { action } => election(ctx, action),
        Command::Completion { shell } => completion(&shell),
    }
}

/// Open (or create) a primitive and report its full name.
fn create_primitive<P: Primitive>(ctx: &Context, raw_name: &str) -> Result<()> {
    let resolver = ctx.resolver();
    let name = ctx.block_on(primitive::create::<P>(&resolver, raw_name))??;
    output::print(format!("Created {}", name));
    Ok(())
}

/// Delete a primitive and report its full name.
fn delete_primitive<P: Primitive>(ctx: &Context, raw_name: &str) -> Result<()> {
    let resolver = ctx.resolver();
    let name = ctx.block_on(primitive::delete::<P>(&resolver, raw_name))??;
    output::print(format!("Deleted {}", name));
    Ok(())
}

/// Run `body` against an open primitive and return its result.
fn with_primitive<P, T, F, Fut>(ctx: &Context, raw_name: &str, body: F) -> Result<T>
where
    P: Primitive,
    F: FnOnce(PrimitiveHandle<P>) -> Fut,
    Fut: Future<Output = Result<T, CliError>>,
{
    let resolver = ctx.resolver();
    let value = ctx.block_on(primitive::run::<P, T, F, Fut>(&resolver, raw_name, body))??;
    Ok(value)
}
