//! counter command - Manage a distributed counter

use super::{create_primitive, delete_primitive, with_primitive};
use crate::cli::args::CounterAction;
use crate::cli::Context;
use crate::primitive::Counter;
use crate::ui::output;
use anyhow::Result;

/// Run a counter subcommand; every verb but create/delete prints the value.
pub fn counter(ctx: &Context, action: CounterAction) -> Result<()> {
    let value = match action {
        CounterAction::Create(target) => return create_primitive::<Counter>(ctx, &target.name),
        CounterAction::Delete(target) => return delete_primitive::<Counter>(ctx, &target.name),
        CounterAction::Get(target) => {
            with_primitive::<Counter, _, _, _>(ctx, &target.name, |counter| async move {
                Ok(counter.get().await?)
            })?
        }
        CounterAction::Set { target, value } => {
            with_primitive::<Counter, _, _, _>(ctx, &target.name, |counter| async move {
                Ok(counter.set(value).await?)
            })?
        }
        CounterAction::Increment { target, delta } => {
            with_primitive::<Counter, _, _, _>(ctx, &target.name, |counter| async move {
                Ok(counter.increment(delta).await?)
            })?
        }
        CounterAction::Decrement { target, delta } => {
            with_primitive::<Counter, _, _, _>(ctx, &target.name, |counter| async move {
                Ok(counter.decrement(delta).await?)
            })?
        }
    };
    output::print(value);
    Ok(())
}
