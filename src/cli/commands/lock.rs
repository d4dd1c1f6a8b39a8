//! lock command - Acquire, inspect and release a distributed lock

use super::{create_primitive, delete_primitive, with_primitive};
use crate::cli::args::LockAction;
use crate::cli::Context;
use crate::primitive::Lock;
use crate::ui::output;
use anyhow::Result;

/// Run a lock subcommand.
///
/// `lock` waits while another session holds the lock, bounded by
/// `--timeout`. A `--version` on `get` or `unlock` is checked by the
/// service, not locally.
pub fn lock(ctx: &Context, action: LockAction) -> Result<()> {
    match action {
        LockAction::Create(target) => create_primitive::<Lock>(ctx, &target.name),
        LockAction::Lock(target) => {
            let version = with_primitive::<Lock, _, _, _>(ctx, &target.name, |lock| async move {
                Ok(lock.lock().await?)
            })?;
            output::print(version);
            Ok(())
        }
        LockAction::Get { target, version } => {
            let locked = with_primitive::<Lock, _, _, _>(ctx, &target.name, |lock| async move {
                Ok(lock.is_locked(version).await?)
            })?;
            output::print(locked);
            Ok(())
        }
        LockAction::Unlock { target, version } => {
            let unlocked = with_primitive::<Lock, _, _, _>(ctx, &target.name, |lock| async move {
                Ok(lock.unlock(version).await?)
            })?;
            output::print(unlocked);
            Ok(())
        }
        LockAction::Delete(target) => delete_primitive::<Lock>(ctx, &target.name),
    }
}
