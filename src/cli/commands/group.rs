//! group commands - Inspect, create, delete and select partition groups

use crate::cli::args::GroupAction;
use crate::cli::Context;
use crate::client::{interruptible, GroupSpec, Protocol};
use crate::core::config::ConfigKey;
use crate::error::CliError;
use crate::ui::output;
use anyhow::Result;
use tracing::debug;

const GROUP_HEADERS: [&str; 3] = ["NAME", "PARTITIONS", "SIZE"];

/// Dispatch a group subcommand; no subcommand shows the default group.
pub fn group(ctx: &Context, action: Option<GroupAction>) -> Result<()> {
    match action.unwrap_or(GroupAction::Get { name: None }) {
        GroupAction::Get { name } => get(ctx, name.as_deref()),
        GroupAction::Set { name } => set_default(ctx, &name),
        GroupAction::Create {
            name,
            protocol,
            partitions,
            partition_size,
        } => create(
            ctx,
            &name,
            GroupSpec {
                protocol: Protocol::from(protocol),
                partitions,
                partition_size,
            },
        ),
        GroupAction::Delete { name } => delete(ctx, &name),
    }
}

/// List the groups in the effective namespace.
pub fn groups(ctx: &Context, no_headers: bool) -> Result<()> {
    let resolver = ctx.resolver();
    let namespace = resolver.namespace()?;

    let groups = ctx.block_on(interruptible(async {
        let controller = resolver.controller()?;
        let tctx = resolver.context();
        tctx.run(controller.list_groups(&tctx, &namespace))
            .await
            .map_err(CliError::from)
    }))??;

    let rows: Vec<Vec<String>> = groups
        .iter()
        .map(|g| {
            vec![
                g.name.clone(),
                g.partitions.to_string(),
                g.partition_size.to_string(),
            ]
        })
        .collect();
    print!("{}", output::format_table(&GROUP_HEADERS, &rows, !no_headers));
    Ok(())
}

fn get(ctx: &Context, name: Option<&str>) -> Result<()> {
    let resolver = ctx.resolver();
    let reference = resolver.resolve_group(name)?;
    debug!(group = %reference, "resolved group");

    let group = ctx.block_on(interruptible(async {
        let controller = resolver.connect(&reference.controller)?;
        let tctx = resolver.context();
        tctx.run(controller.get_group(&tctx, &reference))
            .await
            .map_err(CliError::from)
    }))??;

    output::print(output::format_group(&group));
    Ok(())
}

/// Persist the default group; a `namespace.group` name also sets the
/// default namespace.
fn set_default(ctx: &Context, name: &str) -> Result<()> {
    let reference = ctx.resolver().resolve_group(Some(name))?;
    let qualified = name.trim().contains('.');

    let mut config = ctx.config.clone();
    config.set(ConfigKey::Group, reference.name.as_str())?;
    if qualified {
        config.set(ConfigKey::Namespace, reference.namespace.as_str())?;
    }
    let path = config.flush()?;
    debug!(group = %reference, path = %path.display(), "default group updated");

    if qualified {
        output::print(&reference);
    } else {
        output::print(&reference.name);
    }
    Ok(())
}

fn create(ctx: &Context, name: &str, spec: GroupSpec) -> Result<()> {
    let resolver = ctx.resolver();
    let reference = resolver.resolve_group(Some(name))?;
    debug!(
        group = %reference,
        protocol = spec.protocol.name(),
        partitions = spec.partitions,
        partition_size = spec.partition_size,
        "creating group"
    );

    let group = ctx.block_on(interruptible(async {
        let controller = resolver.connect(&reference.controller)?;
        let tctx = resolver.context();
        tctx.run(controller.create_group(&tctx, &reference, spec))
            .await
            .map_err(CliError::from)
    }))??;

    output::print(output::format_group(&group));
    Ok(())
}

fn delete(ctx: &Context, name: &str) -> Result<()> {
    let resolver = ctx.resolver();
    let reference = resolver.resolve_group(Some(name))?;

    ctx.block_on(interruptible(async {
        let controller = resolver.connect(&reference.controller)?;
        let tctx = resolver.context();
        tctx.run(controller.delete_group(&tctx, &reference))
            .await
            .map_err(CliError::from)
    }))??;

    debug!(group = %reference, "deleted group");
    Ok(())
}
