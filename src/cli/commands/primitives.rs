//! primitives command - List primitives in the effective group

use crate::cli::Context;
use crate::core::timeout::TimeoutContext;
use crate::core::types::PrimitiveKind;
use crate::error::CliError;
use crate::ui::output;
use anyhow::Result;

/// List primitives, optionally of one kind.
///
/// The first column is the bare primitive name so the completion helpers
/// can feed it straight back into `--name`.
pub fn primitives(ctx: &Context, kind: Option<PrimitiveKind>, no_headers: bool) -> Result<()> {
    let resolver = ctx.resolver();
    let group = resolver.resolve_group(None)?;
    let timeout = resolver.timeout();

    let mut found = ctx.block_on(resolver.with_session(&group, |session| async move {
        let tctx = TimeoutContext::new(timeout);
        tctx.run(session.list_primitives(&tctx, kind))
            .await
            .map_err(CliError::from)
    }))??;
    found.sort_by(|a, b| a.name.cmp(&b.name));

    let rows: Vec<Vec<String>> = found
        .iter()
        .map(|info| vec![info.name.name.clone(), info.kind.to_string()])
        .collect();
    print!("{}", output::format_table(&["NAME", "TYPE"], &rows, !no_headers));
    Ok(())
}
