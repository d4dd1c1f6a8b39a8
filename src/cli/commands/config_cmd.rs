//! config command - Get, set, or delete configuration values

use crate::cli::Context;
use crate::core::config::ConfigKey;
use crate::ui::output;
use anyhow::Result;
use tracing::debug;

/// Print a configuration value, or an empty line when unset.
pub fn get(ctx: &Context, key: ConfigKey) -> Result<()> {
    output::print(ctx.config.get(key).unwrap_or_default());
    Ok(())
}

/// Set a configuration value and write the file.
pub fn set(ctx: &Context, key: ConfigKey, value: &str) -> Result<()> {
    let mut config = ctx.config.clone();
    config.set(key, value)?;
    let path = config.flush()?;
    debug!(key = key.as_str(), path = %path.display(), "config updated");

    output::print(value);
    Ok(())
}

/// Delete a configuration value and write the file.
///
/// Prints the value left behind, which is always empty.
pub fn delete(ctx: &Context, key: ConfigKey) -> Result<()> {
    let mut config = ctx.config.clone();
    config.delete(key);
    let path = config.flush()?;
    debug!(key = key.as_str(), path = %path.display(), "config updated");

    output::print(config.get(key).unwrap_or_default());
    Ok(())
}
