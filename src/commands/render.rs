//! Render subcommand handler

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use termsvg::cli::GlobalArgs;
use termsvg::{render_log, CastLog, Config};

/// Render a cast file to SVG.
///
/// The document is built in memory and written only once rendering has
/// succeeded, so a failed render leaves no output file behind.
pub fn handle_render(
    input: &Path,
    output: Option<PathBuf>,
    global: &GlobalArgs,
    config: &Config,
) -> Result<()> {
    let log = CastLog::parse(input, global.lenient)?;

    let mut options = super::render_options(global, config);
    // The recorded theme stands unless one is asked for
    if global.theme.is_some() || log.header.theme.is_none() {
        options.theme = Some(super::theme(global, config));
    }
    let svg = render_log(&log, &options)?;

    let output = output.unwrap_or_else(|| input.with_extension("svg"));
    fs::write(&output, svg).with_context(|| format!("Failed to write SVG: {:?}", output))?;
    eprintln!("Rendering ended, SVG animation is {}", output.display());
    Ok(())
}
