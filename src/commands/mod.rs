//! Command handlers for the binary.

pub mod config;
pub mod record;
pub mod render;
pub mod themes;

use std::path::PathBuf;

use termsvg::cli::GlobalArgs;
use termsvg::render::RenderOptions;
use termsvg::theme::{resolve_theme, Theme, XResources};
use termsvg::Config;

/// `termsvg_<timestamp>.<extension>` in the temp directory.
pub fn default_output(extension: &str) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    std::env::temp_dir().join(format!("termsvg_{stamp}.{extension}"))
}

/// Theme from the command line, then the config file.
pub fn theme(global: &GlobalArgs, config: &Config) -> Theme {
    let name = global.theme.as_deref().unwrap_or(&config.theme);
    resolve_theme(Some(name), &XResources::new())
}

/// Render options from the config file with command-line overrides.
pub fn render_options(global: &GlobalArgs, config: &Config) -> RenderOptions {
    let mut options = config.render.options();
    options.looping |= global.looping;
    options
}
