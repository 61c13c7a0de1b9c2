//! Command-line interface definition.
//!
//! Lives in the library so `xtask` can build the man page from it.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Record terminal sessions and render them as standalone animated SVG.
#[derive(Debug, Parser)]
#[command(
    name = "termsvg",
    version,
    about,
    long_about = "Record terminal sessions and render them as standalone animated SVG.\n\n\
                  Without a subcommand, records a session and renders it straight to SVG.\n\
                  Use `record` to keep a cast log and `render` to turn one into SVG later.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output SVG file (default: termsvg_<timestamp>.svg in the temp directory)
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options accepted by every command.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Color theme: a built-in name, or `auto` to query the display
    #[arg(short, long, global = true, value_name = "NAME")]
    pub theme: Option<String>,

    /// Log debug information to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Loop the animation instead of stopping on the last frame
    #[arg(long = "loop", global = true)]
    pub looping: bool,

    /// Skip malformed cast records instead of failing
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Program to record (default: $SHELL, then /bin/sh)
    #[arg(short, long, global = true, value_name = "CMD")]
    pub command: Option<String>,

    /// Also record keyboard input
    #[arg(long, global = true)]
    pub record_input: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a session to a cast log
    Record {
        /// Output cast file (default: termsvg_<timestamp>.cast in the temp directory)
        output: Option<PathBuf>,
    },

    /// Render a cast log to SVG
    Render {
        /// Cast log to render
        input: PathBuf,

        /// Output SVG file (default: the input path with an .svg extension)
        output: Option<PathBuf>,
    },

    /// List built-in themes
    Themes,

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file location
    Path,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
