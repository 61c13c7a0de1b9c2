use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use termsvg::cli::{Cli, Commands, ConfigCommands};
use termsvg::Config;

mod commands;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG` when set.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        output,
        global,
    } = cli;

    match command {
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => commands::config::handle_show(),
            ConfigCommands::Path => commands::config::handle_path(),
            ConfigCommands::Init { force } => commands::config::handle_init(force),
        },
        Some(Commands::Themes) => {
            commands::themes::handle_themes();
            Ok(())
        }
        Some(Commands::Record { output }) => {
            let config = Config::load()?;
            commands::record::handle_record(output, &global, &config)
        }
        Some(Commands::Render { input, output }) => {
            let config = Config::load()?;
            commands::render::handle_render(&input, output, &global, &config)
        }
        None => {
            let config = Config::load()?;
            commands::record::handle_record_and_render(output, &global, &config)
        }
    }
}
