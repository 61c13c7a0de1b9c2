//! Record handlers: record to a cast file, or record and render in one go.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use anyhow::{Context, Result};
use terminal_size::{terminal_size, Height, Width};

use termsvg::cli::GlobalArgs;
use termsvg::recording::{
    spawn_input_forwarder, CastSink, ChannelSink, ChannelSource, Chunk, PtySession, ReaderSource,
    RecordSink,
};
use termsvg::{render_log, Config, Header, Recorder, RecordingSummary};

/// Record a session to a cast file.
pub fn handle_record(output: Option<PathBuf>, global: &GlobalArgs, config: &Config) -> Result<()> {
    let output = output.unwrap_or_else(|| super::default_output("cast"));

    eprintln!("Recording started, enter \"exit\" command or Control-D to end");
    let summary = record_session(
        || {
            let file = File::create(&output)
                .with_context(|| format!("Failed to create file: {:?}", output))?;
            Ok(CastSink::new(BufWriter::new(file)))
        },
        global,
        config,
    )?;
    eprintln!("Recording ended ({summary}), cast file is {}", output.display());
    Ok(())
}

/// Record a session into memory and render it straight to SVG.
pub fn handle_record_and_render(
    output: Option<PathBuf>,
    global: &GlobalArgs,
    config: &Config,
) -> Result<()> {
    let output = output.unwrap_or_else(|| super::default_output("svg"));
    let (tx, rx) = std::sync::mpsc::channel();

    eprintln!("Recording started, enter \"exit\" command or Control-D to end");
    let summary = record_session(|| Ok(ChannelSink::new(tx)), global, config)?;
    eprintln!("Recording ended ({summary})");

    let log = ChannelSource::new(rx)
        .into_log()
        .context("Failed to collect recording")?;
    let svg = render_log(&log, &super::render_options(global, config))?;
    std::fs::write(&output, svg).with_context(|| format!("Failed to write SVG: {:?}", output))?;
    eprintln!("Rendering ended, SVG animation is {}", output.display());
    Ok(())
}

/// Shell to record: command line, then config, then `$SHELL`, then `/bin/sh`.
fn session_command(global: &GlobalArgs, config: &Config) -> String {
    global
        .command
        .clone()
        .or_else(|| config.record.command.clone())
        .or_else(|| std::env::var("SHELL").ok().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "/bin/sh".to_string())
}

fn current_size() -> (u16, u16) {
    match terminal_size() {
        Some((Width(cols), Height(rows))) if cols > 0 && rows > 0 => (cols, rows),
        _ => (80, 24),
    }
}

/// Run the session on a pty until it exits or Ctrl-C is received.
///
/// The sink is only opened once the session is running, so a session that
/// fails to start leaves no output behind.
#[cfg(not(tarpaulin_include))]
fn record_session<K: RecordSink>(
    open_sink: impl FnOnce() -> Result<K>,
    global: &GlobalArgs,
    config: &Config,
) -> Result<RecordingSummary> {
    let command = session_command(global, config);
    let (cols, rows) = current_size();
    let header = Header {
        cols,
        rows,
        timestamp: u64::try_from(chrono::Utc::now().timestamp()).ok(),
        theme: Some(super::theme(global, config)),
        idle_time_limit: config.record.idle_time_limit,
        command: Some(command.clone()),
        ..Header::default()
    };

    let mut pty = PtySession::spawn(&command, cols, rows)?;
    let sink = match open_sink() {
        Ok(sink) => sink,
        Err(e) => {
            pty.kill();
            return Err(e);
        }
    };
    let source = pty.reader()?;
    let recorder = Recorder::new(header, sink)
        .passthrough(io::stdout())
        .record_input(global.record_input || config.record.record_input);

    let interrupt = recorder.interrupt_flag();
    if let Err(e) = ctrlc::set_handler(move || interrupt.store(true, Ordering::SeqCst)) {
        tracing::debug!(error = %e, "could not install Ctrl-C handler");
    }

    spawn_input_forwarder(ReaderSource::new(io::stdin()), pty.writer()?, recorder.sender());

    let summary = {
        let _raw = RawModeGuard::enable()?;
        let _resize = ResizeWatcher::start(&pty, recorder.sender());
        recorder.run(source)?
    };

    if summary.interrupted {
        pty.kill();
    }
    match pty.wait() {
        Ok(code) => tracing::debug!(code, "session exited"),
        Err(e) => tracing::debug!(error = %e, "could not collect session status"),
    }
    Ok(summary)
}

/// Puts the user's terminal in raw mode while recording, if it is one.
struct RawModeGuard {
    enabled: bool,
}

impl RawModeGuard {
    fn enable() -> Result<Self> {
        let enabled = atty::is(atty::Stream::Stdin);
        if enabled {
            crossterm::terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        }
        Ok(Self { enabled })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.enabled {
            let _ = crossterm::terminal::disable_raw_mode();
        }
    }
}

/// Forwards terminal size changes (SIGWINCH) to the pty and the recorder.
#[cfg(unix)]
struct ResizeWatcher {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl ResizeWatcher {
    fn start(pty: &PtySession, tx: std::sync::mpsc::Sender<Chunk>) -> Option<Self> {
        use signal_hook::consts::signal::SIGWINCH;
        use signal_hook::iterator::Signals;

        let mut signals = match Signals::new([SIGWINCH]) {
            Ok(signals) => signals,
            Err(e) => {
                tracing::debug!(error = %e, "resize tracking disabled");
                return None;
            }
        };
        let handle = signals.handle();
        let resizer = pty.resizer();
        let thread = std::thread::spawn(move || {
            for _ in signals.forever() {
                let (cols, rows) = current_size();
                if let Err(e) = resizer.resize(cols, rows) {
                    tracing::debug!(error = %e, "pty resize failed");
                }
                if tx.send(Chunk::Resize { cols, rows }).is_err() {
                    break;
                }
            }
        });

        Some(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(not(unix))]
struct ResizeWatcher;

#[cfg(not(unix))]
impl ResizeWatcher {
    fn start(_pty: &PtySession, _tx: std::sync::mpsc::Sender<Chunk>) -> Option<Self> {
        None
    }
}
