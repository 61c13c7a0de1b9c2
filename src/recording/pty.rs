//! A shell running on a pseudo-terminal.

use std::io::{Read, Write};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Context, Result};
use portable_pty::{Child, CommandBuilder, MasterPty, NativePtySystem, PtyPair, PtySize, PtySystem};

use super::source::ReaderSource;

type SharedMaster = Arc<Mutex<Box<dyn MasterPty + Send>>>;

/// A child process attached to a freshly allocated pty.
pub struct PtySession {
    master: SharedMaster,
    child: Box<dyn Child + Send + Sync>,
}

impl std::fmt::Debug for PtySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtySession")
            .field("master", &"Box<dyn MasterPty>")
            .field("child", &"Box<dyn Child>")
            .finish()
    }
}

impl PtySession {
    /// Spawn `command` (a program followed by whitespace-separated
    /// arguments) on a `cols` x `rows` pty.
    pub fn spawn(command: &str, cols: u16, rows: u16) -> Result<Self> {
        let mut words = command.split_whitespace();
        let Some(program) = words.next() else {
            bail!("Empty command");
        };
        let mut cmd = CommandBuilder::new(program);
        cmd.args(words);
        if std::env::var_os("TERM").is_none() {
            cmd.env("TERM", "xterm-256color");
        }
        if let Ok(cwd) = std::env::current_dir() {
            cmd.cwd(cwd);
        }

        let pty_system = NativePtySystem::default();
        let PtyPair { master, slave } = pty_system
            .openpty(pty_size(cols, rows))
            .context("Failed to open PTY")?;

        let child = slave
            .spawn_command(cmd)
            .with_context(|| format!("Failed to spawn '{}'", command))?;
        // The reader only sees EOF once every slave handle is closed
        drop(slave);

        tracing::debug!(command, cols, rows, "spawned session");
        Ok(Self {
            master: Arc::new(Mutex::new(master)),
            child,
        })
    }

    /// Byte source reading the session's output.
    pub fn reader(&self) -> Result<ReaderSource<Box<dyn Read + Send>>> {
        let reader = lock(&self.master)?
            .try_clone_reader()
            .context("Failed to clone PTY reader")?;
        Ok(ReaderSource::new(reader))
    }

    /// Writer feeding the session's input. Can only be taken once.
    pub fn writer(&self) -> Result<Box<dyn Write + Send>> {
        lock(&self.master)?
            .take_writer()
            .context("Failed to take PTY writer")
    }

    /// Handle that can resize the pty from another thread.
    pub fn resizer(&self) -> PtyResizer {
        PtyResizer {
            master: Arc::clone(&self.master),
        }
    }

    /// Wait for the child and return its exit code.
    pub fn wait(&mut self) -> Result<u32> {
        let status = self.child.wait().context("Failed to wait for session")?;
        Ok(status.exit_code())
    }

    /// Kill the child if it is still running.
    pub fn kill(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            if let Err(e) = self.child.kill() {
                tracing::debug!(error = %e, "failed to kill session");
            }
        }
    }
}

/// Resizes a [`PtySession`]'s terminal.
#[derive(Clone)]
pub struct PtyResizer {
    master: SharedMaster,
}

impl PtyResizer {
    pub fn resize(&self, cols: u16, rows: u16) -> Result<()> {
        lock(&self.master)?
            .resize(pty_size(cols, rows))
            .context("Failed to resize PTY")
    }
}

fn lock(master: &SharedMaster) -> Result<std::sync::MutexGuard<'_, Box<dyn MasterPty + Send>>> {
    master.lock().map_err(|_| anyhow!("PTY lock poisoned"))
}

fn pty_size(cols: u16, rows: u16) -> PtySize {
    PtySize {
        rows,
        cols,
        pixel_width: 0,
        pixel_height: 0,
    }
}
