//! Raw-mode terminal setup and threaded stdin input.

use crate::error::{Error, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use crossterm::{cursor, execute, terminal};
use milli_core::{ByteSource, ReadOutcome};
use std::collections::VecDeque;
use std::io::{self, Read};
use std::thread;
use std::time::Duration;

/// Rows taken by the status bar and the message bar.
pub const RESERVED_ROWS: usize = 2;

/// Puts the terminal in raw mode for its lifetime.
///
/// Dropping the guard clears the screen and restores cooked mode, including
/// when the editor exits with an error.
#[derive(Debug)]
pub struct RawTerminal {
    _private: (),
}

impl RawTerminal {
    /// Enables raw mode.
    pub fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        log::debug!("raw mode enabled");
        Ok(Self { _private: () })
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(
            stdout,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
            cursor::Show
        );
        let _ = terminal::disable_raw_mode();
        log::debug!("raw mode disabled");
    }
}

/// Returns the text area size as `(rows, cols)`, excluding the two bars.
pub fn window_size() -> Result<(usize, usize)> {
    let (cols, rows) = terminal::size()?;
    if cols == 0 || usize::from(rows) <= RESERVED_ROWS {
        return Err(Error::TerminalSize { cols, rows });
    }
    Ok((usize::from(rows) - RESERVED_ROWS, usize::from(cols)))
}

/// Stdin bytes delivered by a background reader thread.
///
/// The thread reads in chunks and sends each over a channel. Each call to
/// [`ByteSource::next_byte`] waits at most `timeout` for data.
#[derive(Debug)]
pub struct TerminalInput {
    receiver: Receiver<io::Result<Vec<u8>>>,
    pending: VecDeque<u8>,
    timeout: Duration,
}

impl TerminalInput {
    /// Spawns a reader thread on stdin.
    pub fn spawn(timeout: Duration) -> Self {
        let (sender, receiver) = unbounded();
        let spawned = thread::Builder::new()
            .name("milli-stdin".to_string())
            .spawn(move || read_loop(io::stdin(), sender));
        // Without a reader the channel is already disconnected and the
        // first read reports closed input.
        if let Err(err) = spawned {
            log::error!("failed to spawn stdin reader: {}", err);
        }
        Self::from_receiver(receiver, timeout)
    }

    /// Builds an input over an existing channel.
    pub fn from_receiver(receiver: Receiver<io::Result<Vec<u8>>>, timeout: Duration) -> Self {
        Self {
            receiver,
            pending: VecDeque::new(),
            timeout,
        }
    }
}

fn read_loop<R: Read>(mut reader: R, sender: Sender<io::Result<Vec<u8>>>) {
    let mut chunk = [0u8; 256];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => {
                log::debug!("stdin reached end of input");
                return;
            }
            Ok(n) => {
                if sender.send(Ok(chunk[..n].to_vec())).is_err() {
                    return;
                }
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                let _ = sender.send(Err(err));
                return;
            }
        }
    }
}

impl ByteSource for TerminalInput {
    fn next_byte(&mut self) -> io::Result<ReadOutcome> {
        if let Some(byte) = self.pending.pop_front() {
            return Ok(ReadOutcome::Byte(byte));
        }
        match self.receiver.recv_timeout(self.timeout) {
            Ok(Ok(chunk)) => {
                self.pending.extend(chunk);
                Ok(self
                    .pending
                    .pop_front()
                    .map_or(ReadOutcome::WouldBlock, ReadOutcome::Byte))
            }
            Ok(Err(err)) => Err(err),
            Err(RecvTimeoutError::Timeout) => Ok(ReadOutcome::WouldBlock),
            Err(RecvTimeoutError::Disconnected) => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            )),
        }
    }
}
