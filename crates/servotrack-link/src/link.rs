//! Outbound command transmission.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::context::LinkContext;
use crate::protocol::{completion_token, Command, Completion};
use crate::transport::Transport;
use crate::LinkError;

/// Timing bounds for discrete-move acknowledgment waits.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LinkParams {
    /// How long to wait for `DONE`/`ERR` before abandoning a discrete move.
    pub response_timeout: Duration,
    /// Inbound polling cadence during the wait.
    pub poll_interval: Duration,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            response_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(10),
        }
    }
}

/// How a transmission concluded. Only transport faults are `Err`; peer
/// errors and timeouts are soft outcomes the loop continues past.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SendOutcome {
    /// Fire-and-forget command written.
    Sent,
    /// Discrete move acknowledged with `DONE`.
    Completed,
    /// Peer reported `ERR`; the move is abandoned, not retried.
    PeerError,
    /// No terminal token within the timeout; the move is abandoned.
    TimedOut,
}

/// The single writer on the serial line.
///
/// Discrete moves and concurrent telemetry ingestion are mutually
/// exclusive: a blocking wait would race the reader for inbound bytes, so
/// `send` refuses discrete commands while a reader is attached.
pub struct CommandLink<T: Transport> {
    ctx: Arc<LinkContext<T>>,
    params: LinkParams,
    reader_attached: Arc<AtomicBool>,
}

impl<T: Transport> CommandLink<T> {
    pub fn new(ctx: Arc<LinkContext<T>>, params: LinkParams) -> Self {
        Self {
            ctx,
            params,
            reader_attached: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn context(&self) -> &Arc<LinkContext<T>> {
        &self.ctx
    }

    pub(crate) fn reader_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.reader_attached)
    }

    /// Transmit one command.
    ///
    /// Continuous commands drain stale inbound bytes first so a buffered
    /// response cannot corrupt a later read, then return immediately.
    /// Discrete commands poll for a terminal token until the timeout.
    pub fn send(&mut self, command: &Command) -> Result<SendOutcome, LinkError> {
        if command.awaits_completion() && self.reader_attached.load(Ordering::Acquire) {
            return Err(LinkError::DiscreteWithReader);
        }

        let line = command.encode();
        {
            let mut transport = self.ctx.lock_transport();
            transport.drain_input()?;
            transport.write_all(line.as_bytes())?;
        }
        debug!("sent {:?}", line.trim_end());

        if !command.awaits_completion() {
            return Ok(SendOutcome::Sent);
        }
        self.await_completion()
    }

    fn await_completion(&mut self) -> Result<SendOutcome, LinkError> {
        let deadline = Instant::now() + self.params.response_timeout;
        let mut pending = Vec::new();
        let mut chunk = [0u8; 256];

        loop {
            {
                let mut transport = self.ctx.lock_transport();
                let read = transport.read_available(&mut chunk)?;
                pending.extend_from_slice(&chunk[..read]);
            }

            while let Some(pos) = pending.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = pending.drain(..=pos).collect();
                let line = String::from_utf8_lossy(&line);
                match completion_token(&line) {
                    Some(Completion::Done) => return Ok(SendOutcome::Completed),
                    Some(Completion::Err) => {
                        warn!("peer reported an error: {:?}", line.trim_end());
                        return Ok(SendOutcome::PeerError);
                    }
                    None => {}
                }
            }

            if Instant::now() >= deadline {
                warn!(
                    "no completion within {:?}, abandoning move",
                    self.params.response_timeout
                );
                return Ok(SendOutcome::TimedOut);
            }
            std::thread::sleep(self.params.poll_interval);
        }
    }
}
