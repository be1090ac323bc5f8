//! Concurrent IMU telemetry ingestion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};

use crate::context::LinkContext;
use crate::link::CommandLink;
use crate::protocol::parse_heading;
use crate::transport::Transport;

const READ_POLL: Duration = Duration::from_millis(10);

/// Background thread parsing `IMU,<yaw>` lines into the shared heading
/// sample for the lifetime of a session.
///
/// A stream or read fault terminates the reader but never the control
/// loop; the last published heading stays readable, and the controller
/// degrades to vision-only if no sample ever arrived.
pub struct TelemetryReader<T: Transport> {
    ctx: Arc<LinkContext<T>>,
    handle: Option<JoinHandle<()>>,
    attached: Arc<AtomicBool>,
}

impl<T: Transport + 'static> TelemetryReader<T> {
    /// Start the reader on `link`'s context and mark the inbound stream as
    /// owned, which makes the link refuse blocking discrete moves.
    pub fn spawn(link: &CommandLink<T>) -> Self {
        let ctx = Arc::clone(link.context());
        let attached = link.reader_flag();
        attached.store(true, Ordering::Release);

        let thread_ctx = Arc::clone(&ctx);
        let handle = thread::spawn(move || read_loop(&thread_ctx));
        Self {
            ctx,
            handle: Some(handle),
            attached,
        }
    }

    /// Signal shutdown and wait for the thread to exit.
    ///
    /// The wait is bounded: every port read inside the loop is itself
    /// bounded, so the thread observes the stop flag within one poll.
    pub fn stop_and_join(mut self) {
        self.ctx.request_stop();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("telemetry reader panicked");
            }
        }
        self.attached.store(false, Ordering::Release);
    }
}

impl<T: Transport> Drop for TelemetryReader<T> {
    fn drop(&mut self) {
        self.ctx.request_stop();
    }
}

fn read_loop<T: Transport>(ctx: &LinkContext<T>) {
    info!("telemetry reader started");
    let mut pending = Vec::new();
    let mut chunk = [0u8; 256];

    while !ctx.stop_requested() {
        let read = {
            let mut transport = ctx.lock_transport();
            match transport.read_available(&mut chunk) {
                Ok(n) => n,
                Err(e) => {
                    warn!("telemetry read failed, reader stopping: {e}");
                    return;
                }
            }
        };
        pending.extend_from_slice(&chunk[..read]);

        while let Some(pos) = pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = pending.drain(..=pos).collect();
            // Malformed lines are dropped without comment.
            if let Ok(text) = std::str::from_utf8(&line) {
                if let Some(yaw) = parse_heading(text) {
                    ctx.publish_heading(yaw);
                }
            }
        }

        if read == 0 {
            thread::sleep(READ_POLL);
        }
    }
    debug!("telemetry reader stopped");
}
