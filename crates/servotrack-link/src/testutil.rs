//! Scripted in-memory transport for link and telemetry tests.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::transport::Transport;

/// Clone-able fake: every clone shares the same buffers, so tests keep a
/// handle after moving the transport into a `LinkContext`.
#[derive(Clone, Default)]
pub(crate) struct FakeTransport {
    inbound: Arc<Mutex<VecDeque<Vec<u8>>>>,
    staged: Arc<Mutex<VecDeque<Vec<u8>>>>,
    written: Arc<Mutex<Vec<u8>>>,
    drained: Arc<AtomicBool>,
    fail_next_write: Arc<AtomicBool>,
    fail_next_read: Arc<AtomicBool>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes that are immediately readable.
    pub fn push_inbound(&self, bytes: &[u8]) {
        self.inbound.lock().unwrap().push_back(bytes.to_vec());
    }

    /// Queue bytes that become readable only after the next write, like a
    /// peer responding to a command.
    pub fn push_inbound_after_write(&self, bytes: &[u8]) {
        self.staged.lock().unwrap().push_back(bytes.to_vec());
    }

    pub fn take_written_string(&self) -> String {
        let mut written = self.written.lock().unwrap();
        String::from_utf8_lossy(&std::mem::take(&mut *written)).into_owned()
    }

    pub fn was_drained(&self) -> bool {
        self.drained.load(Ordering::Acquire)
    }

    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, Ordering::Release);
    }

    pub fn fail_next_read(&self) {
        self.fail_next_read.store(true, Ordering::Release);
    }
}

impl Transport for FakeTransport {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.fail_next_write.swap(false, Ordering::AcqRel) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "scripted fault"));
        }
        self.written.lock().unwrap().extend_from_slice(bytes);

        let mut staged = self.staged.lock().unwrap();
        let mut inbound = self.inbound.lock().unwrap();
        inbound.extend(staged.drain(..));
        Ok(())
    }

    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.fail_next_read.swap(false, Ordering::AcqRel) {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "scripted read fault",
            ));
        }
        let mut inbound = self.inbound.lock().unwrap();
        let Some(mut chunk) = inbound.pop_front() else {
            return Ok(0);
        };
        if chunk.len() > buf.len() {
            let rest = chunk.split_off(buf.len());
            inbound.push_front(rest);
        }
        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }

    fn drain_input(&mut self) -> io::Result<()> {
        self.drained.store(true, Ordering::Release);
        self.inbound.lock().unwrap().clear();
        Ok(())
    }
}
