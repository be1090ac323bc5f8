//! Shared session context for everything that touches the serial line.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::transport::Transport;

/// State shared between the control loop and the telemetry reader.
///
/// The transport mutex serializes all port access (one physical link for
/// inbound telemetry and outbound commands). The heading sample is
/// last-value-wins: each new IMU report supersedes the previous one, no
/// history is retained.
pub struct LinkContext<T: Transport> {
    transport: Mutex<T>,
    heading: Mutex<Option<f32>>,
    stop: AtomicBool,
}

impl<T: Transport> LinkContext<T> {
    pub fn new(transport: T) -> Arc<Self> {
        Arc::new(Self {
            transport: Mutex::new(transport),
            heading: Mutex::new(None),
            stop: AtomicBool::new(false),
        })
    }

    pub(crate) fn lock_transport(&self) -> MutexGuard<'_, T> {
        match self.transport.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Latest parsed yaw in degrees, if any sample arrived yet.
    pub fn latest_heading(&self) -> Option<f32> {
        match self.heading.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub(crate) fn publish_heading(&self, yaw: f32) {
        match self.heading.lock() {
            Ok(mut guard) => *guard = Some(yaw),
            Err(poisoned) => *poisoned.into_inner() = Some(yaw),
        }
    }

    /// Ask the telemetry reader to wind down.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}
