//! Serial link to the drive controller.
//!
//! One physical line carries both outbound commands and inbound status
//! text, so everything that touches the port goes through a single
//! [`LinkContext`] whose mutex serializes access. The [`CommandLink`] is
//! the only writer; the optional [`TelemetryReader`] only consumes inbound
//! telemetry and therefore cannot coexist with blocking discrete moves.

mod context;
mod link;
mod protocol;
mod telemetry;
#[cfg(test)]
mod testutil;
mod transport;

pub use context::LinkContext;
pub use link::{CommandLink, LinkParams, SendOutcome};
pub use protocol::{completion_token, parse_heading, Command, Completion};
pub use telemetry::TelemetryReader;
pub use transport::{find_port, NullTransport, SerialTransport, Transport};

use std::io;

/// Faults surfaced by the link layer. Transport faults are reported to the
/// caller and are expected to be logged and survived, never to abort the
/// control loop.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("transport fault: {0}")]
    Transport(#[from] io::Error),

    #[error("serial port: {0}")]
    Serial(#[from] serialport::Error),

    #[error("no serial port found")]
    NoPortFound,

    #[error("discrete command refused: the telemetry reader owns the inbound stream")]
    DiscreteWithReader,
}
