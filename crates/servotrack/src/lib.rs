//! Visual-servoing navigation for small differential-drive robots.
//!
//! A session repeatedly captures a frame, masks the configured target
//! color, extracts contours, classifies shapes, selects the best target,
//! steps the navigation controller and transmits one drive command over a
//! serial link. With heading hold enabled, a background reader keeps the
//! latest IMU yaw available to the controller.
//!
//! ## Quickstart
//!
//! ```no_run
//! use servotrack::{ImageSequenceSource, NavigationSession, NullTransport, SessionConfig};
//!
//! let mut source = ImageSequenceSource::from_dir("frames").unwrap();
//! let session = NavigationSession::new(NullTransport, SessionConfig::default());
//! let summary = session.run(&mut source);
//! println!("{:?} after {} frames", summary.outcome, summary.frames);
//! ```

mod config;
mod session;
mod source;

pub use config::{PerceptionParams, SessionConfig};
pub use session::{NavigationSession, RunOutcome, RunSummary};
pub use source::{FrameSource, FrameSourceError, ImageSequenceSource};

pub use servotrack_control::{
    Controller, ControllerParams, Effort, EffortCurve, Offsets, Phase, Pid, PidConfig,
};
pub use servotrack_core::init_with_level;
pub use servotrack_link::{
    find_port, Command, CommandLink, LinkContext, LinkError, LinkParams, NullTransport,
    SendOutcome, SerialTransport, TelemetryReader, Transport,
};
pub use servotrack_vision::{
    blur_rgb, classify, find_regions, ColorTable, HsvRange, Region, Segmenter, ShapeLabel, Target,
    TargetSelector, TargetSelectorParams,
};

/// Install a `tracing` subscriber honoring `RUST_LOG`, with span close
/// events so pipeline stages report their timing.
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .finish()
        .try_init();
}
