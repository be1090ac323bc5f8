//! The navigation run loop.

use image::RgbImage;
use log::{debug, info, warn};

use servotrack_control::{Controller, Offsets, Phase};
use servotrack_link::{Command, CommandLink, LinkContext, SendOutcome, TelemetryReader, Transport};
use servotrack_vision::{blur_rgb, find_regions, Segmenter, TargetSelector};

use crate::config::SessionConfig;
use crate::source::FrameSource;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Why a run ended. Link faults never end a run; only the frame source or
/// a completed alignment does.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunOutcome {
    /// The controller held alignment long enough and ended the session.
    Completed,
    /// The frame source ran out of frames.
    SourceExhausted,
    /// The frame source reported a capture fault.
    CaptureFailed,
}

#[derive(Clone, Copy, Debug)]
pub struct RunSummary {
    pub frames: u64,
    pub outcome: RunOutcome,
}

/// One navigation run: perception, control and transmission state bundled
/// around a shared link context.
///
/// With heading hold configured, a telemetry reader is spawned on the same
/// context at construction and joined at the end of [`run`](Self::run).
pub struct NavigationSession<T: Transport + 'static> {
    segmenter: Segmenter,
    selector: TargetSelector,
    controller: Controller,
    link: CommandLink<T>,
    reader: Option<TelemetryReader<T>>,
    config: SessionConfig,
}

impl<T: Transport + 'static> NavigationSession<T> {
    pub fn new(transport: T, config: SessionConfig) -> Self {
        let ctx = LinkContext::new(transport);
        let link = CommandLink::new(ctx, config.link);
        let reader = config
            .controller
            .heading_hold
            .is_some()
            .then(|| TelemetryReader::spawn(&link));

        Self {
            segmenter: Segmenter::new(config.colors.clone()),
            selector: TargetSelector::new(config.perception.selector),
            controller: Controller::new(config.controller),
            link,
            reader,
            config,
        }
    }

    /// Drive until alignment completes or the source ends.
    ///
    /// Shutdown order: signal the stop flag, send the final stop/exit
    /// commands, join the telemetry reader, then release the transport by
    /// dropping the session.
    #[cfg_attr(feature = "tracing", instrument(level = "info", skip_all))]
    pub fn run(mut self, source: &mut dyn FrameSource) -> RunSummary {
        let dt = self.config.frame_interval.as_secs_f32();
        let mut frames = 0u64;

        let outcome = loop {
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    info!("frame source exhausted after {frames} frames");
                    break RunOutcome::SourceExhausted;
                }
                Err(e) => {
                    warn!("capture failed after {frames} frames: {e}");
                    break RunOutcome::CaptureFailed;
                }
            };
            frames += 1;

            let target = self.perceive(&frame);
            let heading = self.link.context().latest_heading();
            let step = self.controller.step(target, heading, dt);
            debug!("frame {frames}: {:?}", step.phase);

            if step.phase == Phase::Done {
                info!("alignment held, ending session after {frames} frames");
                self.transmit(&Command::Exit);
                break RunOutcome::Completed;
            }

            self.transmit(&Command::Arcade {
                throttle: step.effort.throttle,
                turn: step.effort.turn,
            });

            if !self.config.frame_interval.is_zero() {
                std::thread::sleep(self.config.frame_interval);
            }
        };

        self.link.context().request_stop();
        if outcome != RunOutcome::Completed {
            self.transmit(&Command::stop());
            self.transmit(&Command::Exit);
        }
        if let Some(reader) = self.reader.take() {
            reader.stop_and_join();
        }
        RunSummary { frames, outcome }
    }

    /// Frame -> mask -> regions -> selected target offsets.
    fn perceive(&self, frame: &RgbImage) -> Option<Offsets> {
        let params = &self.config.perception;
        let blurred = blur_rgb(frame, params.blur_sigma);
        let mask = self.segmenter.mask(&blurred, &params.color)?;
        let regions = find_regions(&mask);

        let center_x = frame.width() as f32 / 2.0;
        let reference_y = frame.height() as f32 * params.reference_row_fraction;
        let target = self.selector.select(&regions, center_x, reference_y)?;
        Some(Offsets {
            x: target.offset_x,
            y: target.offset_y,
        })
    }

    /// Transmit with the session's fault policy: every link fault is
    /// reported and survived, degrading to no actuation.
    fn transmit(&mut self, command: &Command) {
        match self.link.send(command) {
            Ok(SendOutcome::PeerError) => warn!("peer rejected {command:?}"),
            Ok(SendOutcome::TimedOut) => warn!("no acknowledgment for {command:?}"),
            Ok(_) => {}
            Err(e) => warn!("link fault, continuing without actuation: {e}"),
        }
    }
}
