//! The newline-terminated ASCII wire format.

use serde::{Deserialize, Serialize};

/// One outbound instruction for the drive controller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Continuous arcade-style effort; fire-and-forget.
    Arcade { throttle: f32, turn: f32 },
    /// Continuous per-wheel speeds; fire-and-forget.
    Tank { left: f32, right: f32 },
    /// Discrete straight-line move; the peer acknowledges completion.
    Straight { distance: f32, speed: f32 },
    /// Discrete turn-in-place; the peer acknowledges completion.
    TurnInPlace { degrees: f32, speed: f32 },
    /// End the session.
    Exit,
}

impl Command {
    /// A zero-effort arcade command.
    pub fn stop() -> Self {
        Command::Arcade {
            throttle: 0.0,
            turn: 0.0,
        }
    }

    /// Discrete moves block until the peer reports `DONE` or `ERR`.
    pub fn awaits_completion(&self) -> bool {
        matches!(
            self,
            Command::Straight { .. } | Command::TurnInPlace { .. }
        )
    }

    /// Serialize to the line form, newline terminator included.
    pub fn encode(&self) -> String {
        match *self {
            Command::Arcade { throttle, turn } => format!("A,{throttle:.2},{turn:.2}\n"),
            Command::Tank { left, right } => format!("L,{left:.2},R,{right:.2}\n"),
            Command::Straight { distance, speed } => format!("S,{distance:.2},{speed:.2}\n"),
            Command::TurnInPlace { degrees, speed } => format!("T,{degrees:.2},{speed:.2}\n"),
            Command::Exit => "E\n".to_string(),
        }
    }
}

/// Terminal acknowledgment of a discrete move.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Completion {
    Done,
    Err,
}

/// Scan one inbound status line for a terminal token.
///
/// Matching is a case-insensitive substring test: the peer embeds the token
/// in free-form text ("Command S Completed ... DONE").
pub fn completion_token(line: &str) -> Option<Completion> {
    let upper = line.to_ascii_uppercase();
    if upper.contains("DONE") {
        Some(Completion::Done)
    } else if upper.contains("ERR") {
        Some(Completion::Err)
    } else {
        None
    }
}

/// Parse one `IMU,<yaw>` telemetry line into a yaw value in degrees.
///
/// Anything that does not match the tagged numeric form yields `None`;
/// malformed telemetry is dropped, never surfaced.
pub fn parse_heading(line: &str) -> Option<f32> {
    let rest = line.trim().strip_prefix("IMU,")?;
    if rest.contains(',') {
        return None;
    }
    rest.parse::<f32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_every_command_form() {
        assert_eq!(
            Command::Arcade {
                throttle: 0.5,
                turn: -0.25
            }
            .encode(),
            "A,0.50,-0.25\n"
        );
        assert_eq!(
            Command::Tank {
                left: 12.0,
                right: -12.0
            }
            .encode(),
            "L,12.00,R,-12.00\n"
        );
        assert_eq!(
            Command::Straight {
                distance: 30.0,
                speed: 0.7
            }
            .encode(),
            "S,30.00,0.70\n"
        );
        assert_eq!(
            Command::TurnInPlace {
                degrees: -90.0,
                speed: 0.6
            }
            .encode(),
            "T,-90.00,0.60\n"
        );
        assert_eq!(Command::Exit.encode(), "E\n");
    }

    #[test]
    fn only_discrete_moves_await_completion() {
        assert!(Command::Straight {
            distance: 1.0,
            speed: 1.0
        }
        .awaits_completion());
        assert!(Command::TurnInPlace {
            degrees: 1.0,
            speed: 1.0
        }
        .awaits_completion());
        assert!(!Command::stop().awaits_completion());
        assert!(!Command::Exit.awaits_completion());
        assert!(!Command::Tank {
            left: 0.0,
            right: 0.0
        }
        .awaits_completion());
    }

    #[test]
    fn completion_tokens_match_case_insensitive_substrings() {
        assert_eq!(completion_token("done"), Some(Completion::Done));
        assert_eq!(
            completion_token("Command S Completed: DONE"),
            Some(Completion::Done)
        );
        assert_eq!(completion_token("err: stall"), Some(Completion::Err));
        assert_eq!(completion_token("battery 7.2V"), None);
    }

    #[test]
    fn done_wins_when_both_tokens_appear() {
        assert_eq!(completion_token("DONE (prev ERR)"), Some(Completion::Done));
    }

    #[test]
    fn heading_lines_parse_and_malformed_lines_drop() {
        assert_eq!(parse_heading("IMU,12.50"), Some(12.5));
        assert_eq!(parse_heading("  IMU,-179.99\r\n"), Some(-179.99));
        assert_eq!(parse_heading("IMU,abc"), None);
        assert_eq!(parse_heading("IMU,1,2"), None);
        assert_eq!(parse_heading("GPS,1.0"), None);
        assert_eq!(parse_heading(""), None);
    }
}
