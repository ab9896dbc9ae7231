// Command types for the body and head units

use serde::{Deserialize, Serialize};

/// Body motion intent, encoded into the 8-character wire command.
///
/// Unset fields keep the neutral wire encoding (zero magnitude, positive
/// sign). Field ranges mirror what the onboard controller accepts:
/// behavior 0 to 9, the float fields -0.9 to 0.9.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct BodyCommand {
    /// Behavior slot on the onboard controller.
    pub behavior: Option<u8>,
    /// Forward speed in m/s.
    pub forward: Option<f32>,
    /// Turn rate in rad/s.
    pub turn: Option<f32>,
    /// Height offset relative to the normal stance.
    pub height: Option<f32>,
}

impl BodyCommand {
    /// All fields unset; encodes as the neutral frame (stand in place).
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn forward(speed: f32) -> Self {
        Self {
            forward: Some(speed),
            ..Self::default()
        }
    }

    pub fn height(offset: f32) -> Self {
        Self {
            height: Some(offset),
            ..Self::default()
        }
    }
}

/// Absolute head pose request, degrees from neutral.
/// An unset axis is left where it is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
pub struct HeadTarget {
    /// Turn angle in degrees, -160 to 160.
    pub turn: Option<f64>,
    /// Tilt angle in degrees, -45 to 45.
    pub tilt: Option<f64>,
}

impl HeadTarget {
    pub fn turn(deg: f64) -> Self {
        Self {
            turn: Some(deg),
            ..Self::default()
        }
    }

    pub fn tilt(deg: f64) -> Self {
        Self {
            tilt: Some(deg),
            ..Self::default()
        }
    }

    pub fn both(turn_deg: f64, tilt_deg: f64) -> Self {
        Self {
            turn: Some(turn_deg),
            tilt: Some(tilt_deg),
        }
    }
}

/// One step of a scripted driving sequence (JSON lines, one step per line).
///
/// ```json
/// {"look": {"turn": 90.0, "tilt": 35.0}}
/// {"body": {"forward": 0.3}}
/// {"pause": {"secs": 0.1}}
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SequenceStep {
    Body(BodyCommand),
    Look(HeadTarget),
    Pause { secs: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_step_json() {
        let step: SequenceStep = serde_json::from_str(r#"{"body": {"forward": 0.3}}"#).unwrap();
        assert_eq!(step, SequenceStep::Body(BodyCommand::forward(0.3)));

        let step: SequenceStep = serde_json::from_str(r#"{"look": {"turn": 90.0}}"#).unwrap();
        assert_eq!(step, SequenceStep::Look(HeadTarget::turn(90.0)));

        let step: SequenceStep = serde_json::from_str(r#"{"pause": {"secs": 0.1}}"#).unwrap();
        assert_eq!(step, SequenceStep::Pause { secs: 0.1 });
    }

    #[test]
    fn test_body_command_partial_fields() {
        let cmd: BodyCommand = serde_json::from_str(r#"{"forward": 0.2, "height": 0.3}"#).unwrap();
        assert_eq!(cmd.forward, Some(0.2));
        assert_eq!(cmd.height, Some(0.3));
        assert_eq!(cmd.behavior, None);
        assert_eq!(cmd.turn, None);
    }
}
