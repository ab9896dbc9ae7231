// Wire encoding for the Minitaur's 8-character body command
//
// Frame layout (all ASCII digits):
//   [0] fixed marker '9'
//   [1] behavior digit
//   [2..4] forward  sign + magnitude
//   [4..6] turn     sign + magnitude
//   [6..8] height   sign + magnitude
//
// Each float field scales to one signed decimal digit: sign '0' = negative,
// '1' = zero or positive, magnitude = abs(round(v * 10)).

use crate::messages::BodyCommand;

/// Wire command length in bytes.
pub const COMMAND_LEN: usize = 8;

/// Frame with every field at its neutral encoding.
const NEUTRAL_FRAME: [u8; COMMAND_LEN] = *b"90000000";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EncodeError {
    #[error("behavior {0} does not fit the wire digit (valid: 0 to 9)")]
    InvalidBehavior(u8),

    #[error("{field} value {value} scales outside the one-digit magnitude slot (valid: -0.9 to 0.9)")]
    Overflow { field: &'static str, value: f32 },
}

/// Encode one float field as its (sign digit, magnitude digit) pair.
///
/// A magnitude that does not fit a single digit would widen the frame and
/// corrupt the fixed positions behind it, so it is rejected here rather
/// than sent.
fn sign_magnitude(field: &'static str, value: f32) -> Result<[u8; 2], EncodeError> {
    let scaled = (value * 10.0).round() as i32;
    let magnitude = scaled.abs();
    if magnitude > 9 {
        return Err(EncodeError::Overflow { field, value });
    }
    let sign = if scaled < 0 { b'0' } else { b'1' };
    Ok([sign, b'0' + magnitude as u8])
}

/// Decode a (sign, magnitude) digit pair back to the scaled integer.
/// Inverse of the field encoding; used for diagnostics and tests.
pub fn decode_sign_magnitude(pair: [u8; 2]) -> i32 {
    let magnitude = (pair[1] - b'0') as i32;
    if pair[0] == b'0' { -magnitude } else { magnitude }
}

/// Encode a body command into the fixed 8-byte wire frame.
///
/// Unset fields keep their neutral encoding. Pure; all validation happens
/// here so nothing malformed ever reaches the serial line.
pub fn encode(cmd: &BodyCommand) -> Result<[u8; COMMAND_LEN], EncodeError> {
    let mut frame = NEUTRAL_FRAME;

    if let Some(behavior) = cmd.behavior {
        if behavior > 9 {
            return Err(EncodeError::InvalidBehavior(behavior));
        }
        frame[1] = b'0' + behavior;
    }
    if let Some(v) = cmd.forward {
        frame[2..4].copy_from_slice(&sign_magnitude("forward", v)?);
    }
    if let Some(v) = cmd.turn {
        frame[4..6].copy_from_slice(&sign_magnitude("turn", v)?);
    }
    if let Some(v) = cmd.height {
        frame[6..8].copy_from_slice(&sign_magnitude("height", v)?);
    }

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_frame() {
        assert_eq!(&encode(&BodyCommand::neutral()).unwrap(), b"90000000");
    }

    #[test]
    fn test_field_positions() {
        let cmd = BodyCommand {
            behavior: Some(5),
            forward: Some(0.3),
            turn: Some(-0.2),
            height: Some(0.9),
        };
        assert_eq!(&encode(&cmd).unwrap(), b"95130219");
    }

    #[test]
    fn test_single_field_leaves_rest_neutral() {
        assert_eq!(&encode(&BodyCommand::forward(0.3)).unwrap(), b"90130000");
        assert_eq!(&encode(&BodyCommand::height(-0.9)).unwrap(), b"90000009");
    }

    #[test]
    fn test_negative_sign_digit() {
        let frame = encode(&BodyCommand::forward(-0.4)).unwrap();
        assert_eq!(&frame[2..4], b"04");
    }

    #[test]
    fn test_frame_always_eight_digits() {
        for tenths in -9..=9 {
            let v = tenths as f32 / 10.0;
            let cmd = BodyCommand {
                behavior: Some(9),
                forward: Some(v),
                turn: Some(-v),
                height: Some(v),
            };
            let frame = encode(&cmd).unwrap();
            assert_eq!(frame.len(), COMMAND_LEN);
            assert!(frame.iter().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_sign_magnitude_round_trip() {
        for tenths in -9..=9i32 {
            let v = tenths as f32 / 10.0;
            let pair = sign_magnitude("test", v).unwrap();
            assert_eq!(decode_sign_magnitude(pair), tenths, "v = {v}");
        }
    }

    #[test]
    fn test_rounding_to_nearest_tenth() {
        // 0.25 scales to 2.5, rounds away from zero
        assert_eq!(decode_sign_magnitude(sign_magnitude("t", 0.25).unwrap()), 3);
        assert_eq!(decode_sign_magnitude(sign_magnitude("t", 0.04).unwrap()), 0);
        assert_eq!(decode_sign_magnitude(sign_magnitude("t", -0.86).unwrap()), -9);
    }

    #[test]
    fn test_magnitude_overflow_rejected() {
        let err = encode(&BodyCommand::forward(1.0)).unwrap_err();
        assert!(matches!(err, EncodeError::Overflow { field: "forward", .. }));

        let err = encode(&BodyCommand::height(-2.5)).unwrap_err();
        assert!(matches!(err, EncodeError::Overflow { field: "height", .. }));

        // 0.95 rounds to 10: just past the edge
        assert!(encode(&BodyCommand::forward(0.95)).is_err());
        assert!(encode(&BodyCommand::forward(0.94)).is_ok());
    }

    #[test]
    fn test_invalid_behavior_rejected() {
        let cmd = BodyCommand {
            behavior: Some(10),
            ..BodyCommand::default()
        };
        assert_eq!(encode(&cmd).unwrap_err(), EncodeError::InvalidBehavior(10));
    }
}
