// Degree-to-step conversion for the head's stepper axes

use std::fmt;

/// One of the two head rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Turn,
    Tilt,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Turn => write!(f, "turn"),
            Axis::Tilt => write!(f, "tilt"),
        }
    }
}

/// Rotation sense as seen by the stepper driver's direction input.
/// Negative drives the direction pin low, positive drives it high
/// (low turns the mount toward negative angles on this wiring).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Negative,
    Positive,
}

/// Relative move for one axis: direction plus unsigned step count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepMove {
    pub direction: Direction,
    pub steps: u32,
}

impl StepMove {
    /// Step count signed by direction, for cumulative position accounting.
    pub fn signed_steps(&self) -> i64 {
        match self.direction {
            Direction::Negative => -i64::from(self.steps),
            Direction::Positive => i64::from(self.steps),
        }
    }
}

/// Requested angle exceeds the axis's hard limit. No motion is performed.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq)]
#[error("{axis} target {requested_deg}° outside ±{max_deg}°")]
pub struct OutOfBounds {
    pub axis: Axis,
    pub requested_deg: f64,
    pub max_deg: f64,
}

/// Convert an absolute target angle into a relative step move from the
/// current angle.
///
/// Pure: bounds-checks the target, then rounds `delta * steps_per_degree`
/// to the nearest whole step. A zero delta comes out as a negative-direction
/// move of zero steps, which drives nothing.
pub fn to_steps(
    axis: Axis,
    target_deg: f64,
    current_deg: f64,
    steps_per_degree: f64,
    max_degrees: f64,
) -> Result<StepMove, OutOfBounds> {
    if target_deg.abs() > max_degrees {
        return Err(OutOfBounds {
            axis,
            requested_deg: target_deg,
            max_deg: max_degrees,
        });
    }

    let delta = target_deg - current_deg;
    let direction = if delta <= 0.0 {
        Direction::Negative
    } else {
        Direction::Positive
    };
    let steps = (delta * steps_per_degree).round().abs() as u32;

    Ok(StepMove { direction, steps })
}
