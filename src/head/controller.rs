// Head positioning: cumulative step accounting and the synchronized pulse loop

use std::thread::sleep;
use std::time::Duration;

use tracing::{debug, info};

use super::steps::{self, Axis, Direction, OutOfBounds, StepMove};
use crate::config::{AxisConfig, HeadConfig};
use crate::messages::HeadTarget;

/// Logic level on a GPIO output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Direction {
    /// Level the direction pin must be driven to for this rotation sense.
    pub fn level(self) -> Level {
        match self {
            Direction::Negative => Level::Low,
            Direction::Positive => Level::High,
        }
    }
}

/// Digital output lines into the stepper drivers.
///
/// Narrow interface over the GPIO layer so tests can record pin activity
/// with an in-memory fake instead of real hardware.
pub trait DigitalOutput {
    fn set_pin(&mut self, pin: u8, level: Level);
}

#[derive(Debug, thiserror::Error)]
pub enum HeadError {
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),

    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),
}

/// Open-loop position of one axis. The signed step count from the neutral
/// startup pose is the single source of truth; the angle is always derived
/// from it, never tracked separately.
struct AxisState {
    axis: Axis,
    cfg: AxisConfig,
    step_count: i64,
}

impl AxisState {
    fn new(axis: Axis, cfg: AxisConfig) -> Self {
        Self {
            axis,
            cfg,
            step_count: 0,
        }
    }

    fn angle_deg(&self) -> f64 {
        self.step_count as f64 / self.cfg.steps_per_degree
    }

    fn plan(&self, target_deg: f64) -> Result<StepMove, OutOfBounds> {
        steps::to_steps(
            self.axis,
            target_deg,
            self.angle_deg(),
            self.cfg.steps_per_degree,
            self.cfg.max_degrees,
        )
    }

    fn apply(&mut self, mv: StepMove) {
        self.step_count += mv.signed_steps();
    }
}

/// Dual-axis head positioning controller.
///
/// Owns both axis states exclusively; nothing else reads or writes the
/// step counts. The head is assumed to start at the neutral pose (there
/// is no homing sensor), so all positions are dead-reckoned from steps.
pub struct HeadController<D: DigitalOutput> {
    outputs: D,
    turn: AxisState,
    tilt: AxisState,
    motor_delay: Duration,
}

impl<D: DigitalOutput> HeadController<D> {
    pub fn new(outputs: D, config: HeadConfig) -> Self {
        Self {
            outputs,
            turn: AxisState::new(Axis::Turn, config.turn),
            tilt: AxisState::new(Axis::Tilt, config.tilt),
            motor_delay: config.motor_delay,
        }
    }

    pub fn turn_angle_deg(&self) -> f64 {
        self.turn.angle_deg()
    }

    pub fn tilt_angle_deg(&self) -> f64 {
        self.tilt.angle_deg()
    }

    /// Move the head to the given absolute angles.
    ///
    /// Both axes are validated before either motor moves; an out-of-bounds
    /// target aborts the whole call with no pulses issued on either axis
    /// (all-or-nothing, no partial motion). Runs to completion once
    /// stepping starts.
    pub fn look(&mut self, target: HeadTarget) -> Result<(), HeadError> {
        let turn_move = target.turn.map(|deg| self.turn.plan(deg)).transpose()?;
        let tilt_move = target.tilt.map(|deg| self.tilt.plan(deg)).transpose()?;

        // Direction pins are set once, before any step edge
        if let Some(mv) = turn_move {
            self.outputs
                .set_pin(self.turn.cfg.pins.direction, mv.direction.level());
            self.turn.apply(mv);
        }
        if let Some(mv) = tilt_move {
            self.outputs
                .set_pin(self.tilt.cfg.pins.direction, mv.direction.level());
            self.tilt.apply(mv);
        }

        let turn_steps = turn_move.map_or(0, |mv| mv.steps);
        let tilt_steps = tilt_move.map_or(0, |mv| mv.steps);
        debug!("Stepping head: turn={} steps, tilt={} steps", turn_steps, tilt_steps);

        self.pulse(turn_steps, tilt_steps);

        info!(
            "Head at turn={:.1}°, tilt={:.1}°",
            self.turn.angle_deg(),
            self.tilt.angle_deg()
        );
        Ok(())
    }

    /// Return the head to the neutral pose (dead-reckoned; no homing).
    pub fn reset(&mut self) -> Result<(), HeadError> {
        self.look(HeadTarget::both(0.0, 0.0))
    }

    /// Interleaved pulse loop for both axes.
    ///
    /// Each iteration costs two motor delays whichever axes are active in
    /// it, so both motors run at the same mechanical cadence; the axis
    /// needing fewer steps idles for the remaining iterations.
    fn pulse(&mut self, turn_steps: u32, tilt_steps: u32) {
        let turn_pin = self.turn.cfg.pins.step;
        let tilt_pin = self.tilt.cfg.pins.step;

        for i in 0..turn_steps.max(tilt_steps) {
            if i < turn_steps {
                self.outputs.set_pin(turn_pin, Level::Low);
            }
            if i < tilt_steps {
                self.outputs.set_pin(tilt_pin, Level::Low);
            }
            sleep(self.motor_delay);

            if i < turn_steps {
                self.outputs.set_pin(turn_pin, Level::High);
            }
            if i < tilt_steps {
                self.outputs.set_pin(tilt_pin, Level::High);
            }
            sleep(self.motor_delay);
        }
    }
}
