// Head unit control: two stepper axes behind the camera mount
//
// Provides:
// - Degree-to-step conversion with per-axis angular bounds
// - Open-loop position tracking from cumulative step counts
// - Synchronized dual-axis pulse loop over GPIO step/direction lines

pub mod controller;
pub mod gpio;
pub mod steps;

pub use controller::{DigitalOutput, HeadController, HeadError, Level};
pub use gpio::RpiHeadOutputs;
pub use steps::{Axis, Direction, OutOfBounds, StepMove};
