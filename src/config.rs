// Hardware configuration: serial link defaults, axis geometry, pin map, timing

use std::time::Duration;

// Serial link to the body motor controller
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";
pub const DEFAULT_BAUDRATE: u32 = 115_200;

// Per-read timeout on the serial port
pub const SERIAL_TIMEOUT: Duration = Duration::from_secs(1);

// Bound on waiting for the controller's ready token before a send fails
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// BCM pin assignments for one stepper driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepperPins {
    pub step: u8,
    pub direction: u8,
    pub enable: u8,
}

/// Motion parameters for one head axis.
#[derive(Debug, Clone, Copy)]
pub struct AxisConfig {
    /// Steps per degree, empirically determined for the mount.
    pub steps_per_degree: f64,
    /// Hard angular limit, degrees either side of neutral.
    pub max_degrees: f64,
    pub pins: StepperPins,
}

/// Head unit configuration: two stepper axes plus the shared step cadence.
#[derive(Debug, Clone, Copy)]
pub struct HeadConfig {
    pub turn: AxisConfig,
    pub tilt: AxisConfig,
    /// Pause between step edges; a full pulse takes twice this.
    pub motor_delay: Duration,
}

impl Default for HeadConfig {
    fn default() -> Self {
        Self {
            turn: AxisConfig {
                steps_per_degree: 2.22,
                max_degrees: 160.0,
                pins: StepperPins {
                    step: 2,
                    direction: 3,
                    enable: 4,
                },
            },
            tilt: AxisConfig {
                steps_per_degree: 10.0,
                max_degrees: 45.0,
                pins: StepperPins {
                    step: 14,
                    direction: 15,
                    enable: 17,
                },
            },
            motor_delay: Duration::from_millis(10),
        }
    }
}
