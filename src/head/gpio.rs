// Raspberry Pi GPIO backend for the stepper drivers

use std::collections::HashMap;

use rppal::gpio::{Gpio, OutputPin};
use tracing::{info, warn};

use super::controller::{DigitalOutput, Level};
use crate::config::HeadConfig;

/// Output lines for both head axes, backed by the Pi's GPIO.
///
/// Claims the step/direction/enable pins at construction and asserts both
/// enable lines (the drivers are active low). rppal resets the pin modes
/// when this is dropped.
pub struct RpiHeadOutputs {
    pins: HashMap<u8, OutputPin>,
    enable_pins: [u8; 2],
}

impl RpiHeadOutputs {
    pub fn new(config: &HeadConfig) -> Result<Self, rppal::gpio::Error> {
        let gpio = Gpio::new()?;

        let mut pins = HashMap::new();
        for axis_pins in [config.turn.pins, config.tilt.pins] {
            for pin in [axis_pins.step, axis_pins.direction, axis_pins.enable] {
                pins.insert(pin, gpio.get(pin)?.into_output());
            }
        }

        let mut outputs = Self {
            pins,
            enable_pins: [config.turn.pins.enable, config.tilt.pins.enable],
        };

        info!("Enabling stepper drivers");
        for pin in outputs.enable_pins {
            outputs.set_pin(pin, Level::Low);
        }

        Ok(outputs)
    }
}

impl DigitalOutput for RpiHeadOutputs {
    fn set_pin(&mut self, pin: u8, level: Level) {
        match self.pins.get_mut(&pin) {
            Some(output) => match level {
                Level::Low => output.set_low(),
                Level::High => output.set_high(),
            },
            // Only the pins claimed at construction are routable
            None => warn!("Ignoring write to unclaimed GPIO pin {}", pin),
        }
    }
}

impl Drop for RpiHeadOutputs {
    fn drop(&mut self) {
        // De-assert the drivers so the motors can't be pulsed by a floating
        // line while the pins reset
        info!("Disabling stepper drivers");
        for pin in self.enable_pins {
            self.set_pin(pin, Level::High);
        }
    }
}
