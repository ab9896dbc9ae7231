// Host-side driver for the Minitaur walking robot and its camera head
//
// Provides:
// - 8-character body command protocol with ready-token handshake (serial)
// - Dual-axis stepper head positioning (GPIO step/direction)

pub mod body;
pub mod config;
pub mod head;
pub mod messages;
