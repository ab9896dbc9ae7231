// Body control for the Minitaur
//
// Provides:
// - Wire encoding of motion intents into the 8-character command frame
// - Ready-token handshake and send over the serial link

pub mod encoder;
pub mod session;

pub use encoder::{EncodeError, encode};
pub use session::{BodySession, SerialChannel, SessionError, UartChannel};
