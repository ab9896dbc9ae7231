// Ready-token handshake and command send over the serial link
//
// The onboard controller prints "next" on its serial line whenever it is
// ready for another command. Every send is gated on one token: writing
// without it would flood the controller's input buffer. This is a plain
// request/reply handshake, not fire-and-forget.

use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

use serialport::SerialPort;
use tracing::{debug, trace};

use super::encoder::{self, EncodeError};
use crate::config::{HANDSHAKE_TIMEOUT, SERIAL_TIMEOUT};
use crate::messages::BodyCommand;

/// Line the controller emits when it wants the next command.
pub const READY_TOKEN: &[u8] = b"next";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no ready token from the controller within {0:?}")]
    HandshakeTimeout(Duration),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Byte transport to the onboard controller.
///
/// Narrow on purpose: the handshake only ever reads lines and writes raw
/// frames, and tests substitute an in-memory fake for the serial port.
pub trait SerialChannel {
    /// Read one newline-terminated line, including the terminator.
    /// Returns `None` when the read times out with no complete line.
    fn read_line(&mut self) -> Result<Option<Vec<u8>>>;

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Serial-port backed channel.
pub struct UartChannel {
    port: Box<dyn SerialPort>,
    /// Bytes received past the last complete line.
    residue: Vec<u8>,
}

impl UartChannel {
    pub fn open(port_name: &str, baudrate: u32) -> Result<Self> {
        let port = serialport::new(port_name, baudrate)
            .timeout(SERIAL_TIMEOUT)
            .open()?;
        Ok(Self {
            port,
            residue: Vec::new(),
        })
    }
}

impl SerialChannel for UartChannel {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>> {
        loop {
            if let Some(pos) = self.residue.iter().position(|&b| b == b'\n') {
                return Ok(Some(self.residue.drain(..=pos).collect()));
            }

            let mut chunk = [0u8; 64];
            match self.port.read(&mut chunk) {
                Ok(0) => return Ok(None),
                Ok(n) => self.residue.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::TimedOut => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }
}

/// Handshaking command session with the body controller.
pub struct BodySession<C: SerialChannel> {
    channel: C,
    handshake_timeout: Duration,
}

impl<C: SerialChannel> BodySession<C> {
    pub fn new(channel: C) -> Self {
        Self::with_timeout(channel, HANDSHAKE_TIMEOUT)
    }

    pub fn with_timeout(channel: C, handshake_timeout: Duration) -> Self {
        Self {
            channel,
            handshake_timeout,
        }
    }

    /// Wait for the controller's ready token, then send one encoded command.
    ///
    /// The command is validated and encoded before any token is consumed, so
    /// a malformed command costs nothing on the wire. Exactly one frame is
    /// written per token observed.
    pub fn send(&mut self, cmd: &BodyCommand) -> Result<()> {
        let frame = encoder::encode(cmd)?;
        self.wait_ready()?;

        debug!("Sending command: {}", String::from_utf8_lossy(&frame));
        self.channel.write_bytes(&frame)
    }

    fn wait_ready(&mut self) -> Result<()> {
        let deadline = Instant::now() + self.handshake_timeout;
        loop {
            if let Some(line) = self.channel.read_line()? {
                let text = trim_line_ending(&line);
                if text == READY_TOKEN {
                    return Ok(());
                }
                trace!("Ignoring serial line: {:?}", String::from_utf8_lossy(text));
            }
            if Instant::now() >= deadline {
                return Err(SessionError::HandshakeTimeout(self.handshake_timeout));
            }
        }
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && (line[end - 1] == b'\n' || line[end - 1] == b'\r') {
        end -= 1;
    }
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted in-memory channel: yields the queued lines one per read,
    /// then times out forever. Records every write.
    struct FakeChannel {
        lines: VecDeque<Vec<u8>>,
        reads: usize,
        writes: Vec<Vec<u8>>,
    }

    impl FakeChannel {
        fn new(lines: &[&[u8]]) -> Self {
            Self {
                lines: lines.iter().map(|l| l.to_vec()).collect(),
                reads: 0,
                writes: Vec::new(),
            }
        }
    }

    impl SerialChannel for FakeChannel {
        fn read_line(&mut self) -> Result<Option<Vec<u8>>> {
            self.reads += 1;
            Ok(self.lines.pop_front())
        }

        fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
            self.writes.push(bytes.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_send_waits_for_ready_token() {
        let channel = FakeChannel::new(&[b"garbage\n", b"next\n"]);
        let mut session = BodySession::new(channel);

        session.send(&BodyCommand::forward(0.3)).unwrap();

        let channel = &session.channel;
        assert_eq!(channel.reads, 2, "token arrived on the second line");
        assert_eq!(channel.writes, vec![b"90130000".to_vec()]);
    }

    #[test]
    fn test_token_with_carriage_return() {
        let channel = FakeChannel::new(&[b"next\r\n"]);
        let mut session = BodySession::new(channel);

        session.send(&BodyCommand::neutral()).unwrap();
        assert_eq!(session.channel.writes.len(), 1);
    }

    #[test]
    fn test_token_must_match_exactly() {
        // "nexts" is not the token; the silent channel then times out
        let channel = FakeChannel::new(&[b"nexts\n"]);
        let mut session = BodySession::with_timeout(channel, Duration::ZERO);

        let err = session.send(&BodyCommand::neutral()).unwrap_err();
        assert!(matches!(err, SessionError::HandshakeTimeout(_)));
        assert!(session.channel.writes.is_empty());
    }

    #[test]
    fn test_timeout_without_token_writes_nothing() {
        let channel = FakeChannel::new(&[]);
        let mut session = BodySession::with_timeout(channel, Duration::ZERO);

        let err = session.send(&BodyCommand::forward(0.2)).unwrap_err();
        assert!(matches!(err, SessionError::HandshakeTimeout(_)));
        assert!(session.channel.writes.is_empty());
    }

    #[test]
    fn test_invalid_command_consumes_no_token() {
        let channel = FakeChannel::new(&[b"next\n"]);
        let mut session = BodySession::new(channel);

        let err = session.send(&BodyCommand::forward(5.0)).unwrap_err();
        assert!(matches!(err, SessionError::Encode(_)));
        assert_eq!(session.channel.reads, 0);
        assert!(session.channel.writes.is_empty());
    }

    #[test]
    fn test_one_write_per_token() {
        let channel = FakeChannel::new(&[b"next\n", b"next\n"]);
        let mut session = BodySession::new(channel);

        session.send(&BodyCommand::forward(0.1)).unwrap();
        session.send(&BodyCommand::forward(-0.1)).unwrap();

        assert_eq!(
            session.channel.writes,
            vec![b"90110000".to_vec(), b"90010000".to_vec()]
        );
    }

    #[test]
    fn test_trim_line_ending() {
        assert_eq!(trim_line_ending(b"next\n"), b"next");
        assert_eq!(trim_line_ending(b"next\r\n"), b"next");
        assert_eq!(trim_line_ending(b"next"), b"next");
        assert_eq!(trim_line_ending(b"\n"), b"");
    }
}
