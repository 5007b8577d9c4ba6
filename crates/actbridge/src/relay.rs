//! The relay: stdin frames → transcode → worker pipe.
//!
//! Runs as a background thread with no cancellation signal. The protocol
//! has no end-of-stream message; the worker's exit is the only natural
//! stopping point, at which time the whole process exits and takes the
//! relay with it, even mid-frame.

use std::fs::File;
use std::io::{Read, Write};
use std::thread;

use actbridge_frame::{decode_text, encode_utf16_ne, FrameError, MessageReader, MessageWriter};
use tracing::{debug, error};

/// Environment variable enabling the diagnostic echo.
pub const DEBUG_ENV: &str = "ACTIONS_RUNNER_WORKER_DEBUG";

/// Diagnostic echo of every relayed message.
///
/// Prints to stdout and never alters the bytes actually forwarded.
#[derive(Debug, Clone, Copy)]
pub struct DebugEcho {
    enabled: bool,
}

impl DebugEcho {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Enabled when `ACTIONS_RUNNER_WORKER_DEBUG` is set to anything other
    /// than `"0"`.
    pub fn from_env() -> Self {
        Self::new(enabled_from(std::env::var(DEBUG_ENV).ok().as_deref()))
    }

    fn print(&self, message_type: u32, text: &str) {
        if !self.enabled {
            return;
        }
        println!("Message Received");
        println!("Type: {message_type}");
        println!("================");
        println!("{text}");
        println!("================");
    }
}

fn enabled_from(value: Option<&str>) -> bool {
    value.is_some_and(|value| value != "0")
}

/// Forward messages one at a time until the input ends.
///
/// Strictly sequential: message N is fully written and flushed before
/// message N+1 is read. Returns `Ok(())` on a clean close of the input
/// stream between frames; every other condition is fatal.
pub fn run_relay<R: Read, W: Write>(
    input: R,
    output: W,
    echo: DebugEcho,
) -> Result<(), FrameError> {
    let mut reader = MessageReader::new(input);
    let mut writer = MessageWriter::new(output);

    loop {
        let message = match reader.read_message() {
            Ok(message) => message,
            Err(FrameError::ConnectionClosed) => return Ok(()),
            Err(err) => return Err(err),
        };

        let text = decode_text(&message.payload)?;
        echo.print(message.message_type, text);

        let encoded = encode_utf16_ne(text);
        writer.send(message.message_type, &encoded)?;

        debug!(
            message_type = message.message_type,
            utf8_len = message.payload.len(),
            utf16_len = encoded.len(),
            "forwarded message"
        );
    }
}

/// Spawn the relay on a background thread reading this process's stdin.
///
/// There is no join and no cancellation: a relay failure ends the thread
/// only, and the program's fate stays with the worker's exit code.
pub fn spawn_relay(pipe: File, echo: DebugEcho) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("relay".to_string())
        .spawn(move || {
            let stdin = std::io::stdin().lock();
            match run_relay(stdin, pipe, echo) {
                Ok(()) => debug!("input stream closed, relay done"),
                Err(err) => error!(%err, "relay failed"),
            }
        })
}
