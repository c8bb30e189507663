//! Command link to the maze robot
//!
//! One command is in flight at a time:
//! 1. The command text plus a `\n` terminator is written in one go.
//! 2. An execution budget is estimated from the text alone.
//! 3. Until the budget runs out the transport is polled; complete lines
//!    become [`Feedback::Line`] events and whatever is left at the deadline
//!    becomes one [`Feedback::Partial`] event.
//!
//! The drain never blocks past its deadline and never fails: read errors
//! are logged and polling continues.

use std::fmt;
use std::io;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::error::LinkError;

/// A line-oriented duplex byte channel
pub trait Transport {
    fn is_open(&self) -> bool;

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Read whatever is pending without blocking. `Ok(0)` means nothing is
    /// available right now.
    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_all(bytes)
    }

    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_available(buf)
    }
}

/// Timing constants for the device, all in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// `host:port` of a serial-to-network bridge, used when `port` is unset
    pub address: String,
    /// Serial device of the robot, e.g. `/dev/ttyUSB0`
    pub port: Option<String>,
    pub baud_rate: u32,
    /// Fixed wait for the execute-stored-route command
    pub execute_budget_ms: u64,
    /// Fixed wait for the calibration command
    pub calibrate_budget_ms: u64,
    pub forward_ms: u64,
    pub turn_ms: u64,
    /// Pause the device takes between two symbols
    pub pause_ms: u64,
    /// Added on top of every estimated (non-fixed) budget
    pub slack_ms: u64,
    pub poll_interval_ms: u64,
    /// Time the device needs to boot after the link opens
    pub settle_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:7000".to_string(),
            port: None,
            baud_rate: 9_600,
            execute_budget_ms: 20_000,
            calibrate_budget_ms: 3_000,
            forward_ms: 500,
            turn_ms: 1_500,
            pause_ms: 200,
            slack_ms: 4_000,
            poll_interval_ms: 50,
            settle_ms: 2_000,
        }
    }
}

impl LinkConfig {
    /// How long to wait for feedback after sending `command`.
    ///
    /// `!E` and `!C` get fixed budgets. Anything else is measured symbol by
    /// symbol after stripping a `!S` marker: forward and turn durations plus
    /// a pause between consecutive symbols, then the slack on top. Symbols
    /// other than `F`, `L` and `R` cost nothing but still count for pauses.
    pub fn budget_for(&self, command: &str) -> Duration {
        if Command::is_execute(command) {
            return Duration::from_millis(self.execute_budget_ms);
        }
        if Command::is_calibrate(command) {
            return Duration::from_millis(self.calibrate_budget_ms);
        }

        let symbols = Command::strip_save_prefix(command);
        let count = symbols.chars().count();
        let moves = symbols
            .chars()
            .map(|c| match c.to_ascii_uppercase() {
                'F' => self.forward_ms,
                'L' | 'R' => self.turn_ms,
                _ => 0,
            })
            .fold(0u64, u64::saturating_add);
        let pauses = self.pause_ms.saturating_mul(count.saturating_sub(1) as u64);

        Duration::from_millis(moves.saturating_add(pauses).saturating_add(self.slack_ms))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// A piece of text received from the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Feedback {
    /// A complete newline-terminated line
    Line(String),
    /// Unterminated text still buffered when the deadline passed
    Partial(String),
}

impl Feedback {
    pub fn text(&self) -> &str {
        match self {
            Feedback::Line(text) | Feedback::Partial(text) => text,
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Line(text) => write!(f, "{}", text),
            Feedback::Partial(text) => write!(f, "{} (partial)", text),
        }
    }
}

/// Lossy UTF-8 decoding that drops undecodable bytes and trailing
/// whitespace (including `\r`).
fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Collects bytes and cuts them into lines.
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, bytes: &[u8], events: &mut Vec<Feedback>) {
        self.pending.extend_from_slice(bytes);
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let text = decode(&line);
            if !text.is_empty() {
                tracing::info!("device: {}", text);
                events.push(Feedback::Line(text));
            }
        }
    }

    fn finish(self, events: &mut Vec<Feedback>) {
        let text = decode(&self.pending);
        if !text.is_empty() {
            tracing::info!("device (partial): {}", text);
            events.push(Feedback::Partial(text));
        }
    }
}

/// Sends commands over a [`Transport`] and collects timed feedback
#[derive(Debug)]
pub struct CommandLink<T> {
    transport: T,
    config: LinkConfig,
}

impl<T: Transport> CommandLink<T> {
    pub fn new(transport: T, config: LinkConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Write `command` followed by a newline. No retry.
    ///
    /// # Errors
    /// [`LinkError::NotOpen`] if the transport is closed and
    /// [`LinkError::Write`] if the write fails.
    pub fn send(&mut self, command: &str) -> Result<(), LinkError> {
        if !self.transport.is_open() {
            return Err(LinkError::NotOpen);
        }
        tracing::info!("sending command: {}", command);
        let mut bytes = Vec::with_capacity(command.len() + 1);
        bytes.extend_from_slice(command.as_bytes());
        bytes.push(b'\n');
        self.transport.write_all(&bytes).map_err(LinkError::Write)
    }

    /// Send `command` and drain feedback for its estimated budget.
    ///
    /// # Errors
    /// Only the send can fail, see [`CommandLink::send`].
    pub fn dispatch(&mut self, command: &str) -> Result<Vec<Feedback>, LinkError> {
        self.send(command)?;
        let budget = self.config.budget_for(command);
        tracing::info!("waiting {:.2}s for feedback", budget.as_secs_f64());
        let events = self.drain(budget);
        tracing::info!("feedback window closed ({} events)", events.len());
        Ok(events)
    }

    /// Poll the transport until `budget` has elapsed.
    pub fn drain(&mut self, budget: Duration) -> Vec<Feedback> {
        // A budget too large to represent as an instant never expires.
        let deadline = Instant::now().checked_add(budget);
        let poll = self.config.poll_interval();
        let mut buffer = LineBuffer::default();
        let mut events = Vec::new();
        let mut chunk = [0u8; 512];
        let mut last_error: Option<io::ErrorKind> = None;

        loop {
            let now = Instant::now();
            let idle = match deadline {
                Some(deadline) if now >= deadline => break,
                Some(deadline) => poll.min(deadline - now),
                None => poll,
            };

            match self.transport.read_available(&mut chunk) {
                Ok(0) => thread::sleep(idle),
                Ok(n) => buffer.push(&chunk[..n], &mut events),
                Err(e) => {
                    if last_error != Some(e.kind()) {
                        tracing::warn!("error reading feedback: {}", e);
                    } else {
                        tracing::debug!("error reading feedback: {}", e);
                    }
                    last_error = Some(e.kind());
                    thread::sleep(idle);
                }
            }
        }

        buffer.finish(&mut events);
        events
    }

    /// Wait for the device to boot, then collect whatever greeting it has
    /// already printed.
    pub fn settle(&mut self) -> Vec<Feedback> {
        thread::sleep(Duration::from_millis(self.config.settle_ms));

        let mut buffer = LineBuffer::default();
        let mut events = Vec::new();
        let mut chunk = [0u8; 512];
        loop {
            match self.transport.read_available(&mut chunk) {
                Ok(0) => break,
                Ok(n) => buffer.push(&chunk[..n], &mut events),
                Err(e) => {
                    tracing::warn!("error reading greeting: {}", e);
                    break;
                }
            }
        }
        buffer.finish(&mut events);
        events
    }
}
