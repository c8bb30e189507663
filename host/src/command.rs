//! Device command vocabulary
//!
//! | text      | meaning                                  |
//! |-----------|------------------------------------------|
//! | `FRFL...` | drive the instructions now               |
//! | `!S...`   | store the instructions on the device     |
//! | `!E`      | execute the stored route                 |
//! | `!C`      | run calibration                          |
//!
//! Control tokens are case-insensitive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;

pub const SAVE_PREFIX: &str = "!S";
pub const EXECUTE_TOKEN: &str = "!E";
pub const CALIBRATE_TOKEN: &str = "!C";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "instructions", rename_all = "lowercase")]
pub enum Command {
    Drive(String),
    Save(String),
    Execute,
    Calibrate,
}

impl Command {
    pub fn is_execute(text: &str) -> bool {
        text.eq_ignore_ascii_case(EXECUTE_TOKEN)
    }

    pub fn is_calibrate(text: &str) -> bool {
        text.eq_ignore_ascii_case(CALIBRATE_TOKEN)
    }

    /// `text` without a leading save marker, when it carries instructions
    /// after the marker.
    pub fn strip_save_prefix(text: &str) -> &str {
        match text.get(..SAVE_PREFIX.len()) {
            Some(head) if head.eq_ignore_ascii_case(SAVE_PREFIX) && text.len() > SAVE_PREFIX.len() => {
                &text[SAVE_PREFIX.len()..]
            }
            _ => text,
        }
    }
}

fn check_instructions(instructions: &str, offset: usize) -> Result<(), CommandError> {
    if instructions.is_empty() {
        return Err(CommandError::Empty);
    }
    match instructions
        .chars()
        .enumerate()
        .find(|(_, c)| !matches!(c.to_ascii_uppercase(), 'F' | 'L' | 'R'))
    {
        Some((position, symbol)) => Err(CommandError::InvalidSymbol {
            symbol,
            position: position + offset,
        }),
        None => Ok(()),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CommandError::Empty);
        }
        if Self::is_execute(s) {
            return Ok(Command::Execute);
        }
        if Self::is_calibrate(s) {
            return Ok(Command::Calibrate);
        }

        let body = Self::strip_save_prefix(s);
        if body.len() != s.len() {
            check_instructions(body, SAVE_PREFIX.len())?;
            return Ok(Command::Save(body.to_ascii_uppercase()));
        }
        check_instructions(s, 0)?;
        Ok(Command::Drive(s.to_ascii_uppercase()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Drive(instructions) => write!(f, "{}", instructions),
            Command::Save(instructions) => write!(f, "{}{}", SAVE_PREFIX, instructions),
            Command::Execute => write!(f, "{}", EXECUTE_TOKEN),
            Command::Calibrate => write!(f, "{}", CALIBRATE_TOKEN),
        }
    }
}
