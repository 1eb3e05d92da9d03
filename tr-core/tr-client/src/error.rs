//! Error type for command exchanges

use crate::command::AckResponse;
use std::fmt;
use std::time::Duration;
use tr_model::{ModelError, TeensyFileType, TeensyToken};
use tr_shared::TransportError;

/// Error raised while talking to a cartridge
#[derive(Debug, Clone, PartialEq)]
pub enum TeensyError {
    /// A protocol phase was not acknowledged
    Ack {
        phase: &'static str,
        response: AckResponse,
        /// Whatever the device printed after refusing, often the reason
        device_output: String,
    },
    /// A control token other than the expected one arrived
    UnexpectedToken {
        expected: TeensyToken,
        received: TeensyToken,
    },
    /// A bounded wait ran out
    Timeout {
        context: &'static str,
        waited: Duration,
    },
    /// Directory payload could not be decoded
    Decode(String),
    Transport(TransportError),
    UnsupportedFileType(TeensyFileType),
    Io(String),
    /// No cartridge is connected
    NotConnected,
}

impl TeensyError {
    /// Device text captured with the error, if any
    pub fn device_output(&self) -> Option<&str> {
        match self {
            TeensyError::Ack { device_output, .. } if !device_output.is_empty() => {
                Some(device_output)
            }
            _ => None,
        }
    }
}

impl fmt::Display for TeensyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeensyError::Ack {
                phase,
                response,
                device_output,
            } => {
                write!(f, "Error getting acknowledgement when {phase}: {response}")?;
                if !device_output.is_empty() {
                    write!(f, " ({})", device_output.trim())?;
                }
                Ok(())
            }
            TeensyError::UnexpectedToken { expected, received } => {
                write!(f, "Expected {expected} but received {received}")
            }
            TeensyError::Timeout { context, waited } => {
                write!(f, "Timed out after {waited:?} waiting for {context}")
            }
            TeensyError::Decode(msg) => write!(f, "Error parsing directory content: {msg}"),
            TeensyError::Transport(e) => write!(f, "Transport error: {e}"),
            TeensyError::UnsupportedFileType(file_type) => {
                write!(f, "Unsupported file type: {file_type:?}")
            }
            TeensyError::Io(msg) => write!(f, "I/O error: {msg}"),
            TeensyError::NotConnected => write!(f, "No TeensyROM connected"),
        }
    }
}

impl std::error::Error for TeensyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TeensyError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransportError> for TeensyError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::NotOpen => TeensyError::NotConnected,
            other => TeensyError::Transport(other),
        }
    }
}

impl From<ModelError> for TeensyError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::UnsupportedFileType(file_type) => TeensyError::UnsupportedFileType(file_type),
            other => TeensyError::Io(other.to_string()),
        }
    }
}
