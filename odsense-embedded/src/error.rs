use core::fmt;

use crate::filter::MIN_SAMPLE_COUNT;
use crate::sensor::{Channel, MeasurementMode};

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    InitializationError,
    NotInitialized,
    InvalidSampleCount(u8),
    InvalidReadInterval,
    /// Only continuous measurement modes give a fresh value on every read.
    UnsupportedMode(MeasurementMode),
    InsufficientSamples(usize),
    /// `None` when the failing read was an ambient read outside a capture.
    SensorReadError(Option<Channel>),
    PinError(Channel),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InitializationError => write!(f, "Initialization error"),
            Error::NotInitialized => write!(f, "Sensor not initialized"),
            Error::InvalidSampleCount(n) => {
                write!(
                    f,
                    "Invalid sample count {n}, at least {MIN_SAMPLE_COUNT} samples are required"
                )
            }
            Error::InvalidReadInterval => write!(f, "Read interval must be at least 1 ms"),
            Error::UnsupportedMode(mode) => {
                write!(f, "Unsupported measurement mode {mode:?}, a continuous mode is required")
            }
            Error::InsufficientSamples(n) => {
                write!(f, "Cannot filter {n} samples, at least {MIN_SAMPLE_COUNT} are required")
            }
            Error::SensorReadError(Some(channel)) => {
                write!(f, "Light sensor read failed during {channel:?} capture")
            }
            Error::SensorReadError(None) => write!(f, "Light sensor read failed"),
            Error::PinError(channel) => write!(f, "Failed to drive {channel:?} LED output"),
        }
    }
}

impl core::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
