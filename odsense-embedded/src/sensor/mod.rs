mod controller;
mod led;
#[cfg(test)]
pub(crate) mod mock;

pub use controller::*;
pub use led::LedPins;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filter::MIN_SAMPLE_COUNT;

pub const DEFAULT_SAMPLE_COUNT: u8 = 10;
pub const DEFAULT_READ_INTERVAL_MS: u16 = 50;
pub const DEFAULT_SETTLE_MS: u32 = 500;

pub const BH1750_ADDRESS_LOW: u8 = 0x23;
pub const BH1750_ADDRESS_HIGH: u8 = 0x5C;

/// Measurement modes understood by BH1750-class light sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasurementMode {
    /// 1 lx resolution, ~120 ms per measurement
    ContinuousHighRes,
    /// 0.5 lx resolution, ~120 ms per measurement
    ContinuousHighRes2,
    /// 4 lx resolution, ~16 ms per measurement
    ContinuousLowRes,
    OneTimeHighRes,
    OneTimeHighRes2,
    OneTimeLowRes,
}

impl MeasurementMode {
    pub const fn opcode(self) -> u8 {
        match self {
            MeasurementMode::ContinuousHighRes => 0x10,
            MeasurementMode::ContinuousHighRes2 => 0x11,
            MeasurementMode::ContinuousLowRes => 0x13,
            MeasurementMode::OneTimeHighRes => 0x20,
            MeasurementMode::OneTimeHighRes2 => 0x21,
            MeasurementMode::OneTimeLowRes => 0x23,
        }
    }

    pub const fn is_continuous(self) -> bool {
        matches!(
            self,
            MeasurementMode::ContinuousHighRes
                | MeasurementMode::ContinuousHighRes2
                | MeasurementMode::ContinuousLowRes
        )
    }
}

/// Ambient light sensor the controller samples from.
pub trait LightSource {
    type Error: core::fmt::Debug;

    /// Binds the sensor to `address` and switches it to `mode`.
    fn begin(
        &mut self,
        address: u8,
        mode: MeasurementMode,
    ) -> core::result::Result<(), Self::Error>;

    /// Returns the current light level in lux.
    fn read_light_level(&mut self) -> core::result::Result<f32, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    Red,
    Green,
    Blue,
    White,
}

impl Channel {
    /// Capture order used by a full capture.
    pub const ALL: [Channel; 4] = [Channel::Red, Channel::Green, Channel::Blue, Channel::White];

    /// Bit mask of the LED lines lit for this channel (bit 0 red, 1 green, 2 blue).
    pub const fn led_mask(self) -> u8 {
        match self {
            Channel::Red => 0b001,
            Channel::Green => 0b010,
            Channel::Blue => 0b100,
            Channel::White => 0b111,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Samples taken per channel
    pub n_samples: u8,
    /// Delay after each sample (ms)
    pub ms_reads: u16,
    /// Delay between switching the LEDs on and the first sample (ms)
    pub settle_ms: u32,
    /// Mode requested from the light sensor during `begin`
    pub mode: MeasurementMode,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            n_samples: DEFAULT_SAMPLE_COUNT,
            ms_reads: DEFAULT_READ_INTERVAL_MS,
            settle_ms: DEFAULT_SETTLE_MS,
            mode: MeasurementMode::ContinuousHighRes2,
        }
    }
}

impl SensorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_samples < MIN_SAMPLE_COUNT {
            return Err(Error::InvalidSampleCount(self.n_samples));
        }
        if self.ms_reads == 0 {
            return Err(Error::InvalidReadInterval);
        }
        if !self.mode.is_continuous() {
            return Err(Error::UnsupportedMode(self.mode));
        }
        Ok(())
    }

    /// Approximate duration of one full capture (ms), saturating at `u32::MAX`.
    pub fn capture_duration_ms(&self) -> u32 {
        let sampling = u32::from(self.n_samples) * u32::from(self.ms_reads);
        self.settle_ms
            .saturating_add(sampling)
            .saturating_mul(Channel::ALL.len() as u32)
    }
}

/// Last reduced value of every channel (lux).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelReadings {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub white: f32,
}

impl ChannelReadings {
    pub fn get(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
            Channel::White => self.white,
        }
    }

    pub fn set(&mut self, channel: Channel, value: f32) {
        match channel {
            Channel::Red => self.red = value,
            Channel::Green => self.green = value,
            Channel::Blue => self.blue = value,
            Channel::White => self.white = value,
        }
    }
}
