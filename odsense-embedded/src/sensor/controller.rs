use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::error::{Error, Result};
use crate::filter::trimmed_mean;

use super::led::LedPins;
use super::{Channel, ChannelReadings, LightSource, MIN_SAMPLE_COUNT, SensorConfig};

/// Optical density sensor: three LEDs shining through a sample onto an
/// ambient light sensor.
///
/// Captures are blocking. Each channel lights its LEDs, waits for the light to
/// settle, samples `n_samples` times and reduces the window with a trimmed
/// mean. Channels never overlap.
pub struct OpticalDensitySensor<Light, Pin, Delay>
where
    Light: LightSource,
    Pin: OutputPin,
    Delay: DelayNs,
{
    light_source: Light,
    delay: Delay,
    leds: Option<LedPins<Pin>>,
    config: SensorConfig,
    readings: ChannelReadings,
    address: Option<u8>,
    initialized: bool,
}

impl<Light, Pin, Delay> OpticalDensitySensor<Light, Pin, Delay>
where
    Light: LightSource,
    Pin: OutputPin,
    Delay: DelayNs,
{
    pub fn new(light_source: Light, delay: Delay) -> Self {
        Self {
            light_source,
            delay,
            leds: None,
            config: SensorConfig::default(),
            readings: ChannelReadings::default(),
            address: None,
            initialized: false,
        }
    }

    pub fn with_config(light_source: Light, delay: Delay, config: SensorConfig) -> Result<Self> {
        config.validate()?;

        let mut sensor = Self::new(light_source, delay);
        sensor.config = config;
        Ok(sensor)
    }

    /// Assigns the LED lines, switches them off and puts the light sensor at
    /// `address` into the configured measurement mode.
    ///
    /// Calling this again after a successful start does nothing; the pins
    /// passed on such a call are dropped unused.
    pub fn begin(&mut self, address: u8, red: Pin, green: Pin, blue: Pin) -> Result<()> {
        if self.initialized {
            log::debug!("Sensor already initialized, skipping begin");
            return Ok(());
        }

        let mut leds = LedPins::new(red, green, blue);
        leds.off().map_err(|err| {
            log::warn!("Failed to configure LED outputs: {:?}", err);
            Error::PinError(Channel::White)
        })?;
        self.leds = Some(leds);

        let mode = self.config.mode;
        self.light_source.begin(address, mode).map_err(|err| {
            log::warn!(
                "Light sensor at {:#04x} refused mode {:?}: {:?}",
                address,
                mode,
                err
            );
            Error::InitializationError
        })?;

        self.address = Some(address);
        self.initialized = true;
        log::info!(
            "Optical density sensor started at {:#04x} in {:?} mode",
            address,
            mode
        );
        Ok(())
    }

    /// Captures all four channels in the order red, green, blue, white.
    ///
    /// Readings are only replaced once every channel succeeded; on error the
    /// previous readings stay available.
    pub fn capture(&mut self) -> Result<ChannelReadings> {
        let mut readings = ChannelReadings::default();
        for channel in Channel::ALL {
            let value = self.capture_channel(channel)?;
            readings.set(channel, value);
        }

        self.readings = readings;
        log::info!(
            "Captured R={:.2} G={:.2} B={:.2} W={:.2}",
            readings.red,
            readings.green,
            readings.blue,
            readings.white
        );
        Ok(readings)
    }

    /// Runs a single channel phase and returns its filtered value without
    /// storing it.
    pub fn capture_channel(&mut self, channel: Channel) -> Result<f32> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }

        let Self {
            light_source,
            delay,
            leds,
            config,
            ..
        } = self;
        let leds = leds.as_mut().ok_or(Error::NotInitialized)?;

        log::debug!(
            "{:?} phase: {} samples every {} ms",
            channel,
            config.n_samples,
            config.ms_reads
        );

        if let Err(err) = leds.on(channel) {
            log::warn!("Failed to switch on {:?} LED: {:?}", channel, err);
            leds.off().ok();
            return Err(Error::PinError(channel));
        }
        delay.delay_ms(config.settle_ms);

        let mut samples = Vec::with_capacity(usize::from(config.n_samples));
        for _ in 0..config.n_samples {
            match light_source.read_light_level() {
                Ok(lux) => samples.push(lux),
                Err(err) => {
                    log::warn!(
                        "Light read failed after {} {:?} samples: {:?}",
                        samples.len(),
                        channel,
                        err
                    );
                    leds.off().ok();
                    return Err(Error::SensorReadError(Some(channel)));
                }
            }
            delay.delay_ms(u32::from(config.ms_reads));
        }

        leds.off().map_err(|err| {
            log::warn!("Failed to switch off {:?} LED: {:?}", channel, err);
            Error::PinError(channel)
        })?;

        trimmed_mean(&mut samples)
    }

    /// Reads the light sensor once with every LED left as it is.
    pub fn read_light_level(&mut self) -> Result<f32> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }

        self.light_source.read_light_level().map_err(|err| {
            log::warn!("Ambient light read failed: {:?}", err);
            Error::SensorReadError(None)
        })
    }

    pub fn set_n_samples(&mut self, n_samples: u8) -> Result<()> {
        if n_samples < MIN_SAMPLE_COUNT {
            log::warn!("Rejected sample count {}", n_samples);
            return Err(Error::InvalidSampleCount(n_samples));
        }
        self.config.n_samples = n_samples;
        Ok(())
    }

    pub fn n_samples(&self) -> u8 {
        self.config.n_samples
    }

    pub fn set_ms_reads(&mut self, ms_reads: u16) -> Result<()> {
        if ms_reads == 0 {
            log::warn!("Rejected read interval of 0 ms");
            return Err(Error::InvalidReadInterval);
        }
        self.config.ms_reads = ms_reads;
        Ok(())
    }

    pub fn ms_reads(&self) -> u16 {
        self.config.ms_reads
    }

    pub fn set_settle_ms(&mut self, settle_ms: u32) {
        self.config.settle_ms = settle_ms;
    }

    pub fn settle_ms(&self) -> u32 {
        self.config.settle_ms
    }

    /// Replaces the whole configuration. The measurement mode only takes
    /// effect on the next successful `begin`.
    pub fn set_config(&mut self, config: SensorConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn readings(&self) -> ChannelReadings {
        self.readings
    }

    pub fn red_value(&self) -> f32 {
        self.readings.red
    }

    pub fn green_value(&self) -> f32 {
        self.readings.green
    }

    pub fn blue_value(&self) -> f32 {
        self.readings.blue
    }

    pub fn white_value(&self) -> f32 {
        self.readings.white
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn address(&self) -> Option<u8> {
        self.address
    }

    /// Hands the hardware back. LED pins are only present after `begin`.
    pub fn release(self) -> (Light, Delay, Option<[Pin; 3]>) {
        (self.light_source, self.delay, self.leds.map(LedPins::release))
    }
}

#[cfg(feature = "std")]
impl<Light, Pin> OpticalDensitySensor<Light, Pin, embassy_time::Delay>
where
    Light: LightSource,
    Pin: OutputPin,
{
    /// Uses the embassy time driver for the settle and sampling delays.
    pub fn with_system_delay(light_source: Light) -> Self {
        Self::new(light_source, embassy_time::Delay)
    }
}
