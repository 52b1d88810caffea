use embedded_hal::digital::OutputPin;

use super::Channel;

/// Red, green and blue LED output lines, in that order.
pub struct LedPins<Pin>
where
    Pin: OutputPin,
{
    pins: [Pin; 3],
}

impl<Pin> LedPins<Pin>
where
    Pin: OutputPin,
{
    pub fn new(red: Pin, green: Pin, blue: Pin) -> Self {
        Self {
            pins: [red, green, blue],
        }
    }

    /// Lights the LEDs of `channel`; lines outside its mask are left alone.
    pub fn on(&mut self, channel: Channel) -> Result<(), Pin::Error> {
        let mask = channel.led_mask();
        for (i, pin) in self.pins.iter_mut().enumerate() {
            if (mask & (1 << i)) != 0 {
                pin.set_high()?;
            }
        }
        Ok(())
    }

    /// Switches every line low, even if one of them fails.
    pub fn off(&mut self) -> Result<(), Pin::Error> {
        let mut result = Ok(());
        for pin in self.pins.iter_mut() {
            if let Err(err) = pin.set_low() {
                result = Err(err);
            }
        }
        result
    }

    pub fn release(self) -> [Pin; 3] {
        self.pins
    }
}
