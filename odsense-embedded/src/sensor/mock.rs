//! Fake hardware shared by the sensor tests. Every fake writes into one
//! [`EventLog`] so tests can check the order of side effects.

use core::cell::{Cell, RefCell};

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorType, OutputPin};

use super::{Channel, LightSource, MeasurementMode};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Pin(Channel, bool),
    Begin(u8, MeasurementMode),
    /// Light read, tagged with the LED mask lit at the time.
    Read(u8),
    Delay(u32),
}

#[derive(Debug, Default)]
struct LogState {
    events: Vec<Event>,
    lit: u8,
}

#[derive(Debug, Clone, Default)]
pub struct EventLog {
    state: Rc<RefCell<LogState>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn lit(&self) -> u8 {
        self.state.borrow().lit
    }

    /// LED masks seen by each read, in order.
    pub fn read_masks(&self) -> Vec<u8> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                Event::Read(mask) => Some(*mask),
                _ => None,
            })
            .collect()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                Event::Delay(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.state.borrow().events.iter().filter(|e| predicate(*e)).count()
    }

    pub fn clear(&self) {
        self.state.borrow_mut().events.clear();
    }

    fn push(&self, event: Event) {
        let mut state = self.state.borrow_mut();
        if let Event::Pin(channel, high) = event {
            if high {
                state.lit |= channel.led_mask();
            } else {
                state.lit &= !channel.led_mask();
            }
        }
        state.events.push(event);
    }

    fn record_read(&self) {
        let lit = self.lit();
        self.push(Event::Read(lit));
    }
}

#[derive(Debug)]
pub struct PinFault;

impl digital::Error for PinFault {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

#[derive(Debug)]
pub struct MockPin {
    channel: Channel,
    log: EventLog,
    fail: Rc<Cell<bool>>,
}

impl MockPin {
    pub fn new(channel: Channel, log: &EventLog) -> Self {
        Self {
            channel,
            log: log.clone(),
            fail: Rc::new(Cell::new(false)),
        }
    }

    /// Handle that keeps controlling the pin after it was moved away.
    pub fn fault_switch(&self) -> Rc<Cell<bool>> {
        self.fail.clone()
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.set(fail);
    }
}

impl ErrorType for MockPin {
    type Error = PinFault;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.fail.get() {
            return Err(PinFault);
        }
        self.log.push(Event::Pin(self.channel, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if self.fail.get() {
            return Err(PinFault);
        }
        self.log.push(Event::Pin(self.channel, true));
        Ok(())
    }
}

pub fn mock_pins(log: &EventLog) -> (MockPin, MockPin, MockPin) {
    (
        MockPin::new(Channel::Red, log),
        MockPin::new(Channel::Green, log),
        MockPin::new(Channel::Blue, log),
    )
}

#[derive(Debug, PartialEq)]
pub struct ReadFault;

/// Light sensor replaying a scripted list of readings. Once the script runs
/// out it keeps returning `ambient`.
#[derive(Debug)]
pub struct MockLightSource {
    log: EventLog,
    script: VecDeque<Result<f32, ReadFault>>,
    pub ambient: f32,
    pub accept_mode: bool,
}

impl MockLightSource {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            script: VecDeque::new(),
            ambient: 0.0,
            accept_mode: true,
        }
    }

    pub fn push_samples(&mut self, samples: &[f32]) {
        self.script.extend(samples.iter().copied().map(Ok));
    }

    pub fn push_fault(&mut self) {
        self.script.push_back(Err(ReadFault));
    }
}

impl LightSource for MockLightSource {
    type Error = ReadFault;

    fn begin(&mut self, address: u8, mode: MeasurementMode) -> Result<(), Self::Error> {
        self.log.push(Event::Begin(address, mode));
        if self.accept_mode { Ok(()) } else { Err(ReadFault) }
    }

    fn read_light_level(&mut self) -> Result<f32, Self::Error> {
        self.log.record_read();
        self.script.pop_front().unwrap_or(Ok(self.ambient))
    }
}

#[derive(Debug)]
pub struct MockDelay {
    log: EventLog,
}

impl MockDelay {
    pub fn new(log: &EventLog) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::Delay(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::Delay(ms));
    }
}
