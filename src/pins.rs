//! Pin-level access to the IC socket.
//!
//! Everything the tester does to a chip goes through [`PinIo`]; the engine
//! never touches hardware registers itself.

use std::fmt;

use crate::descriptor::ConfigError;

/// Pins 7 and 14 of a 14-pin DIP are GND and VCC.
pub const GND_PIN: u8 = 7;
pub const VCC_PIN: u8 = 14;
pub const SOCKET_PINS: u8 = 14;

/// A signal position on the 14-pin test socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinId(u8);

impl PinId {
    pub fn new(number: u8) -> Result<Self, ConfigError> {
        match number {
            GND_PIN | VCC_PIN => Err(ConfigError::InvalidPin(number)),
            1..=SOCKET_PINS => Ok(PinId(number)),
            _ => Err(ConfigError::InvalidPin(number)),
        }
    }

    #[inline]
    pub fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pin {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Low,
    High,
}

impl Level {
    #[inline]
    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

impl From<bool> for Level {
    #[inline]
    fn from(v: bool) -> Self {
        if v {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    #[inline]
    fn from(level: Level) -> bool {
        level.is_high()
    }
}

/// Direction from the tester's point of view: an `Output` pin feeds one of
/// the IC's inputs, an `Input` pin samples one of the IC's outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

pub trait PinIo {
    fn set_direction(&mut self, pin: PinId, direction: Direction);
    fn write(&mut self, pin: PinId, level: Level);
    fn read(&mut self, pin: PinId) -> Level;
}

impl<T: PinIo + ?Sized> PinIo for &mut T {
    fn set_direction(&mut self, pin: PinId, direction: Direction) {
        (**self).set_direction(pin, direction)
    }

    fn write(&mut self, pin: PinId, level: Level) {
        (**self).write(pin, level)
    }

    fn read(&mut self, pin: PinId) -> Level {
        (**self).read(pin)
    }
}

/// Blocks long enough for a gate output to settle after its inputs change.
pub trait Delay {
    fn settle(&mut self);
}

impl<T: Delay + ?Sized> Delay for &mut T {
    fn settle(&mut self) {
        (**self).settle()
    }
}

/// Spin for a fixed number of iterations, calibrated on the bench with a scope.
#[derive(Debug, Clone, Copy)]
pub struct SpinDelay {
    pub cycles: u32,
}

impl SpinDelay {
    pub fn new(cycles: u32) -> Self {
        SpinDelay { cycles }
    }
}

impl Delay for SpinDelay {
    fn settle(&mut self) {
        for _ in 0..self.cycles {
            std::hint::spin_loop();
        }
    }
}
