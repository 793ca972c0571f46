#![no_std]

#[cfg(test)]
extern crate std;

pub mod bus;
pub mod expander;
pub mod platform;

pub use bus::{
    ArgError, BusError, Line, LineBinding, LineConfig, Spi3Wire, Spi3WireConfig, CLOCK_HZ_MAX,
};
pub use expander::{ExpanderError, IoExpanderOps, NoExpander, PinMode, Tca9554};
pub use platform::{DelayOps, I2cOps, OutputOnly, PinOps};
