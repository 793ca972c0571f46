#[cfg(feature = "esp-hal-runtime")]
use esp_hal::{
    gpio::{Flex, Pull},
    i2c::master::{Error as I2cError, I2c},
    time::{Duration, Instant},
    Blocking,
};

pub trait DelayOps {
    fn delay_us(&self, micros: u32);
    fn delay_ms(&self, millis: u32);
}

pub trait I2cOps {
    type Error;

    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;
    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), Self::Error>;
    fn write_read(&mut self, addr: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Self::Error>;
    fn probe(&mut self, addr: u8) -> Result<bool, Self::Error>;
    fn reset(&mut self) -> Result<(), Self::Error>;
}

/// One digital output line. `release` returns the pin to input/floating so a
/// panel can be handed over to another interface after init.
pub trait PinOps {
    type Error;

    fn set_output(&mut self) -> Result<(), Self::Error>;
    fn set_level(&mut self, high: bool) -> Result<(), Self::Error>;
    fn release(&mut self) -> Result<(), Self::Error>;
}

/// Adapter for plain `embedded-hal` output pins that cannot float. `release`
/// leaves the line driven at its last level.
pub struct OutputOnly<P> {
    pin: P,
}

impl<P> OutputOnly<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: embedded_hal::digital::OutputPin> PinOps for OutputOnly<P> {
    type Error = P::Error;

    fn set_output(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_level(&mut self, high: bool) -> Result<(), Self::Error> {
        if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(feature = "esp-hal-runtime")]
pub struct HalI2c<'d> {
    bus: I2c<'d, Blocking>,
}

#[cfg(feature = "esp-hal-runtime")]
impl<'d> HalI2c<'d> {
    pub fn new(bus: I2c<'d, Blocking>) -> Self {
        Self { bus }
    }
}

#[cfg(feature = "esp-hal-runtime")]
impl I2cOps for HalI2c<'_> {
    type Error = I2cError;

    fn read(&mut self, addr: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.bus.read(addr, buffer)
    }

    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.bus.write(addr, bytes)
    }

    fn write_read(&mut self, addr: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.bus.write_read(addr, bytes, buffer)
    }

    fn probe(&mut self, addr: u8) -> Result<bool, Self::Error> {
        match self.bus.write(addr, &[0x00]) {
            Ok(()) => Ok(true),
            Err(I2cError::AcknowledgeCheckFailed(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        // `esp-hal` resets the peripheral state on each transaction path.
        // Keep the trait hook for parity with ESP-IDF migration behavior.
        Ok(())
    }
}

#[cfg(feature = "esp-hal-runtime")]
pub struct HalPin<'d> {
    pin: Flex<'d>,
}

#[cfg(feature = "esp-hal-runtime")]
impl<'d> HalPin<'d> {
    pub fn new(pin: Flex<'d>) -> Self {
        Self { pin }
    }
}

#[cfg(feature = "esp-hal-runtime")]
impl PinOps for HalPin<'_> {
    type Error = core::convert::Infallible;

    fn set_output(&mut self) -> Result<(), Self::Error> {
        self.pin.set_as_output();
        Ok(())
    }

    fn set_level(&mut self, high: bool) -> Result<(), Self::Error> {
        if high {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        self.pin.set_as_input(Pull::None);
        Ok(())
    }
}

#[cfg(feature = "esp-hal-runtime")]
#[derive(Clone, Copy, Default)]
pub struct BusyDelay;

#[cfg(feature = "esp-hal-runtime")]
impl BusyDelay {
    pub const fn new() -> Self {
        Self
    }

    fn delay_duration(&self, duration: Duration) {
        let start = Instant::now();
        while start.elapsed() < duration {}
    }
}

#[cfg(feature = "esp-hal-runtime")]
impl DelayOps for BusyDelay {
    fn delay_us(&self, micros: u32) {
        self.delay_duration(Duration::from_micros(micros as u64));
    }

    fn delay_ms(&self, millis: u32) {
        self.delay_duration(Duration::from_millis(millis as u64));
    }
}

/// Delay backend on the embassy time driver. Millisecond waits go through the
/// shared tick source, so their granularity is the driver's tick period.
#[cfg(feature = "embassy-runtime")]
#[derive(Clone, Copy, Default)]
pub struct TickDelay;

#[cfg(feature = "embassy-runtime")]
impl TickDelay {
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(feature = "embassy-runtime")]
impl DelayOps for TickDelay {
    fn delay_us(&self, micros: u32) {
        embassy_time::block_for(embassy_time::Duration::from_micros(micros as u64));
    }

    fn delay_ms(&self, millis: u32) {
        embassy_time::block_for(embassy_time::Duration::from_millis(millis as u64));
    }
}
