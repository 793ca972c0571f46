use crate::platform::I2cOps;

// TCA9554 with A2..A0 strapped low. The TCA9554A variant starts at 0x38.
pub const TCA9554_I2C_ADDR: u8 = 0x20;

const REG_OUTPUT: u8 = 0x01;
const REG_CONFIG: u8 = 0x03;
const PIN_COUNT: u8 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinMode {
    Input,
    Output,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ExpanderError<E> {
    I2c(E),
    InvalidPin(u8),
}

impl<E> From<E> for ExpanderError<E> {
    fn from(value: E) -> Self {
        Self::I2c(value)
    }
}

pub type Result<T, E> = core::result::Result<T, ExpanderError<E>>;

/// What the panel bus needs from an I/O expander: per-pin direction and
/// output level, each call one transaction on the expander's control bus.
pub trait IoExpanderOps {
    type Error;

    fn set_direction(&mut self, pin: u8, mode: PinMode) -> core::result::Result<(), Self::Error>;
    fn set_level(&mut self, pin: u8, high: bool) -> core::result::Result<(), Self::Error>;
}

/// Stand-in expander type for buses wired to native GPIOs only, so
/// `Option<X>` has something to be `None` of.
pub enum NoExpander {}

impl IoExpanderOps for NoExpander {
    type Error = core::convert::Infallible;

    fn set_direction(
        &mut self,
        _pin: u8,
        _mode: PinMode,
    ) -> core::result::Result<(), Self::Error> {
        match *self {}
    }

    fn set_level(&mut self, _pin: u8, _high: bool) -> core::result::Result<(), Self::Error> {
        match *self {}
    }
}

/// 8-bit I2C expander (TCA9554 family). OUTPUT and CONFIG registers are
/// shadowed here; `new` reads the chip state once, later calls mutate the
/// shadow and write the whole register back. CONFIG bit 1 = input.
pub struct Tca9554<I2C> {
    i2c: I2C,
    addr: u8,
    out_reg: u8,
    cfg_reg: u8,
}

impl<I2C> Tca9554<I2C>
where
    I2C: I2cOps,
{
    pub fn new(mut i2c: I2C, addr: u8) -> Result<Self, I2C::Error> {
        let mut out = [0u8; 1];
        i2c.write_read(addr, &[REG_OUTPUT], &mut out)?;
        let mut cfg = [0u8; 1];
        i2c.write_read(addr, &[REG_CONFIG], &mut cfg)?;
        Ok(Self {
            i2c,
            addr,
            out_reg: out[0],
            cfg_reg: cfg[0],
        })
    }

    pub fn probe(&mut self) -> core::result::Result<bool, I2C::Error> {
        self.i2c.probe(self.addr)
    }

    pub fn into_inner(self) -> I2C {
        self.i2c
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.addr, &[reg, value])?;
        Ok(())
    }
}

impl<I2C> IoExpanderOps for Tca9554<I2C>
where
    I2C: I2cOps,
{
    type Error = ExpanderError<I2C::Error>;

    fn set_direction(&mut self, pin: u8, mode: PinMode) -> Result<(), I2C::Error> {
        if pin >= PIN_COUNT {
            return Err(ExpanderError::InvalidPin(pin));
        }
        match mode {
            PinMode::Input => self.cfg_reg |= 1 << pin,
            PinMode::Output => self.cfg_reg &= !(1 << pin),
        }
        self.write_reg(REG_CONFIG, self.cfg_reg)
    }

    fn set_level(&mut self, pin: u8, high: bool) -> Result<(), I2C::Error> {
        if pin >= PIN_COUNT {
            return Err(ExpanderError::InvalidPin(pin));
        }
        if high {
            self.out_reg |= 1 << pin;
        } else {
            self.out_reg &= !(1 << pin);
        }
        self.write_reg(REG_OUTPUT, self.out_reg)
    }
}
