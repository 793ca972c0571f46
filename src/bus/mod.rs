use crate::expander::IoExpanderOps;
use crate::platform::{DelayOps, PinOps};

/// Ceiling for the bit-banged clock. GPIO toggling through an expander or
/// the ROM delay loop cannot honor anything faster.
pub const CLOCK_HZ_MAX: u32 = 500_000;

const LCD_CMD_BYTES_MAX: u8 = 4;
const LCD_PARAM_BYTES_MAX: u8 = 4;
const SPI_MODE_MAX: u8 = 3;
// Above this the busy-wait would monopolize the core for whole ticks.
const BUSY_WAIT_CEILING_US: u32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    Cs,
    Scl,
    Sda,
}

/// One logical bus line: a native pin, or a pin index on the shared
/// expander handle passed to [`Spi3Wire::new`].
pub enum LineBinding<P> {
    Native(P),
    Expander(u8),
}

pub struct LineConfig<P> {
    pub cs: LineBinding<P>,
    pub scl: LineBinding<P>,
    pub sda: LineBinding<P>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgError {
    CommandBytes(u8),
    ParamBytes(u8),
    ClockTooFast(u32),
    SpiMode(u8),
    MissingExpander,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusError {
    InvalidArgument(ArgError),
    Io(Line),
    NotSupported,
}

pub type Result<T> = core::result::Result<T, BusError>;

#[derive(Clone, Copy, Debug)]
pub struct Spi3WireConfig {
    /// SCL frequency in Hz; 0 means [`CLOCK_HZ_MAX`].
    pub clock_hz: u32,
    /// Bytes per command word, 1..=4.
    pub command_bytes: u8,
    /// Bytes per parameter word, 1..=4.
    pub param_bytes: u8,
    /// Classic SPI mode 0..=3, turned into idle levels and active edge.
    pub spi_mode: u8,
    /// Prefix the first byte of every frame with a D/C bit.
    pub use_dc_bit: bool,
    /// D/C polarity: true means 0 marks data, 1 marks commands.
    pub dc_zero_on_data: bool,
    pub lsb_first: bool,
    pub cs_high_active: bool,
    /// Leave CS driven at its active level when the bus is torn down, for
    /// panels whose SPI pins double as RGB signals after init.
    pub keep_cs_on_teardown: bool,
}

impl Default for Spi3WireConfig {
    fn default() -> Self {
        Self {
            clock_hz: 0,
            command_bytes: 1,
            param_bytes: 1,
            spi_mode: 0,
            use_dc_bit: true,
            dc_zero_on_data: false,
            lsb_first: false,
            cs_high_active: false,
            keep_cs_on_teardown: false,
        }
    }
}

/// Bit-banged 3-wire serial bus for register-programmed display
/// controllers. Owns its three line bindings for its whole lifetime;
/// [`Spi3Wire::teardown`] consumes the bus and frees the lines.
pub struct Spi3Wire<P, X, D> {
    cs: LineBinding<P>,
    scl: LineBinding<P>,
    sda: LineBinding<P>,
    expander: Option<X>,
    delay: D,
    half_period_us: u32,
    command_bytes: u8,
    param_bytes: u8,
    command_dc: Option<bool>,
    param_dc: Option<bool>,
    lsb_first: bool,
    cs_active_high: bool,
    data_idle_high: bool,
    clock_rising_active: bool,
    keep_cs_on_teardown: bool,
}

mod base;
mod transfer;
