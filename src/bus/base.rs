use super::*;
use crate::expander::PinMode;

const ALL_LINES: [Line; 3] = [Line::Cs, Line::Scl, Line::Sda];

impl<P, X, D> Spi3Wire<P, X, D>
where
    P: PinOps,
    X: IoExpanderOps,
    D: DelayOps,
{
    pub fn new(
        lines: LineConfig<P>,
        expander: Option<X>,
        delay: D,
        config: Spi3WireConfig,
    ) -> Result<Self> {
        if !(1..=LCD_CMD_BYTES_MAX).contains(&config.command_bytes) {
            return Err(BusError::InvalidArgument(ArgError::CommandBytes(
                config.command_bytes,
            )));
        }
        if !(1..=LCD_PARAM_BYTES_MAX).contains(&config.param_bytes) {
            return Err(BusError::InvalidArgument(ArgError::ParamBytes(
                config.param_bytes,
            )));
        }
        if config.clock_hz > CLOCK_HZ_MAX {
            return Err(BusError::InvalidArgument(ArgError::ClockTooFast(
                config.clock_hz,
            )));
        }
        if config.spi_mode > SPI_MODE_MAX {
            return Err(BusError::InvalidArgument(ArgError::SpiMode(config.spi_mode)));
        }
        let any_on_expander = [&lines.cs, &lines.scl, &lines.sda]
            .into_iter()
            .any(|binding| matches!(binding, LineBinding::Expander(_)));
        if any_on_expander && expander.is_none() {
            return Err(BusError::InvalidArgument(ArgError::MissingExpander));
        }

        let clock_hz = if config.clock_hz == 0 {
            CLOCK_HZ_MAX
        } else {
            config.clock_hz
        };
        let (command_dc, param_dc) = if config.use_dc_bit {
            let param_level = !config.dc_zero_on_data;
            (Some(!param_level), Some(param_level))
        } else {
            (None, None)
        };
        let data_idle_high = config.spi_mode & 0x1 != 0;
        // The edge sense flips with the idle level so that the second
        // transition of each bit cell stays the sampling edge.
        let clock_rising_active = if data_idle_high {
            config.spi_mode & 0x2 != 0
        } else {
            config.spi_mode & 0x2 == 0
        };

        let mut bus = Self {
            cs: lines.cs,
            scl: lines.scl,
            sda: lines.sda,
            expander,
            delay,
            half_period_us: 1_000_000 / (clock_hz * 2),
            command_bytes: config.command_bytes,
            param_bytes: config.param_bytes,
            command_dc,
            param_dc,
            lsb_first: config.lsb_first,
            cs_active_high: config.cs_high_active,
            data_idle_high,
            clock_rising_active,
            keep_cs_on_teardown: config.keep_cs_on_teardown,
        };
        bus.init_lines()?;
        log::info!(
            "3-wire panel bus up: {} Hz, {}B commands, {}B parameters",
            clock_hz,
            config.command_bytes,
            config.param_bytes
        );
        Ok(bus)
    }

    /// Releases SCL and SDA back to inputs. CS is released too unless the
    /// bus was configured to keep it asserted, in which case it is driven
    /// active and left that way.
    pub fn teardown(mut self) -> Result<()> {
        let mut first_failure = None;
        if self.keep_cs_on_teardown {
            log::warn!("teardown keeps CS asserted");
            if let Err(err) = self.set_line(Line::Cs, self.cs_active_high) {
                first_failure = Some(err);
            }
        } else if let Err(err) = self.release_line(Line::Cs) {
            first_failure = Some(err);
        }
        for line in [Line::Scl, Line::Sda] {
            if let Err(err) = self.release_line(line) {
                first_failure.get_or_insert(err);
            }
        }
        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn init_lines(&mut self) -> Result<()> {
        for (idx, line) in ALL_LINES.into_iter().enumerate() {
            if let Err(err) = self.configure_output(line) {
                for done in &ALL_LINES[..idx] {
                    let _ = self.release_line(*done);
                }
                return Err(err);
            }
        }
        let idle_levels = [
            (Line::Cs, !self.cs_active_high),
            (Line::Scl, self.data_idle_high),
            (Line::Sda, self.data_idle_high),
        ];
        for (line, level) in idle_levels {
            if let Err(err) = self.set_line(line, level) {
                for done in ALL_LINES {
                    let _ = self.release_line(done);
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn configure_output(&mut self, line: Line) -> Result<()> {
        let Self {
            cs,
            scl,
            sda,
            expander,
            ..
        } = self;
        match Self::binding_of(cs, scl, sda, line) {
            LineBinding::Native(pin) => pin.set_output().map_err(|_| BusError::Io(line)),
            LineBinding::Expander(pin) => expander
                .as_mut()
                .ok_or(BusError::Io(line))?
                .set_direction(*pin, PinMode::Output)
                .map_err(|_| BusError::Io(line)),
        }
    }

    fn release_line(&mut self, line: Line) -> Result<()> {
        let Self {
            cs,
            scl,
            sda,
            expander,
            ..
        } = self;
        match Self::binding_of(cs, scl, sda, line) {
            LineBinding::Native(pin) => pin.release().map_err(|_| BusError::Io(line)),
            LineBinding::Expander(pin) => expander
                .as_mut()
                .ok_or(BusError::Io(line))?
                .set_direction(*pin, PinMode::Input)
                .map_err(|_| BusError::Io(line)),
        }
    }

    pub(super) fn set_line(&mut self, line: Line, high: bool) -> Result<()> {
        let Self {
            cs,
            scl,
            sda,
            expander,
            ..
        } = self;
        match Self::binding_of(cs, scl, sda, line) {
            LineBinding::Native(pin) => pin.set_level(high).map_err(|_| BusError::Io(line)),
            LineBinding::Expander(pin) => expander
                .as_mut()
                .ok_or(BusError::Io(line))?
                .set_level(*pin, high)
                .map_err(|_| BusError::Io(line)),
        }
    }

    fn binding_of<'a>(
        cs: &'a mut LineBinding<P>,
        scl: &'a mut LineBinding<P>,
        sda: &'a mut LineBinding<P>,
        line: Line,
    ) -> &'a mut LineBinding<P> {
        match line {
            Line::Cs => cs,
            Line::Scl => scl,
            Line::Sda => sda,
        }
    }
}
