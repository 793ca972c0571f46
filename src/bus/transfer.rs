use super::*;

impl<P, X, D> Spi3Wire<P, X, D>
where
    P: PinOps,
    X: IoExpanderOps,
    D: DelayOps,
{
    /// Sends an optional command word followed by `params` split into
    /// parameter-width words, each word its own CS-bracketed frame.
    /// Register-style controllers latch on every CS pulse, so words are not
    /// merged into one long frame. A trailing partial word is dropped.
    pub fn transmit(&mut self, command: Option<u32>, params: &[u8]) -> Result<()> {
        if let Some(command) = command {
            self.write_word(self.command_dc, self.command_bytes, command)?;
        }
        for word in params.chunks_exact(usize::from(self.param_bytes)) {
            let mut value = 0u32;
            for &byte in word {
                value = (value << 8) | u32::from(byte);
            }
            self.write_word(self.param_dc, self.param_bytes, value)?;
        }
        Ok(())
    }

    /// One frame: CS assert, the word most-significant-byte first, lines
    /// back to idle, CS deassert. Value bits above `width * 8` are ignored.
    fn write_word(&mut self, dc: Option<bool>, width: u8, value: u32) -> Result<()> {
        let cs_active = self.cs_active_high;
        let data_idle = self.data_idle_high;

        self.set_line(Line::Cs, cs_active)?;
        self.hold_half_period();
        self.set_line(Line::Scl, self.clock_setup_level())?;
        for index in (0..width).rev() {
            let byte = (value >> (8 * u32::from(index))) as u8;
            // The D/C bit belongs to the first byte on the wire only.
            let byte_dc = if index + 1 == width { dc } else { None };
            self.write_byte(byte_dc, byte)?;
        }
        self.set_line(Line::Scl, data_idle)?;
        self.set_line(Line::Sda, data_idle)?;
        self.hold_half_period();
        self.set_line(Line::Cs, !cs_active)?;
        self.hold_half_period();
        Ok(())
    }

    /// 8 bits, or 9 with a leading D/C bit. Each bit cell is one full clock
    /// period: SDA valid, SCL to the pre-edge level, half period, SCL across
    /// the active edge, half period.
    fn write_byte(&mut self, dc: Option<bool>, byte: u8) -> Result<()> {
        let setup_level = self.clock_setup_level();
        let bit_count: u8 = if dc.is_some() { 9 } else { 8 };
        let mut shifting = byte;

        for bit in 0..bit_count {
            match (bit, dc) {
                (0, Some(dc_level)) => self.set_line(Line::Sda, dc_level)?,
                _ => {
                    let probe = if self.lsb_first { 0x01 } else { 0x80 };
                    self.set_line(Line::Sda, shifting & probe != 0)?;
                    shifting = if self.lsb_first {
                        shifting >> 1
                    } else {
                        shifting << 1
                    };
                }
            }
            self.set_line(Line::Scl, setup_level)?;
            self.hold_half_period();
            self.set_line(Line::Scl, !setup_level)?;
            self.hold_half_period();
        }
        Ok(())
    }

    /// Level SCL must hold immediately before the active edge.
    fn clock_setup_level(&self) -> bool {
        !self.clock_rising_active
    }

    /// Sub-millisecond holds busy-wait; anything longer goes through the
    /// coarse scheduler path so slow clocks do not spin a core.
    fn hold_half_period(&self) {
        let micros = self.half_period_us;
        if micros >= BUSY_WAIT_CEILING_US {
            self.delay.delay_ms(micros / 1000);
        } else {
            self.delay.delay_us(micros);
        }
    }

    /// Parameter readback needs a MISO path this bus does not have. Present
    /// for interface parity with the hardware-SPI panel IO.
    pub fn receive_params(&mut self, _command: Option<u32>, _buffer: &mut [u8]) -> Result<()> {
        log::error!("parameter readback is not supported");
        Err(BusError::NotSupported)
    }

    /// Bulk color data goes over the hardware SPI or RGB path, never this
    /// bus. Present for interface parity with the hardware-SPI panel IO.
    pub fn transmit_color(&mut self, _command: Option<u32>, _pixels: &[u8]) -> Result<()> {
        log::error!("color transfer is not supported");
        Err(BusError::NotSupported)
    }

    /// Everything here completes synchronously; there is no event to hook.
    /// Present for interface parity with the hardware-SPI panel IO.
    pub fn register_transfer_done<F: FnMut()>(&mut self, _on_done: F) -> Result<()> {
        log::error!("transfer-done callbacks are not supported");
        Err(BusError::NotSupported)
    }
}
