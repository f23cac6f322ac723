/*
 *  display/drivers/epd7in5v2.rs
 *
 *  wxpaper - weather on paper
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use epd_waveshare::epd7in5_v2::Epd7in5;
use epd_waveshare::prelude::WaveshareDisplay;
use linux_embedded_hal::sysfs_gpio::Direction;
use linux_embedded_hal::{Delay, SpidevDevice, SysfsPin};
use log::{debug, info};

use crate::canvas::Canvas;
use crate::config::BusConfig;
use crate::display::error::DisplayError;
use crate::display::traits::DisplaySink;

type Panel = Epd7in5<SpidevDevice, SysfsPin, SysfsPin, SysfsPin, Delay>;

/// Waveshare 7.5" V2 (800x480, black/white) on a Linux SPI bus.
///
/// Each refresh wakes the panel, pushes a full frame and puts it back to sleep.
pub struct Epd7in5V2Sink {
    spi: SpidevDevice,
    epd: Panel,
    invert: bool,
}

impl Epd7in5V2Sink {
    /// Open the SPI device and the DC/RST/BUSY pins named in `bus`.
    pub fn new(bus: &BusConfig, invert: bool) -> Result<Self, DisplayError> {
        info!(
            "Initializing 7.5\" V2 panel on {} (DC {}, RST {}, BUSY {})",
            bus.spi, bus.dc_pin, bus.rst_pin, bus.busy_pin
        );

        let busy = init_gpio(bus.busy_pin, Direction::In)?;
        let dc = init_gpio(bus.dc_pin, Direction::Out)?;
        let rst = init_gpio(bus.rst_pin, Direction::Out)?;

        let mut spi = SpidevDevice::open(&bus.spi)
            .map_err(|e| DisplayError::InitializationFailed(format!("{}: {}", bus.spi, e)))?;

        let epd = Epd7in5::new(&mut spi, busy, dc, rst, &mut Delay, None)
            .map_err(|e| DisplayError::InitializationFailed(format!("{:?}", e)))?;

        info!("E-paper panel initialized");
        Ok(Self { spi, epd, invert })
    }
}

impl DisplaySink for Epd7in5V2Sink {
    fn name(&self) -> &'static str {
        "waveshare7in5v2"
    }

    fn display(&mut self, canvas: &Canvas) -> Result<(), DisplayError> {
        self.check_size(canvas)?;
        let frame = canvas.to_packed_bytes(self.invert);

        self.epd.wake_up(&mut self.spi, &mut Delay)?;
        self.epd
            .update_and_display_frame(&mut self.spi, &frame, &mut Delay)?;
        debug!("Frame of {} bytes pushed", frame.len());
        self.epd.sleep(&mut self.spi, &mut Delay)?;
        info!("Image displayed on e-paper successfully.");
        Ok(())
    }
}

fn init_gpio(pin: u64, direction: Direction) -> Result<SysfsPin, DisplayError> {
    let gpio = SysfsPin::new(pin);
    gpio.export()
        .map_err(|e| DisplayError::GpioError(format!("export {}: {}", pin, e)))?;
    gpio.set_direction(direction)
        .map_err(|e| DisplayError::GpioError(format!("direction {}: {}", pin, e)))?;
    if direction == Direction::Out {
        gpio.set_value(1)
            .map_err(|e| DisplayError::GpioError(format!("set {}: {}", pin, e)))?;
    }
    Ok(gpio)
}
