//! Output drivers for real strips and for headless runs

use core::fmt::Debug;

use log::{Level, debug, log_enabled};
use smart_leds::{SmartLedsWrite, gamma};

use crate::color::{ColorOrder, Rgb, to_hex_color};
use crate::config::StripConfig;
use crate::error::HardwareError;
use crate::OutputDriver;

/// Adapter from any `smart-leds` writer to [`OutputDriver`]
///
/// Frames are staged on `write` and sent on `show`, with the strip's color
/// order and optional gamma correction applied on the way out.
pub struct SmartLedsOutput<W> {
    writer: W,
    pixel_count: usize,
    color_order: ColorOrder,
    gamma: bool,
    staged: Vec<Rgb>,
}

impl<W> SmartLedsOutput<W>
where
    W: SmartLedsWrite<Color = Rgb>,
    W::Error: Debug,
{
    pub fn new(writer: W, config: &StripConfig) -> Self {
        Self {
            writer,
            pixel_count: config.pixel_count,
            color_order: config.color_order,
            gamma: config.gamma,
            staged: Vec::with_capacity(config.pixel_count),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> OutputDriver for SmartLedsOutput<W>
where
    W: SmartLedsWrite<Color = Rgb>,
    W::Error: Debug,
{
    fn write(&mut self, colors: &[Rgb]) -> Result<(), HardwareError> {
        if colors.len() != self.pixel_count {
            return Err(HardwareError::FrameSize {
                expected: self.pixel_count,
                actual: colors.len(),
            });
        }
        self.staged.clear();
        self.staged
            .extend(colors.iter().map(|color| self.color_order.apply(*color)));
        Ok(())
    }

    fn show(&mut self) -> Result<(), HardwareError> {
        let colors = self.staged.iter().copied();
        let written = if self.gamma {
            self.writer.write(gamma(colors))
        } else {
            self.writer.write(colors)
        };
        written.map_err(|err| HardwareError::Write(format!("{err:?}")))
    }
}

/// Driver that logs frames instead of lighting anything
#[derive(Debug, Default)]
pub struct LogOutput {
    staged: Vec<Rgb>,
    frames: usize,
}

impl LogOutput {
    pub const fn new() -> Self {
        Self {
            staged: Vec::new(),
            frames: 0,
        }
    }

    /// Frames flushed so far
    pub const fn frames(&self) -> usize {
        self.frames
    }

    /// Most recently flushed frame
    pub fn last_frame(&self) -> &[Rgb] {
        &self.staged
    }
}

impl OutputDriver for LogOutput {
    fn write(&mut self, colors: &[Rgb]) -> Result<(), HardwareError> {
        self.staged.clear();
        self.staged.extend_from_slice(colors);
        Ok(())
    }

    fn show(&mut self) -> Result<(), HardwareError> {
        self.frames += 1;
        if log_enabled!(Level::Debug) {
            let colors: Vec<String> =
                self.staged.iter().map(|color| to_hex_color(*color)).collect();
            debug!("frame {}: {}", self.frames, colors.join(" "));
        }
        Ok(())
    }
}

#[cfg(feature = "spi")]
pub use spi::{SpiStrip, open_spi};

#[cfg(feature = "spi")]
mod spi {
    use linux_embedded_hal::SpidevBus;
    use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
    use log::info;
    use ws2812_spi::Ws2812;

    use super::SmartLedsOutput;
    use crate::config::StripConfig;
    use crate::error::HardwareError;

    /// WS2812 timing needs an SPI clock between 2 and 3.8 MHz
    const SPI_SPEED_HZ: u32 = 3_000_000;

    pub type SpiStrip = SmartLedsOutput<Ws2812<SpidevBus>>;

    /// Open the WS2812 strip on the given spidev device
    pub fn open_spi(path: &str, config: &StripConfig) -> Result<SpiStrip, HardwareError> {
        let mut bus =
            SpidevBus::open(path).map_err(|err| HardwareError::Open(format!("{path}: {err:?}")))?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(SPI_SPEED_HZ)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        bus.configure(&options)
            .map_err(|err| HardwareError::Open(format!("{path}: {err:?}")))?;
        info!("opened WS2812 strip on {path} with {} pixels", config.pixel_count);
        Ok(SmartLedsOutput::new(Ws2812::new(bus), config))
    }
}
