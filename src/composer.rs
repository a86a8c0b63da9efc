//! Static frame composition
//!
//! Turns the roster, one classified snapshot, the operating mode and the
//! health override into a frame. Composition never touches hardware.

use crate::bounds::RenderingBounds;
use crate::classify::ClassifiedWeather;
use crate::color::{OFF, Rgb, scale_color};
use crate::config::{BrightnessConfig, ColorPalette};
use crate::health::HealthOverride;
use crate::roster::{Roster, Slot};
use crate::schedule::OperatingMode;

/// Builds base frames from classified weather
#[derive(Debug, Clone)]
pub struct FrameComposer<'a> {
    palette: &'a ColorPalette,
    brightness: &'a BrightnessConfig,
}

impl<'a> FrameComposer<'a> {
    pub const fn new(palette: &'a ColorPalette, brightness: &'a BrightnessConfig) -> Self {
        Self {
            palette,
            brightness,
        }
    }

    /// Compose a frame with one color per roster slot
    ///
    /// Slots outside `bounds` (the legend area) are left off.
    pub fn compose(
        &self,
        roster: &Roster,
        weather: &ClassifiedWeather,
        mode: OperatingMode,
        health: HealthOverride,
        bounds: RenderingBounds,
    ) -> Vec<Rgb> {
        let level = mode.level(self.brightness);
        let override_color = health.color(self.palette);

        roster
            .slots()
            .iter()
            .enumerate()
            .map(|(index, slot)| match slot {
                _ if level == 0 || !bounds.contains(index) => OFF,
                Slot::Skip => OFF,
                Slot::Airport(code) => {
                    let color = override_color
                        .unwrap_or_else(|| self.palette.category(weather.category(code)));
                    scale_color(color, level)
                }
            })
            .collect()
    }
}
