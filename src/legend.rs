//! Fixed legend swatches at the end of the strip

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::bounds::{RenderingBounds, bounded};
use crate::color::{Rgb, scale_color};
use crate::config::{ColorPalette, LegendConfig};
use crate::weather::FlightCategory;

/// Maximum number of legend swatches
pub const LEGEND_CAPACITY: usize = 8;

/// One legend swatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendItem {
    Vfr,
    Mvfr,
    Ifr,
    Lifr,
    Missing,
    Windy,
    Lightning,
    Snow,
}

impl LegendItem {
    /// Flight categories, best to worst
    pub const CATEGORIES: [Self; 4] = [Self::Vfr, Self::Mvfr, Self::Ifr, Self::Lifr];

    pub const fn color(self, palette: &ColorPalette) -> Rgb {
        match self {
            Self::Vfr => palette.category(FlightCategory::Vfr),
            Self::Mvfr => palette.category(FlightCategory::Mvfr),
            Self::Ifr => palette.category(FlightCategory::Ifr),
            Self::Lifr => palette.category(FlightCategory::Lifr),
            Self::Missing => palette.category(FlightCategory::Missing),
            Self::Windy => palette.windy,
            Self::Lightning => palette.lightning,
            Self::Snow => palette.snow,
        }
    }
}

/// Legend painted over the trailing slots, independent of weather
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegendOverlay {
    items: Vec<LegendItem, LEGEND_CAPACITY>,
}

impl LegendOverlay {
    /// Overlay from configuration; empty when the legend is disabled
    pub fn from_config(config: &LegendConfig) -> Self {
        if config.enabled {
            Self {
                items: config.items.clone(),
            }
        } else {
            Self::default()
        }
    }

    /// Number of trailing slots reserved
    pub fn reserved(&self) -> usize {
        self.items.len()
    }

    /// Slots left for airports on a strip of `pixel_count`
    pub fn airport_bounds(&self, pixel_count: usize) -> RenderingBounds {
        RenderingBounds::leading(pixel_count.saturating_sub(self.reserved()))
    }

    /// Paint the swatches, scaled to `level`
    pub fn apply(&self, frame: &mut [Rgb], palette: &ColorPalette, level: u8) {
        let area = RenderingBounds {
            start: frame.len().saturating_sub(self.reserved()),
            end: frame.len(),
        };
        for (led, item) in bounded(frame, area).iter_mut().zip(&self.items) {
            *led = scale_color(item.color(palette), level);
        }
    }
}
