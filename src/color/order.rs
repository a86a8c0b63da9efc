use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Channel order of the physical strip
///
/// WS2812 drivers already emit GRB on the wire, so `Grb` is a no-op. `Rgb`
/// is for strips wired with red and green swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorOrder {
    #[default]
    Grb,
    Rgb,
}

impl ColorOrder {
    /// Reorder a logical color for the wire
    #[inline]
    pub const fn apply(self, color: Rgb) -> Rgb {
        match self {
            Self::Grb => color,
            Self::Rgb => Rgb {
                r: color.g,
                g: color.r,
                b: color.b,
            },
        }
    }
}
