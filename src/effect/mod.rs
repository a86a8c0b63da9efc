//! Animation passes with compile-time known variants
//!
//! Each animation is a resumable step generator: every call to
//! [`Animation::step`] renders one sub-frame and reports how long it should
//! be held. The sequencer owns pushing and waiting, so the animations never
//! touch hardware or sleep themselves.

mod lightning;
mod snow_twinkle;
mod wind_fade;

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

pub use lightning::LightningAnimation;
pub use snow_twinkle::SnowTwinkleAnimation;
pub use wind_fade::WindFadeAnimation;

use crate::classify::Condition;
use crate::color::{Rgb, scale_color};
use crate::config::{BrightnessConfig, ColorPalette, LightningConfig, SnowConfig, WindFadeConfig};
use crate::math8::relative_level;

/// Number of distinct animation kinds
pub const ANIMATION_KINDS: usize = 3;

const ANIMATION_NAME_WIND: &str = "wind";
const ANIMATION_NAME_LIGHTNING: &str = "lightning";
const ANIMATION_NAME_SNOW: &str = "snow";

pub trait Animation {
    /// Render the next sub-frame
    ///
    /// Only `members` of `frame` may be written; `base` holds the composed
    /// colors for the whole strip. Returns the hold before the next step, or
    /// `None` once the pass has nothing left to show.
    fn step(&mut self, base: &[Rgb], members: &[usize], frame: &mut [Rgb]) -> Option<Duration>;
}

/// Known animation kinds that can be ordered in the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationKind {
    #[serde(rename = "wind")]
    WindFade,
    #[serde(rename = "lightning")]
    Lightning,
    #[serde(rename = "snow")]
    SnowTwinkle,
}

impl AnimationKind {
    /// Order used when the configuration leaves a kind out
    pub const DEFAULT_ORDER: [Self; ANIMATION_KINDS] =
        [Self::WindFade, Self::Lightning, Self::SnowTwinkle];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WindFade => ANIMATION_NAME_WIND,
            Self::Lightning => ANIMATION_NAME_LIGHTNING,
            Self::SnowTwinkle => ANIMATION_NAME_SNOW,
        }
    }

    /// Condition set whose members this animation affects
    pub const fn target(self) -> Condition {
        match self {
            Self::WindFade => Condition::Windy,
            Self::Lightning => Condition::Lightning,
            Self::SnowTwinkle => Condition::Snow,
        }
    }
}

/// Timing parameters of one animation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationTiming {
    WindFade(WindFadeConfig),
    Lightning(LightningConfig),
    SnowTwinkle(SnowConfig),
}

/// One configured animation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationSpec {
    /// Position in the run order
    pub position: usize,
    pub enabled: bool,
    pub timing: AnimationTiming,
}

impl AnimationSpec {
    pub const fn kind(&self) -> AnimationKind {
        match self.timing {
            AnimationTiming::WindFade(_) => AnimationKind::WindFade,
            AnimationTiming::Lightning(_) => AnimationKind::Lightning,
            AnimationTiming::SnowTwinkle(_) => AnimationKind::SnowTwinkle,
        }
    }

    /// Build the animation for a frame composed at `level`
    pub fn to_slot(
        &self,
        palette: &ColorPalette,
        brightness: &BrightnessConfig,
        level: u8,
    ) -> AnimationSlot {
        match self.timing {
            AnimationTiming::WindFade(config) => {
                let floor = relative_level(brightness.wind_floor_level(), level);
                AnimationSlot::WindFade(WindFadeAnimation::new(&config, floor))
            }
            AnimationTiming::Lightning(config) => AnimationSlot::Lightning(LightningAnimation::new(
                &config,
                scale_color(palette.lightning, level),
            )),
            AnimationTiming::SnowTwinkle(config) => AnimationSlot::SnowTwinkle(
                SnowTwinkleAnimation::new(&config, scale_color(palette.snow, level)),
            ),
        }
    }
}

/// Animation slot - enum containing all possible animations
#[derive(Debug, Clone)]
pub enum AnimationSlot {
    WindFade(WindFadeAnimation),
    Lightning(LightningAnimation),
    SnowTwinkle(SnowTwinkleAnimation),
}

impl AnimationSlot {
    pub fn step(&mut self, base: &[Rgb], members: &[usize], frame: &mut [Rgb]) -> Option<Duration> {
        match self {
            Self::WindFade(animation) => animation.step(base, members, frame),
            Self::Lightning(animation) => animation.step(base, members, frame),
            Self::SnowTwinkle(animation) => animation.step(base, members, frame),
        }
    }
}

/// Paint `color` on every member slot
fn fill_members(frame: &mut [Rgb], members: &[usize], color: Rgb) {
    for &index in members {
        if let Some(led) = frame.get_mut(index) {
            *led = color;
        }
    }
}

/// Copy the base color back onto every member slot
fn restore_members(base: &[Rgb], members: &[usize], frame: &mut [Rgb]) {
    for &index in members {
        if let (Some(led), Some(color)) = (frame.get_mut(index), base.get(index)) {
            *led = *color;
        }
    }
}
