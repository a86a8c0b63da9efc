//! Ordered, time-boxed animation passes over the composed frame
//!
//! Passes run one after another. Every pass that starts ends by pushing the
//! base frame again, including when a push inside the pass fails, so an
//! airport in several condition sets is never drawn by two animations at once.

use log::{debug, warn};

use crate::bounds::RenderingBounds;
use crate::classify::{ClassifiedWeather, Condition};
use crate::color::Rgb;
use crate::config::{BrightnessConfig, ColorPalette};
use crate::effect::AnimationSpec;
use crate::error::HardwareError;
use crate::roster::Roster;
use crate::{Delay, OutputDriver};

/// Inputs shared by every pass of one cycle
#[derive(Debug, Clone, Copy)]
pub struct PassContext<'a> {
    pub roster: &'a Roster,
    pub weather: &'a ClassifiedWeather,
    /// Airport area; legend slots are outside it
    pub bounds: RenderingBounds,
    /// Frame pushed before the passes, restored after each one
    pub base: &'a [Rgb],
    /// Brightness level the base frame was composed at
    pub level: u8,
}

impl PassContext<'_> {
    /// Slot indices of airports in the condition set
    pub fn members(&self, condition: Condition) -> Vec<usize> {
        let set = self.weather.set(condition);
        self.roster
            .airports()
            .filter(|(index, code)| self.bounds.contains(*index) && set.contains(code))
            .map(|(index, _)| index)
            .collect()
    }
}

/// Runs animation passes in configured order
#[derive(Debug, Clone)]
pub struct AnimationSequencer<'a> {
    palette: &'a ColorPalette,
    brightness: &'a BrightnessConfig,
}

impl<'a> AnimationSequencer<'a> {
    pub const fn new(palette: &'a ColorPalette, brightness: &'a BrightnessConfig) -> Self {
        Self {
            palette,
            brightness,
        }
    }

    /// Run every enabled pass whose condition set is non-empty
    ///
    /// Returns the number of passes that ran. Stops at the first failed push.
    pub fn run<O, D>(
        &self,
        specs: &[AnimationSpec],
        ctx: &PassContext<'_>,
        output: &mut O,
        delay: &mut D,
    ) -> Result<usize, HardwareError>
    where
        O: OutputDriver + ?Sized,
        D: Delay + ?Sized,
    {
        let mut ordered: Vec<&AnimationSpec> = specs.iter().collect();
        ordered.sort_by_key(|spec| spec.position);

        let mut passes = 0;
        for spec in ordered {
            if self.run_pass(spec, ctx, output, delay)? {
                passes += 1;
            }
        }
        Ok(passes)
    }

    /// Run a single pass; `Ok(false)` when it was skipped
    pub fn run_pass<O, D>(
        &self,
        spec: &AnimationSpec,
        ctx: &PassContext<'_>,
        output: &mut O,
        delay: &mut D,
    ) -> Result<bool, HardwareError>
    where
        O: OutputDriver + ?Sized,
        D: Delay + ?Sized,
    {
        let kind = spec.kind();
        if !spec.enabled {
            return Ok(false);
        }
        let members = ctx.members(kind.target());
        if members.is_empty() {
            return Ok(false);
        }
        debug!("running {} pass over {} airports", kind.as_str(), members.len());

        let mut animation = spec.to_slot(self.palette, self.brightness, ctx.level);
        let mut frame = ctx.base.to_vec();
        let played = loop {
            let Some(hold) = animation.step(ctx.base, &members, &mut frame) else {
                break Ok(());
            };
            if let Err(err) = output.push(&frame) {
                break Err(err);
            }
            delay.delay(hold);
        };

        let restored = output.push(ctx.base);
        if let Err(err) = &played {
            warn!("{} pass interrupted: {err}", kind.as_str());
        }
        played.and(restored).map(|()| true)
    }
}
