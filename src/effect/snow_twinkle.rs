use embassy_time::Duration;

use super::{Animation, fill_members};
use crate::color::{OFF, Rgb};
use crate::config::SnowConfig;

/// Snow twinkle: alternate the snow highlight and off
///
/// The base color comes back when the sequencer restores the pass.
#[derive(Debug, Clone)]
pub struct SnowTwinkleAnimation {
    highlight: Rgb,
    blink_count: u8,
    pause: Duration,
    blinks_done: u8,
    lit: bool,
}

impl SnowTwinkleAnimation {
    pub fn new(config: &SnowConfig, highlight: Rgb) -> Self {
        Self {
            highlight,
            blink_count: config.blink_count,
            pause: Duration::from_millis(config.blink_pause_ms),
            blinks_done: 0,
            lit: false,
        }
    }
}

impl Animation for SnowTwinkleAnimation {
    fn step(&mut self, _base: &[Rgb], members: &[usize], frame: &mut [Rgb]) -> Option<Duration> {
        if self.lit {
            fill_members(frame, members, OFF);
            self.lit = false;
            self.blinks_done += 1;
            return Some(self.pause);
        }
        if self.blinks_done >= self.blink_count {
            return None;
        }
        fill_members(frame, members, self.highlight);
        self.lit = true;
        Some(self.pause)
    }
}
