use embassy_time::Duration;

use super::{Animation, fill_members, restore_members};
use crate::color::Rgb;
use crate::config::LightningConfig;

/// Lightning: flash the highlight color, then fall back to the base color
#[derive(Debug, Clone)]
pub struct LightningAnimation {
    highlight: Rgb,
    flash_count: u8,
    flash_on: Duration,
    flash_off: Duration,
    flashes_done: u8,
    lit: bool,
}

impl LightningAnimation {
    pub fn new(config: &LightningConfig, highlight: Rgb) -> Self {
        Self {
            highlight,
            flash_count: config.flash_count,
            flash_on: Duration::from_millis(config.flash_on_ms),
            flash_off: Duration::from_millis(config.flash_off_ms),
            flashes_done: 0,
            lit: false,
        }
    }
}

impl Animation for LightningAnimation {
    fn step(&mut self, base: &[Rgb], members: &[usize], frame: &mut [Rgb]) -> Option<Duration> {
        if self.lit {
            restore_members(base, members, frame);
            self.lit = false;
            self.flashes_done += 1;
            return Some(self.flash_off);
        }
        if self.flashes_done >= self.flash_count {
            return None;
        }
        fill_members(frame, members, self.highlight);
        self.lit = true;
        Some(self.flash_on)
    }
}
