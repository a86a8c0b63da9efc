use embassy_time::Duration;

use super::Animation;
use crate::color::{Rgb, scale_color};
use crate::config::WindFadeConfig;
use crate::math8::{blend8, step_progress8};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    FadeOut(u16),
    Hold,
    FadeIn(u16),
    Done,
}

/// Wind fade: full brightness down to a floor, hold, then back up
///
/// The floor is a scale factor relative to the base frame, so base colors
/// are recovered exactly on the last fade-in step.
#[derive(Debug, Clone)]
pub struct WindFadeAnimation {
    steps: u16,
    step_delay: Duration,
    hold: Duration,
    floor: u8,
    phase: Phase,
}

impl WindFadeAnimation {
    pub fn new(config: &WindFadeConfig, floor: u8) -> Self {
        Self {
            steps: config.steps,
            step_delay: config.step_delay(),
            hold: Duration::from_millis(config.hold_ms),
            floor,
            phase: Phase::FadeOut(1),
        }
    }

    fn paint(base: &[Rgb], members: &[usize], frame: &mut [Rgb], factor: u8) {
        for &index in members {
            if let (Some(led), Some(color)) = (frame.get_mut(index), base.get(index)) {
                *led = scale_color(*color, factor);
            }
        }
    }
}

impl Animation for WindFadeAnimation {
    fn step(&mut self, base: &[Rgb], members: &[usize], frame: &mut [Rgb]) -> Option<Duration> {
        if self.steps == 0 {
            return None;
        }
        match self.phase {
            Phase::FadeOut(step) => {
                let progress = step_progress8(step, self.steps);
                Self::paint(base, members, frame, blend8(255, self.floor, progress));
                self.phase = if step >= self.steps {
                    Phase::Hold
                } else {
                    Phase::FadeOut(step + 1)
                };
                Some(self.step_delay)
            }
            Phase::Hold => {
                Self::paint(base, members, frame, self.floor);
                self.phase = Phase::FadeIn(1);
                Some(self.hold)
            }
            Phase::FadeIn(step) => {
                let progress = step_progress8(step, self.steps);
                Self::paint(base, members, frame, blend8(self.floor, 255, progress));
                self.phase = if step >= self.steps {
                    Phase::Done
                } else {
                    Phase::FadeIn(step + 1)
                };
                Some(self.step_delay)
            }
            Phase::Done => None,
        }
    }
}
