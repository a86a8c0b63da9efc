//! Time-of-day power schedule
//!
//! Windows are half-open: inclusive at the start, exclusive at the end. A
//! window whose start is after its end wraps past midnight.

use chrono::{Local, NaiveDate, NaiveTime};
use log::debug;

use crate::config::{BrightnessConfig, ScheduleConfig};
use crate::sun::sun_times;

/// How the strip should be lit this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatingMode {
    Bright,
    Dim,
    Off,
}

impl OperatingMode {
    /// Brightness level for this mode (0-255)
    pub fn level(self, brightness: &BrightnessConfig) -> u8 {
        match self {
            Self::Bright => brightness.bright_level(),
            Self::Dim => brightness.dim_level(),
            Self::Off => 0,
        }
    }
}

/// Check if `t` falls inside the `[start, end)` window
///
/// Equal boundaries describe a window covering the whole day.
pub fn in_window(t: NaiveTime, start: NaiveTime, end: NaiveTime) -> bool {
    if start == end {
        true
    } else if start < end {
        start <= t && t < end
    } else {
        t >= start || t < end
    }
}

/// Power schedule with boundaries resolved for one date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerSchedule {
    pub lights_off_enabled: bool,
    pub lights_off: NaiveTime,
    pub lights_on: NaiveTime,
    pub dimming_enabled: bool,
    pub bright_start: NaiveTime,
    pub dim_start: NaiveTime,
}

impl PowerSchedule {
    /// Schedule using the configured boundaries as written
    pub const fn fixed(config: &ScheduleConfig) -> Self {
        Self {
            lights_off_enabled: config.lights_off_enabled,
            lights_off: config.lights_off,
            lights_on: config.lights_on,
            dimming_enabled: config.dimming_enabled,
            bright_start: config.bright_start,
            dim_start: config.dim_start,
        }
    }

    /// Schedule for `date`, with sunrise/sunset boundaries when configured
    ///
    /// Falls back to the fixed boundaries on dates where the sun does not
    /// both rise and set.
    pub fn for_date(config: &ScheduleConfig, date: NaiveDate) -> Self {
        let mut schedule = Self::fixed(config);
        let Some(daylight) = config.daylight else {
            return schedule;
        };

        let times = sun_times(daylight.latitude, daylight.longitude, date);
        if let (Some(sunrise), Some(sunset)) = (times.sunrise, times.sunset) {
            schedule.bright_start = sunrise.with_timezone(&Local).time();
            schedule.dim_start = sunset.with_timezone(&Local).time();
            debug!(
                "daylight boundaries for {date}: bright at {}, dim at {}",
                schedule.bright_start, schedule.dim_start
            );
        }
        schedule
    }

    /// Operating mode at time of day `now`
    pub fn evaluate(&self, now: NaiveTime) -> OperatingMode {
        if self.lights_off_enabled && in_window(now, self.lights_off, self.lights_on) {
            return OperatingMode::Off;
        }
        if !self.dimming_enabled || in_window(now, self.bright_start, self.dim_start) {
            return OperatingMode::Bright;
        }
        OperatingMode::Dim
    }
}

/// Caches the resolved schedule per date
///
/// Sunrise/sunset only change once a day, so they are not recomputed every
/// cycle.
#[derive(Debug, Default)]
pub struct PowerScheduleEvaluator {
    resolved: Option<(NaiveDate, ScheduleConfig, PowerSchedule)>,
}

impl PowerScheduleEvaluator {
    pub const fn new() -> Self {
        Self { resolved: None }
    }

    /// Operating mode for local wall-clock `date` and `time`
    pub fn evaluate(
        &mut self,
        config: &ScheduleConfig,
        date: NaiveDate,
        time: NaiveTime,
    ) -> OperatingMode {
        let schedule = match &self.resolved {
            Some((cached_date, cached_config, schedule))
                if *cached_date == date && cached_config == config =>
            {
                *schedule
            }
            _ => {
                let schedule = PowerSchedule::for_date(config, date);
                self.resolved = Some((date, config.clone(), schedule));
                schedule
            }
        };
        schedule.evaluate(time)
    }
}
