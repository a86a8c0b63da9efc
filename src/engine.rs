//! The engine control loop
//!
//! One thread owns the whole cycle: schedule, health, composition, the push
//! and every animation sub-frame. Configuration swaps and shutdown requests
//! arrive through the intent queue and take effect between cycles.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use chrono::{Local, NaiveDateTime};
use embassy_time::{Duration, Instant};
use log::{debug, error, info, warn};

use crate::classify::ConditionClassifier;
use crate::color::{OFF, Rgb};
use crate::composer::FrameComposer;
use crate::config::Config;
use crate::error::HardwareError;
use crate::health::{ConnectivityProbe, HealthMonitor, HealthOverride};
use crate::intent::{IntentProcessor, IntentReceiver};
use crate::legend::LegendOverlay;
use crate::roster::Roster;
use crate::schedule::{OperatingMode, PowerScheduleEvaluator};
use crate::sequencer::{AnimationSequencer, PassContext};
use crate::weather::{WeatherSnapshot, WeatherSource};
use crate::{Delay, OutputDriver};

/// Wait after a failed push before the next cycle
pub const HARDWARE_BACKOFF: Duration = Duration::from_secs(5);

/// Clock readings for one cycle
#[derive(Debug, Clone, Copy)]
pub struct CycleTime {
    /// Local wall-clock time, for the power schedule
    pub local: NaiveDateTime,
    /// Monotonic time, for rate limiting
    pub monotonic: Instant,
    /// System time, for snapshot age
    pub system: SystemTime,
}

impl CycleTime {
    pub fn now() -> Self {
        Self {
            local: Local::now().naive_local(),
            monotonic: Instant::now(),
            system: SystemTime::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Base frame pushed; animations ran if healthy
    Rendered,
    /// Schedule says off; an all-off frame was pushed
    LightsOff,
    /// A push failed and the backoff was applied
    HardwareFailure,
    /// Shutdown requested; nothing rendered
    Shutdown,
}

/// What one cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub outcome: CycleOutcome,
    pub mode: Option<OperatingMode>,
    pub health: HealthOverride,
    /// Frame pushed before animations, empty when nothing was composed
    pub base_frame: Vec<Rgb>,
    /// Animation passes that ran
    pub passes: usize,
}

impl CycleReport {
    fn new(outcome: CycleOutcome, mode: Option<OperatingMode>) -> Self {
        Self {
            outcome,
            mode,
            health: HealthOverride::None,
            base_frame: Vec::new(),
            passes: 0,
        }
    }
}

/// Weather map engine - the main orchestrator
pub struct MetarEngine<O, D, P, W>
where
    O: OutputDriver,
    D: Delay,
    P: ConnectivityProbe,
    W: WeatherSource,
{
    config: Config,
    roster: Roster,
    weather: W,
    output: O,
    delay: D,
    health: HealthMonitor<P>,
    schedule: PowerScheduleEvaluator,
    intents: IntentProcessor,
    running: bool,
}

impl<O, D, P, W> MetarEngine<O, D, P, W>
where
    O: OutputDriver,
    D: Delay,
    P: ConnectivityProbe,
    W: WeatherSource,
{
    pub fn new(
        config: Config,
        roster: Roster,
        weather: W,
        output: O,
        delay: D,
        probe: P,
        intents: IntentReceiver,
    ) -> Self {
        Self {
            config,
            roster,
            weather,
            output,
            delay,
            health: HealthMonitor::new(probe),
            schedule: PowerScheduleEvaluator::new(),
            intents: IntentProcessor::new(intents),
            running: true,
        }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    pub const fn output(&self) -> &O {
        &self.output
    }

    pub const fn delay(&self) -> &D {
        &self.delay
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Run cycles until `stop` is raised or a shutdown intent arrives,
    /// then blank the strip
    pub fn run(&mut self, stop: &AtomicBool) {
        info!("engine started with {} slots", self.roster.len());
        while self.running && !stop.load(Ordering::Relaxed) {
            let report = self.run_cycle(CycleTime::now());
            debug!(
                "cycle finished: {:?}, {} animation passes",
                report.outcome, report.passes
            );
        }
        self.shutdown();
    }

    /// Run one full cycle
    ///
    /// Errors never escape: weather problems render as missing and push
    /// failures end the cycle after [`HARDWARE_BACKOFF`].
    pub fn run_cycle(&mut self, now: CycleTime) -> CycleReport {
        self.process_intents();
        if !self.running {
            return CycleReport::new(CycleOutcome::Shutdown, None);
        }

        let mode = self
            .schedule
            .evaluate(&self.config.schedule, now.local.date(), now.local.time());
        if mode == OperatingMode::Off {
            return self.lights_off();
        }

        let snapshot = self.weather.snapshot().unwrap_or_else(|err| {
            error!("weather snapshot unavailable: {err}");
            Arc::new(WeatherSnapshot::empty())
        });
        let health = self
            .health
            .evaluate(&self.config.health, now.monotonic, snapshot.age(now.system));

        let classified = ConditionClassifier::new(self.config.wind_threshold)
            .classify_roster(&self.roster, &snapshot);
        let legend = LegendOverlay::from_config(&self.config.legend);
        let bounds = legend.airport_bounds(self.roster.len());
        let level = mode.level(&self.config.brightness);

        let mut base = FrameComposer::new(&self.config.colors, &self.config.brightness).compose(
            &self.roster,
            &classified,
            mode,
            health,
            bounds,
        );
        legend.apply(&mut base, &self.config.colors, level);

        let mut report = CycleReport::new(CycleOutcome::Rendered, Some(mode));
        report.health = health;

        if let Err(err) = self.output.push(&base) {
            error!("failed to push frame: {err}");
            self.delay.delay(HARDWARE_BACKOFF);
            report.outcome = CycleOutcome::HardwareFailure;
            return report;
        }
        self.delay.delay(self.config.animations.pause());

        if !health.is_active() {
            let ctx = PassContext {
                roster: &self.roster,
                weather: &classified,
                bounds,
                base: &base,
                level,
            };
            let sequencer = AnimationSequencer::new(&self.config.colors, &self.config.brightness);
            match sequencer.run(
                &self.config.animations.specs(),
                &ctx,
                &mut self.output,
                &mut self.delay,
            ) {
                Ok(passes) => report.passes = passes,
                Err(err) => {
                    error!("animation push failed: {err}");
                    self.delay.delay(HARDWARE_BACKOFF);
                    report.outcome = CycleOutcome::HardwareFailure;
                }
            }
        }

        report.base_frame = base;
        report
    }

    /// Push an all-off frame
    pub fn blank(&mut self) -> Result<(), HardwareError> {
        self.output.push(&vec![OFF; self.roster.len()])
    }

    /// Stop cycling and blank the strip, best effort
    pub fn shutdown(&mut self) {
        self.running = false;
        match self.blank() {
            Ok(()) => info!("strip blanked, engine stopped"),
            Err(err) => warn!("failed to blank strip on shutdown: {err}"),
        }
    }

    fn lights_off(&mut self) -> CycleReport {
        let mut report = CycleReport::new(CycleOutcome::LightsOff, Some(OperatingMode::Off));
        if let Err(err) = self.blank() {
            error!("failed to push off frame: {err}");
            self.delay.delay(HARDWARE_BACKOFF);
            report.outcome = CycleOutcome::HardwareFailure;
            return report;
        }
        report.base_frame = vec![OFF; self.roster.len()];
        self.delay.delay(self.config.animations.pause());
        report
    }

    fn process_intents(&mut self) {
        let effects = self.intents.process_pending();
        if let Some(config) = effects.config {
            self.apply_config(*config);
        }
        if effects.shutdown {
            info!("shutdown requested");
            self.running = false;
        }
    }

    fn apply_config(&mut self, mut config: Config) {
        if config.strip.pixel_count != self.roster.len() {
            warn!(
                "pixel count change to {} needs a restart, keeping {}",
                config.strip.pixel_count,
                self.roster.len()
            );
            config.strip.pixel_count = self.roster.len();
        }
        self.config = config.sanitize();
        info!("configuration reloaded");
    }
}
