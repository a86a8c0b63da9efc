mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;
    use std::time::{Duration as StdDuration, SystemTime};

    use chrono::NaiveDate;
    use embassy_time::{Duration, Instant};
    use myrtio_metar_composer::color::{OFF, Rgb, scale_color};
    use myrtio_metar_composer::config::{Config, ScheduleConfig};
    use myrtio_metar_composer::engine::{CycleOutcome, CycleTime, HARDWARE_BACKOFF, MetarEngine};
    use myrtio_metar_composer::error::HardwareError;
    use myrtio_metar_composer::health::{ConnectivityProbe, HealthOverride};
    use myrtio_metar_composer::intent::{EngineIntent, IntentSender, intent_channel, request_reload};
    use myrtio_metar_composer::legend::LegendItem;
    use myrtio_metar_composer::roster::Roster;
    use myrtio_metar_composer::schedule::OperatingMode;
    use myrtio_metar_composer::weather::{AirportRecord, FlightCategory, WeatherSnapshot};
    use myrtio_metar_composer::{Delay, OutputDriver};

    #[derive(Default)]
    struct RecordingOutput {
        staged: Vec<Rgb>,
        frames: Vec<Vec<Rgb>>,
        failing: bool,
    }

    impl OutputDriver for RecordingOutput {
        fn write(&mut self, colors: &[Rgb]) -> Result<(), HardwareError> {
            self.staged = colors.to_vec();
            Ok(())
        }

        fn show(&mut self) -> Result<(), HardwareError> {
            if self.failing {
                return Err(HardwareError::Write("strip unplugged".to_owned()));
            }
            self.frames.push(self.staged.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingDelay(Vec<Duration>);

    impl Delay for RecordingDelay {
        fn delay(&mut self, duration: Duration) {
            self.0.push(duration);
        }
    }

    struct FixedProbe(bool);

    impl ConnectivityProbe for FixedProbe {
        fn is_connected(&mut self) -> bool {
            self.0
        }
    }

    type TestEngine =
        MetarEngine<RecordingOutput, RecordingDelay, FixedProbe, Arc<WeatherSnapshot>>;

    const UPDATED_AT_SECS: u64 = 1_800_000_000;

    fn record(category: FlightCategory, wind: f32) -> AirportRecord {
        AirportRecord {
            flight_category: Some(category),
            wind_speed: Some(wind),
            ..AirportRecord::default()
        }
    }

    fn snapshot() -> Arc<WeatherSnapshot> {
        Arc::new(WeatherSnapshot::new(
            HashMap::from([
                ("KSEA".to_owned(), record(FlightCategory::Vfr, 5.0)),
                ("KPDX".to_owned(), record(FlightCategory::Ifr, 25.0)),
            ]),
            Some(SystemTime::UNIX_EPOCH + StdDuration::from_secs(UPDATED_AT_SECS)),
        ))
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.strip.pixel_count = 3;
        config.wind_threshold = 20.0;
        config.animations.wind.steps = 2;
        config.animations.wind.fade_ms = 20;
        config.animations.wind.hold_ms = 50;
        config
    }

    fn engine(config: Config, connected: bool) -> (TestEngine, IntentSender) {
        engine_with(config, connected, RecordingOutput::default())
    }

    fn engine_with(
        config: Config,
        connected: bool,
        output: RecordingOutput,
    ) -> (TestEngine, IntentSender) {
        let roster = Roster::parse("KSEA\nSKIP\nKPDX", config.strip.pixel_count);
        engine_with_roster(config, roster, connected, output)
    }

    fn engine_with_roster(
        config: Config,
        roster: Roster,
        connected: bool,
        output: RecordingOutput,
    ) -> (TestEngine, IntentSender) {
        let (sender, receiver) = intent_channel();
        let engine = MetarEngine::new(
            config,
            roster,
            snapshot(),
            output,
            RecordingDelay::default(),
            FixedProbe(connected),
            receiver,
        );
        (engine, sender)
    }

    /// Cycle clock at `hour:minute`, `age_secs` after the snapshot was written
    fn at(hour: u32, minute: u32, age_secs: u64) -> CycleTime {
        CycleTime {
            local: NaiveDate::from_ymd_opt(2026, 3, 14)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap(),
            monotonic: Instant::from_secs(1_000),
            system: SystemTime::UNIX_EPOCH + StdDuration::from_secs(UPDATED_AT_SECS + age_secs),
        }
    }

    #[test]
    fn test_end_to_end_cycle() {
        let config = test_config();
        let level = config.brightness.bright_level();
        let vfr = scale_color(config.colors.vfr, level);
        let ifr = scale_color(config.colors.ifr, level);
        let (mut engine, _sender) = engine(config, true);

        let report = engine.run_cycle(at(12, 0, 60));
        assert_eq!(report.outcome, CycleOutcome::Rendered);
        assert_eq!(report.mode, Some(OperatingMode::Bright));
        assert_eq!(report.health, HealthOverride::None);
        assert_eq!(report.base_frame, [vfr, OFF, ifr]);
        assert_eq!(report.passes, 1);

        let frames = &engine.output().frames;
        assert_eq!(frames[0], [vfr, OFF, ifr]);
        for frame in frames {
            assert_eq!(frame[0], vfr);
            assert_eq!(frame[1], OFF);
        }
        assert!(frames.iter().any(|frame| frame[2] != ifr));
        assert_eq!(frames.last().unwrap(), &report.base_frame);

        // base frame pause comes before any animation step
        assert_eq!(engine.delay().0[0], Duration::from_millis(4000));
    }

    #[test]
    fn test_lights_off_window() {
        let mut config = test_config();
        config.schedule = ScheduleConfig {
            lights_off_enabled: true,
            lights_off: chrono::NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            lights_on: chrono::NaiveTime::from_hms_opt(6, 30, 0).unwrap(),
            ..ScheduleConfig::default()
        };
        let (mut engine, _sender) = engine(config, true);

        let report = engine.run_cycle(at(23, 0, 60));
        assert_eq!(report.outcome, CycleOutcome::LightsOff);
        assert_eq!(report.mode, Some(OperatingMode::Off));
        assert_eq!(engine.output().frames, [vec![OFF; 3]]);
        assert_eq!(report.passes, 0);
    }

    #[test]
    fn test_stale_data_overrides_and_suppresses_animation() {
        let config = test_config();
        let stale = scale_color(config.colors.stale_data, config.brightness.bright_level());
        let (mut engine, _sender) = engine(config, true);

        let report = engine.run_cycle(at(12, 0, 3_600));
        assert_eq!(report.health, HealthOverride::StaleData);
        assert_eq!(report.base_frame, [stale, OFF, stale]);
        assert_eq!(report.passes, 0);
        assert_eq!(engine.output().frames.len(), 1);
    }

    #[test]
    fn test_disconnected_wins_over_stale() {
        let config = test_config();
        let level = config.brightness.bright_level();
        let offline = scale_color(config.colors.wifi_disconnected, level);
        let (mut engine, _sender) = engine(config, false);

        let report = engine.run_cycle(at(12, 0, 3_600));
        assert_eq!(report.health, HealthOverride::WifiDisconnected);
        assert_eq!(report.base_frame, [offline, OFF, offline]);
    }

    #[test]
    fn test_push_failure_backs_off() {
        let (mut engine, _sender) = engine_with(test_config(), true, RecordingOutput {
            failing: true,
            ..RecordingOutput::default()
        });

        let report = engine.run_cycle(at(12, 0, 60));
        assert_eq!(report.outcome, CycleOutcome::HardwareFailure);
        assert_eq!(report.passes, 0);
        assert_eq!(engine.delay().0, [HARDWARE_BACKOFF]);
        assert!(engine.is_running());
    }

    #[test]
    fn test_reload_applies_at_cycle_boundary() {
        let (mut engine, sender) = engine(test_config(), true);

        let mut reloaded = test_config();
        reloaded.strip.pixel_count = 99;
        reloaded.animations.wind.enabled = false;
        reloaded.legend.enabled = true;
        reloaded.legend.items = heapless::Vec::from_slice(&[LegendItem::Vfr]).unwrap();
        assert!(request_reload(&sender, reloaded));

        let report = engine.run_cycle(at(12, 0, 60));
        assert_eq!(engine.config().strip.pixel_count, 3);
        assert!(!engine.config().animations.wind.enabled);
        assert_eq!(report.passes, 0);

        // KPDX's slot now holds the legend swatch
        let level = engine.config().brightness.bright_level();
        assert_eq!(report.base_frame[2], scale_color(engine.config().colors.vfr, level));
        assert_eq!(report.base_frame.len(), 3);
    }

    #[test]
    fn test_wind_pass_leaves_legend_slots_alone() {
        let mut config = test_config();
        config.legend.enabled = true;
        config.legend.items = heapless::Vec::from_slice(&[LegendItem::Vfr]).unwrap();
        let level = config.brightness.bright_level();
        let swatch = scale_color(config.colors.vfr, level);
        let ifr = scale_color(config.colors.ifr, level);

        // KPDX on slot 0 animates; the KPDX under the legend on slot 2 must not
        let roster = Roster::parse("KPDX\nSKIP\nKPDX", config.strip.pixel_count);
        let (mut engine, _sender) =
            engine_with_roster(config, roster, true, RecordingOutput::default());

        let report = engine.run_cycle(at(12, 0, 60));
        assert!(engine.config().animations.wind.enabled);
        assert_eq!(report.base_frame, [ifr, OFF, swatch]);
        assert_eq!(report.passes, 1);

        let frames = &engine.output().frames;
        assert!(frames.len() > 1);
        assert!(frames.iter().any(|frame| frame[0] != ifr));
        for frame in frames {
            assert_eq!(frame[2], swatch);
        }
    }

    #[test]
    fn test_shutdown_intent_stops_engine() {
        let (mut engine, sender) = engine(test_config(), true);
        assert!(sender.try_send(EngineIntent::Shutdown).is_ok());

        let report = engine.run_cycle(at(12, 0, 60));
        assert_eq!(report.outcome, CycleOutcome::Shutdown);
        assert!(!engine.is_running());
        assert!(engine.output().frames.is_empty());

        engine.run(&AtomicBool::new(false));
        assert_eq!(engine.output().frames, [vec![OFF; 3]]);
    }

    #[test]
    fn test_stop_flag_blanks_strip() {
        let (mut engine, _sender) = engine(test_config(), true);
        engine.run(&AtomicBool::new(true));
        assert!(!engine.is_running());
        assert_eq!(engine.output().frames, [vec![OFF; 3]]);
    }
}
