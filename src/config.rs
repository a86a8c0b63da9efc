//! Immutable configuration snapshot
//!
//! The whole snapshot is replaced on reload; nothing in the engine mutates
//! it. Every field has a default so partial files are accepted.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use embassy_time::Duration;
use heapless::Vec;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::color::{ColorOrder, Rgb, rgb_from_u32};
use crate::effect::{ANIMATION_KINDS, AnimationKind, AnimationSpec, AnimationTiming};
use crate::error::ConfigError;
use crate::legend::{LEGEND_CAPACITY, LegendItem};
use crate::math8::fraction_to_level;
use crate::weather::FlightCategory;

pub const DEFAULT_PIXEL_COUNT: usize = 50;
pub const DEFAULT_PROBE_ADDRESS: &str = "8.8.8.8:53";

const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

/// Strip output selection, resolved once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StripDriver {
    /// Log frames instead of driving hardware
    Log,
    /// WS2812 on `/dev/spidev0.0`
    #[default]
    Spi0,
    /// WS2812 on `/dev/spidev1.0`
    Spi1,
}

impl StripDriver {
    pub const fn device_path(self) -> Option<&'static str> {
        match self {
            Self::Log => None,
            Self::Spi0 => Some("/dev/spidev0.0"),
            Self::Spi1 => Some("/dev/spidev1.0"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    pub pixel_count: usize,
    pub driver: StripDriver,
    pub color_order: ColorOrder,
    pub gamma: bool,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            pixel_count: DEFAULT_PIXEL_COUNT,
            driver: StripDriver::default(),
            color_order: ColorOrder::default(),
            gamma: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub airports: PathBuf,
    pub weather: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            airports: PathBuf::from("airports.txt"),
            weather: PathBuf::from("weather.json"),
        }
    }
}

/// Brightness fractions (0.0-1.0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrightnessConfig {
    /// Full brightness
    pub bright: f32,
    /// Daytime-dimming brightness
    pub dim: f32,
    /// Floor reached by the wind fade
    pub wind_floor: f32,
}

impl Default for BrightnessConfig {
    fn default() -> Self {
        Self {
            bright: 0.5,
            dim: 0.3,
            wind_floor: 0.05,
        }
    }
}

impl BrightnessConfig {
    pub fn bright_level(&self) -> u8 {
        fraction_to_level(self.bright)
    }

    pub fn dim_level(&self) -> u8 {
        fraction_to_level(self.dim)
    }

    pub fn wind_floor_level(&self) -> u8 {
        fraction_to_level(self.wind_floor)
    }
}

/// Full-intensity colors, scaled by the operating mode at render time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPalette {
    #[serde(with = "hex_color")]
    pub vfr: Rgb,
    #[serde(with = "hex_color")]
    pub mvfr: Rgb,
    #[serde(with = "hex_color")]
    pub ifr: Rgb,
    #[serde(with = "hex_color")]
    pub lifr: Rgb,
    #[serde(with = "hex_color")]
    pub missing: Rgb,
    #[serde(with = "hex_color")]
    pub lightning: Rgb,
    #[serde(with = "hex_color")]
    pub snow: Rgb,
    /// Legend swatch for windy airports
    #[serde(with = "hex_color")]
    pub windy: Rgb,
    #[serde(with = "hex_color")]
    pub stale_data: Rgb,
    #[serde(with = "hex_color")]
    pub wifi_disconnected: Rgb,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            vfr: rgb_from_u32(0x00FF00),
            mvfr: rgb_from_u32(0x0000FF),
            ifr: rgb_from_u32(0xFF0000),
            lifr: rgb_from_u32(0xFF00FF),
            missing: rgb_from_u32(0xFFA500),
            lightning: rgb_from_u32(0xFFFFFF),
            snow: rgb_from_u32(0xC8DCFF),
            windy: rgb_from_u32(0xFFC800),
            stale_data: rgb_from_u32(0xFFFF00),
            wifi_disconnected: rgb_from_u32(0x00FFFF),
        }
    }
}

impl ColorPalette {
    pub const fn category(&self, category: FlightCategory) -> Rgb {
        match category {
            FlightCategory::Vfr => self.vfr,
            FlightCategory::Mvfr => self.mvfr,
            FlightCategory::Ifr => self.ifr,
            FlightCategory::Lifr => self.lifr,
            FlightCategory::Missing => self.missing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindFadeConfig {
    pub enabled: bool,
    /// Duration of each fade direction
    pub fade_ms: u64,
    /// Interpolation steps per fade direction
    pub steps: u16,
    /// Hold at the floor brightness
    pub hold_ms: u64,
}

impl Default for WindFadeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fade_ms: 500,
            steps: 100,
            hold_ms: 1200,
        }
    }
}

impl WindFadeConfig {
    /// Delay between interpolation steps
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.fade_ms / u64::from(self.steps.max(1)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightningConfig {
    pub enabled: bool,
    pub flash_count: u8,
    pub flash_on_ms: u64,
    pub flash_off_ms: u64,
}

impl Default for LightningConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            flash_count: 3,
            flash_on_ms: 100,
            flash_off_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowConfig {
    pub enabled: bool,
    pub blink_count: u8,
    pub blink_pause_ms: u64,
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            blink_count: 3,
            blink_pause_ms: 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationsConfig {
    /// Order in which passes run
    #[serde(deserialize_with = "unique_list::deserialize")]
    pub order: Vec<AnimationKind, ANIMATION_KINDS>,
    /// Pause after the base frame is pushed
    pub pause_ms: u64,
    pub wind: WindFadeConfig,
    pub lightning: LightningConfig,
    pub snow: SnowConfig,
}

impl Default for AnimationsConfig {
    fn default() -> Self {
        Self {
            order: Vec::from_slice(&AnimationKind::DEFAULT_ORDER).unwrap_or_default(),
            pause_ms: 4000,
            wind: WindFadeConfig::default(),
            lightning: LightningConfig::default(),
            snow: SnowConfig::default(),
        }
    }
}

impl AnimationsConfig {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    /// Animation specs in run order
    pub fn specs(&self) -> Vec<AnimationSpec, ANIMATION_KINDS> {
        let mut specs = Vec::new();
        for (position, kind) in self.order.iter().enumerate() {
            let (enabled, timing) = match kind {
                AnimationKind::WindFade => {
                    (self.wind.enabled, AnimationTiming::WindFade(self.wind))
                }
                AnimationKind::Lightning => (
                    self.lightning.enabled,
                    AnimationTiming::Lightning(self.lightning),
                ),
                AnimationKind::SnowTwinkle => {
                    (self.snow.enabled, AnimationTiming::SnowTwinkle(self.snow))
                }
            };
            let spec = AnimationSpec {
                position,
                enabled,
                timing,
            };
            if specs.push(spec).is_err() {
                break;
            }
        }
        specs
    }

    fn disable_all(&mut self) {
        self.wind.enabled = false;
        self.lightning.enabled = false;
        self.snow.enabled = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DaylightConfig {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub lights_off_enabled: bool,
    #[serde(with = "hhmm")]
    pub lights_on: NaiveTime,
    #[serde(with = "hhmm")]
    pub lights_off: NaiveTime,
    pub dimming_enabled: bool,
    #[serde(with = "hhmm")]
    pub bright_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub dim_start: NaiveTime,
    /// When set, sunrise/sunset replace `bright_start`/`dim_start`
    pub daylight: Option<DaylightConfig>,
}

fn time_of_day(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            lights_off_enabled: false,
            lights_on: time_of_day(7, 10),
            lights_off: time_of_day(20, 5),
            dimming_enabled: true,
            bright_start: time_of_day(7, 20),
            dim_start: time_of_day(18, 5),
            daylight: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub stale_check_enabled: bool,
    /// Expected interval between weather updates
    pub weather_update_interval_secs: u64,
    pub wifi_check_enabled: bool,
    /// Minimum time between connectivity probes
    pub wifi_check_interval_secs: u64,
    pub probe_address: String,
    pub probe_timeout_ms: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            stale_check_enabled: true,
            weather_update_interval_secs: 300,
            wifi_check_enabled: true,
            wifi_check_interval_secs: 60,
            probe_address: DEFAULT_PROBE_ADDRESS.to_owned(),
            probe_timeout_ms: 1500,
        }
    }
}

impl HealthConfig {
    /// Snapshot age past which data counts as stale
    pub fn stale_after(&self) -> core::time::Duration {
        core::time::Duration::from_secs(self.weather_update_interval_secs.saturating_mul(2))
    }

    pub fn wifi_check_interval(&self) -> Duration {
        Duration::from_secs(self.wifi_check_interval_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendConfig {
    pub enabled: bool,
    /// Swatches painted at the end of the strip, in order
    #[serde(deserialize_with = "unique_list::deserialize")]
    pub items: Vec<LegendItem, LEGEND_CAPACITY>,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            items: Vec::from_slice(&LegendItem::CATEGORIES).unwrap_or_default(),
        }
    }
}

/// Complete configuration snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub strip: StripConfig,
    pub files: FilesConfig,
    pub brightness: BrightnessConfig,
    pub colors: ColorPalette,
    /// Knots; wind or gust above this animates the airport
    pub wind_threshold: f32,
    pub animations: AnimationsConfig,
    pub schedule: ScheduleConfig,
    pub health: HealthConfig,
    pub legend: LegendConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strip: StripConfig::default(),
            files: FilesConfig::default(),
            brightness: BrightnessConfig::default(),
            colors: ColorPalette::default(),
            wind_threshold: 8.0,
            animations: AnimationsConfig::default(),
            schedule: ScheduleConfig::default(),
            health: HealthConfig::default(),
            legend: LegendConfig::default(),
        }
    }
}

impl Config {
    /// Safest configuration: always bright, no animations
    pub fn fallback() -> Self {
        let mut config = Self::default();
        config.schedule.lights_off_enabled = false;
        config.schedule.dimming_enabled = false;
        config.animations.disable_all();
        config
    }

    /// Parse a JSON configuration and repair contradictions
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        Ok(config.sanitize())
    }

    /// Load and sanitize the configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Load the configuration file, falling back to [`Config::fallback`]
    pub fn load_or_fallback(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            warn!(
                "failed to load config from {}: {err}, using safe defaults",
                path.display()
            );
            Self::fallback()
        })
    }

    /// Repair values that cannot be honoured, degrading to safe behaviour
    #[must_use]
    pub fn sanitize(mut self) -> Self {
        if self.strip.pixel_count == 0 {
            warn!("pixel count is zero, using {DEFAULT_PIXEL_COUNT}");
            self.strip.pixel_count = DEFAULT_PIXEL_COUNT;
        }

        let brightness = &mut self.brightness;
        for value in [&mut brightness.bright, &mut brightness.dim, &mut brightness.wind_floor] {
            let current = *value;
            if !(0.0..=1.0).contains(&current) {
                warn!("brightness {current} out of range, clamping");
                *value = if current.is_nan() { 0.0 } else { current.clamp(0.0, 1.0) };
            }
        }

        if self.wind_threshold.is_nan() || self.wind_threshold < 0.0 {
            warn!("invalid wind threshold {}, disabling wind animation", self.wind_threshold);
            self.wind_threshold = f32::MAX;
            self.animations.wind.enabled = false;
        }

        self.sanitize_animations();

        let reserved = if self.legend.enabled {
            self.legend.items.len()
        } else {
            0
        };
        if reserved >= self.strip.pixel_count {
            warn!(
                "legend needs {reserved} slots but the strip has {}, disabling legend",
                self.strip.pixel_count
            );
            self.legend.enabled = false;
        }

        if let Some(daylight) = self.schedule.daylight {
            let in_range = daylight.latitude.abs() <= MAX_LATITUDE
                && daylight.longitude.abs() <= MAX_LONGITUDE;
            if !in_range {
                warn!(
                    "daylight coordinates ({}, {}) out of range, using fixed dimming times",
                    daylight.latitude, daylight.longitude
                );
                self.schedule.daylight = None;
            }
        }

        if self.health.probe_address.parse::<std::net::SocketAddr>().is_err() {
            warn!(
                "invalid probe address {:?}, using {DEFAULT_PROBE_ADDRESS}",
                self.health.probe_address
            );
            self.health.probe_address = DEFAULT_PROBE_ADDRESS.to_owned();
        }

        self
    }

    fn sanitize_animations(&mut self) {
        let animations = &mut self.animations;

        let mut order: Vec<AnimationKind, ANIMATION_KINDS> = Vec::new();
        for kind in animations
            .order
            .iter()
            .chain(AnimationKind::DEFAULT_ORDER.iter())
        {
            if !order.contains(kind) && order.push(*kind).is_err() {
                break;
            }
        }
        animations.order = order;

        if animations.wind.enabled && animations.wind.steps == 0 {
            warn!("wind fade has zero steps, disabling it");
            animations.wind.enabled = false;
        }
        if animations.lightning.enabled && animations.lightning.flash_count == 0 {
            warn!("lightning has zero flashes, disabling it");
            animations.lightning.enabled = false;
        }
        if animations.snow.enabled && animations.snow.blink_count == 0 {
            warn!("snow has zero blinks, disabling it");
            animations.snow.enabled = false;
        }
    }
}

mod hex_color {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::color::{Rgb, parse_hex_color, to_hex_color};

    pub(super) fn serialize<S: Serializer>(color: &Rgb, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_hex_color(*color))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgb, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_hex_color(&raw).map_err(serde::de::Error::custom)
    }
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::error::ConfigError;

    const FORMAT: &str = "%H:%M";

    pub(super) fn serialize<S: Serializer>(
        time: &NaiveTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S"))
            .map_err(|_| serde::de::Error::custom(ConfigError::Time(raw)))
    }
}

/// Accept lists of any length, keeping the first occurrence of each entry
/// up to the list's capacity
mod unique_list {
    use heapless::Vec;
    use log::warn;
    use serde::{Deserialize, Deserializer};

    pub(super) fn deserialize<'de, D, T, const N: usize>(
        deserializer: D,
    ) -> Result<Vec<T, N>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + PartialEq + core::fmt::Debug,
    {
        let raw = std::vec::Vec::<T>::deserialize(deserializer)?;
        let mut list = Vec::new();
        for item in raw {
            if list.contains(&item) {
                warn!("dropping duplicate list entry {item:?}");
            } else if let Err(item) = list.push(item) {
                warn!("list holds at most {N} entries, dropping {item:?}");
            }
        }
        Ok(list)
    }
}
