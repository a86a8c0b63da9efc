//! Weather snapshot input
//!
//! A snapshot is an immutable, point-in-time set of airport records. The
//! engine takes one `Arc<WeatherSnapshot>` per cycle so every component sees
//! the same batch.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Deserializer};

use crate::error::DataError;

const CATEGORY_NAME_VFR: &str = "VFR";
const CATEGORY_NAME_MVFR: &str = "MVFR";
const CATEGORY_NAME_IFR: &str = "IFR";
const CATEGORY_NAME_LIFR: &str = "LIFR";
const CATEGORY_NAME_MISSING: &str = "MISSING";

/// Flight category, best to worst, plus missing data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlightCategory {
    Vfr,
    Mvfr,
    Ifr,
    Lifr,
    Missing,
}

impl FlightCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vfr => CATEGORY_NAME_VFR,
            Self::Mvfr => CATEGORY_NAME_MVFR,
            Self::Ifr => CATEGORY_NAME_IFR,
            Self::Lifr => CATEGORY_NAME_LIFR,
            Self::Missing => CATEGORY_NAME_MISSING,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            CATEGORY_NAME_VFR => Some(Self::Vfr),
            CATEGORY_NAME_MVFR => Some(Self::Mvfr),
            CATEGORY_NAME_IFR => Some(Self::Ifr),
            CATEGORY_NAME_LIFR => Some(Self::Lifr),
            CATEGORY_NAME_MISSING => Some(Self::Missing),
            _ => None,
        }
    }
}

/// Reported visibility, either numeric or as METAR-style text
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Visibility {
    Miles(f32),
    Text(String),
}

impl Visibility {
    /// Visibility in statute miles, if it can be parsed
    ///
    /// Accepts plain numbers, `10+`, `P6SM`, `M1/4SM`, `1/2` and `1 1/2`.
    pub fn statute_miles(&self) -> Option<f32> {
        match self {
            Self::Miles(miles) if miles.is_finite() && *miles >= 0.0 => Some(*miles),
            Self::Miles(_) => None,
            Self::Text(text) => parse_visibility_text(text),
        }
    }
}

fn parse_visibility_text(text: &str) -> Option<f32> {
    let trimmed = text.trim().trim_end_matches("SM").trim_end_matches('+');
    let trimmed = trimmed
        .strip_prefix('P')
        .or_else(|| trimmed.strip_prefix('M'))
        .unwrap_or(trimmed);

    let mut total = 0.0_f32;
    let mut parts = 0;
    for part in trimmed.split_whitespace() {
        total += match part.split_once('/') {
            Some((num, den)) => {
                let num: f32 = num.parse().ok()?;
                let den: f32 = den.parse().ok()?;
                if den == 0.0 {
                    return None;
                }
                num / den
            }
            None => part.parse().ok()?,
        };
        parts += 1;
    }

    if parts == 0 || !total.is_finite() || total < 0.0 {
        return None;
    }
    Some(total)
}

fn category_or_none<'de, D>(deserializer: D) -> Result<Option<FlightCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(FlightCategory::parse_from_str)
        .filter(|category| *category != FlightCategory::Missing))
}

/// Weather facts for one airport
///
/// Field aliases accept both the fetcher's names and the raw API names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirportRecord {
    /// Reported category; absent (or `MISSING`) means derive it
    #[serde(
        default,
        alias = "flt_cat",
        alias = "fltcat",
        deserialize_with = "category_or_none"
    )]
    pub flight_category: Option<FlightCategory>,
    /// Sustained wind in knots
    #[serde(default, alias = "wspd")]
    pub wind_speed: Option<f32>,
    /// Gust in knots
    #[serde(default, alias = "wgst")]
    pub wind_gust: Option<f32>,
    #[serde(default, alias = "visib")]
    pub visibility: Option<Visibility>,
    /// Ceiling in feet above ground
    #[serde(default, alias = "ceil")]
    pub ceiling: Option<f32>,
    #[serde(default, alias = "rawOb")]
    pub raw_observation: String,
    #[serde(
        default,
        alias = "obsTime",
        with = "chrono::serde::ts_seconds_option"
    )]
    pub observation_time: Option<DateTime<Utc>>,
}

impl AirportRecord {
    /// Wind speed, absent treated as calm
    pub fn wind_speed_kt(&self) -> f32 {
        self.wind_speed.unwrap_or(0.0)
    }

    /// Wind gust, absent treated as calm
    pub fn wind_gust_kt(&self) -> f32 {
        self.wind_gust.unwrap_or(0.0)
    }
}

/// Immutable weather batch keyed by airport code
#[derive(Debug, Clone, Default)]
pub struct WeatherSnapshot {
    records: HashMap<String, AirportRecord>,
    updated_at: Option<SystemTime>,
}

impl WeatherSnapshot {
    pub fn new(records: HashMap<String, AirportRecord>, updated_at: Option<SystemTime>) -> Self {
        let records = records
            .into_iter()
            .map(|(code, record)| (code.trim().to_ascii_uppercase(), record))
            .collect();
        Self {
            records,
            updated_at,
        }
    }

    /// Snapshot with no records and unknown freshness
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON object keyed by airport code
    ///
    /// Records that fail to deserialize are logged and left out, so those
    /// airports render as missing.
    pub fn from_json(text: &str, updated_at: Option<SystemTime>) -> Result<Self, DataError> {
        let raw: HashMap<String, serde_json::Value> = serde_json::from_str(text)?;
        let mut records = HashMap::with_capacity(raw.len());
        for (code, value) in raw {
            match serde_json::from_value::<AirportRecord>(value) {
                Ok(record) => {
                    records.insert(code, record);
                }
                Err(err) => warn!("dropping malformed weather record for {code}: {err}"),
            }
        }
        Ok(Self::new(records, updated_at))
    }

    pub fn get(&self, code: &str) -> Option<&AirportRecord> {
        self.records.get(code)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// When the snapshot was last written by the ingestion side
    pub const fn updated_at(&self) -> Option<SystemTime> {
        self.updated_at
    }

    /// Age of the snapshot at `now`, if its update time is known
    pub fn age(&self, now: SystemTime) -> Option<core::time::Duration> {
        let updated_at = self.updated_at?;
        Some(now.duration_since(updated_at).unwrap_or_default())
    }
}

/// Supplier of the current weather snapshot
pub trait WeatherSource {
    /// Return the latest snapshot
    ///
    /// Implementations replace the snapshot wholesale; they never mutate one
    /// that was already handed out.
    fn snapshot(&mut self) -> Result<Arc<WeatherSnapshot>, DataError>;
}

impl WeatherSource for Arc<WeatherSnapshot> {
    fn snapshot(&mut self) -> Result<Arc<WeatherSnapshot>, DataError> {
        Ok(Arc::clone(self))
    }
}

/// Weather snapshot persisted as JSON by the ingestion side
///
/// The file is only re-parsed when its modification time changes.
#[derive(Debug)]
pub struct WeatherFile {
    path: PathBuf,
    cached: Option<(SystemTime, Arc<WeatherSnapshot>)>,
}

impl WeatherFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> DataError {
        DataError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl WeatherSource for WeatherFile {
    fn snapshot(&mut self) -> Result<Arc<WeatherSnapshot>, DataError> {
        let modified = fs::metadata(&self.path)
            .and_then(|meta| meta.modified())
            .map_err(|err| self.io_error(err))?;

        if let Some((cached_at, snapshot)) = &self.cached {
            if *cached_at == modified {
                debug!("weather snapshot unchanged");
                return Ok(Arc::clone(snapshot));
            }
        }

        let text = fs::read_to_string(&self.path).map_err(|err| self.io_error(err))?;
        let snapshot = Arc::new(WeatherSnapshot::from_json(&text, Some(modified))?);
        info!(
            "loaded weather snapshot with {} records from {}",
            snapshot.len(),
            self.path.display()
        );
        self.cached = Some((modified, Arc::clone(&snapshot)));
        Ok(snapshot)
    }
}
