//! Flight category and condition-set classification
//!
//! Condition sets are rebuilt from scratch for every snapshot; nothing is
//! carried over between cycles.

use std::collections::{HashMap, HashSet};

use crate::roster::Roster;
use crate::weather::{AirportRecord, FlightCategory, WeatherSnapshot};

/// Whole-word observation tokens that indicate lightning
pub const LIGHTNING_KEYWORDS: [&str; 3] = ["TS", "LTG", "VCTS"];

/// Whole-word observation tokens that indicate snow
pub const SNOW_KEYWORDS: [&str; 7] = ["SN", "BLSN", "DRSN", "GS", "SG", "SNINCR", "SP"];

const VFR_MIN_VISIBILITY_SM: f32 = 5.0;
const VFR_MIN_CEILING_FT: f32 = 3000.0;
const MVFR_MIN_VISIBILITY_SM: f32 = 3.0;
const MVFR_MIN_CEILING_FT: f32 = 1000.0;
const IFR_MIN_VISIBILITY_SM: f32 = 1.0;
const IFR_MIN_CEILING_FT: f32 = 500.0;

/// Conditions an airport can be animated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Windy,
    Lightning,
    Snow,
    Missing,
}

/// Classification of a single airport record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: FlightCategory,
    pub windy: bool,
    pub lightning: bool,
    pub snow: bool,
}

impl Classification {
    /// Classification of an airport with no usable record
    pub const MISSING: Self = Self {
        category: FlightCategory::Missing,
        windy: false,
        lightning: false,
        snow: false,
    };

    pub const fn has(&self, condition: Condition) -> bool {
        match condition {
            Condition::Windy => self.windy,
            Condition::Lightning => self.lightning,
            Condition::Snow => self.snow,
            Condition::Missing => matches!(self.category, FlightCategory::Missing),
        }
    }
}

/// Derive a flight category from visibility and ceiling
///
/// A missing ceiling means unlimited. Missing visibility cannot be
/// classified.
pub fn derive_category(visibility_sm: Option<f32>, ceiling_ft: Option<f32>) -> FlightCategory {
    let Some(visibility) = visibility_sm else {
        return FlightCategory::Missing;
    };
    let ceiling_at_least = |min: f32| ceiling_ft.is_none_or(|ceiling| ceiling >= min);

    if visibility >= VFR_MIN_VISIBILITY_SM && ceiling_at_least(VFR_MIN_CEILING_FT) {
        FlightCategory::Vfr
    } else if visibility >= MVFR_MIN_VISIBILITY_SM && ceiling_at_least(MVFR_MIN_CEILING_FT) {
        FlightCategory::Mvfr
    } else if visibility >= IFR_MIN_VISIBILITY_SM && ceiling_at_least(IFR_MIN_CEILING_FT) {
        FlightCategory::Ifr
    } else {
        FlightCategory::Lifr
    }
}

/// Check if the observation contains any keyword as a whole word
///
/// Words are maximal runs of ASCII alphanumerics, so `-SN` matches `SN` but
/// `KTSA` never matches `TS`.
pub fn contains_keyword(observation: &str, keywords: &[&str]) -> bool {
    observation
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .any(|word| keywords.iter().any(|keyword| word.eq_ignore_ascii_case(keyword)))
}

/// Set of airport codes sharing one condition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionSet {
    codes: HashSet<String>,
}

impl ConditionSet {
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    fn insert(&mut self, code: &str) {
        self.codes.insert(code.to_owned());
    }
}

/// Classified view of one snapshot for the airports on the roster
#[derive(Debug, Clone, Default)]
pub struct ClassifiedWeather {
    airports: HashMap<String, Classification>,
    windy: ConditionSet,
    lightning: ConditionSet,
    snow: ConditionSet,
    missing: ConditionSet,
}

impl ClassifiedWeather {
    /// Classification of an airport, missing if it was never classified
    pub fn get(&self, code: &str) -> Classification {
        self.airports
            .get(code)
            .copied()
            .unwrap_or(Classification::MISSING)
    }

    pub fn category(&self, code: &str) -> FlightCategory {
        self.get(code).category
    }

    pub const fn set(&self, condition: Condition) -> &ConditionSet {
        match condition {
            Condition::Windy => &self.windy,
            Condition::Lightning => &self.lightning,
            Condition::Snow => &self.snow,
            Condition::Missing => &self.missing,
        }
    }

    fn insert(&mut self, code: &str, classification: Classification) {
        if classification.windy {
            self.windy.insert(code);
        }
        if classification.lightning {
            self.lightning.insert(code);
        }
        if classification.snow {
            self.snow.insert(code);
        }
        if classification.has(Condition::Missing) {
            self.missing.insert(code);
        }
        self.airports.insert(code.to_owned(), classification);
    }
}

/// Turns airport records into categories and condition memberships
#[derive(Debug, Clone, Copy)]
pub struct ConditionClassifier {
    /// Wind or gust strictly above this (knots) marks an airport windy
    wind_threshold: f32,
}

impl ConditionClassifier {
    pub const fn new(wind_threshold: f32) -> Self {
        Self { wind_threshold }
    }

    /// Classify one record
    pub fn classify(&self, record: &AirportRecord) -> Classification {
        let category = record.flight_category.unwrap_or_else(|| {
            derive_category(
                record
                    .visibility
                    .as_ref()
                    .and_then(|visibility| visibility.statute_miles()),
                record.ceiling,
            )
        });

        Classification {
            category,
            windy: record.wind_speed_kt() > self.wind_threshold
                || record.wind_gust_kt() > self.wind_threshold,
            lightning: contains_keyword(&record.raw_observation, &LIGHTNING_KEYWORDS),
            snow: contains_keyword(&record.raw_observation, &SNOW_KEYWORDS),
        }
    }

    /// Classify every roster airport against one snapshot
    ///
    /// Airports without a record are classified as missing.
    pub fn classify_roster(
        &self,
        roster: &Roster,
        snapshot: &WeatherSnapshot,
    ) -> ClassifiedWeather {
        let mut classified = ClassifiedWeather::default();
        for (_, code) in roster.airports() {
            let classification = snapshot
                .get(code)
                .map_or(Classification::MISSING, |record| self.classify(record));
            classified.insert(code, classification);
        }
        classified
    }
}
