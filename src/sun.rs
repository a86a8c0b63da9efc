//! Sunrise and sunset times (NOAA algorithm, zenith 90.833°)
//!
//! Used to move the bright/dim boundaries with the seasons.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};

/// "Official" sunrise/sunset zenith, refraction included
const ZENITH_DEG: f64 = 90.833;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

#[inline]
fn sin_deg(x: f64) -> f64 {
    x.to_radians().sin()
}

#[inline]
fn cos_deg(x: f64) -> f64 {
    x.to_radians().cos()
}

#[inline]
fn tan_deg(x: f64) -> f64 {
    x.to_radians().tan()
}

/// Normalize angle to [0, 360)
fn norm360(x: f64) -> f64 {
    x.rem_euclid(360.0)
}

/// UT hour of sunrise (`rising`) or sunset on day-of-year `day`
///
/// `None` when the sun stays above or below the horizon all day.
fn event_ut_hours(latitude: f64, longitude: f64, day: f64, rising: bool) -> Option<f64> {
    let lng_hour = longitude / 15.0;
    let t = if rising {
        day + (6.0 - lng_hour) / 24.0
    } else {
        day + (18.0 - lng_hour) / 24.0
    };

    // Mean anomaly and true longitude
    let m = 0.9856 * t - 3.289;
    let l = norm360(m + 1.916 * sin_deg(m) + 0.020 * sin_deg(2.0 * m) + 282.634);

    // Right ascension, moved into the same quadrant as L
    let mut ra = norm360((0.91764 * tan_deg(l)).atan().to_degrees());
    ra += (l / 90.0).floor() * 90.0 - (ra / 90.0).floor() * 90.0;
    ra /= 15.0;

    let sin_dec = 0.39782 * sin_deg(l);
    let cos_dec = (1.0 - sin_dec * sin_dec).sqrt();

    let cos_h =
        (cos_deg(ZENITH_DEG) - sin_dec * sin_deg(latitude)) / (cos_dec * cos_deg(latitude));
    if !(-1.0..=1.0).contains(&cos_h) {
        return None;
    }

    let h = if rising {
        360.0 - cos_h.acos().to_degrees()
    } else {
        cos_h.acos().to_degrees()
    } / 15.0;

    let local_mean = h + ra - 0.06571 * t - 6.622;
    Some((local_mean - lng_hour).rem_euclid(24.0))
}

#[allow(clippy::cast_possible_truncation)]
fn ut_hours_to_utc(date: NaiveDate, ut_hours: f64) -> DateTime<Utc> {
    let seconds = (ut_hours * 3600.0).round() as i64;
    let midnight = date.and_time(NaiveTime::MIN);
    (midnight + Duration::seconds(seconds)).and_utc()
}

/// Sunrise and sunset on `date` at the given coordinates
#[allow(clippy::cast_lossless)]
pub fn sun_times(latitude: f64, longitude: f64, date: NaiveDate) -> SunTimes {
    let day = date.ordinal() as f64;
    let at = |rising| {
        event_ut_hours(latitude, longitude, day, rising).map(|h| ut_hours_to_utc(date, h))
    };
    SunTimes {
        sunrise: at(true),
        sunset: at(false),
    }
}
