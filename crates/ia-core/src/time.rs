//! Time points and the time-domain descriptor.
//!
//! Timeseries are indexed either by plain years or by datetimes. A store may
//! hold both, in which case its domain is `Mixed`.

use core::fmt;
use core::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::IaError;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// A single point on the time axis of a record.
///
/// Years sort before datetimes so that mixed stores have a stable order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimePoint {
    Year(i32),
    DateTime(NaiveDateTime),
}

impl TimePoint {
    /// Calendar year of this time point.
    pub fn year(&self) -> i32 {
        match self {
            TimePoint::Year(y) => *y,
            TimePoint::DateTime(dt) => dt.year(),
        }
    }

    pub fn is_year(&self) -> bool {
        matches!(self, TimePoint::Year(_))
    }

    /// Build a datetime time point at midnight of the given date.
    pub fn date(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(TimePoint::DateTime)
    }
}

impl From<i32> for TimePoint {
    fn from(year: i32) -> Self {
        TimePoint::Year(year)
    }
}

impl From<NaiveDateTime> for TimePoint {
    fn from(dt: NaiveDateTime) -> Self {
        TimePoint::DateTime(dt)
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimePoint::Year(y) => write!(f, "{y}"),
            TimePoint::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl FromStr for TimePoint {
    type Err = IaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(year) = s.parse::<i32>() {
            return Ok(TimePoint::Year(year));
        }
        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(TimePoint::DateTime(dt));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(TimePoint::DateTime)
            .ok_or_else(|| IaError::InvalidTime {
                input: s.to_string(),
            })
    }
}

impl Serialize for TimePoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TimePoint::Year(y) => serializer.serialize_i32(*y),
            TimePoint::DateTime(_) => serializer.collect_str(self),
        }
    }
}

struct TimePointVisitor;

impl Visitor<'_> for TimePointVisitor {
    type Value = TimePoint;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer year or a datetime string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<TimePoint, E> {
        i32::try_from(v)
            .map(TimePoint::Year)
            .map_err(|_| E::custom(format!("year out of range: {v}")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<TimePoint, E> {
        i32::try_from(v)
            .map(TimePoint::Year)
            .map_err(|_| E::custom(format!("year out of range: {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<TimePoint, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for TimePoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimePointVisitor)
    }
}

/// Which kinds of time points a collection of records holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeDomain {
    Year,
    Datetime,
    Mixed,
}

impl TimeDomain {
    /// Classify a set of time points. An empty set counts as `Year`.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a TimePoint>) -> Self {
        let mut years = false;
        let mut datetimes = false;
        for point in points {
            match point {
                TimePoint::Year(_) => years = true,
                TimePoint::DateTime(_) => datetimes = true,
            }
        }
        match (years, datetimes) {
            (_, false) => TimeDomain::Year,
            (false, true) => TimeDomain::Datetime,
            (true, true) => TimeDomain::Mixed,
        }
    }

    /// Name of the time column for tabular output.
    pub fn time_col(&self) -> &'static str {
        match self {
            TimeDomain::Year => "year",
            TimeDomain::Datetime | TimeDomain::Mixed => "time",
        }
    }
}

impl fmt::Display for TimeDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeDomain::Year => "year",
            TimeDomain::Datetime => "datetime",
            TimeDomain::Mixed => "mixed",
        };
        f.write_str(s)
    }
}
