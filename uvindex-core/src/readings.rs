//! The five readings a host exposes, described as one table.
//!
//! A host iterates [`READINGS`] once at setup, registers one entity per
//! descriptor, and from then on receives [`Reading`] values through its
//! [`ReadingSink`].

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::{
    derive,
    model::{DerivedReading, Payload},
};

/// Unit of measurement: the UV index is dimensionless.
pub const UNIT: &str = "";
pub const STATE_CLASS: &str = "measurement";
pub const SUGGESTED_DISPLAY_PRECISION: u8 = 1;

/// Attribute key carrying the instant of a min/max reading.
pub const TIME_ATTRIBUTE: &str = "time";

pub type DeriveFn = fn(&Payload, DateTime<Utc>) -> DerivedReading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadingKind {
    Current,
    TodayMax,
    TodayMin,
    TomorrowMax,
    TomorrowMin,
}

impl ReadingKind {
    pub fn as_str(&self) -> &'static str {
        self.descriptor().key
    }

    pub const fn all() -> &'static [ReadingKind] {
        &[
            ReadingKind::Current,
            ReadingKind::TodayMax,
            ReadingKind::TodayMin,
            ReadingKind::TomorrowMax,
            ReadingKind::TomorrowMin,
        ]
    }

    pub fn descriptor(&self) -> &'static ReadingDescriptor {
        match self {
            ReadingKind::Current => &READINGS[0],
            ReadingKind::TodayMax => &READINGS[1],
            ReadingKind::TodayMin => &READINGS[2],
            ReadingKind::TomorrowMax => &READINGS[3],
            ReadingKind::TomorrowMin => &READINGS[4],
        }
    }
}

impl std::fmt::Display for ReadingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of one exposed reading.
#[derive(Debug, Clone, Copy)]
pub struct ReadingDescriptor {
    pub kind: ReadingKind,
    /// Stable key, also used as the host's translation key.
    pub key: &'static str,
    pub uid_suffix: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    /// Whether the reading carries a `time` attribute.
    pub timestamped: bool,
    pub derive: DeriveFn,
}

impl ReadingDescriptor {
    pub fn unique_id(&self, entry_id: &str) -> String {
        format!("{entry_id}_{}", self.uid_suffix)
    }

    pub fn evaluate(&self, entry_id: &str, payload: &Payload, now: DateTime<Utc>) -> Reading {
        let derived = (self.derive)(payload, now);
        Reading {
            unique_id: self.unique_id(entry_id),
            kind: self.kind,
            value: derived.value,
            at: if self.timestamped { derived.at } else { None },
        }
    }
}

pub static READINGS: [ReadingDescriptor; 5] = [
    ReadingDescriptor {
        kind: ReadingKind::Current,
        key: "current_uv_index",
        uid_suffix: "current",
        name: "Current UV Index",
        icon: "mdi:white-balance-sunny",
        timestamped: false,
        derive: derive::current,
    },
    ReadingDescriptor {
        kind: ReadingKind::TodayMax,
        key: "today_max_uv",
        uid_suffix: "today_max",
        name: "Today Max UV Index",
        icon: "mdi:weather-sunset-up",
        timestamped: true,
        derive: derive::today_max,
    },
    ReadingDescriptor {
        kind: ReadingKind::TodayMin,
        key: "today_min_uv",
        uid_suffix: "today_min",
        name: "Today Min UV Index",
        icon: "mdi:weather-sunset-down",
        timestamped: true,
        derive: derive::today_min,
    },
    ReadingDescriptor {
        kind: ReadingKind::TomorrowMax,
        key: "tomorrow_max_uv",
        uid_suffix: "tomorrow_max",
        name: "Tomorrow Max UV Index",
        icon: "mdi:weather-sunset-up",
        timestamped: true,
        derive: derive::tomorrow_max,
    },
    ReadingDescriptor {
        kind: ReadingKind::TomorrowMin,
        key: "tomorrow_min_uv",
        uid_suffix: "tomorrow_min",
        name: "Tomorrow Min UV Index",
        icon: "mdi:weather-sunset-down",
        timestamped: true,
        derive: derive::tomorrow_min,
    },
];

/// Device the readings are grouped under on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub identifier: String,
    pub name: &'static str,
    pub manufacturer: &'static str,
    pub model: &'static str,
}

impl DeviceInfo {
    pub fn for_entry(entry_id: &str) -> Self {
        Self {
            identifier: entry_id.to_string(),
            name: "Current UV Index",
            manufacturer: "CurrentUVIndex.com",
            model: "UV Index API",
        }
    }
}

/// One derived value, ready for the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub unique_id: String,
    pub kind: ReadingKind,
    pub value: Option<f64>,
    pub at: Option<DateTime<Utc>>,
}

impl Reading {
    pub fn descriptor(&self) -> &'static ReadingDescriptor {
        self.kind.descriptor()
    }

    /// Extra state attributes. Empty unless a timestamp was derived.
    pub fn attributes(&self) -> BTreeMap<&'static str, String> {
        self.at
            .map(|at| (TIME_ATTRIBUTE, at.to_rfc3339()))
            .into_iter()
            .collect()
    }
}

/// Where the host receives readings.
pub trait ReadingSink: Send + Sync {
    fn publish(&self, reading: &Reading);

    /// No payload has ever been fetched, so the reading has no state at all.
    fn unavailable(&self, descriptor: &ReadingDescriptor, unique_id: &str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ForecastPoint, NowPoint};
    use std::collections::HashSet;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .expect("valid test timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn kinds_map_to_their_own_descriptor() {
        for kind in ReadingKind::all() {
            assert_eq!(kind.descriptor().kind, *kind);
        }
        assert_eq!(ReadingKind::all().len(), READINGS.len());
    }

    #[test]
    fn unique_ids_are_distinct_per_entry() {
        let ids: HashSet<String> = READINGS.iter().map(|d| d.unique_id("home")).collect();
        assert_eq!(ids.len(), READINGS.len());
        assert!(ids.contains("home_current"));
        assert!(ids.contains("home_tomorrow_min"));
    }

    #[test]
    fn only_min_max_readings_are_timestamped() {
        let payload = Payload {
            now: NowPoint { uvi: Some(2.0) },
            forecast: vec![ForecastPoint {
                time: at("2025-08-26T12:00:00Z"),
                uvi: Some(5.1),
            }],
        };
        let now = at("2025-08-26T13:00:00Z");

        let current = ReadingKind::Current.descriptor().evaluate("e", &payload, now);
        assert_eq!(current.value, Some(2.0));
        assert!(current.attributes().is_empty());

        let max = ReadingKind::TodayMax.descriptor().evaluate("e", &payload, now);
        assert_eq!(max.unique_id, "e_today_max");
        assert_eq!(max.value, Some(5.1));
        assert_eq!(
            max.attributes().get(TIME_ATTRIBUTE).map(String::as_str),
            Some("2025-08-26T12:00:00+00:00")
        );

        let tomorrow = ReadingKind::TomorrowMax.descriptor().evaluate("e", &payload, now);
        assert_eq!(tomorrow.value, None);
        assert!(tomorrow.attributes().is_empty());
    }

    #[test]
    fn display_uses_key() {
        assert_eq!(ReadingKind::TodayMin.to_string(), "today_min_uv");
    }

    #[test]
    fn device_info_is_scoped_to_entry() {
        let info = DeviceInfo::for_entry("cabin");
        assert_eq!(info.identifier, "cabin");
        assert_eq!(info.manufacturer, "CurrentUVIndex.com");
    }
}
