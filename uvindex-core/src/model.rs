use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coordinate the poller asks the API about.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// The `now` part of a payload. Only the UV index matters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NowPoint {
    pub uvi: Option<f64>,
}

/// One forecast entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub time: DateTime<Utc>,
    pub uvi: Option<f64>,
}

/// Result of one successful poll. Replaced wholesale, never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub now: NowPoint,
    /// Entries in the order the API returned them.
    pub forecast: Vec<ForecastPoint>,
}

/// A derived value plus the instant of the forecast entry it came from.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedReading {
    pub value: Option<f64>,
    pub at: Option<DateTime<Utc>>,
}

impl DerivedReading {
    pub const fn absent() -> Self {
        Self { value: None, at: None }
    }

    pub fn is_absent(&self) -> bool {
        self.value.is_none()
    }
}

impl From<&ForecastPoint> for DerivedReading {
    fn from(point: &ForecastPoint) -> Self {
        Self {
            value: point.uvi,
            at: Some(point.time),
        }
    }
}
