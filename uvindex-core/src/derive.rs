//! Derived readings over the last good payload.
//!
//! Every function here is pure: the result depends only on the payload and the
//! `now` instant passed in. Day classification uses UTC calendar dates and is
//! evaluated at read time, so an entry can move from "tomorrow" to "today" as
//! the clock passes midnight without any new poll.
//!
//! Ties resolve to the first matching entry in forecast order.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::model::{DerivedReading, ForecastPoint, Payload};

/// `now.uvi` verbatim. No timestamp is attached.
pub fn current(payload: &Payload, _now: DateTime<Utc>) -> DerivedReading {
    DerivedReading {
        value: payload.now.uvi,
        at: None,
    }
}

pub fn today_max(payload: &Payload, now: DateTime<Utc>) -> DerivedReading {
    max_for_day(&payload.forecast, today(now))
}

pub fn today_min(payload: &Payload, now: DateTime<Utc>) -> DerivedReading {
    min_positive_for_day(&payload.forecast, today(now))
}

pub fn tomorrow_max(payload: &Payload, now: DateTime<Utc>) -> DerivedReading {
    max_for_day(&payload.forecast, tomorrow(now))
}

pub fn tomorrow_min(payload: &Payload, now: DateTime<Utc>) -> DerivedReading {
    min_positive_for_day(&payload.forecast, tomorrow(now))
}

fn today(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

fn tomorrow(now: DateTime<Utc>) -> NaiveDate {
    (now + TimeDelta::days(1)).date_naive()
}

/// Entries with a known UV index whose UTC date is `day`.
fn known_values_for_day(
    forecast: &[ForecastPoint],
    day: NaiveDate,
) -> impl Iterator<Item = (&ForecastPoint, f64)> {
    forecast
        .iter()
        .filter(move |point| point.time.date_naive() == day)
        .filter_map(|point| point.uvi.map(|uvi| (point, uvi)))
}

/// Highest UV index of the day. Missing values never win; if the day has no
/// entries, or only missing ones, the reading is absent.
fn max_for_day(forecast: &[ForecastPoint], day: NaiveDate) -> DerivedReading {
    known_values_for_day(forecast, day)
        .fold(None::<(&ForecastPoint, f64)>, |best, (point, uvi)| match best {
            Some((_, best_uvi)) if uvi <= best_uvi => best,
            _ => Some((point, uvi)),
        })
        .map(|(point, _)| DerivedReading::from(point))
        .unwrap_or_default()
}

/// Lowest strictly positive UV index of the day. Zero and missing values are
/// night hours or gaps, not a minimum.
fn min_positive_for_day(forecast: &[ForecastPoint], day: NaiveDate) -> DerivedReading {
    known_values_for_day(forecast, day)
        .filter(|(_, uvi)| *uvi > 0.0)
        .fold(None::<(&ForecastPoint, f64)>, |best, (point, uvi)| match best {
            Some((_, best_uvi)) if uvi >= best_uvi => best,
            _ => Some((point, uvi)),
        })
        .map(|(point, _)| DerivedReading::from(point))
        .unwrap_or_default()
}
