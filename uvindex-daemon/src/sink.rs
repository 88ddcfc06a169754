use uvindex_core::{
    Reading, ReadingDescriptor, ReadingSink,
    readings::{SUGGESTED_DISPLAY_PRECISION, TIME_ATTRIBUTE},
};

/// Sink that renders each reading as a log line.
#[derive(Debug, Clone, Copy)]
pub struct LogSink;

impl LogSink {
    pub fn render(reading: &Reading) -> String {
        let descriptor = reading.descriptor();
        let value = match reading.value {
            Some(v) => format!("{:.*}", usize::from(SUGGESTED_DISPLAY_PRECISION), v),
            None => "unknown".to_string(),
        };

        match reading.attributes().get(TIME_ATTRIBUTE) {
            Some(time) => format!("{}: {} ({} {})", descriptor.name, value, TIME_ATTRIBUTE, time),
            None => format!("{}: {}", descriptor.name, value),
        }
    }
}

impl ReadingSink for LogSink {
    fn publish(&self, reading: &Reading) {
        tracing::info!(
            unique_id = %reading.unique_id,
            icon = reading.descriptor().icon,
            "{}",
            Self::render(reading)
        );
    }

    fn unavailable(&self, descriptor: &ReadingDescriptor, unique_id: &str) {
        tracing::info!(unique_id, "{}: unavailable", descriptor.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use uvindex_core::ReadingKind;

    #[test]
    fn render_includes_time_for_min_max() {
        let at = DateTime::parse_from_rfc3339("2025-08-26T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let reading = Reading {
            unique_id: "home_today_max".into(),
            kind: ReadingKind::TodayMax,
            value: Some(5.14),
            at: Some(at),
        };

        assert_eq!(
            LogSink::render(&reading),
            "Today Max UV Index: 5.1 (time 2025-08-26T12:00:00+00:00)"
        );
    }

    #[test]
    fn render_missing_value() {
        let reading = Reading {
            unique_id: "home_current".into(),
            kind: ReadingKind::Current,
            value: None,
            at: None,
        };

        assert_eq!(LogSink::render(&reading), "Current UV Index: unknown");
    }
}
