//! Folding interval forecast records into one entry per calendar day.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use std::collections::HashMap;

use crate::model::{ForecastEntry, ForecastRecord};

/// Number of calendar days shown, today included.
pub const FORECAST_DAYS: i64 = 7;

struct DayAccumulator {
    max_temp: f64,
    min_temp: f64,
    latest: DateTime<Utc>,
    icon: String,
    description: String,
}

impl DayAccumulator {
    fn seed(record: &ForecastRecord) -> Self {
        Self {
            max_temp: record.temp_max,
            min_temp: record.temp_min,
            latest: record.timestamp,
            icon: record.icon.clone(),
            description: record.description.clone(),
        }
    }

    fn absorb(&mut self, record: &ForecastRecord) {
        self.max_temp = self.max_temp.max(record.temp_max);
        self.min_temp = self.min_temp.min(record.temp_min);

        if record.timestamp > self.latest {
            self.latest = record.timestamp;
            self.icon = record.icon.clone();
            self.description = record.description.clone();
        }
    }
}

/// Group `records` by their calendar date in `tz` and keep the days in
/// `today ..= today + 6`. The representative icon and description come from
/// the latest record of each day, whatever order the input is in.
pub fn aggregate_daily<Tz: TimeZone>(
    records: &[ForecastRecord],
    today: NaiveDate,
    tz: &Tz,
) -> Vec<ForecastEntry> {
    let mut days: HashMap<NaiveDate, DayAccumulator> = HashMap::new();

    for record in records {
        let date = record.timestamp.with_timezone(tz).date_naive();
        days.entry(date)
            .and_modify(|acc| acc.absorb(record))
            .or_insert_with(|| DayAccumulator::seed(record));
    }

    (0..FORECAST_DAYS)
        .map(|offset| today + Duration::days(offset))
        .filter_map(|date| {
            let acc = days.remove(&date)?;
            Some(ForecastEntry {
                date,
                label: day_label(date, today),
                max_temp: acc.max_temp,
                min_temp: acc.min_temp,
                icon: acc.icon,
                description: acc.description,
            })
        })
        .collect()
}

fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        return "Today".to_string();
    }

    match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
    .to_string()
}
