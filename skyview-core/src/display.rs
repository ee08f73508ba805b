//! Text for the current-conditions panel and the forecast cards.

use chrono::{DateTime, TimeZone};

use crate::model::{CurrentConditions, ForecastEntry, Units};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

pub fn icon_url(icon: &str) -> String {
    format!("{ICON_BASE_URL}/{icon}@2x.png")
}

/// Nearest whole degree; halves round up, so -2.5 shows as -2.
pub fn round_temperature(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Wind in display units, rounded.
pub fn display_wind_speed(native: f64, units: Units) -> i64 {
    (native * units.wind_factor()).round() as i64
}

/// "Monday, October 19, 2026"
pub fn format_long_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%A, %B %-d, %Y").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPanel {
    pub location: String,
    pub date: String,
    pub icon_url: String,
    pub description: String,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind_speed: String,
}

impl CurrentPanel {
    pub fn new(current: &CurrentConditions, units: Units, date: String) -> Self {
        let location = if current.country.is_empty() {
            current.location_name.clone()
        } else {
            format!("{}, {}", current.location_name, current.country)
        };
        let suffix = units.temperature_suffix();

        Self {
            location,
            date,
            icon_url: icon_url(&current.icon),
            description: current.description.clone(),
            temperature: format!("{}{suffix}", round_temperature(current.temperature)),
            feels_like: format!("{}{suffix}", round_temperature(current.feels_like)),
            humidity: format!("{}%", current.humidity_pct),
            wind_speed: format!(
                "{} {}",
                display_wind_speed(current.wind_speed, units),
                units.wind_label()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastCard {
    pub day: String,
    pub icon_url: String,
    pub description: String,
    pub high: String,
    pub low: String,
}

impl From<&ForecastEntry> for ForecastCard {
    fn from(entry: &ForecastEntry) -> Self {
        Self {
            day: entry.label.clone(),
            icon_url: icon_url(&entry.icon),
            description: entry.description.clone(),
            high: format!("{}°", round_temperature(entry.max_temp)),
            low: format!("{}°", round_temperature(entry.min_temp)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    fn current() -> CurrentConditions {
        CurrentConditions {
            location_name: "Paris".into(),
            country: "FR".into(),
            condition: "Clouds".into(),
            description: "broken clouds".into(),
            icon: "04d".into(),
            temperature: 71.5,
            feels_like: 70.49,
            humidity_pct: 63,
            wind_speed: 10.0,
        }
    }

    #[test]
    fn metric_wind_uses_fixed_factor() {
        assert_eq!(display_wind_speed(10.0, Units::Metric), 36);
    }

    #[test]
    fn wind_rounds_both_ways() {
        // 4.4 * 3.6 = 15.84 -> 16, 4.3 * 3.6 = 15.48 -> 15
        assert_eq!(display_wind_speed(4.4, Units::Metric), 16);
        assert_eq!(display_wind_speed(4.3, Units::Metric), 15);
        assert_eq!(display_wind_speed(7.6, Units::Imperial), 8);
        assert_eq!(display_wind_speed(7.4, Units::Imperial), 7);
    }

    #[test]
    fn temperatures_round_to_whole_degrees() {
        assert_eq!(round_temperature(71.5), 72);
        assert_eq!(round_temperature(70.49), 70);
        assert_eq!(round_temperature(-3.2), -3);
        assert_eq!(round_temperature(-2.5), -2);
        assert_eq!(round_temperature(-2.51), -3);
    }

    #[test]
    fn current_panel_fields() {
        let panel = CurrentPanel::new(&current(), Units::Imperial, "today".into());

        assert_eq!(panel.location, "Paris, FR");
        assert_eq!(panel.temperature, "72°F");
        assert_eq!(panel.feels_like, "70°F");
        assert_eq!(panel.humidity, "63%");
        assert_eq!(panel.wind_speed, "10 mph");
        assert_eq!(panel.icon_url, "https://openweathermap.org/img/wn/04d@2x.png");
    }

    #[test]
    fn current_panel_metric_wind() {
        let panel = CurrentPanel::new(&current(), Units::Metric, String::new());
        assert_eq!(panel.wind_speed, "36 km/h");
        assert_eq!(panel.temperature, "72°C");
    }

    #[test]
    fn location_without_country() {
        let mut c = current();
        c.country.clear();
        assert_eq!(CurrentPanel::new(&c, Units::Imperial, String::new()).location, "Paris");
    }

    #[test]
    fn long_date_format() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let date = tz.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        assert_eq!(format_long_date(&date), "Monday, October 19, 2026");
    }

    #[test]
    fn forecast_card_from_entry() {
        let entry = ForecastEntry {
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            label: "Tue".into(),
            max_temp: 64.6,
            min_temp: 50.4,
            icon: "10d".into(),
            description: "light rain".into(),
        };

        let card = ForecastCard::from(&entry);
        assert_eq!(card.day, "Tue");
        assert_eq!(card.high, "65°");
        assert_eq!(card.low, "50°");
        assert_eq!(card.icon_url, "https://openweathermap.org/img/wn/10d@2x.png");
    }
}
