use chrono::Local;
use std::io::{self, Write};

use skyview_core::{
    Activity, Screen, View, ViewState, WeatherReport,
    display::{CurrentPanel, ForecastCard, format_long_date},
};

/// Prints every rendered state: panels to `out`, progress and errors to `err`.
pub struct TerminalView {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}

impl TerminalView {
    pub fn new(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self { out, err }
    }

    fn draw(&mut self, state: &ViewState) -> io::Result<()> {
        match &state.screen {
            Screen::AwaitingCredential { error: None } => {
                writeln!(self.err, "Enter your OpenWeatherMap API key to get started.")
            }
            Screen::AwaitingCredential { error: Some(msg) }
            | Screen::Ready(Activity::ShowingError(msg)) => writeln!(self.err, "error: {msg}"),
            Screen::Ready(Activity::Idle) => Ok(()),
            Screen::Ready(Activity::Loading) => writeln!(self.err, "Loading weather..."),
            Screen::Ready(Activity::ShowingResult(report)) => {
                write!(self.out, "{}", format_report(report))?;
                self.out.flush()
            }
        }
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stderr()))
    }
}

impl std::fmt::Debug for TerminalView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalView").finish_non_exhaustive()
    }
}

impl View for TerminalView {
    fn render(&mut self, state: &ViewState) {
        if let Err(err) = self.draw(state) {
            tracing::debug!(error = %err, "terminal write failed");
        }
    }
}

pub fn format_report(report: &WeatherReport) -> String {
    let date = format_long_date(&report.fetched_at.with_timezone(&Local));
    let panel = CurrentPanel::new(&report.current, report.units, date);

    let mut out = String::new();
    out.push_str(&format!("\n{} | {}\n", panel.location, panel.date));
    out.push_str(&format!("{} [{}]\n", panel.description, report.theme.as_str()));
    out.push_str(&format!("  Temperature  {} (feels like {})\n", panel.temperature, panel.feels_like));
    out.push_str(&format!("  Humidity     {}\n", panel.humidity));
    out.push_str(&format!("  Wind         {}\n", panel.wind_speed));
    out.push_str(&format!("  Icon         {}\n", panel.icon_url));

    if !report.forecast.is_empty() {
        out.push_str("\nForecast\n");
        for card in report.forecast.iter().map(ForecastCard::from) {
            out.push_str(&format!(
                "  {:<6} {:>5} / {:<5} {}\n",
                card.day, card.high, card.low, card.description
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use skyview_core::{CurrentConditions, ForecastEntry, Theme, Units};
    use std::sync::{Arc, Mutex};

    fn report() -> WeatherReport {
        WeatherReport {
            current: CurrentConditions {
                location_name: "Paris".into(),
                country: "FR".into(),
                condition: "Clear".into(),
                description: "clear sky".into(),
                icon: "01d".into(),
                temperature: 20.4,
                feels_like: 19.6,
                humidity_pct: 48,
                wind_speed: 3.0,
            },
            forecast: vec![ForecastEntry {
                date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
                label: "Today".into(),
                max_temp: 22.5,
                min_temp: 11.2,
                icon: "01d".into(),
                description: "clear sky".into(),
            }],
            theme: Theme::Clear,
            units: Units::Metric,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn report_lists_current_and_forecast() {
        let out = format_report(&report());

        assert!(out.contains("Paris, FR"));
        assert!(out.contains("clear sky [clear]"));
        assert!(out.contains("20°C (feels like 20°C)"));
        assert!(out.contains("Wind         11 km/h"));
        assert!(out.contains("Today"));
        assert!(out.contains("23°"));
        assert!(out.contains("11°"));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured_view() -> (TerminalView, Captured, Captured) {
        let (out, err) = (Captured::default(), Captured::default());
        (TerminalView::new(Box::new(out.clone()), Box::new(err.clone())), out, err)
    }

    #[test]
    fn repeated_error_is_printed_each_time() {
        let (mut view, _out, err) = captured_view();
        let state = ViewState {
            screen: Screen::AwaitingCredential {
                error: Some("API key appears to be too short.".into()),
            },
            ..ViewState::default()
        };

        view.render(&state);
        view.render(&state);

        assert_eq!(err.text().matches("error: API key appears to be too short.").count(), 2);
    }

    #[test]
    fn result_goes_to_stdout() {
        let (mut view, out, err) = captured_view();
        let state = ViewState {
            screen: Screen::Ready(Activity::ShowingResult(Box::new(report()))),
            ..ViewState::default()
        };

        view.render(&state);

        assert!(out.text().contains("Paris, FR"));
        assert!(err.text().is_empty());
    }
}
