//! Plain-text rendering of a view model. All rounding happens here.

use std::fmt::Write;

use chrono::Timelike;
use weathercast_core::ViewModel;

fn degrees(celsius: f64) -> String {
    format!("{}°", celsius.round() as i64)
}

pub fn render(vm: &ViewModel) -> String {
    let mut out = String::new();
    let c = &vm.current;

    let _ = writeln!(out, "{}", vm.location);
    let _ = writeln!(out, "{}  {}C  {}", vm.icon(), degrees(c.temperature_c), vm.description());
    let _ = writeln!(
        out,
        "Feels like {}C · Humidity {}% · Wind {} km/h · AQI {}",
        degrees(c.apparent_temperature_c),
        c.humidity_pct,
        c.wind_speed_kmh.round() as i64,
        c.aqi,
    );
    let _ = writeln!(out, "Theme: {}", vm.background());

    let _ = writeln!(out, "\nToday's forecast");
    for hour in &vm.hourly {
        let _ = writeln!(
            out,
            "  {:>5}  {}  {}",
            format!("{}:00", hour.time.hour()),
            hour.weather_code.icon(vm.is_day),
            degrees(hour.temperature_c),
        );
    }

    let _ = writeln!(out, "\n7-day forecast");
    for (i, day) in vm.daily.iter().enumerate() {
        let label = if i == 0 {
            "Today".to_string()
        } else {
            day.date.format("%a").to_string()
        };
        let _ = writeln!(
            out,
            "  {:<5}  {}  {:<13} {} / {}",
            label,
            day.weather_code.icon(true),
            day.weather_code.description(true),
            degrees(day.temperature_max_c),
            degrees(day.temperature_min_c),
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
    use weathercast_core::{CurrentConditions, DailyEntry, HourlyEntry, WeatherCode};

    fn view_model(is_day: bool) -> ViewModel {
        let start = NaiveDateTime::parse_from_str("2024-06-01T00:00", "%Y-%m-%dT%H:%M")
            .expect("valid time");
        let sunrise = DateTime::parse_from_rfc3339("2024-06-01T05:48:00+02:00")
            .expect("sunrise");
        let sunset = DateTime::parse_from_rfc3339("2024-06-01T21:47:00+02:00")
            .expect("sunset");

        ViewModel {
            location: "Paris".into(),
            current: CurrentConditions {
                temperature_c: 21.5,
                humidity_pct: 48,
                apparent_temperature_c: -0.4,
                wind_speed_kmh: 11.2,
                weather_code: WeatherCode(0),
                aqi: 37,
            },
            hourly: (0..6)
                .map(|i| HourlyEntry {
                    time: start + Duration::hours(i),
                    temperature_c: 14.0 + i as f64,
                    weather_code: WeatherCode(61),
                })
                .collect(),
            daily: vec![
                DailyEntry {
                    date: NaiveDate::from_ymd_opt(2024, 6, 1).expect("date"),
                    weather_code: WeatherCode(0),
                    temperature_max_c: 25.1,
                    temperature_min_c: 13.7,
                    sunrise,
                    sunset,
                },
                DailyEntry {
                    date: NaiveDate::from_ymd_opt(2024, 6, 2).expect("date"),
                    weather_code: WeatherCode(61),
                    temperature_max_c: 19.0,
                    temperature_min_c: 12.2,
                    sunrise: sunrise + Duration::days(1),
                    sunset: sunset + Duration::days(1),
                },
            ],
            is_day,
        }
    }

    #[test]
    fn renders_current_conditions_rounded() {
        let text = render(&view_model(true));

        assert!(text.starts_with("Paris\n"));
        assert!(text.contains("☀️  22°C  Sunny"));
        assert!(text.contains("Feels like 0°C"));
        assert!(text.contains("Humidity 48%"));
        assert!(text.contains("Wind 11 km/h"));
        assert!(text.contains("AQI 37"));
        assert!(text.contains("Theme: bg-clear-day"));
    }

    #[test]
    fn renders_hour_labels_and_day_names() {
        let text = render(&view_model(true));

        assert!(text.contains("0:00"));
        assert!(text.contains("5:00"));

        let days: Vec<&str> = text
            .lines()
            .skip_while(|line| *line != "7-day forecast")
            .skip(1)
            .collect();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0], "  Today  ☀️  Sunny         25° / 14°");
        assert_eq!(days[1], "  Sun    🌧️  Light rain    19° / 12°");
    }

    #[test]
    fn only_the_first_day_is_labelled_today() {
        let mut vm = view_model(true);
        vm.daily[0].weather_code = WeatherCode(3);
        let text = render(&vm);

        let labels: Vec<&str> = text
            .lines()
            .skip_while(|line| *line != "7-day forecast")
            .skip(1)
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        assert_eq!(labels, ["Today", "Sun"]);
    }

    #[test]
    fn night_uses_night_theme() {
        let text = render(&view_model(false));

        assert!(text.contains("🌙"));
        assert!(text.contains("Clear"));
        assert!(text.contains("Theme: bg-clear-night"));
    }
}
