use crate::model::{CurrentConditions, Forecast, HOURLY_LIMIT, ViewModel};

/// Join a forecast, an AQI reading and the day/night flag into a view model.
///
/// Pure: equal inputs give equal view models.
pub fn assemble(label: &str, forecast: Forecast, aqi: u32, is_day: bool) -> ViewModel {
    let Forecast {
        current,
        mut hourly,
        daily,
    } = forecast;
    hourly.truncate(HOURLY_LIMIT);

    ViewModel {
        location: label.to_string(),
        current: CurrentConditions::new(current, aqi),
        hourly,
        daily,
        is_day,
    }
}
