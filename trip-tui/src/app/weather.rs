use trip_api::{TripWeather, WeatherForecastDay};

pub const WEATHER_ERROR: &str = "Could not load the weather forecast.";

/// Forecast state for the open trip. Fetched once, on first visit to the tab.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WeatherState {
    #[default]
    NotLoaded,
    Loading,
    Loaded(TripWeather),
    Failed,
}

impl WeatherState {
    /// Only a tab that has never asked for the forecast triggers a fetch.
    pub fn needs_fetch(&self) -> bool {
        matches!(self, WeatherState::NotLoaded)
    }

    pub fn forecast(&self) -> Option<&TripWeather> {
        match self {
            WeatherState::Loaded(weather) => Some(weather),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainBand {
    Low,
    Moderate,
    High,
}

impl RainBand {
    pub fn from_probability(precip_prob: i32) -> Self {
        if precip_prob >= 70 {
            RainBand::High
        } else if precip_prob >= 40 {
            RainBand::Moderate
        } else {
            RainBand::Low
        }
    }
}

pub fn to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn format_fahrenheit(celsius: f64) -> String {
    format!("{:.0}°F", to_fahrenheit(celsius))
}

/// Short packing hint shown next to each forecast day. Freezing nights win
/// over hot afternoons, matching the backend's advice.
pub fn travel_tip(day: &WeatherForecastDay) -> &'static str {
    if day.temp_min <= 2.0 {
        "Bundle up, it will be freezing"
    } else if day.temp_max >= 32.0 {
        "Stay hydrated and plan shade breaks"
    } else {
        match RainBand::from_probability(day.precip_prob) {
            RainBand::High => "Plan indoor activities",
            RainBand::Moderate => "Pack an umbrella",
            RainBand::Low => "Great day for sightseeing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn day(max: f64, min: f64, precip: i32) -> WeatherForecastDay {
        WeatherForecastDay {
            date: date!(2024 - 05 - 01),
            summary: "Clear".to_string(),
            temp_max: max,
            temp_min: min,
            precip_prob: precip,
            advice: String::new(),
        }
    }

    #[test]
    fn rain_bands_split_at_forty_and_seventy() {
        assert_eq!(RainBand::from_probability(0), RainBand::Low);
        assert_eq!(RainBand::from_probability(39), RainBand::Low);
        assert_eq!(RainBand::from_probability(40), RainBand::Moderate);
        assert_eq!(RainBand::from_probability(69), RainBand::Moderate);
        assert_eq!(RainBand::from_probability(70), RainBand::High);
        assert_eq!(RainBand::from_probability(100), RainBand::High);
    }

    #[test]
    fn celsius_converts_to_fahrenheit() {
        assert_eq!(to_fahrenheit(0.0), 32.0);
        assert_eq!(to_fahrenheit(100.0), 212.0);
        assert_eq!(to_fahrenheit(-40.0), -40.0);
        assert_eq!(format_fahrenheit(21.0), "70°F");
    }

    #[test]
    fn temperature_extremes_override_rain_tip() {
        assert_eq!(travel_tip(&day(20.0, 12.0, 80)), "Plan indoor activities");
        assert_eq!(travel_tip(&day(20.0, 12.0, 45)), "Pack an umbrella");
        assert_eq!(travel_tip(&day(34.0, 22.0, 80)), "Stay hydrated and plan shade breaks");
        assert_eq!(travel_tip(&day(5.0, -1.0, 10)), "Bundle up, it will be freezing");
    }

    #[test]
    fn freezing_night_beats_hot_afternoon() {
        let desert = day(33.0, 1.0, 0);
        assert_eq!(travel_tip(&desert), "Bundle up, it will be freezing");
    }

    #[test]
    fn only_untouched_state_needs_fetch() {
        assert!(WeatherState::NotLoaded.needs_fetch());
        assert!(!WeatherState::Loading.needs_fetch());
        assert!(!WeatherState::Failed.needs_fetch());
    }
}
