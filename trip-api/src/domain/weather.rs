use serde::{Deserialize, Serialize};
use time::Date;

use super::iso_date;

/// One day of the trip forecast. Temperatures are in Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecastDay {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub summary: String,
    pub temp_max: f64,
    pub temp_min: f64,
    /// Probability of precipitation, 0-100.
    pub precip_prob: i32,
    pub advice: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripWeather {
    pub city: String,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
    pub days: Vec<WeatherForecastDay>,
}
