use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Current conditions for a city, as reported by the weather API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Canonical city name echoed back by the API.
    pub city_name: String,
    pub country_code: String,
    pub temperature_f: f64,
    pub feels_like_f: f64,
    pub humidity_pct: u8,
    pub wind_speed_mph: f64,
    pub condition: String,
    pub icon_id: String,
}

/// One 3-hour forecast data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// API-server local time.
    pub timestamp: NaiveDateTime,
    pub temperature_f: f64,
    pub feels_like_f: f64,
    pub humidity_pct: u8,
    pub condition: String,
    pub icon_id: String,
}

impl ForecastSample {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }
}

/// At most five samples, one per calendar day, in chronological order.
pub type ForecastSummary = Vec<ForecastSample>;

/// Previously searched city names, most recent first.
pub type HistoryList = Vec<String>;
