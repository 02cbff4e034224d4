use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    DashboardError,
    model::{CurrentWeather, ForecastSample},
};

use super::WeatherApi;

/// Measurement system requested from the API: °F and mph.
const UNITS: &str = "imperial";
const DEFAULT_ICON: &str = "01d";
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, city: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%url, city, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", UNITS)])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {endpoint} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                endpoint,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {endpoint} JSON"))
    }

    async fn current(&self, city: &str) -> Result<CurrentWeather> {
        let parsed: OwCurrentResponse = self.get_json("weather", city).await?;
        let (condition, icon_id) = first_condition(&parsed.weather);

        Ok(CurrentWeather {
            city_name: parsed.name,
            country_code: parsed.sys.and_then(|s| s.country).unwrap_or_default(),
            temperature_f: parsed.main.temp,
            feels_like_f: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed_mph: parsed.wind.speed,
            condition,
            icon_id,
        })
    }

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastSample>> {
        let parsed: OwForecastResponse = self.get_json("forecast", city).await?;

        parsed
            .list
            .into_iter()
            .map(|entry| {
                let timestamp = NaiveDateTime::parse_from_str(&entry.dt_txt, DT_TXT_FORMAT)
                    .with_context(|| format!("Invalid forecast timestamp '{}'", entry.dt_txt))?;
                let (condition, icon_id) = first_condition(&entry.weather);

                Ok(ForecastSample {
                    timestamp,
                    temperature_f: entry.main.temp,
                    feels_like_f: entry.main.feels_like,
                    humidity_pct: entry.main.humidity,
                    condition,
                    icon_id,
                })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: Option<OwSys>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[async_trait]
impl WeatherApi for OpenWeatherClient {
    async fn fetch_current(&self, city: &str) -> Result<CurrentWeather, DashboardError> {
        self.current(city).await.map_err(|err| {
            tracing::debug!(city, error = %format!("{err:#}"), "current conditions lookup failed");
            DashboardError::NotFound
        })
    }

    async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastSample>, DashboardError> {
        self.forecast(city).await.map_err(|err| {
            tracing::debug!(city, error = %format!("{err:#}"), "forecast lookup failed");
            DashboardError::ForecastUnavailable
        })
    }
}

fn first_condition(weather: &[OwWeather]) -> (String, String) {
    let first = weather.first();
    let description = first.and_then(|w| w.description.clone()).unwrap_or_default();
    let icon = first
        .and_then(|w| w.icon.clone())
        .unwrap_or_else(|| DEFAULT_ICON.to_string());
    (description, icon)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
