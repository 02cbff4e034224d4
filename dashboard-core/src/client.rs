use crate::{
    Config, DashboardError,
    client::openweather::OpenWeatherClient,
    model::{CurrentWeather, ForecastSample},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// The two read endpoints a dashboard search needs.
///
/// Both calls are independent and may run concurrently.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    async fn fetch_current(&self, city: &str) -> Result<CurrentWeather, DashboardError>;

    /// Raw 3-hour samples, in the order the API returned them.
    async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastSample>, DashboardError>;
}

/// Construct the OpenWeather client from config.
///
/// Fails with [`DashboardError::ConfigurationMissing`] before any network
/// call when no usable API key is configured.
pub fn client_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.api_key()?;
    OpenWeatherClient::new(api_key, config.base_url())
}
