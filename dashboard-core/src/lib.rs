//! Core library for the weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client (current conditions and 5-day forecast)
//! - Forecast day-bucketing and search history
//! - HTML rendering of the dashboard regions and the search orchestration
//!
//! It is used by `dashboard-cli`, but can also be embedded in other front ends.

pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod history;
pub mod model;
pub mod render;
pub mod storage;

pub use client::{WeatherApi, client_from_config, openweather::OpenWeatherClient};
pub use config::Config;
pub use dashboard::{Applied, Dashboard, SearchOutcome, SearchTicket};
pub use error::DashboardError;
pub use history::HistoryStore;
pub use model::{CurrentWeather, ForecastSample, ForecastSummary, HistoryList};
pub use render::{Markup, View};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
