//! Search orchestration: loading state, concurrent fetch, and result rendering.

use chrono::Local;

use crate::{
    DashboardError,
    client::WeatherApi,
    forecast,
    history::HistoryStore,
    model::{CurrentWeather, ForecastSample},
    render::View,
    storage::KeyValueStore,
};

/// Identifies one search attempt. Only the newest ticket's outcome is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub token: u64,
    pub city: String,
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub token: u64,
    pub result: Result<(CurrentWeather, Vec<ForecastSample>), DashboardError>,
}

/// What [`Dashboard::apply`] did with an outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Success,
    Failure(DashboardError),
    /// A newer search started after this one; the view was left untouched.
    Stale,
}

#[derive(Debug)]
pub struct Dashboard<A, S> {
    api: A,
    history: HistoryStore<S>,
    view: View,
    latest_token: u64,
}

impl<A: WeatherApi, S: KeyValueStore> Dashboard<A, S> {
    pub fn new(api: A, history: HistoryStore<S>) -> Self {
        let mut view = View::default();
        view.show_history(history.load());

        Self { api, history, view, latest_token: 0 }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// City to auto-load on startup, if anything was searched before.
    pub fn startup_city(&self) -> Option<String> {
        self.history.most_recent()
    }

    /// Search from free-text input. Blank input is ignored.
    pub async fn submit(&mut self, input: &str) -> Option<Applied> {
        let city = input.trim();
        if city.is_empty() {
            return None;
        }
        Some(self.search(city).await)
    }

    /// Search for a history entry, using its stored value verbatim.
    pub async fn select_history(&mut self, city: &str) -> Applied {
        self.search(city).await
    }

    pub async fn search(&mut self, city: &str) -> Applied {
        let ticket = self.begin(city);
        let outcome = self.fetch(&ticket).await;
        self.apply(outcome)
    }

    /// Enter the loading state and issue a ticket for a new attempt.
    pub fn begin(&mut self, city: &str) -> SearchTicket {
        self.latest_token += 1;
        self.view.show_loading(city);

        SearchTicket { token: self.latest_token, city: city.to_string() }
    }

    /// Run both lookups together; the first failure wins.
    pub async fn fetch(&self, ticket: &SearchTicket) -> SearchOutcome {
        let result = tokio::try_join!(
            self.api.fetch_current(&ticket.city),
            self.api.fetch_forecast(&ticket.city),
        );

        SearchOutcome { token: ticket.token, result }
    }

    pub fn apply(&mut self, outcome: SearchOutcome) -> Applied {
        if outcome.token != self.latest_token {
            tracing::warn!(
                token = outcome.token,
                latest = self.latest_token,
                "discarding result of superseded search"
            );
            return Applied::Stale;
        }

        match outcome.result {
            Ok((current, samples)) => {
                let city = current.city_name.clone();
                tracing::info!(city = %city, samples = samples.len(), "search succeeded");

                self.view.show_weather(current, Local::now());
                self.view.show_forecast(forecast::summarize(&samples));

                let cities = self.history.record(&city);
                self.view.show_history(cities);
                Applied::Success
            }
            Err(err) => {
                self.view.show_error(err.user_message());
                Applied::Failure(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render::CurrentPanel, storage::MemoryStore};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct FakeApi {
        fail_current: bool,
        fail_forecast: bool,
        /// Every city string either endpoint was called with.
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn note(&self, city: &str) {
            self.calls.lock().unwrap().push(city.to_string());
        }
    }

    fn weather(name: &str) -> CurrentWeather {
        CurrentWeather {
            city_name: name.into(),
            country_code: "JP".into(),
            temperature_f: 50.0,
            feels_like_f: 48.0,
            humidity_pct: 60,
            wind_speed_mph: 3.0,
            condition: "clear sky".into(),
            icon_id: "01d".into(),
        }
    }

    #[async_trait]
    impl WeatherApi for FakeApi {
        async fn fetch_current(&self, city: &str) -> Result<CurrentWeather, DashboardError> {
            self.note(city);
            if self.fail_current {
                return Err(DashboardError::NotFound);
            }
            // The API answers with a canonical spelling.
            let mut canonical = city.to_lowercase();
            if let Some(first) = canonical.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            Ok(weather(&canonical))
        }

        async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastSample>, DashboardError> {
            self.note(city);
            if self.fail_forecast {
                return Err(DashboardError::ForecastUnavailable);
            }
            let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
            Ok((0..16)
                .map(|i| ForecastSample {
                    timestamp: (day + chrono::Days::new(i / 8))
                        .and_hms_opt((i % 8) as u32 * 3, 0, 0)
                        .unwrap(),
                    temperature_f: 60.0,
                    feels_like_f: 59.0,
                    humidity_pct: 50,
                    condition: "few clouds".into(),
                    icon_id: "02d".into(),
                })
                .collect())
        }
    }

    fn dashboard(api: FakeApi) -> Dashboard<FakeApi, MemoryStore> {
        Dashboard::new(api, HistoryStore::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn success_renders_everything_and_records_canonical_name() {
        let mut dash = dashboard(FakeApi::default());

        let applied = dash.search("tOKYO").await;

        assert_eq!(applied, Applied::Success);
        assert!(matches!(
            &dash.view().current,
            CurrentPanel::Populated { weather, .. } if weather.city_name == "Tokyo"
        ));
        assert_eq!(dash.view().forecast.days.len(), 2);
        assert_eq!(dash.view().history.cities, vec!["Tokyo"]);
        assert_eq!(dash.startup_city().as_deref(), Some("Tokyo"));
    }

    #[tokio::test]
    async fn current_failure_wins_even_if_forecast_succeeds() {
        let mut dash = dashboard(FakeApi { fail_current: true, ..FakeApi::default() });

        let applied = dash.search("Nowhere").await;

        assert_eq!(applied, Applied::Failure(DashboardError::NotFound));
        assert_eq!(
            dash.view().current,
            CurrentPanel::Error { message: "City not found. Try another name.".into() }
        );
        assert!(dash.view().forecast.days.is_empty());
        assert!(dash.view().history.cities.is_empty());
    }

    #[tokio::test]
    async fn forecast_failure_fails_the_search() {
        let mut dash = dashboard(FakeApi { fail_forecast: true, ..FakeApi::default() });

        let applied = dash.search("Paris").await;

        assert_eq!(applied, Applied::Failure(DashboardError::ForecastUnavailable));
        assert!(dash.view().history.cities.is_empty());
    }

    #[tokio::test]
    async fn blank_submit_is_a_no_op() {
        let mut dash = dashboard(FakeApi::default());

        assert_eq!(dash.submit("   ").await, None);
        assert!(dash.api.calls().is_empty());
        assert_eq!(dash.view().current, CurrentPanel::Empty);
    }

    #[tokio::test]
    async fn submit_trims_input() {
        let mut dash = dashboard(FakeApi::default());

        assert_eq!(dash.submit("  lima \n").await, Some(Applied::Success));
        assert_eq!(dash.api.calls(), vec!["lima", "lima"]);
        assert_eq!(dash.view().history.cities, vec!["Lima"]);
    }

    #[tokio::test]
    async fn begin_shows_loading_and_clears_forecast() {
        let mut dash = dashboard(FakeApi::default());
        dash.search("Oslo").await;
        assert!(!dash.view().forecast.days.is_empty());

        let ticket = dash.begin("Rome");

        assert_eq!(dash.view().current, CurrentPanel::Loading { city: "Rome".into() });
        assert!(dash.view().forecast.days.is_empty());
        assert_eq!(ticket.city, "Rome");
    }

    #[tokio::test]
    async fn stale_completion_is_discarded() {
        let mut dash = dashboard(FakeApi::default());

        let first = dash.begin("Paris");
        let second = dash.begin("Tokyo");

        let newer = dash.fetch(&second).await;
        assert_eq!(dash.apply(newer), Applied::Success);

        let older = dash.fetch(&first).await;
        assert_eq!(dash.apply(older), Applied::Stale);

        assert!(matches!(
            &dash.view().current,
            CurrentPanel::Populated { weather, .. } if weather.city_name == "Tokyo"
        ));
        assert_eq!(dash.view().history.cities, vec!["Tokyo"]);
    }

    #[tokio::test]
    async fn existing_history_is_rendered_on_startup() {
        let mut store = MemoryStore::new();
        store.set(crate::history::STORAGE_KEY, r#"["Cairo","Lagos"]"#).unwrap();

        let dash = Dashboard::new(FakeApi::default(), HistoryStore::new(store));

        assert_eq!(dash.view().history.cities, vec!["Cairo", "Lagos"]);
        assert_eq!(dash.startup_city().as_deref(), Some("Cairo"));
    }

    #[tokio::test]
    async fn history_selection_uses_stored_value() {
        let mut store = MemoryStore::new();
        store.set(crate::history::STORAGE_KEY, r#"["Tokyo"," São Paulo "]"#).unwrap();
        let mut dash = Dashboard::new(FakeApi::default(), HistoryStore::new(store));

        assert_eq!(dash.select_history(" São Paulo ").await, Applied::Success);

        assert_eq!(dash.api.calls(), vec![" São Paulo ", " São Paulo "]);
        assert_eq!(dash.view().history.cities, vec!["Tokyo", " São Paulo "]);
    }
}
