use thiserror::Error;

/// Errors surfaced by a dashboard search.
///
/// The `Display` text of each variant is what the user sees in the
/// current-weather region, so keep it short and actionable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// The current-conditions lookup failed.
    #[error("City not found. Try another name.")]
    NotFound,

    /// The 5-day forecast lookup failed.
    #[error("Could not fetch forecast. Try again later.")]
    ForecastUnavailable,

    /// No usable API key; raised before any request is sent.
    #[error(
        "No OpenWeather API key configured.\n\
         Hint: run `weather-dashboard configure` or set OPENWEATHER_API_KEY."
    )]
    ConfigurationMissing,

    /// Persisted history could not be decoded. Never reaches the user:
    /// the history store degrades to an empty list instead.
    #[error("Persisted history is malformed: {0}")]
    MalformedPersistedState(String),
}

impl DashboardError {
    /// Message to show in the results region.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_carry_user_facing_text() {
        assert_eq!(
            DashboardError::NotFound.user_message(),
            "City not found. Try another name."
        );
        assert_eq!(
            DashboardError::ForecastUnavailable.user_message(),
            "Could not fetch forecast. Try again later."
        );
    }

    #[test]
    fn configuration_missing_mentions_configure_command() {
        let msg = DashboardError::ConfigurationMissing.to_string();
        assert!(msg.contains("weather-dashboard configure"));
    }
}
