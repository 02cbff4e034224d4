use crate::{error::DashboardError, model::HistoryList, storage::KeyValueStore};

pub const STORAGE_KEY: &str = "weatherDashboardHistory";
pub const MAX_ENTRIES: usize = 8;

/// Bounded, case-insensitively deduplicated list of searched cities.
#[derive(Debug)]
pub struct HistoryStore<S> {
    store: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Current history. Missing or corrupt state degrades to an empty list,
    /// and whatever was persisted is held to the dedup and size limits.
    pub fn load(&self) -> HistoryList {
        let Some(raw) = self.store.get(STORAGE_KEY) else {
            return Vec::new();
        };

        match decode(&raw) {
            Ok(list) => normalize(list),
            Err(err) => {
                tracing::debug!(error = %err, "ignoring persisted history");
                Vec::new()
            }
        }
    }

    /// Record a successful search and persist the result.
    ///
    /// An existing case-insensitive match is left where it is.
    pub fn record(&mut self, city: &str) -> HistoryList {
        let mut history = self.load();

        let exists = history.iter().any(|c| same_city(c, city));
        if !exists {
            history.insert(0, city.to_string());
        }
        history.truncate(MAX_ENTRIES);

        match serde_json::to_string(&history) {
            Ok(encoded) => {
                if let Err(err) = self.store.set(STORAGE_KEY, &encoded) {
                    tracing::warn!(error = %err, "failed to persist search history");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to encode search history"),
        }

        history
    }

    pub fn most_recent(&self) -> Option<String> {
        self.load().into_iter().next()
    }
}

/// Drop later case-insensitive duplicates, then cap the length.
fn normalize(list: HistoryList) -> HistoryList {
    let mut out: HistoryList = Vec::with_capacity(list.len().min(MAX_ENTRIES));
    for city in list {
        if !out.iter().any(|c| same_city(c, &city)) {
            out.push(city);
        }
    }
    out.truncate(MAX_ENTRIES);
    out
}

fn same_city(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn decode(raw: &str) -> Result<HistoryList, DashboardError> {
    serde_json::from_str::<Vec<String>>(raw)
        .map_err(|e| DashboardError::MalformedPersistedState(e.to_string()))
}
