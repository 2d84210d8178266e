use campus_placement::config::StorageConfig;
use campus_placement::error::AppError;
use campus_placement::workflows::placement::{
    Actor, InMemoryPlacementStore, PlacementReader, PlacementService, PlacementServiceError,
    PlacementStore, PlacementTx, RepositoryError, SqlitePlacementStore,
};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// The store picked by `APP_DATABASE_PATH`: SQLite when a path is set, process
/// memory otherwise.
pub(crate) enum ConfiguredStore {
    Memory(InMemoryPlacementStore),
    Sqlite(SqlitePlacementStore),
}

impl ConfiguredStore {
    pub(crate) fn open(config: &StorageConfig) -> Result<Self, RepositoryError> {
        match &config.database_path {
            Some(path) => {
                let store = SqlitePlacementStore::open(path)?;
                tracing::info!(path = %path.display(), "using sqlite placement store");
                Ok(Self::Sqlite(store))
            }
            None => {
                tracing::warn!("APP_DATABASE_PATH not set; placement data lives in memory only");
                Ok(Self::Memory(InMemoryPlacementStore::new()))
            }
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Sqlite(_) => "sqlite",
        }
    }
}

impl PlacementStore for ConfiguredStore {
    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn PlacementTx) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        match self {
            Self::Memory(store) => store.transaction(work),
            Self::Sqlite(store) => store.transaction(work),
        }
    }

    fn read<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&dyn PlacementReader) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        match self {
            Self::Memory(store) => store.read(work),
            Self::Sqlite(store) => store.read(work),
        }
    }
}

/// Looks up the account a CLI command acts as. Role checks stay with the service.
pub(crate) fn actor_for_username<S>(
    service: &PlacementService<S>,
    username: &str,
) -> Result<Actor, AppError>
where
    S: PlacementStore + 'static,
{
    let account = service
        .store()
        .read(|reader| reader.account_by_username(username.trim()))?
        .ok_or(PlacementServiceError::Unauthenticated)?;
    Ok(Actor::new(account.id, account.role))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
