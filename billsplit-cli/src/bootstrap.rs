use billsplit_application::BillRepository;
use billsplit_infrastructure::{CachedBillRepository, JsonFileBillRepository};
use std::{env, path::PathBuf};
use tracing_subscriber::EnvFilter;

const DEFAULT_DATA_DIR: &str = "./bills";
const DEFAULT_CURRENCY: &str = "THB";
const DEFAULT_LOG_FILTER: &str = "billsplit=info";
/// Lives next to the cached bills. The leading dot keeps it out of the bill id space.
const SYNC_JOURNAL: &str = ".pending.json";

/// Application configuration read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    /// When set, bills are written to this directory first and synced to
    /// `data_dir`. Unsynced bills are retried on their next read.
    pub cache_dir: Option<PathBuf>,
    pub currency: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).filter(|raw| !raw.trim().is_empty());
        Self {
            data_dir: value("BILLSPLIT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            cache_dir: value("BILLSPLIT_CACHE_DIR").map(PathBuf::from),
            currency: value("BILLSPLIT_CURRENCY")
                .map(|code| code.trim().to_ascii_uppercase())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        }
    }

    pub fn build_repository(&self) -> Box<dyn BillRepository> {
        let primary = JsonFileBillRepository::new(&self.data_dir);
        match &self.cache_dir {
            Some(cache_dir) => Box::new(
                CachedBillRepository::new(primary, JsonFileBillRepository::new(cache_dir))
                    .with_journal(cache_dir.join(SYNC_JOURNAL)),
            ),
            None => Box::new(primary),
        }
    }
}

/// Initialize logging and tracing. Output goes to stderr so command output stays
/// pipeable.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
