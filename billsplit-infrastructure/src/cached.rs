use billsplit_application::{BillRepository, RepositoryError};
use billsplit_domain::{Bill, BillId};
use indexmap::IndexSet;
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

/// A primary store fronted by a local copy.
///
/// Writes land in the local copy first and are then pushed to the primary. A
/// failed push is logged, the local write still counts, and the bill is marked
/// as pending. Reading a pending bill retries the push and serves the local copy,
/// so offline edits are never replaced by an older primary copy. Other reads
/// prefer the primary and refresh the local copy, falling back to it when the
/// primary cannot be reached.
pub struct CachedBillRepository<P, C> {
    primary: P,
    cache: C,
    pending: Mutex<IndexSet<BillId>>,
    journal: Option<PathBuf>,
}

impl<P, C> CachedBillRepository<P, C>
where
    P: BillRepository,
    C: BillRepository,
{
    pub fn new(primary: P, cache: C) -> Self {
        Self {
            primary,
            cache,
            pending: Mutex::default(),
            journal: None,
        }
    }

    /// Keeps the pending list in a JSON file at `path` so unsynced bills are
    /// retried after a restart.
    pub fn with_journal(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let pending = read_journal(&path);
        if !pending.is_empty() {
            tracing::debug!(count = pending.len(), "Restored pending syncs");
        }
        self.pending = Mutex::new(pending);
        self.journal = Some(path);
        self
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Bills whose latest local write has not reached the primary yet.
    pub fn pending(&self) -> Result<Vec<BillId>, RepositoryError> {
        Ok(self.lock_pending()?.iter().cloned().collect())
    }

    fn lock_pending(&self) -> Result<MutexGuard<'_, IndexSet<BillId>>, RepositoryError> {
        self.pending.lock().map_err(|_| {
            RepositoryError::Unavailable("pending sync list lock poisoned".to_string())
        })
    }

    fn set_pending(&self, id: &BillId, pending: bool) -> Result<(), RepositoryError> {
        let mut ids = self.lock_pending()?;
        let changed = if pending {
            ids.insert(id.clone())
        } else {
            ids.shift_remove(id)
        };
        match &self.journal {
            Some(path) if changed => write_journal(path, &ids),
            _ => Ok(()),
        }
    }

    /// Pushes the local copy of a pending bill and returns it. `None` when the
    /// local copy is gone.
    fn sync_pending(&self, id: &BillId) -> Result<Option<Bill>, RepositoryError> {
        let bill = match self.cache.load(id) {
            Ok(bill) => bill,
            Err(RepositoryError::NotFound(_)) => {
                tracing::warn!(bill_id = %id, "Pending bill missing from local copy");
                self.set_pending(id, false)?;
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        match self.primary.save(&bill) {
            Ok(()) => {
                self.set_pending(id, false)?;
                tracing::info!(bill_id = %id, "Synced offline changes to primary store");
            }
            Err(err) => tracing::warn!(
                bill_id = %id,
                error = %err,
                "Primary store still unreachable, serving local copy"
            ),
        }
        Ok(Some(bill))
    }
}

impl<P, C> BillRepository for CachedBillRepository<P, C>
where
    P: BillRepository,
    C: BillRepository,
{
    fn load(&self, id: &BillId) -> Result<Bill, RepositoryError> {
        let pending = self.lock_pending()?.contains(id);
        if pending {
            if let Some(bill) = self.sync_pending(id)? {
                return Ok(bill);
            }
        }

        match self.primary.load(id) {
            Ok(bill) => {
                if let Err(err) = self.cache.save(&bill) {
                    tracing::warn!(bill_id = %id, error = %err, "Failed to refresh local copy");
                }
                Ok(bill)
            }
            Err(err @ (RepositoryError::Unavailable(_) | RepositoryError::Io(_))) => {
                tracing::warn!(
                    bill_id = %id,
                    error = %err,
                    "Primary store unreachable, serving local copy"
                );
                self.cache.load(id)
            }
            Err(err) => Err(err),
        }
    }

    fn save(&self, bill: &Bill) -> Result<(), RepositoryError> {
        self.cache.save(bill)?;
        match self.primary.save(bill) {
            Ok(()) => self.set_pending(&bill.id, false),
            Err(err) => {
                tracing::warn!(
                    bill_id = %bill.id,
                    error = %err,
                    "Failed to sync bill to primary store, kept local copy"
                );
                self.set_pending(&bill.id, true)
            }
        }
    }
}

fn read_journal(path: &Path) -> IndexSet<BillId> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return IndexSet::new(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Failed to read sync journal");
            return IndexSet::new();
        }
    };
    match serde_json::from_str::<Vec<String>>(&content) {
        Ok(ids) => ids.into_iter().map(BillId::new).collect(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Ignoring malformed sync journal");
            IndexSet::new()
        }
    }
}

fn write_journal(path: &Path, ids: &IndexSet<BillId>) -> Result<(), RepositoryError> {
    let ids: Vec<&str> = ids.iter().map(BillId::as_str).collect();
    let json =
        serde_json::to_string(&ids).map_err(|err| RepositoryError::Serialization(err.to_string()))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let staging = path.with_extension("tmp");
    fs::write(&staging, json)?;
    fs::rename(&staging, path)?;
    Ok(())
}
