use crate::records::StoredBill;
use billsplit_application::{BillRepository, RepositoryError};
use billsplit_domain::{Bill, BillId};
use std::{fs, io, path::PathBuf};

/// Keeps one pretty-printed JSON document per bill under a directory.
#[derive(Debug, Clone)]
pub struct JsonFileBillRepository {
    root: PathBuf,
}

impl JsonFileBillRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `None` for ids that are not a plain file stem.
    fn path_for(&self, id: &BillId) -> Option<PathBuf> {
        let valid = !id.as_str().is_empty()
            && id
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| self.root.join(format!("{id}.json")))
    }
}

impl BillRepository for JsonFileBillRepository {
    fn load(&self, id: &BillId) -> Result<Bill, RepositoryError> {
        let path = self
            .path_for(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(RepositoryError::NotFound(id.clone()));
            }
            Err(err) => return Err(err.into()),
        };
        let stored: StoredBill = serde_json::from_str(&content)
            .map_err(|err| RepositoryError::Serialization(format!("{}: {err}", path.display())))?;
        tracing::debug!(bill_id = %id, path = %path.display(), "Loaded bill");
        Ok(stored.into())
    }

    fn save(&self, bill: &Bill) -> Result<(), RepositoryError> {
        let path = self
            .path_for(&bill.id)
            .ok_or_else(|| RepositoryError::InvalidId(bill.id.clone()))?;
        let json = serde_json::to_string_pretty(&StoredBill::from(bill))
            .map_err(|err| RepositoryError::Serialization(err.to_string()))?;

        fs::create_dir_all(&self.root)?;
        // Write next to the target and rename so readers never see a partial file.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, json)?;
        fs::rename(&staging, &path)?;
        tracing::debug!(bill_id = %bill.id, path = %path.display(), "Saved bill");
        Ok(())
    }
}
