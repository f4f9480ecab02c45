use billsplit_application::{BillRepository, RepositoryError};
use billsplit_domain::{Bill, BillId};
use fxhash::FxHashMap;
use std::sync::RwLock;

/// Process-local bill storage. Also serves as the offline cache in front of a
/// remote store.
#[derive(Debug, Default)]
pub struct InMemoryBillRepository {
    bills: RwLock<FxHashMap<BillId, Bill>>,
}

impl InMemoryBillRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bills.read().map(|bills| bills.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Unavailable("in-memory store lock poisoned".to_string())
}

impl BillRepository for InMemoryBillRepository {
    fn load(&self, id: &BillId) -> Result<Bill, RepositoryError> {
        let bills = self.bills.read().map_err(|_| poisoned())?;
        bills
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    fn save(&self, bill: &Bill) -> Result<(), RepositoryError> {
        let mut bills = self.bills.write().map_err(|_| poisoned())?;
        bills.insert(bill.id.clone(), bill.clone());
        Ok(())
    }
}
