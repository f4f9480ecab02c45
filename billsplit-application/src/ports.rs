use crate::error::RepositoryError;
use billsplit_domain::{Bill, BillId};

/// Storage for bills. The settlement engine never talks to it.
pub trait BillRepository: Send + Sync {
    fn load(&self, id: &BillId) -> Result<Bill, RepositoryError>;
    fn save(&self, bill: &Bill) -> Result<(), RepositoryError>;
}

/// Source of identifiers for new bills, members and items.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

