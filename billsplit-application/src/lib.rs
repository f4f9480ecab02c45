#![warn(clippy::uninlined_format_args)]

pub mod bill_service;
pub mod error;
pub mod model;
pub mod ports;

pub use bill_service::BillService;
pub use error::{BillServiceError, ItemValidationError, RepositoryError};
pub use model::{MemberStatement, NewItem, SettlementReport};
pub use ports::{BillRepository, IdGenerator};
