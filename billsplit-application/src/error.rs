use billsplit_domain::{BillId, ItemId, MemberId, Money};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("bill {0} was not found")]
    NotFound(BillId),
    #[error("bill id {0} cannot be used as a storage key")]
    InvalidId(BillId),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored bill is malformed: {0}")]
    Serialization(String),
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemValidationError {
    #[error("item name must not be blank")]
    BlankName,
    #[error("price must not be negative (got {0})")]
    NegativePrice(Money),
    #[error("amount {0} exceeds the limit of {limit}", limit = Money::MAX_AMOUNT)]
    AmountTooLarge(Money),
    #[error("an item needs at least one payer")]
    NoPayers,
    #[error("member {0} is not part of the bill")]
    UnknownMember(MemberId),
    #[error("member {0} has a paid amount but is not a payer")]
    PaidAmountForNonPayer(MemberId),
    #[error("paid amount for {member} must not be negative (got {amount})")]
    NegativePaidAmount { member: MemberId, amount: Money },
}

#[derive(Debug, Error)]
pub enum BillServiceError {
    #[error("bill {0} was not found")]
    BillNotFound(BillId),
    #[error("member {0} was not found")]
    MemberNotFound(MemberId),
    #[error("item {0} was not found")]
    ItemNotFound(ItemId),
    #[error("name must not be blank")]
    BlankName,
    #[error("invalid item: {0}")]
    InvalidItem(#[from] ItemValidationError),
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for BillServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => BillServiceError::BillNotFound(id),
            other => BillServiceError::Repository(other),
        }
    }
}
