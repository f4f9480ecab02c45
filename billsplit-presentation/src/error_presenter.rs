use billsplit_application::{BillServiceError, ItemValidationError, RepositoryError};
use billsplit_domain::Money;
use billsplit_i18n as i18n;

pub fn format_service_error(error: &BillServiceError) -> String {
    match error {
        BillServiceError::BillNotFound(id) => i18n::bill_not_found(id),
        BillServiceError::MemberNotFound(id) => i18n::member_not_found(id),
        BillServiceError::ItemNotFound(id) => i18n::item_not_found(id),
        BillServiceError::BlankName => i18n::BLANK_NAME.to_string(),
        BillServiceError::InvalidItem(err) => format_item_error(err),
        BillServiceError::Repository(RepositoryError::NotFound(id)) => i18n::bill_not_found(id),
        BillServiceError::Repository(err) => i18n::storage_failed(err),
    }
}

fn format_item_error(error: &ItemValidationError) -> String {
    match error {
        ItemValidationError::BlankName => i18n::BLANK_NAME.to_string(),
        ItemValidationError::NegativePrice(price) => i18n::negative_price(price),
        ItemValidationError::AmountTooLarge(amount) => {
            i18n::amount_too_large(amount, Money::MAX_AMOUNT)
        }
        ItemValidationError::NoPayers => i18n::NO_PAYERS.to_string(),
        ItemValidationError::UnknownMember(id) => i18n::unknown_member(id),
        ItemValidationError::PaidAmountForNonPayer(id) => i18n::paid_amount_for_non_payer(id),
        ItemValidationError::NegativePaidAmount { member, amount } => {
            i18n::negative_paid_amount(member, amount)
        }
    }
}
