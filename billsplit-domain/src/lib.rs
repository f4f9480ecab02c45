#![warn(clippy::uninlined_format_args)]

pub mod ids;
pub mod model;
pub mod palette;
pub mod services;

pub use model::{
    Bill, BillId, BillItem, ItemId, Member, MemberId, MemberSummary, Money, PaymentMethod,
    Transaction,
};
pub use services::{BalanceAggregator, SETTLED_EPSILON, SettlementReducer};

/// Per-member shared total, paid total and balance for `bill`, in member order.
pub fn compute_summaries(bill: &Bill) -> Vec<MemberSummary> {
    BalanceAggregator.compute(bill)
}

/// Net transactions settling `bill`. `summaries` supplies display names.
pub fn compute_transactions(summaries: &[MemberSummary], bill: &Bill) -> Vec<Transaction> {
    SettlementReducer.compute(summaries, bill)
}
