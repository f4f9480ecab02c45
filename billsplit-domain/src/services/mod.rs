pub mod balance_aggregator;
pub mod settlement_reducer;

pub use balance_aggregator::BalanceAggregator;
pub use settlement_reducer::{SETTLED_EPSILON, SettlementReducer};
