use crate::model::{Bill, MemberId, MemberSummary, Money, Transaction};
use fxhash::{FxHashMap, FxHashSet};
use indexmap::IndexMap;

/// Net differences at or below one cent are considered settled.
pub const SETTLED_EPSILON: Money = Money::CENT;

/// Reduces per-item obligations into at most one payment per pair of members.
pub struct SettlementReducer;

impl SettlementReducer {
    /// Compute the net transactions that settle `bill`.
    ///
    /// Every item induces, for each sharer and each other payer, an obligation of
    /// the sharer's fraction of what that payer contributed. Obligations between the
    /// same two members are netted against each other in both directions.
    ///
    /// # Arguments
    /// * `summaries` - Output of the balance aggregator, used for display names only
    /// * `bill` - Source of the items
    ///
    /// # Returns
    /// Transactions ordered by the first appearance of their pair while scanning
    /// items, amounts rounded to cents
    pub fn compute(&self, summaries: &[MemberSummary], bill: &Bill) -> Vec<Transaction> {
        let obligations = Self::accumulate_obligations(bill);
        let names: FxHashMap<&MemberId, &str> = summaries
            .iter()
            .map(|summary| (&summary.member_id, summary.name.as_str()))
            .collect();

        let mut visited: FxHashSet<(&MemberId, &MemberId)> = FxHashSet::default();
        let mut transactions = Vec::new();

        for &(a, b) in obligations.keys() {
            let pair = if a <= b { (a, b) } else { (b, a) };
            if !visited.insert(pair) {
                continue;
            }

            let forward = obligations.get(&(a, b)).copied().unwrap_or(Money::ZERO);
            let backward = obligations.get(&(b, a)).copied().unwrap_or(Money::ZERO);
            let Some(net) = forward.checked_sub(backward) else {
                tracing::debug!(from = %a, to = %b, "Skipping pair whose net overflows");
                continue;
            };
            if net.abs() <= SETTLED_EPSILON {
                continue;
            }

            let (from, to) = if net.is_negative() { (b, a) } else { (a, b) };
            let (Some(from_name), Some(to_name)) = (names.get(from), names.get(to)) else {
                tracing::debug!(
                    from = %from,
                    to = %to,
                    amount = %net.abs(),
                    "Dropping transaction for member without summary"
                );
                continue;
            };

            transactions.push(Transaction {
                from: from.clone(),
                from_name: (*from_name).to_string(),
                to: to.clone(),
                to_name: (*to_name).to_string(),
                amount: net.abs().round_cents(),
            });
        }

        transactions
    }

    /// Directed `(sharer, payer)` obligations summed over all items, keyed in
    /// order of first appearance.
    fn accumulate_obligations(bill: &Bill) -> IndexMap<(&MemberId, &MemberId), Money> {
        let mut obligations: IndexMap<(&MemberId, &MemberId), Money> = IndexMap::new();

        for item in &bill.items {
            let Some(share_ratio) = item
                .price_per_person()
                .and_then(|price_per_person| price_per_person.checked_ratio(item.price))
            else {
                continue;
            };

            for sharer in &item.shared_by {
                for payer in &item.paid_by {
                    if sharer == payer {
                        continue;
                    }
                    let Some(paid_amount) = item.paid_amount(payer) else {
                        continue;
                    };
                    let entry = obligations.entry((sharer, payer)).or_insert(Money::ZERO);
                    match paid_amount
                        .checked_mul(share_ratio)
                        .and_then(|owed| entry.checked_add(owed))
                    {
                        Some(total) => *entry = total,
                        None => tracing::debug!(
                            item_id = %item.id,
                            sharer = %sharer,
                            payer = %payer,
                            "Skipping obligation that overflows"
                        ),
                    }
                }
            }
        }

        obligations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{BillId, BillItem, ItemId, Member},
        services::BalanceAggregator,
    };
    use indexmap::IndexSet;
    use rstest::{fixture, rstest};

    #[fixture]
    fn reducer() -> SettlementReducer {
        SettlementReducer
    }

    fn ids(names: &[&str]) -> IndexSet<MemberId> {
        names.iter().copied().map(MemberId::from).collect()
    }

    fn item(price: Money, paid_by: &[&str], shared_by: &[&str]) -> BillItem {
        BillItem {
            id: ItemId::new(format!("item-{price}")),
            name: "item".to_string(),
            price,
            paid_by: ids(paid_by),
            shared_by: ids(shared_by),
            paid_amounts: None,
        }
    }

    fn bill(members: &[&str], items: Vec<BillItem>) -> Bill {
        let mut bill = Bill::new(BillId::new("bill"), "test");
        bill.members = members
            .iter()
            .map(|id| Member::new(MemberId::from(*id), id.to_uppercase(), "gray"))
            .collect();
        bill.items = items;
        bill
    }

    fn settle(reducer: &SettlementReducer, bill: &Bill) -> Vec<(String, String, Money)> {
        let summaries = BalanceAggregator.compute(bill);
        reducer
            .compute(&summaries, bill)
            .into_iter()
            .map(|tx| (tx.from.to_string(), tx.to.to_string(), tx.amount))
            .collect()
    }

    fn expected(rows: &[(&str, &str, Money)]) -> Vec<(String, String, Money)> {
        rows.iter()
            .map(|(from, to, amount)| (from.to_string(), to.to_string(), *amount))
            .collect()
    }

    #[rstest]
    #[case::equal_split_single_payer(
        &["a", "b", "c"],
        vec![item(Money::from_i64(300), &["a"], &["a", "b", "c"])],
        &[("b", "a", Money::from_i64(100)), ("c", "a", Money::from_i64(100))]
    )]
    #[case::opposing_flows_cancel(
        &["a", "b"],
        vec![
            item(Money::from_i64(100), &["a"], &["a", "b"]),
            item(Money::from_i64(100), &["b"], &["a", "b"]),
        ],
        &[]
    )]
    #[case::opposing_flows_net_to_difference(
        &["a", "b"],
        vec![
            item(Money::from_i64(100), &["a"], &["a", "b"]),
            item(Money::from_i64(40), &["b"], &["a", "b"]),
        ],
        &[("b", "a", Money::from_i64(30))]
    )]
    #[case::opted_out_item(
        &["a", "b"],
        vec![item(Money::from_i64(50), &["a"], &[])],
        &[]
    )]
    #[case::zero_price_item(
        &["a", "b"],
        vec![item(Money::ZERO, &["a"], &["b"])],
        &[]
    )]
    #[case::self_consumption_only(
        &["a"],
        vec![item(Money::from_i64(70), &["a"], &["a"])],
        &[]
    )]
    #[case::net_within_epsilon(
        &["a", "b"],
        vec![item(Money::new(5, 3), &["a"], &["b"])],
        &[]
    )]
    #[case::net_exactly_one_cent(
        &["a", "b"],
        vec![item(Money::CENT, &["a"], &["b"])],
        &[]
    )]
    #[case::net_above_epsilon(
        &["a", "b"],
        vec![item(Money::new(2, 2), &["a"], &["b"])],
        &[("b", "a", Money::new(2, 2))]
    )]
    #[case::amounts_rounded_to_cents(
        &["a", "b", "c"],
        vec![item(Money::from_i64(100), &["a"], &["a", "b", "c"])],
        &[("b", "a", Money::new(3333, 2)), ("c", "a", Money::new(3333, 2))]
    )]
    fn settlement_reducer_cases(
        reducer: SettlementReducer,
        #[case] members: &[&str],
        #[case] items: Vec<BillItem>,
        #[case] rows: &[(&str, &str, Money)],
    ) {
        assert_eq!(settle(&reducer, &bill(members, items)), expected(rows));
    }

    #[rstest]
    fn unequal_paid_amounts_split_by_contribution(reducer: SettlementReducer) {
        let mut line = item(Money::from_i64(90), &["a", "b"], &["a", "b", "c"]);
        line.paid_amounts = Some(IndexMap::from_iter([
            (MemberId::from("a"), Money::from_i64(60)),
            (MemberId::from("b"), Money::from_i64(30)),
        ]));

        let transactions = settle(&reducer, &bill(&["a", "b", "c"], vec![line]));

        // As co-sharers a owes b 10 and b owes a 20, which nets to b -> a 10.
        assert_eq!(
            transactions,
            expected(&[
                ("b", "a", Money::from_i64(10)),
                ("c", "a", Money::from_i64(20)),
                ("c", "b", Money::from_i64(10)),
            ])
        );
    }

    #[rstest]
    fn transactions_carry_display_names(reducer: SettlementReducer) {
        let bill = bill(&["a", "b"], vec![item(Money::from_i64(10), &["a"], &["b"])]);
        let summaries = BalanceAggregator.compute(&bill);

        let transactions = reducer.compute(&summaries, &bill);

        assert_eq!(
            transactions,
            vec![Transaction {
                from: MemberId::from("b"),
                from_name: "B".to_string(),
                to: MemberId::from("a"),
                to_name: "A".to_string(),
                amount: Money::from_i64(10),
            }]
        );
    }

    #[rstest]
    fn transactions_without_summary_are_dropped(reducer: SettlementReducer) {
        let bill = bill(
            &["a", "b"],
            vec![item(Money::from_i64(30), &["a"], &["a", "b", "ghost"])],
        );
        let summaries = BalanceAggregator.compute(&bill);

        let transactions = reducer.compute(&summaries, &bill);

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].from, MemberId::from("b"));
        assert_eq!(transactions[0].amount, Money::from_i64(10));
    }

    #[rstest]
    fn obligations_past_the_decimal_range_are_skipped(reducer: SettlementReducer) {
        let huge = Money::from_decimal(rust_decimal::Decimal::MAX);
        let mut first = item(huge, &["a"], &["b"]);
        first.id = ItemId::new("first");
        let mut second = item(huge, &["a"], &["b"]);
        second.id = ItemId::new("second");

        let transactions = settle(&reducer, &bill(&["a", "b"], vec![first, second]));

        assert_eq!(transactions, expected(&[("b", "a", huge)]));
    }

    #[rstest]
    fn output_follows_first_appearance(reducer: SettlementReducer) {
        let bill = bill(
            &["a", "b", "c"],
            vec![
                item(Money::from_i64(20), &["c"], &["b"]),
                item(Money::from_i64(20), &["a"], &["b"]),
                item(Money::from_i64(5), &["b"], &["c"]),
            ],
        );

        assert_eq!(
            settle(&reducer, &bill),
            expected(&[
                ("b", "c", Money::from_i64(15)),
                ("b", "a", Money::from_i64(20)),
            ])
        );
    }
}
