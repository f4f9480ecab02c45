use crate::model::{Bill, MemberId, MemberSummary, Money};
use indexmap::IndexMap;

/// Derives per-member totals from a bill.
pub struct BalanceAggregator;

#[derive(Clone, Copy, Default)]
struct Totals {
    shared: Money,
    paid: Money,
}

impl Totals {
    /// Applies the contribution only if the totals and their difference stay
    /// representable.
    fn try_add(&mut self, shared: Money, paid: Money) -> bool {
        let next = self
            .shared
            .checked_add(shared)
            .zip(self.paid.checked_add(paid))
            .filter(|(shared, paid)| paid.checked_sub(*shared).is_some());
        match next {
            Some((shared, paid)) => {
                self.shared = shared;
                self.paid = paid;
                true
            }
            None => false,
        }
    }
}

impl BalanceAggregator {
    /// Compute one summary per member, in member order.
    ///
    /// Items whose `shared_by` is empty add nothing to anyone's shared total.
    /// Item references to members that are not in the bill are skipped, as are
    /// contributions that would overflow a member's totals.
    pub fn compute(&self, bill: &Bill) -> Vec<MemberSummary> {
        let mut totals: IndexMap<&MemberId, Totals> = bill
            .members
            .iter()
            .map(|member| (&member.id, Totals::default()))
            .collect();

        for item in &bill.items {
            if let Some(price_per_person) = item.price_per_person() {
                for sharer in &item.shared_by {
                    match totals.get_mut(sharer) {
                        Some(entry) => {
                            if !entry.try_add(price_per_person, Money::ZERO) {
                                tracing::debug!(
                                    item_id = %item.id,
                                    member_id = %sharer,
                                    "Skipping share that overflows the member total"
                                );
                            }
                        }
                        None => tracing::debug!(
                            item_id = %item.id,
                            member_id = %sharer,
                            "Ignoring unknown sharer"
                        ),
                    }
                }
            }

            for payer in &item.paid_by {
                let Some(paid_amount) = item.paid_amount(payer) else {
                    continue;
                };
                match totals.get_mut(payer) {
                    Some(entry) => {
                        if !entry.try_add(Money::ZERO, paid_amount) {
                            tracing::debug!(
                                item_id = %item.id,
                                member_id = %payer,
                                "Skipping payment that overflows the member total"
                            );
                        }
                    }
                    None => tracing::debug!(
                        item_id = %item.id,
                        member_id = %payer,
                        "Ignoring unknown payer"
                    ),
                }
            }
        }

        bill.members
            .iter()
            .map(|member| {
                let totals = totals.get(&member.id).copied().unwrap_or_default();
                MemberSummary {
                    member_id: member.id.clone(),
                    name: member.name.clone(),
                    total_shared: totals.shared,
                    total_paid: totals.paid,
                    balance: totals.paid - totals.shared,
                }
            })
            .collect()
    }
}
