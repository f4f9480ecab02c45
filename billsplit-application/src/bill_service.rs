use crate::{
    error::{BillServiceError, ItemValidationError},
    model::{MemberStatement, NewItem, SettlementReport},
    ports::{BillRepository, IdGenerator},
};
use billsplit_domain::{
    Bill, BillId, BillItem, ItemId, Member, MemberId, Money, PaymentMethod, compute_summaries,
    compute_transactions, palette,
};
use indexmap::{IndexMap, IndexSet};

/// Admin and member operations over stored bills.
///
/// Every mutation loads the current bill, applies the change and writes the whole
/// bill back. Figures are recomputed from the stored items on every read.
#[derive(Clone, Copy)]
pub struct BillService<'a> {
    repository: &'a dyn BillRepository,
    ids: &'a dyn IdGenerator,
}

impl<'a> BillService<'a> {
    pub fn new(repository: &'a dyn BillRepository, ids: &'a dyn IdGenerator) -> Self {
        Self { repository, ids }
    }

    pub fn create_bill(&self, name: &str, member_names: &[&str]) -> Result<Bill, BillServiceError> {
        let name = non_blank(name)?;
        let mut bill = Bill::new(BillId::new(self.ids.next_id()), name);
        for member_name in member_names {
            let member_name = non_blank(member_name)?;
            self.push_member(&mut bill, member_name);
        }

        self.repository.save(&bill)?;
        tracing::info!(
            bill_id = %bill.id,
            member_count = bill.members.len(),
            "Created bill"
        );
        Ok(bill)
    }

    pub fn load_bill(&self, bill_id: &BillId) -> Result<Bill, BillServiceError> {
        Ok(self.repository.load(bill_id)?)
    }

    pub fn add_member(&self, bill_id: &BillId, name: &str) -> Result<Member, BillServiceError> {
        let name = non_blank(name)?;
        self.modify(bill_id, |bill| Ok(self.push_member(bill, name)))
    }

    pub fn rename_member(
        &self,
        bill_id: &BillId,
        member_id: &MemberId,
        name: &str,
    ) -> Result<(), BillServiceError> {
        let name = non_blank(name)?;
        self.modify(bill_id, |bill| {
            find_member(bill, member_id)?.name = name.to_string();
            Ok(())
        })
    }

    pub fn set_payment_verified(
        &self,
        bill_id: &BillId,
        member_id: &MemberId,
        verified: bool,
    ) -> Result<(), BillServiceError> {
        self.modify(bill_id, |bill| {
            find_member(bill, member_id)?.payment_verified = verified;
            Ok(())
        })
    }

    /// Records a reference (URL or storage key) to an uploaded payment slip.
    pub fn attach_payment_slip(
        &self,
        bill_id: &BillId,
        member_id: &MemberId,
        reference: &str,
    ) -> Result<(), BillServiceError> {
        let reference = non_blank(reference)?;
        self.modify(bill_id, |bill| {
            let member = find_member(bill, member_id)?;
            if !member.payment_slips.iter().any(|slip| slip == reference) {
                member.payment_slips.push(reference.to_string());
            }
            Ok(())
        })
    }

    /// Removes a member and every reference to it from the bill's items.
    pub fn remove_member(
        &self,
        bill_id: &BillId,
        member_id: &MemberId,
    ) -> Result<Member, BillServiceError> {
        self.modify(bill_id, |bill| {
            let touched_items = bill
                .items
                .iter()
                .filter(|item| item.references(member_id))
                .count();
            let removed = bill
                .remove_member(member_id)
                .ok_or_else(|| BillServiceError::MemberNotFound(member_id.clone()))?;
            tracing::info!(
                bill_id = %bill.id,
                member_id = %member_id,
                touched_items,
                "Removed member"
            );
            Ok(removed)
        })
    }

    pub fn add_item(&self, bill_id: &BillId, item: NewItem) -> Result<BillItem, BillServiceError> {
        self.modify(bill_id, |bill| {
            let item = build_item(bill, ItemId::new(self.ids.next_id()), item)?;
            bill.items.push(item.clone());
            Ok(item)
        })
    }

    /// Replaces the contents of an existing item, keeping its id and position.
    pub fn update_item(
        &self,
        bill_id: &BillId,
        item_id: &ItemId,
        item: NewItem,
    ) -> Result<BillItem, BillServiceError> {
        self.modify(bill_id, |bill| {
            if bill.item(item_id).is_none() {
                return Err(BillServiceError::ItemNotFound(item_id.clone()));
            }
            let updated = build_item(bill, item_id.clone(), item)?;
            if let Some(slot) = bill.item_mut(item_id) {
                *slot = updated.clone();
            }
            Ok(updated)
        })
    }

    pub fn remove_item(
        &self,
        bill_id: &BillId,
        item_id: &ItemId,
    ) -> Result<BillItem, BillServiceError> {
        self.modify(bill_id, |bill| {
            bill.remove_item(item_id)
                .ok_or_else(|| BillServiceError::ItemNotFound(item_id.clone()))
        })
    }

    pub fn set_payment_method(
        &self,
        bill_id: &BillId,
        method: Option<PaymentMethod>,
    ) -> Result<(), BillServiceError> {
        self.modify(bill_id, |bill| {
            bill.payment_method = method;
            Ok(())
        })
    }

    pub fn settlement(&self, bill_id: &BillId) -> Result<SettlementReport, BillServiceError> {
        let bill = self.repository.load(bill_id)?;
        Ok(settlement_report(bill))
    }

    pub fn member_statement(
        &self,
        bill_id: &BillId,
        member_id: &MemberId,
    ) -> Result<MemberStatement, BillServiceError> {
        let bill = self.repository.load(bill_id)?;
        let member = bill
            .member(member_id)
            .ok_or_else(|| BillServiceError::MemberNotFound(member_id.clone()))?;
        let payment_verified = member.payment_verified;
        let payment_slips = member.payment_slips.clone();

        let summaries = compute_summaries(&bill);
        let transactions = compute_transactions(&summaries, &bill);
        let summary = summaries
            .into_iter()
            .find(|summary| &summary.member_id == member_id)
            .ok_or_else(|| BillServiceError::MemberNotFound(member_id.clone()))?;
        let (pays, receives): (Vec<_>, Vec<_>) = transactions
            .into_iter()
            .filter(|tx| &tx.from == member_id || &tx.to == member_id)
            .partition(|tx| &tx.from == member_id);

        Ok(MemberStatement {
            bill_name: bill.name,
            summary,
            pays,
            receives,
            payment_verified,
            payment_slips,
            payment_method: bill.payment_method,
        })
    }

    fn modify<T>(
        &self,
        bill_id: &BillId,
        apply: impl FnOnce(&mut Bill) -> Result<T, BillServiceError>,
    ) -> Result<T, BillServiceError> {
        let mut bill = self.repository.load(bill_id)?;
        let output = apply(&mut bill)?;
        self.repository.save(&bill)?;
        Ok(output)
    }

    fn push_member(&self, bill: &mut Bill, name: &str) -> Member {
        let color = palette::color_for_index(bill.members.len());
        let member = Member::new(MemberId::new(self.ids.next_id()), name, color);
        bill.members.push(member.clone());
        member
    }
}

fn settlement_report(bill: Bill) -> SettlementReport {
    let summaries = compute_summaries(&bill);
    let transactions = compute_transactions(&summaries, &bill);
    SettlementReport {
        total: bill.total(),
        unassigned_total: bill.unassigned_total(),
        bill_id: bill.id,
        bill_name: bill.name,
        summaries,
        transactions,
        payment_method: bill.payment_method,
    }
}

fn non_blank(name: &str) -> Result<&str, BillServiceError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(BillServiceError::BlankName);
    }
    Ok(trimmed)
}

fn find_member<'b>(
    bill: &'b mut Bill,
    member_id: &MemberId,
) -> Result<&'b mut Member, BillServiceError> {
    bill.member_mut(member_id)
        .ok_or_else(|| BillServiceError::MemberNotFound(member_id.clone()))
}

fn build_item(bill: &Bill, id: ItemId, item: NewItem) -> Result<BillItem, ItemValidationError> {
    let name = item.name.trim();
    if name.is_empty() {
        return Err(ItemValidationError::BlankName);
    }
    if item.price.is_negative() {
        return Err(ItemValidationError::NegativePrice(item.price));
    }
    if item.price > Money::MAX_AMOUNT {
        return Err(ItemValidationError::AmountTooLarge(item.price));
    }

    let paid_by: IndexSet<MemberId> = item.paid_by.into_iter().collect();
    if paid_by.is_empty() {
        return Err(ItemValidationError::NoPayers);
    }
    let shared_by: IndexSet<MemberId> = item.shared_by.into_iter().collect();
    if let Some(unknown) = paid_by
        .iter()
        .chain(shared_by.iter())
        .find(|member| !bill.has_member(member))
    {
        return Err(ItemValidationError::UnknownMember(unknown.clone()));
    }

    let paid_amounts = match item.paid_amounts {
        Some(amounts) => {
            let amounts: IndexMap<MemberId, Money> = amounts.into_iter().collect();
            for (member, amount) in &amounts {
                if !paid_by.contains(member) {
                    return Err(ItemValidationError::PaidAmountForNonPayer(member.clone()));
                }
                if amount.is_negative() {
                    return Err(ItemValidationError::NegativePaidAmount {
                        member: member.clone(),
                        amount: *amount,
                    });
                }
                if *amount > Money::MAX_AMOUNT {
                    return Err(ItemValidationError::AmountTooLarge(*amount));
                }
            }
            Some(amounts)
        }
        None => None,
    };

    let item = BillItem {
        id,
        name: name.to_string(),
        price: item.price,
        paid_by,
        shared_by,
        paid_amounts,
    };
    warn_on_paid_amount_drift(&item);
    Ok(item)
}

fn warn_on_paid_amount_drift(item: &BillItem) {
    if item.paid_amounts.is_none() {
        return;
    }
    let reported: Money = item
        .paid_by
        .iter()
        .filter_map(|payer| item.paid_amount(payer))
        .sum();
    if reported != item.price {
        tracing::warn!(
            item_id = %item.id,
            price = %item.price,
            reported = %reported,
            "Paid amounts do not add up to the item price"
        );
    }
}
