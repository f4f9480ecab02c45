use billsplit_domain::{BillId, MemberId, MemberSummary, Money, PaymentMethod, Transaction};

/// Input for creating or replacing an item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub price: Money,
    pub paid_by: Vec<MemberId>,
    pub shared_by: Vec<MemberId>,
    pub paid_amounts: Option<Vec<(MemberId, Money)>>,
}

impl NewItem {
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        Self {
            name: name.into(),
            price,
            paid_by: Vec::new(),
            shared_by: Vec::new(),
            paid_amounts: None,
        }
    }

    pub fn paid_by(mut self, members: impl IntoIterator<Item = MemberId>) -> Self {
        self.paid_by = members.into_iter().collect();
        self
    }

    pub fn shared_by(mut self, members: impl IntoIterator<Item = MemberId>) -> Self {
        self.shared_by = members.into_iter().collect();
        self
    }

    pub fn paid_amounts(mut self, amounts: impl IntoIterator<Item = (MemberId, Money)>) -> Self {
        self.paid_amounts = Some(amounts.into_iter().collect());
        self
    }
}

/// Admin dashboard figures for a bill.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementReport {
    pub bill_id: BillId,
    pub bill_name: String,
    pub summaries: Vec<MemberSummary>,
    pub transactions: Vec<Transaction>,
    pub total: Money,
    /// Cost of items nobody currently owes for.
    pub unassigned_total: Money,
    pub payment_method: Option<PaymentMethod>,
}

/// What a single member sees when checking their balance.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberStatement {
    pub bill_name: String,
    pub summary: MemberSummary,
    pub pays: Vec<Transaction>,
    pub receives: Vec<Transaction>,
    pub payment_verified: bool,
    pub payment_slips: Vec<String>,
    pub payment_method: Option<PaymentMethod>,
}

impl MemberStatement {
    pub fn amount_to_pay(&self) -> Money {
        self.pays.iter().map(|tx| tx.amount).sum()
    }

    pub fn amount_to_receive(&self) -> Money {
        self.receives.iter().map(|tx| tx.amount).sum()
    }
}
