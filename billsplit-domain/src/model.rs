use indexmap::{IndexMap, IndexSet};
use rust_decimal::{Decimal, RoundingStrategy};
use smol_str::SmolStr;
use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub SmolStr);

        impl $name {
            pub fn new(value: impl AsRef<str>) -> Self {
                Self(SmolStr::new(value))
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a participant within a bill.
    MemberId
);
string_id!(
    /// Identifier of an expense line within a bill.
    ItemId
);
string_id!(BillId);

/// Exact decimal amount of money.
///
/// The arithmetic operators saturate at the `Decimal` range. Use the `checked_*`
/// methods where an overflow has to be noticed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);
    pub const CENT: Self = Self(Decimal::from_parts(1, 0, 0, false, 2));
    /// Largest price or paid amount an item may carry (one trillion).
    pub const MAX_AMOUNT: Self = Self(Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0));

    /// `Money::new(1234, 2)` is `12.34`.
    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn signum(self) -> i64 {
        if self.0.is_zero() {
            0
        } else if self.0.is_sign_negative() {
            -1
        } else {
            1
        }
    }

    /// Splits the amount into `parts` equal shares. `None` when `parts` is zero.
    pub fn split(self, parts: usize) -> Option<Self> {
        if parts == 0 {
            return None;
        }
        self.0.checked_div(Decimal::from(parts)).map(Self)
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn checked_mul(self, rhs: Decimal) -> Option<Self> {
        self.0.checked_mul(rhs).map(Self)
    }

    /// Ratio of two amounts. `None` when `rhs` is zero.
    pub fn checked_ratio(self, rhs: Self) -> Option<Decimal> {
        self.0.checked_div(rhs.0)
    }

    /// Rounds to two decimal places, midpoint away from zero.
    pub fn round_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_sub(rhs.0);
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub color: String,
    pub payment_slips: Vec<String>,
    pub payment_verified: bool,
}

impl Member {
    pub fn new(id: MemberId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            payment_slips: Vec::new(),
            payment_verified: false,
        }
    }
}

/// One expense line of a bill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BillItem {
    pub id: ItemId,
    pub name: String,
    /// Total cost of the line.
    pub price: Money,
    /// Members who funded the line.
    pub paid_by: IndexSet<MemberId>,
    /// Members who owe for the line. Empty means the cost is unassigned.
    pub shared_by: IndexSet<MemberId>,
    /// Exact contribution per payer. Payers without an entry fall back to an
    /// equal split of `price`.
    pub paid_amounts: Option<IndexMap<MemberId, Money>>,
}

impl BillItem {
    /// Amount `payer` contributed toward this line.
    ///
    /// Returns `None` when `paid_by` is empty. The result is not checked against
    /// `paid_by` membership or against `price`.
    pub fn paid_amount(&self, payer: &MemberId) -> Option<Money> {
        if let Some(amount) = self
            .paid_amounts
            .as_ref()
            .and_then(|amounts| amounts.get(payer))
        {
            return Some(*amount);
        }
        self.price.split(self.paid_by.len())
    }

    /// Share of `price` owed by each member of `shared_by`.
    pub fn price_per_person(&self) -> Option<Money> {
        self.price.split(self.shared_by.len())
    }

    pub fn is_unassigned(&self) -> bool {
        self.shared_by.is_empty()
    }

    pub fn references(&self, member: &MemberId) -> bool {
        self.paid_by.contains(member)
            || self.shared_by.contains(member)
            || self
                .paid_amounts
                .as_ref()
                .is_some_and(|amounts| amounts.contains_key(member))
    }

    /// Drops every reference to `member`. Returns whether anything changed.
    pub fn forget_member(&mut self, member: &MemberId) -> bool {
        let mut changed = self.paid_by.shift_remove(member);
        changed |= self.shared_by.shift_remove(member);
        if let Some(amounts) = self.paid_amounts.as_mut() {
            changed |= amounts.shift_remove(member).is_some();
            if amounts.is_empty() {
                self.paid_amounts = None;
            }
        }
        changed
    }
}

/// How members are asked to pay the collector. Display-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentMethod {
    PromptPay {
        id: String,
    },
    QrCode {
        image: String,
    },
    BankAccount {
        bank: String,
        account_name: String,
        account_number: String,
    },
}

impl PaymentMethod {
    pub fn kind(&self) -> &'static str {
        match self {
            PaymentMethod::PromptPay { .. } => "promptpay",
            PaymentMethod::QrCode { .. } => "qrcode",
            PaymentMethod::BankAccount { .. } => "bank_account",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bill {
    pub id: BillId,
    pub name: String,
    pub members: Vec<Member>,
    pub items: Vec<BillItem>,
    pub payment_method: Option<PaymentMethod>,
}

impl Bill {
    pub fn new(id: BillId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: Vec::new(),
            items: Vec::new(),
            payment_method: None,
        }
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|member| &member.id == id)
    }

    pub fn member_mut(&mut self, id: &MemberId) -> Option<&mut Member> {
        self.members.iter_mut().find(|member| &member.id == id)
    }

    pub fn has_member(&self, id: &MemberId) -> bool {
        self.member(id).is_some()
    }

    pub fn item(&self, id: &ItemId) -> Option<&BillItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn item_mut(&mut self, id: &ItemId) -> Option<&mut BillItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    /// Removes a member and every reference to it from the items.
    pub fn remove_member(&mut self, id: &MemberId) -> Option<Member> {
        let index = self.members.iter().position(|member| &member.id == id)?;
        let removed = self.members.remove(index);
        for item in &mut self.items {
            item.forget_member(id);
        }
        Some(removed)
    }

    pub fn remove_item(&mut self, id: &ItemId) -> Option<BillItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn total(&self) -> Money {
        self.items.iter().map(|item| item.price).sum()
    }

    /// Sum of prices of items nobody currently owes for.
    pub fn unassigned_total(&self) -> Money {
        self.items
            .iter()
            .filter(|item| item.is_unassigned())
            .map(|item| item.price)
            .sum()
    }
}

/// Per-member totals derived from a bill.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberSummary {
    pub member_id: MemberId,
    pub name: String,
    pub total_shared: Money,
    pub total_paid: Money,
    /// `total_paid - total_shared`. Positive means the member is owed money.
    pub balance: Money,
}

/// `from` owes `to` the given amount, after netting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub from: MemberId,
    pub from_name: String,
    pub to: MemberId,
    pub to_name: String,
    pub amount: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn item(price: Money, paid_by: &[&str], shared_by: &[&str]) -> BillItem {
        BillItem {
            id: ItemId::new("item"),
            name: "item".to_string(),
            price,
            paid_by: paid_by.iter().copied().map(MemberId::from).collect(),
            shared_by: shared_by.iter().copied().map(MemberId::from).collect(),
            paid_amounts: None,
        }
    }

    #[rstest]
    #[case::single_payer(&["a"], "a", Some(Money::from_i64(90)))]
    #[case::equal_split(&["a", "b", "c"], "b", Some(Money::from_i64(30)))]
    #[case::no_payers(&[], "a", None)]
    fn paid_amount_defaults_to_equal_split(
        #[case] paid_by: &[&str],
        #[case] payer: &str,
        #[case] expected: Option<Money>,
    ) {
        let line = item(Money::from_i64(90), paid_by, &["a"]);
        assert_eq!(line.paid_amount(&MemberId::from(payer)), expected);
    }

    #[test]
    fn paid_amount_prefers_explicit_contribution() {
        let mut line = item(Money::from_i64(90), &["a", "b"], &["a"]);
        line.paid_amounts = Some(IndexMap::from_iter([(
            MemberId::from("a"),
            Money::from_i64(60),
        )]));

        assert_eq!(
            line.paid_amount(&MemberId::from("a")),
            Some(Money::from_i64(60))
        );
        assert_eq!(
            line.paid_amount(&MemberId::from("b")),
            Some(Money::from_i64(45))
        );
    }

    #[test]
    fn remove_member_cascades_into_items() {
        let mut bill = Bill::new(BillId::new("bill"), "dinner");
        bill.members.push(Member::new(MemberId::from("a"), "A", "red"));
        bill.members.push(Member::new(MemberId::from("b"), "B", "blue"));
        let mut line = item(Money::from_i64(100), &["a", "b"], &["a", "b"]);
        line.paid_amounts = Some(IndexMap::from_iter([(
            MemberId::from("b"),
            Money::from_i64(100),
        )]));
        bill.items.push(line);

        let removed = bill.remove_member(&MemberId::from("b"));

        assert_eq!(removed.map(|member| member.name), Some("B".to_string()));
        let line = &bill.items[0];
        assert!(!line.references(&MemberId::from("b")));
        assert_eq!(line.paid_amounts, None);
        assert_eq!(line.paid_by.len(), 1);
        assert_eq!(line.shared_by.len(), 1);
    }

    #[rstest]
    #[case::rounds_down(Money::new(12_344, 3), Money::new(1234, 2))]
    #[case::midpoint_away_from_zero(Money::new(12_345, 3), Money::new(1235, 2))]
    #[case::negative_midpoint(Money::new(-12_345, 3), Money::new(-1235, 2))]
    fn round_cents_cases(#[case] input: Money, #[case] expected: Money) {
        assert_eq!(input.round_cents(), expected);
    }

    #[test]
    fn split_by_zero_is_none() {
        assert_eq!(Money::from_i64(10).split(0), None);
    }

    #[test]
    fn unassigned_total_counts_items_without_sharers() {
        let mut bill = Bill::new(BillId::new("bill"), "dinner");
        bill.items.push(item(Money::from_i64(50), &["a"], &[]));
        bill.items.push(item(Money::from_i64(70), &["a"], &["a"]));

        assert_eq!(bill.unassigned_total(), Money::from_i64(50));
        assert_eq!(bill.total(), Money::from_i64(120));
    }
}
