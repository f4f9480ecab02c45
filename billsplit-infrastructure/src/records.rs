//! On-disk representation of a bill.
//!
//! Older documents carry a single `paymentSlipUrl` per member. It is folded into
//! `paymentSlips` on read and never written back.

use billsplit_domain::{
    Bill, BillId, BillItem, ItemId, Member, MemberId, Money, PaymentMethod, palette,
};
use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBill {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<StoredMember>,
    #[serde(default)]
    pub items: Vec<StoredItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<StoredPaymentMethod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMember {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payment_slips: Vec<String>,
    #[serde(default, skip_serializing)]
    pub payment_slip_url: Option<String>,
    #[serde(default)]
    pub payment_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub paid_by: Vec<String>,
    #[serde(default)]
    pub shared_by: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_amounts: Option<IndexMap<String, Decimal>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum StoredPaymentMethod {
    #[serde(rename = "promptpay")]
    PromptPay { id: String },
    #[serde(rename = "qrcode")]
    QrCode { image: String },
    #[serde(rename = "bank_account")]
    BankAccount {
        bank: String,
        account_name: String,
        account_number: String,
    },
}

impl From<StoredBill> for Bill {
    fn from(stored: StoredBill) -> Self {
        let members = stored
            .members
            .into_iter()
            .enumerate()
            .map(|(index, member)| member.into_member(index))
            .collect();
        Bill {
            id: BillId::new(stored.id),
            name: stored.name,
            members,
            items: stored.items.into_iter().map(BillItem::from).collect(),
            payment_method: stored.payment_method.map(PaymentMethod::from),
        }
    }
}

impl From<&Bill> for StoredBill {
    fn from(bill: &Bill) -> Self {
        StoredBill {
            id: bill.id.to_string(),
            name: bill.name.clone(),
            members: bill.members.iter().map(StoredMember::from).collect(),
            items: bill.items.iter().map(StoredItem::from).collect(),
            payment_method: bill.payment_method.as_ref().map(StoredPaymentMethod::from),
        }
    }
}

impl StoredMember {
    fn into_member(self, index: usize) -> Member {
        let mut payment_slips = self.payment_slips;
        if let Some(legacy) = self
            .payment_slip_url
            .filter(|url| !url.trim().is_empty() && !payment_slips.contains(url))
        {
            payment_slips.insert(0, legacy);
        }
        let color = if self.color.is_empty() {
            palette::color_for_index(index).to_string()
        } else {
            self.color
        };
        Member {
            id: MemberId::new(self.id),
            name: self.name,
            color,
            payment_slips,
            payment_verified: self.payment_verified,
        }
    }
}

impl From<&Member> for StoredMember {
    fn from(member: &Member) -> Self {
        StoredMember {
            id: member.id.to_string(),
            name: member.name.clone(),
            color: member.color.clone(),
            payment_slips: member.payment_slips.clone(),
            payment_slip_url: None,
            payment_verified: member.payment_verified,
        }
    }
}

impl From<StoredItem> for BillItem {
    fn from(stored: StoredItem) -> Self {
        BillItem {
            id: ItemId::new(stored.id),
            name: stored.name,
            price: Money::from_decimal(stored.price),
            paid_by: stored.paid_by.into_iter().map(MemberId::new).collect(),
            shared_by: stored.shared_by.into_iter().map(MemberId::new).collect(),
            paid_amounts: stored.paid_amounts.map(|amounts| {
                amounts
                    .into_iter()
                    .map(|(member, amount)| (MemberId::new(member), Money::from_decimal(amount)))
                    .collect()
            }),
        }
    }
}

impl From<&BillItem> for StoredItem {
    fn from(item: &BillItem) -> Self {
        StoredItem {
            id: item.id.to_string(),
            name: item.name.clone(),
            price: item.price.as_decimal(),
            paid_by: ids_to_strings(&item.paid_by),
            shared_by: ids_to_strings(&item.shared_by),
            paid_amounts: item.paid_amounts.as_ref().map(|amounts| {
                amounts
                    .iter()
                    .map(|(member, amount)| (member.to_string(), amount.as_decimal()))
                    .collect()
            }),
        }
    }
}

fn ids_to_strings(ids: &IndexSet<MemberId>) -> Vec<String> {
    ids.iter().map(MemberId::to_string).collect()
}

impl From<StoredPaymentMethod> for PaymentMethod {
    fn from(stored: StoredPaymentMethod) -> Self {
        match stored {
            StoredPaymentMethod::PromptPay { id } => PaymentMethod::PromptPay { id },
            StoredPaymentMethod::QrCode { image } => PaymentMethod::QrCode { image },
            StoredPaymentMethod::BankAccount {
                bank,
                account_name,
                account_number,
            } => PaymentMethod::BankAccount {
                bank,
                account_name,
                account_number,
            },
        }
    }
}

impl From<&PaymentMethod> for StoredPaymentMethod {
    fn from(method: &PaymentMethod) -> Self {
        match method.clone() {
            PaymentMethod::PromptPay { id } => StoredPaymentMethod::PromptPay { id },
            PaymentMethod::QrCode { image } => StoredPaymentMethod::QrCode { image },
            PaymentMethod::BankAccount {
                bank,
                account_name,
                account_number,
            } => StoredPaymentMethod::BankAccount {
                bank,
                account_name,
                account_number,
            },
        }
    }
}
