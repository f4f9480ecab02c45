#![warn(clippy::uninlined_format_args)]

#[cfg(all(feature = "th", feature = "en"))]
compile_error!("Cannot enable both 'th' and 'en' features at the same time");

#[cfg(feature = "th")]
pub mod strings {
    pub const MEMBER: &str = "สมาชิก";
    pub const SHARED: &str = "ยอดที่ใช้";
    pub const PAID: &str = "ยอดที่จ่าย";
    pub const BALANCE: &str = "คงเหลือ";
    pub const FROM: &str = "ผู้จ่าย";
    pub const TO: &str = "ผู้รับ";
    pub const AMOUNT: &str = "จำนวนเงิน";
    pub const TOTAL: &str = "ยอดรวม";
    pub const UNASSIGNED: &str = "ยังไม่มีผู้หาร";
    pub const ALL_SETTLED: &str = "ไม่มีรายการที่ต้องโอน";
    pub const YOU_PAY: &str = "คุณต้องโอน";
    pub const YOU_RECEIVE: &str = "คุณจะได้รับ";
    pub const VERIFIED: &str = "ตรวจสอบการชำระแล้ว";
    pub const NOT_VERIFIED: &str = "ยังไม่ได้ตรวจสอบการชำระ";
    pub const PAYMENT_SLIPS: &str = "สลิปการโอน";
    pub const PAYMENT_METHOD: &str = "ช่องทางการชำระ";
    pub const PROMPTPAY: &str = "พร้อมเพย์";
    pub const QR_CODE: &str = "คิวอาร์โค้ด";
    pub const BANK_ACCOUNT: &str = "บัญชีธนาคาร";
    pub const BLANK_NAME: &str = "ชื่อต้องไม่ว่างเปล่า";
    pub const NO_PAYERS: &str = "รายการต้องมีผู้จ่ายอย่างน้อยหนึ่งคน";
}

#[cfg(any(feature = "en", not(feature = "th")))]
pub mod strings {
    pub const MEMBER: &str = "Member";
    pub const SHARED: &str = "Shared";
    pub const PAID: &str = "Paid";
    pub const BALANCE: &str = "Balance";
    pub const FROM: &str = "From";
    pub const TO: &str = "To";
    pub const AMOUNT: &str = "Amount";
    pub const TOTAL: &str = "Total";
    pub const UNASSIGNED: &str = "Unassigned";
    pub const ALL_SETTLED: &str = "Nothing to transfer";
    pub const YOU_PAY: &str = "You pay";
    pub const YOU_RECEIVE: &str = "You receive";
    pub const VERIFIED: &str = "Payment verified";
    pub const NOT_VERIFIED: &str = "Payment not verified";
    pub const PAYMENT_SLIPS: &str = "Payment slips";
    pub const PAYMENT_METHOD: &str = "Payment method";
    pub const PROMPTPAY: &str = "PromptPay";
    pub const QR_CODE: &str = "QR code";
    pub const BANK_ACCOUNT: &str = "Bank account";
    pub const BLANK_NAME: &str = "Name must not be blank";
    pub const NO_PAYERS: &str = "An item needs at least one payer";
}

pub use strings::*;

use std::{cmp::Ordering, fmt::Display};

#[cfg(feature = "th")]
pub fn bill_not_found(id: impl Display) -> String {
    format!("ไม่พบบิล '{id}'")
}

#[cfg(feature = "th")]
pub fn member_not_found(id: impl Display) -> String {
    format!("ไม่พบสมาชิก '{id}'")
}

#[cfg(feature = "th")]
pub fn item_not_found(id: impl Display) -> String {
    format!("ไม่พบรายการ '{id}'")
}

#[cfg(feature = "th")]
pub fn negative_price(price: impl Display) -> String {
    format!("ราคาต้องไม่ติดลบ ({price})")
}

#[cfg(feature = "th")]
pub fn amount_too_large(amount: impl Display, limit: impl Display) -> String {
    format!("ยอดเงินเกินขีดจำกัด {limit} ({amount})")
}

#[cfg(feature = "th")]
pub fn unknown_member(id: impl Display) -> String {
    format!("'{id}' ไม่ได้เป็นสมาชิกของบิลนี้")
}

#[cfg(feature = "th")]
pub fn paid_amount_for_non_payer(id: impl Display) -> String {
    format!("'{id}' มียอดที่จ่ายแต่ไม่ได้เป็นผู้จ่าย")
}

#[cfg(feature = "th")]
pub fn negative_paid_amount(id: impl Display, amount: impl Display) -> String {
    format!("ยอดที่ '{id}' จ่ายต้องไม่ติดลบ ({amount})")
}

#[cfg(feature = "th")]
pub fn storage_failed(detail: impl Display) -> String {
    format!("บันทึกหรืออ่านข้อมูลไม่สำเร็จ: {detail}")
}

#[cfg(any(feature = "en", not(feature = "th")))]
pub fn bill_not_found(id: impl Display) -> String {
    format!("Bill '{id}' was not found")
}

#[cfg(any(feature = "en", not(feature = "th")))]
pub fn member_not_found(id: impl Display) -> String {
    format!("Member '{id}' was not found")
}

#[cfg(any(feature = "en", not(feature = "th")))]
pub fn item_not_found(id: impl Display) -> String {
    format!("Item '{id}' was not found")
}

#[cfg(any(feature = "en", not(feature = "th")))]
pub fn negative_price(price: impl Display) -> String {
    format!("Price must not be negative (got {price})")
}

#[cfg(any(feature = "en", not(feature = "th")))]
pub fn amount_too_large(amount: impl Display, limit: impl Display) -> String {
    format!("Amount must not exceed {limit} (got {amount})")
}

#[cfg(any(feature = "en", not(feature = "th")))]
pub fn unknown_member(id: impl Display) -> String {
    format!("'{id}' is not a member of this bill")
}

#[cfg(any(feature = "en", not(feature = "th")))]
pub fn paid_amount_for_non_payer(id: impl Display) -> String {
    format!("'{id}' has a paid amount but is not a payer")
}

#[cfg(any(feature = "en", not(feature = "th")))]
pub fn negative_paid_amount(id: impl Display, amount: impl Display) -> String {
    format!("Amount paid by '{id}' must not be negative (got {amount})")
}

#[cfg(any(feature = "en", not(feature = "th")))]
pub fn storage_failed(detail: impl Display) -> String {
    format!("Could not read or write bill data: {detail}")
}

pub struct BalanceLineMessage<'a> {
    name: &'a str,
    amount: String,
    direction: Ordering,
}

/// One-line description of a member's position. `amount` is already formatted
/// and unsigned; `direction` is the sign of the balance.
pub fn balance_line(name: &str, amount: String, direction: Ordering) -> BalanceLineMessage<'_> {
    BalanceLineMessage {
        name,
        amount,
        direction,
    }
}

#[cfg(feature = "th")]
impl std::fmt::Display for BalanceLineMessage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.direction {
            Ordering::Greater => write!(f, "{} จะได้รับคืน {}", self.name, self.amount),
            Ordering::Less => write!(f, "{} ต้องจ่ายเพิ่ม {}", self.name, self.amount),
            Ordering::Equal => write!(f, "{} ไม่มียอดค้าง", self.name),
        }
    }
}

#[cfg(any(feature = "en", not(feature = "th")))]
impl std::fmt::Display for BalanceLineMessage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.direction {
            Ordering::Greater => write!(f, "{} is owed {}", self.name, self.amount),
            Ordering::Less => write!(f, "{} owes {}", self.name, self.amount),
            Ordering::Equal => write!(f, "{} is settled up", self.name),
        }
    }
}
