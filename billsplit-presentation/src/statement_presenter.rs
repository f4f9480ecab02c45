use crate::{
    currency::format_amount,
    report_presenter::format_payment_method,
    text_table::{Alignment, TextTableBuilder},
};
use billsplit_application::MemberStatement;
use billsplit_domain::Transaction;
use billsplit_i18n as i18n;
use std::{borrow::Cow, fmt::Write};

/// Renders what a single member sees: their position, who to pay and who pays
/// them.
pub struct StatementPresenter;

impl StatementPresenter {
    pub fn render(statement: &MemberStatement, currency: &str) -> String {
        let summary = &statement.summary;
        let mut out = String::with_capacity(512);

        let _ = writeln!(out, "{}", statement.bill_name);
        let _ = writeln!(
            out,
            "{}",
            i18n::balance_line(
                &summary.name,
                format_amount(summary.balance.abs(), currency),
                summary.balance.round_cents().signum().cmp(&0),
            )
        );
        let _ = writeln!(
            out,
            "{}: {}  {}: {}",
            i18n::SHARED,
            format_amount(summary.total_shared, currency),
            i18n::PAID,
            format_amount(summary.total_paid, currency)
        );

        if !statement.pays.is_empty() {
            let _ = writeln!(
                out,
                "\n{}: {}",
                i18n::YOU_PAY,
                format_amount(statement.amount_to_pay(), currency)
            );
            out.push_str(&counterparty_table(
                i18n::TO,
                &statement.pays,
                |tx| &tx.to_name,
                currency,
            ));
        }
        if !statement.receives.is_empty() {
            let _ = writeln!(
                out,
                "\n{}: {}",
                i18n::YOU_RECEIVE,
                format_amount(statement.amount_to_receive(), currency)
            );
            out.push_str(&counterparty_table(
                i18n::FROM,
                &statement.receives,
                |tx| &tx.from_name,
                currency,
            ));
        }
        if statement.pays.is_empty() && statement.receives.is_empty() {
            let _ = writeln!(out, "\n{}", i18n::ALL_SETTLED);
        }

        let status = if statement.payment_verified {
            i18n::VERIFIED
        } else {
            i18n::NOT_VERIFIED
        };
        let _ = writeln!(out, "\n{status}");
        if !statement.payment_slips.is_empty() {
            let _ = writeln!(out, "{}:", i18n::PAYMENT_SLIPS);
            for slip in &statement.payment_slips {
                let _ = writeln!(out, "  - {slip}");
            }
        }
        if let Some(method) = &statement.payment_method {
            let _ = writeln!(
                out,
                "{}: {}",
                i18n::PAYMENT_METHOD,
                format_payment_method(method)
            );
        }

        out
    }
}

fn counterparty_table(
    header: &'static str,
    transactions: &[Transaction],
    name: impl Fn(&Transaction) -> &String,
    currency: &str,
) -> String {
    let headers = [Cow::Borrowed(header), Cow::Borrowed(i18n::AMOUNT)];
    TextTableBuilder::new()
        .alignments(&[Alignment::Left, Alignment::Right])
        .headers(&headers)
        .rows(transactions.iter().map(|tx| {
            [
                Cow::Borrowed(name(tx).as_str()),
                Cow::Owned(format_amount(tx.amount, currency)),
            ]
        }))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use billsplit_domain::{MemberId, MemberSummary, Money};
    use rstest::{fixture, rstest};

    fn tx(from: &str, to: &str, amount: i64) -> Transaction {
        Transaction {
            from: MemberId::from(from),
            from_name: from.to_string(),
            to: MemberId::from(to),
            to_name: to.to_string(),
            amount: Money::from_i64(amount),
        }
    }

    #[fixture]
    fn statement() -> MemberStatement {
        MemberStatement {
            bill_name: "Trip".to_string(),
            summary: MemberSummary {
                member_id: MemberId::from("Ben"),
                name: "Ben".to_string(),
                total_shared: Money::from_i64(30),
                total_paid: Money::from_i64(30),
                balance: Money::ZERO,
            },
            pays: vec![tx("Ben", "Ann", 10)],
            receives: vec![tx("Cat", "Ben", 10)],
            payment_verified: false,
            payment_slips: vec!["slips/ben.png".to_string()],
            payment_method: None,
        }
    }

    #[rstest]
    fn shows_both_directions(statement: MemberStatement) {
        let text = StatementPresenter::render(&statement, "THB");

        assert!(text.starts_with("Trip\n"));
        assert!(text.contains(&format!("{}: ฿10.00", i18n::YOU_PAY)));
        assert!(text.contains("| Ann | ฿10.00 |"));
        assert!(text.contains(&format!("{}: ฿10.00", i18n::YOU_RECEIVE)));
        assert!(text.contains("| Cat  | ฿10.00 |"));
        assert!(text.contains(i18n::NOT_VERIFIED));
        assert!(text.contains("  - slips/ben.png"));
        assert!(!text.contains(i18n::ALL_SETTLED));
    }

    #[rstest]
    fn settled_member_sees_nothing_to_transfer(mut statement: MemberStatement) {
        statement.pays.clear();
        statement.receives.clear();
        statement.payment_verified = true;

        let text = StatementPresenter::render(&statement, "THB");

        assert!(text.contains(i18n::ALL_SETTLED));
        assert!(text.contains(i18n::VERIFIED));
    }
}
