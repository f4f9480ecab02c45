use crate::{
    currency::{format_amount, format_signed_amount},
    text_table::{Alignment, TextTableBuilder},
};
use billsplit_application::SettlementReport;
use billsplit_domain::{MemberSummary, PaymentMethod, Transaction};
use billsplit_i18n as i18n;
use std::{borrow::Cow, fmt};

pub struct ReportPresenter;

pub struct ReportView {
    pub title: String,
    pub balance_table: String,
    pub transfer_table: Option<String>,
    pub totals: Vec<String>,
    pub payment_method: Option<String>,
}

impl ReportPresenter {
    pub fn render(report: &SettlementReport, currency: &str) -> ReportView {
        let mut totals = vec![format!(
            "{}: {}",
            i18n::TOTAL,
            format_amount(report.total, currency)
        )];
        if !report.unassigned_total.is_zero() {
            totals.push(format!(
                "{}: {}",
                i18n::UNASSIGNED,
                format_amount(report.unassigned_total, currency)
            ));
        }

        let transfer_table = if report.transactions.is_empty() {
            None
        } else {
            Some(Self::build_transfer_table(&report.transactions, currency))
        };

        ReportView {
            title: format!("{} ({})", report.bill_name, report.bill_id),
            balance_table: Self::build_balance_table(&report.summaries, currency),
            transfer_table,
            totals,
            payment_method: report.payment_method.as_ref().map(format_payment_method),
        }
    }

    pub fn build_balance_table(summaries: &[MemberSummary], currency: &str) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[
                Alignment::Left,
                Alignment::Right,
                Alignment::Right,
                Alignment::Right,
            ])
            .headers(&[
                Cow::Borrowed(i18n::MEMBER),
                Cow::Borrowed(i18n::SHARED),
                Cow::Borrowed(i18n::PAID),
                Cow::Borrowed(i18n::BALANCE),
            ]);

        for summary in summaries {
            builder = builder.row([
                Cow::Borrowed(summary.name.as_str()),
                Cow::Owned(format_amount(summary.total_shared, currency)),
                Cow::Owned(format_amount(summary.total_paid, currency)),
                Cow::Owned(format_signed_amount(summary.balance, currency)),
            ]);
        }

        builder.build()
    }

    pub fn build_transfer_table(transactions: &[Transaction], currency: &str) -> String {
        let mut builder = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&[
                Cow::Borrowed(i18n::FROM),
                Cow::Borrowed(i18n::TO),
                Cow::Borrowed(i18n::AMOUNT),
            ]);

        for tx in transactions {
            builder = builder.row([
                Cow::Borrowed(tx.from_name.as_str()),
                Cow::Borrowed(tx.to_name.as_str()),
                Cow::Owned(format_amount(tx.amount, currency)),
            ]);
        }

        builder.build()
    }
}

impl fmt::Display for ReportView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f)?;
        write!(f, "{}", self.balance_table)?;
        writeln!(f)?;
        match &self.transfer_table {
            Some(table) => write!(f, "{table}")?,
            None => writeln!(f, "{}", i18n::ALL_SETTLED)?,
        }
        writeln!(f)?;
        for line in &self.totals {
            writeln!(f, "{line}")?;
        }
        if let Some(method) = &self.payment_method {
            writeln!(f, "{}: {method}", i18n::PAYMENT_METHOD)?;
        }
        Ok(())
    }
}

pub fn format_payment_method(method: &PaymentMethod) -> String {
    match method {
        PaymentMethod::PromptPay { id } => format!("{} {id}", i18n::PROMPTPAY),
        PaymentMethod::QrCode { image } => format!("{} {image}", i18n::QR_CODE),
        PaymentMethod::BankAccount {
            bank,
            account_name,
            account_number,
        } => format!(
            "{} {bank} {account_number} ({account_name})",
            i18n::BANK_ACCOUNT
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billsplit_domain::{BillId, MemberId, Money};
    use rstest::{fixture, rstest};

    fn summary(id: &str, name: &str, shared: i64, paid: i64) -> MemberSummary {
        MemberSummary {
            member_id: MemberId::from(id),
            name: name.to_string(),
            total_shared: Money::from_i64(shared),
            total_paid: Money::from_i64(paid),
            balance: Money::from_i64(paid - shared),
        }
    }

    #[fixture]
    fn report() -> SettlementReport {
        SettlementReport {
            bill_id: BillId::new("b1"),
            bill_name: "Dinner".to_string(),
            summaries: vec![
                summary("a", "Ann", 100, 330),
                summary("b", "Ben", 100, 0),
                summary("c", "Cat", 100, 0),
            ],
            transactions: vec![
                Transaction {
                    from: MemberId::from("b"),
                    from_name: "Ben".to_string(),
                    to: MemberId::from("a"),
                    to_name: "Ann".to_string(),
                    amount: Money::from_i64(100),
                },
                Transaction {
                    from: MemberId::from("c"),
                    from_name: "Cat".to_string(),
                    to: MemberId::from("a"),
                    to_name: "Ann".to_string(),
                    amount: Money::from_i64(100),
                },
            ],
            total: Money::from_i64(330),
            unassigned_total: Money::from_i64(30),
            payment_method: Some(PaymentMethod::PromptPay {
                id: "0812345678".to_string(),
            }),
        }
    }

    #[rstest]
    fn balance_table_lists_every_member(report: SettlementReport) {
        let table = ReportPresenter::build_balance_table(&report.summaries, "THB");

        assert_eq!(table.lines().count(), 5);
        assert!(table.contains("| Ann    | ฿100.00 | ฿330.00 | +฿230.00 |"));
        assert!(table.contains("-฿100.00"));
    }

    #[rstest]
    fn view_includes_transfers_and_totals(report: SettlementReport) {
        let view = ReportPresenter::render(&report, "THB");

        assert_eq!(view.title, "Dinner (b1)");
        let transfers = view.transfer_table.as_deref().expect("transfer table");
        assert!(transfers.contains("| Ben  | Ann | ฿100.00 |"));
        assert_eq!(
            view.totals,
            vec![
                format!("{}: ฿330.00", i18n::TOTAL),
                format!("{}: ฿30.00", i18n::UNASSIGNED),
            ]
        );
        assert_eq!(
            view.payment_method,
            Some(format!("{} 0812345678", i18n::PROMPTPAY))
        );
    }

    #[rstest]
    fn settled_bill_has_no_transfer_table(mut report: SettlementReport) {
        report.transactions.clear();
        report.unassigned_total = Money::ZERO;

        let view = ReportPresenter::render(&report, "THB");
        let text = view.to_string();

        assert!(view.transfer_table.is_none());
        assert_eq!(view.totals.len(), 1);
        assert!(text.contains(i18n::ALL_SETTLED));
    }

    #[rstest]
    #[case::promptpay(
        PaymentMethod::PromptPay { id: "0812345678".to_string() },
        "0812345678"
    )]
    #[case::qr_code(PaymentMethod::QrCode { image: "qr.png".to_string() }, "qr.png")]
    #[case::bank_account(
        PaymentMethod::BankAccount {
            bank: "KBank".to_string(),
            account_name: "Ann".to_string(),
            account_number: "123-4".to_string(),
        },
        "KBank 123-4 (Ann)"
    )]
    fn payment_method_mentions_details(#[case] method: PaymentMethod, #[case] detail: &str) {
        assert!(format_payment_method(&method).ends_with(detail));
    }
}
