use billsplit_domain::Money;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "billsplit", version, about = "Split shared bills and settle up")]
#[command(after_help = "Members and items may be given by id or by name.")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a bill with its members
    Create {
        name: String,
        #[arg(required = true)]
        members: Vec<String>,
    },
    /// Balances and transfers for everyone
    Show { bill: String },
    /// What a single member pays or receives
    Member { bill: String, member: String },
    AddMember { bill: String, name: String },
    RenameMember {
        bill: String,
        member: String,
        name: String,
    },
    /// Also removes the member from every item
    RemoveMember { bill: String, member: String },
    /// Mark a member's payment as verified
    Verify {
        bill: String,
        member: String,
        /// Mark the payment as not verified again
        #[arg(long)]
        undo: bool,
    },
    /// Attach a payment slip reference
    Slip {
        bill: String,
        member: String,
        reference: String,
    },
    /// Set or clear how members pay the collector
    PaymentMethod {
        bill: String,
        #[command(subcommand)]
        method: PaymentMethodArgs,
    },
    AddItem {
        bill: String,
        #[command(flatten)]
        item: ItemArgs,
    },
    /// Replace every field of an item
    EditItem {
        bill: String,
        #[arg(value_name = "ITEM")]
        item_ref: String,
        #[command(flatten)]
        item: ItemArgs,
    },
    RemoveItem {
        bill: String,
        #[arg(value_name = "ITEM")]
        item_ref: String,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethodArgs {
    #[command(name = "promptpay")]
    PromptPay { id: String },
    #[command(name = "qrcode")]
    QrCode { image: String },
    Bank {
        bank: String,
        account_name: String,
        account_number: String,
    },
    /// Clear the payment method
    #[command(name = "none")]
    Clear,
}

/// Item fields as typed on the command line. Member references are resolved
/// against the bill later.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ItemArgs {
    pub name: String,
    #[arg(value_parser = parse_money, allow_negative_numbers = true)]
    pub price: Money,
    #[arg(long, value_delimiter = ',', required = true)]
    pub paid_by: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub shared_by: Vec<String>,
    /// Exact contribution per payer, e.g. `ann=60,ben=30`
    #[arg(long, value_delimiter = ',', value_parser = parse_paid_amount)]
    pub paid: Option<Vec<(String, Money)>>,
}

fn parse_paid_amount(entry: &str) -> Result<(String, Money), String> {
    let Some((member, amount)) = entry.split_once('=') else {
        return Err(format!("expected <member>=<amount>, got '{entry}'"));
    };
    Ok((member.trim().to_string(), parse_money(amount)?))
}

fn parse_money(raw: &str) -> Result<Money, String> {
    Decimal::from_str(raw.trim())
        .map(Money::from_decimal)
        .map_err(|err| format!("invalid amount '{raw}': {err}"))
}
