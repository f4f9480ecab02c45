use crate::{
    CliResult,
    args::{Command, ItemArgs, PaymentMethodArgs},
};
use billsplit_application::{BillService, BillServiceError, NewItem};
use billsplit_domain::{Bill, BillId, ItemId, MemberId, PaymentMethod};
use billsplit_presentation::{
    ReportPresenter, StatementPresenter, format_amount, format_service_error,
};
use std::fmt::Write;

/// Runs one command and returns what should be printed.
pub fn execute(command: Command, service: &BillService<'_>, currency: &str) -> CliResult<String> {
    let output = match command {
        Command::Create { name, members } => {
            let members: Vec<&str> = members.iter().map(String::as_str).collect();
            let bill = checked(service.create_bill(&name, &members))?;
            let mut out = format!("Created bill '{}' ({})", bill.name, bill.id);
            for member in &bill.members {
                let _ = write!(out, "\n  {} ({})", member.name, member.id);
            }
            out
        }
        Command::Show { bill } => {
            let report = checked(service.settlement(&BillId::new(bill)))?;
            ReportPresenter::render(&report, currency).to_string()
        }
        Command::Member { bill, member } => {
            let bill = load(service, &bill)?;
            let member_id = resolve_member(&bill, &member)?;
            let statement = checked(service.member_statement(&bill.id, &member_id))?;
            StatementPresenter::render(&statement, currency)
        }
        Command::AddMember { bill, name } => {
            let member = checked(service.add_member(&BillId::new(bill), &name))?;
            format!("Added {} ({})", member.name, member.id)
        }
        Command::RenameMember { bill, member, name } => {
            let bill = load(service, &bill)?;
            let member_id = resolve_member(&bill, &member)?;
            checked(service.rename_member(&bill.id, &member_id, &name))?;
            format!("Renamed {member} to {}", name.trim())
        }
        Command::RemoveMember { bill, member } => {
            let bill = load(service, &bill)?;
            let member_id = resolve_member(&bill, &member)?;
            let removed = checked(service.remove_member(&bill.id, &member_id))?;
            format!("Removed {}", removed.name)
        }
        Command::Verify { bill, member, undo } => {
            let verified = !undo;
            let bill = load(service, &bill)?;
            let member_id = resolve_member(&bill, &member)?;
            checked(service.set_payment_verified(&bill.id, &member_id, verified))?;
            let state = if verified { "verified" } else { "not verified" };
            format!("Marked payment of {member} as {state}")
        }
        Command::Slip {
            bill,
            member,
            reference,
        } => {
            let bill = load(service, &bill)?;
            let member_id = resolve_member(&bill, &member)?;
            checked(service.attach_payment_slip(&bill.id, &member_id, &reference))?;
            format!("Attached payment slip for {member}")
        }
        Command::PaymentMethod { bill, method } => {
            let method = match method {
                PaymentMethodArgs::PromptPay { id } => Some(PaymentMethod::PromptPay { id }),
                PaymentMethodArgs::QrCode { image } => Some(PaymentMethod::QrCode { image }),
                PaymentMethodArgs::Bank {
                    bank,
                    account_name,
                    account_number,
                } => Some(PaymentMethod::BankAccount {
                    bank,
                    account_name,
                    account_number,
                }),
                PaymentMethodArgs::Clear => None,
            };
            let cleared = method.is_none();
            checked(service.set_payment_method(&BillId::new(bill), method))?;
            if cleared {
                "Payment method cleared".to_string()
            } else {
                "Payment method updated".to_string()
            }
        }
        Command::AddItem { bill, item } => {
            let bill = load(service, &bill)?;
            let new_item = to_new_item(&bill, item)?;
            let item = checked(service.add_item(&bill.id, new_item))?;
            format!(
                "Added item '{}' ({}) for {}",
                item.name,
                item.id,
                format_amount(item.price, currency)
            )
        }
        Command::EditItem {
            bill,
            item_ref,
            item,
        } => {
            let bill = load(service, &bill)?;
            let item_id = resolve_item(&bill, &item_ref)?;
            let new_item = to_new_item(&bill, item)?;
            let item = checked(service.update_item(&bill.id, &item_id, new_item))?;
            format!(
                "Updated item '{}' ({}) to {}",
                item.name,
                item.id,
                format_amount(item.price, currency)
            )
        }
        Command::RemoveItem { bill, item_ref } => {
            let bill = load(service, &bill)?;
            let item_id = resolve_item(&bill, &item_ref)?;
            let removed = checked(service.remove_item(&bill.id, &item_id))?;
            format!("Removed item '{}'", removed.name)
        }
    };

    Ok(output)
}

fn checked<T>(result: Result<T, BillServiceError>) -> CliResult<T> {
    result.map_err(|err| {
        tracing::debug!(error = ?err, "Command failed");
        format_service_error(&err).into()
    })
}

fn load(service: &BillService<'_>, bill: &str) -> CliResult<Bill> {
    checked(service.load_bill(&BillId::new(bill)))
}

/// Accepts a member id or a (case-insensitive) member name.
fn resolve_member(bill: &Bill, reference: &str) -> CliResult<MemberId> {
    let reference = reference.trim();
    if let Some(member) = bill.member(&MemberId::new(reference)) {
        return Ok(member.id.clone());
    }
    let mut matches = bill
        .members
        .iter()
        .filter(|member| member.name.eq_ignore_ascii_case(reference));
    match (matches.next(), matches.next()) {
        (Some(member), None) => Ok(member.id.clone()),
        (Some(_), Some(_)) => {
            Err(format!("More than one member is named '{reference}', use the member id").into())
        }
        (None, _) => {
            let missing = BillServiceError::MemberNotFound(MemberId::new(reference));
            Err(format_service_error(&missing).into())
        }
    }
}

/// Accepts an item id or a (case-insensitive) item name.
fn resolve_item(bill: &Bill, reference: &str) -> CliResult<ItemId> {
    let reference = reference.trim();
    if let Some(item) = bill.item(&ItemId::new(reference)) {
        return Ok(item.id.clone());
    }
    let mut matches = bill
        .items
        .iter()
        .filter(|item| item.name.eq_ignore_ascii_case(reference));
    match (matches.next(), matches.next()) {
        (Some(item), None) => Ok(item.id.clone()),
        (Some(_), Some(_)) => {
            Err(format!("More than one item is named '{reference}', use the item id").into())
        }
        (None, _) => {
            let missing = BillServiceError::ItemNotFound(ItemId::new(reference));
            Err(format_service_error(&missing).into())
        }
    }
}

fn to_new_item(bill: &Bill, item: ItemArgs) -> CliResult<NewItem> {
    let resolve_all = |references: &[String]| -> CliResult<Vec<MemberId>> {
        references
            .iter()
            .map(|reference| resolve_member(bill, reference))
            .collect()
    };

    let mut new_item = NewItem::new(item.name, item.price)
        .paid_by(resolve_all(&item.paid_by)?)
        .shared_by(resolve_all(&item.shared_by)?);
    if let Some(paid) = item.paid {
        let amounts = paid
            .into_iter()
            .map(|(reference, amount)| resolve_member(bill, &reference).map(|id| (id, amount)))
            .collect::<CliResult<Vec<_>>>()?;
        new_item = new_item.paid_amounts(amounts);
    }
    Ok(new_item)
}
