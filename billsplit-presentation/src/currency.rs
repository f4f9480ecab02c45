use billsplit_domain::Money;

/// Symbol placed before amounts for well-known ISO codes.
pub fn currency_symbol(code: &str) -> Option<&'static str> {
    let symbol = match code.to_ascii_uppercase().as_str() {
        "THB" => "฿",
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        _ => return None,
    };
    Some(symbol)
}

/// `฿1,234.56` style rendering: rounded to cents, grouped thousands. Codes
/// without a known symbol are appended instead (`1,234.56 CHF`).
pub fn format_amount(amount: Money, currency: &str) -> String {
    let sign = if amount.round_cents().is_negative() {
        "-"
    } else {
        ""
    };
    let digits = group_thousands(amount);
    match currency_symbol(currency) {
        Some(symbol) => format!("{sign}{symbol}{digits}"),
        None if currency.is_empty() => format!("{sign}{digits}"),
        None => format!("{sign}{digits} {}", currency.to_ascii_uppercase()),
    }
}

/// Like [`format_amount`], with an explicit `+` on positive amounts.
pub fn format_signed_amount(amount: Money, currency: &str) -> String {
    let formatted = format_amount(amount, currency);
    if amount.round_cents().is_zero() || amount.is_negative() {
        formatted
    } else {
        format!("+{formatted}")
    }
}

fn group_thousands(amount: Money) -> String {
    let unsigned = amount.round_cents().abs().as_decimal();
    let text = format!("{unsigned:.2}");
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(text.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped.push('.');
    grouped.push_str(fraction);
    grouped
}
