//! Presentational formatting (es-AR conventions: `.` thousands, `,` decimals).

use maleta_shared::types::Currency;
use rust_decimal::Decimal;

use super::conversion::{round_money, to_base};

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Renders `amount` as e.g. `ARS 1.234.567,89` or `-USD 10,00`.
#[must_use]
pub fn format_amount(amount: Decimal, currency: Currency) -> String {
    let rounded = round_money(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    format!("{sign}{currency} {},{frac_part}", group_thousands(int_part))
}

/// Like [`format_amount`], with an `(≈ ARS …)` suffix for foreign amounts
/// that have a usable rate.
#[must_use]
pub fn format_with_conversion(amount: Decimal, currency: Currency, rate: Option<Decimal>) -> String {
    let base = format_amount(amount, currency);
    if currency.is_base() {
        return base;
    }
    match to_base(amount, currency, rate) {
        Ok(converted) => format!("{base} (≈ {})", format_amount(converted, Currency::BASE)),
        Err(_) => base,
    }
}
