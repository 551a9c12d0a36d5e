//! Currencies and currency-tagged amounts.
//!
//! Amounts are always `rust_decimal::Decimal`; floats never touch money.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currencies the agency books in.
///
/// ARS is the accounting currency. USD is the only foreign one and always
/// needs a rate to be expressed in ARS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Argentine peso.
    Ars,
    /// US dollar.
    Usd,
}

impl Currency {
    /// Accounting currency.
    pub const BASE: Self = Self::Ars;

    /// Whether amounts in this currency need no conversion.
    #[must_use]
    pub const fn is_base(self) -> bool {
        matches!(self, Self::Ars)
    }

    /// Stored and wire representation.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ars => "ARS",
            Self::Usd => "USD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.eq_ignore_ascii_case("ARS") {
            Ok(Self::Ars)
        } else if code.eq_ignore_ascii_case("USD") {
            Ok(Self::Usd)
        } else {
            Err(format!("unsupported currency '{s}'"))
        }
    }
}

/// An amount together with the currency it is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in major units.
    pub amount: Decimal,
    /// Denomination.
    pub currency: Currency,
}

impl Money {
    /// Tags `amount` with `currency`.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ars_is_the_only_base_currency() {
        assert_eq!(Currency::BASE, Currency::Ars);
        assert!(Currency::Ars.is_base());
        assert!(!Currency::Usd.is_base());
    }

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!("usd".parse::<Currency>(), Ok(Currency::Usd));
        assert_eq!(" ARS ".parse::<Currency>(), Ok(Currency::Ars));
        assert!("EUR".parse::<Currency>().is_err());
        assert!("".parse::<Currency>().is_err());
    }

    #[test]
    fn serializes_as_upper_case_code() {
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), "\"USD\"");
        let parsed: Currency = serde_json::from_str("\"ARS\"").unwrap();
        assert_eq!(parsed, Currency::Ars);
    }

    #[test]
    fn money_display_puts_code_first() {
        assert_eq!(Money::new(dec!(1500.50), Currency::Ars).to_string(), "ARS 1500.50");
    }
}
