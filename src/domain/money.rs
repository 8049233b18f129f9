use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Monetary amounts are exact decimals, so splitting 10.00 three ways keeps
/// full precision until balances are rounded for display.
pub type Amount = Decimal;

/// Balances are reported with two decimal places.
pub const BALANCE_SCALE: u32 = 2;

/// Raw amount as it arrives from a caller: typed text or an already numeric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountInput<'a> {
    Text(&'a str),
    Number(f64),
}

impl<'a> From<&'a str> for AmountInput<'a> {
    fn from(text: &'a str) -> Self {
        AmountInput::Text(text)
    }
}

impl<'a> From<&'a String> for AmountInput<'a> {
    fn from(text: &'a String) -> Self {
        AmountInput::Text(text.as_str())
    }
}

impl From<f64> for AmountInput<'_> {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

impl From<i64> for AmountInput<'_> {
    fn from(value: i64) -> Self {
        AmountInput::Number(value as f64)
    }
}

impl From<i32> for AmountInput<'_> {
    fn from(value: i32) -> Self {
        AmountInput::Number(f64::from(value))
    }
}

impl AmountInput<'_> {
    /// Resolve the input to a finite decimal.
    pub fn resolve(self) -> Result<Amount, ParseAmountError> {
        match self {
            AmountInput::Text(text) => parse_amount(text),
            AmountInput::Number(value) => {
                if !value.is_finite() {
                    return Err(ParseAmountError::NotFinite);
                }
                Decimal::try_from(value).map_err(|_| ParseAmountError::OutOfRange)
            }
        }
    }
}

/// Parse a decimal string into an amount.
/// Example: "50" -> 50, "12.5" -> 12.5, " 1e3 " -> 1000
///
/// Numbers outside the `Decimal` range (about 7.9e28) or finer than 28
/// decimal places are rejected as [`ParseAmountError::OutOfRange`].
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::InvalidFormat);
    }

    let lowered = input.to_ascii_lowercase();
    let unsigned = lowered.trim_start_matches(['+', '-']);
    if unsigned.starts_with("inf") || unsigned == "nan" {
        return Err(ParseAmountError::NotFinite);
    }

    Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .map_err(|_| {
            // Well-formed, but beyond Decimal's magnitude or 28-digit scale.
            match input.parse::<f64>() {
                Ok(value) if value.is_finite() => ParseAmountError::OutOfRange,
                _ => ParseAmountError::InvalidFormat,
            }
        })
}

/// Format an amount with two decimals.
/// Example: 15.5 -> "15.50", -4.5 -> "-4.50"
pub fn format_amount(amount: Amount) -> String {
    format!("{:.2}", amount)
}

/// How balances are rounded to two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingMode {
    /// Round half to even (banker's rounding): 0.025 -> 0.02, 0.035 -> 0.04.
    #[default]
    HalfEven,
    /// Round half away from zero: 0.025 -> 0.03, -0.025 -> -0.03.
    HalfUp,
}

impl RoundingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundingMode::HalfEven => "half-even",
            RoundingMode::HalfUp => "half-up",
        }
    }

    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
        }
    }

    /// Round an amount to [`BALANCE_SCALE`] decimal places.
    pub fn round(self, amount: Amount) -> Amount {
        let rounded = amount.round_dp_with_strategy(BALANCE_SCALE, self.strategy());
        // -0.00 and 0.00 must compare and print the same.
        if rounded.is_zero() {
            Decimal::ZERO
        } else {
            rounded
        }
    }
}

impl FromStr for RoundingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "half-even" | "bankers" => Ok(RoundingMode::HalfEven),
            "half-up" => Ok(RoundingMode::HalfUp),
            other => Err(format!(
                "unknown rounding mode '{}' (expected half-even or half-up)",
                other
            )),
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
    NotFinite,
    OutOfRange,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid money format"),
            ParseAmountError::NotFinite => write!(f, "amount must be a finite number"),
            ParseAmountError::OutOfRange => write!(f, "amount is out of range"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
