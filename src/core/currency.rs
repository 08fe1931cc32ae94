//! Currency identifiers and the rate source abstraction

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Three-letter ISO 4217 code, always upper case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    pub const USD: CurrencyCode = CurrencyCode(*b"USD");
    pub const PLN: CurrencyCode = CurrencyCode(*b"PLN");

    pub fn as_str(&self) -> &str {
        // Only ASCII letters get past `from_str`.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bytes = s.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(anyhow!("Invalid currency code: {}", s));
        }
        let mut code = [0u8; 3];
        for (slot, b) in code.iter_mut().zip(bytes) {
            *slot = b.to_ascii_uppercase();
        }
        Ok(CurrencyCode(code))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> String {
        code.as_str().to_string()
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered (source, target) currency pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pair {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl Pair {
    pub fn new(from: CurrencyCode, to: CurrencyCode) -> Self {
        Pair { from, to }
    }

    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }

    pub fn swapped(&self) -> Self {
        Pair {
            from: self.to,
            to: self.from,
        }
    }

    /// Label shown above the history list, e.g. `USD ➝ PLN`.
    pub fn arrow_label(&self) -> String {
        format!("{} ➝ {}", self.from, self.to)
    }
}

impl Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Source of exchange rates.
///
/// Both calls fail when the response carries no numeric rate for `pair.to`.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Latest rate. With `amount` set the API returns the converted amount
    /// instead of the unit rate.
    async fn latest(&self, pair: Pair, amount: Option<f64>) -> Result<f64>;

    /// Unit rate published for `date`.
    async fn historical(&self, pair: Pair, date: NaiveDate) -> Result<f64>;
}
