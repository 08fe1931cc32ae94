//! Static table of the currencies the rate API publishes.

use super::currency::CurrencyCode;
use anyhow::{Result, anyhow};

#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyInfo {
    pub code: CurrencyCode,
    pub name: &'static str,
    /// Two-letter region used for the flag.
    pub flag: &'static str,
    /// Symbol used by the pl-PL number format; `None` means the code is shown.
    pub symbol: Option<&'static str>,
    pub minor_units: u8,
}

impl CurrencyInfo {
    /// Regional indicator pair, e.g. `pl` -> 🇵🇱.
    pub fn flag_emoji(&self) -> String {
        self.flag
            .chars()
            .filter(char::is_ascii_alphabetic)
            .filter_map(|c| {
                char::from_u32(0x1F1E6 + (c.to_ascii_lowercase() as u32 - 'a' as u32))
            })
            .collect()
    }

    pub fn display_symbol(&self) -> &str {
        self.symbol.unwrap_or(self.code.as_str())
    }
}

// (code, name, flag, symbol, minor units)
const TABLE: &[(&str, &str, &str, Option<&str>, u8)] = &[
    ("AUD", "Dolar australijski", "au", None, 2),
    ("BGN", "Lew bułgarski", "bg", None, 2),
    ("BRL", "Real brazylijski", "br", Some("R$"), 2),
    ("CAD", "Dolar kanadyjski", "ca", None, 2),
    ("CHF", "Frank szwajcarski", "ch", None, 2),
    ("CNY", "Juan chiński", "cn", None, 2),
    ("CZK", "Korona czeska", "cz", None, 2),
    ("DKK", "Korona duńska", "dk", None, 2),
    ("EUR", "Euro", "eu", Some("€"), 2),
    ("GBP", "Funt szterling", "gb", None, 2),
    ("HKD", "Dolar hongkoński", "hk", None, 2),
    ("HUF", "Forint węgierski", "hu", None, 2),
    ("IDR", "Rupia indonezyjska", "id", None, 2),
    ("ILS", "Nowy szekel izraelski", "il", None, 2),
    ("INR", "Rupia indyjska", "in", None, 2),
    ("ISK", "Korona islandzka", "is", None, 0),
    ("JPY", "Jen japoński", "jp", None, 0),
    ("KRW", "Won południowokoreański", "kr", None, 0),
    ("MXN", "Peso meksykańskie", "mx", None, 2),
    ("MYR", "Ringgit malezyjski", "my", None, 2),
    ("NOK", "Korona norweska", "no", None, 2),
    ("NZD", "Dolar nowozelandzki", "nz", None, 2),
    ("PHP", "Peso filipińskie", "ph", None, 2),
    ("PLN", "Złoty polski", "pl", Some("zł"), 2),
    ("RON", "Lej rumuński", "ro", None, 2),
    ("SEK", "Korona szwedzka", "se", None, 2),
    ("SGD", "Dolar singapurski", "sg", None, 2),
    ("THB", "Bat tajlandzki", "th", None, 2),
    ("TRY", "Lira turecka", "tr", None, 2),
    ("USD", "Dolar amerykański", "us", None, 2),
    ("ZAR", "Rand południowoafrykański", "za", None, 2),
];

/// Read-only currency metadata, loaded once at startup.
#[derive(Debug, Clone)]
pub struct CurrencyTable {
    entries: Vec<CurrencyInfo>,
}

impl CurrencyTable {
    pub fn builtin() -> Self {
        let entries = TABLE
            .iter()
            .filter_map(|(code, name, flag, symbol, minor_units)| {
                Some(CurrencyInfo {
                    code: code.parse().ok()?,
                    name: *name,
                    flag: *flag,
                    symbol: *symbol,
                    minor_units: *minor_units,
                })
            })
            .collect();
        CurrencyTable { entries }
    }

    pub fn get(&self, code: CurrencyCode) -> Option<&CurrencyInfo> {
        self.entries.iter().find(|info| info.code == code)
    }

    pub fn lookup(&self, code: &str) -> Result<&CurrencyInfo> {
        let code: CurrencyCode = code.parse()?;
        self.get(code)
            .ok_or_else(|| anyhow!("Unsupported currency: {}", code))
    }

    pub fn entries(&self) -> &[CurrencyInfo] {
        &self.entries
    }
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self::builtin()
    }
}
