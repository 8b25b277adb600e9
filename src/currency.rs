//! Supported currencies (ISO 4217 reference data)

use crate::error::{FxError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency enumeration (ISO 4217 codes)
///
/// The supported set is fixed; codes outside it are rejected at the
/// parse boundary rather than silently given a rate of 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// US Dollar
    USD,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Japanese Yen
    JPY,
    /// Canadian Dollar
    CAD,
    /// Australian Dollar
    AUD,
    /// Swiss Franc
    CHF,
    /// Chinese Yuan
    CNY,
    /// Brazilian Real
    BRL,
    /// Mexican Peso
    MXN,
    /// Indian Rupee
    INR,
    /// Russian Ruble
    RUB,
    /// South African Rand
    ZAR,
    /// Turkish Lira
    TRY,
    /// South Korean Won
    KRW,
}

impl Currency {
    /// Get ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::CHF => "CHF",
            Currency::CNY => "CNY",
            Currency::BRL => "BRL",
            Currency::MXN => "MXN",
            Currency::INR => "INR",
            Currency::RUB => "RUB",
            Currency::ZAR => "ZAR",
            Currency::TRY => "TRY",
            Currency::KRW => "KRW",
        }
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            Currency::USD => "US Dollar",
            Currency::EUR => "Euro",
            Currency::GBP => "British Pound",
            Currency::JPY => "Japanese Yen",
            Currency::CAD => "Canadian Dollar",
            Currency::AUD => "Australian Dollar",
            Currency::CHF => "Swiss Franc",
            Currency::CNY => "Chinese Yuan",
            Currency::BRL => "Brazilian Real",
            Currency::MXN => "Mexican Peso",
            Currency::INR => "Indian Rupee",
            Currency::RUB => "Russian Ruble",
            Currency::ZAR => "South African Rand",
            Currency::TRY => "Turkish Lira",
            Currency::KRW => "South Korean Won",
        }
    }

    /// Get currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CAD => "C$",
            Currency::AUD => "A$",
            Currency::CHF => "CHF",
            Currency::CNY => "¥",
            Currency::BRL => "R$",
            Currency::MXN => "$",
            Currency::INR => "₹",
            Currency::RUB => "₽",
            Currency::ZAR => "R",
            Currency::TRY => "₺",
            Currency::KRW => "₩",
        }
    }

    /// Locale hint for number formatting in the presentation layer
    pub fn locale(&self) -> &'static str {
        match self {
            Currency::USD => "en-US",
            Currency::EUR => "de-DE",
            Currency::GBP => "en-GB",
            Currency::JPY => "ja-JP",
            Currency::CAD => "en-CA",
            Currency::AUD => "en-AU",
            Currency::CHF => "de-CH",
            Currency::CNY => "zh-CN",
            Currency::BRL => "pt-BR",
            Currency::MXN => "es-MX",
            Currency::INR => "en-IN",
            Currency::RUB => "ru-RU",
            Currency::ZAR => "en-ZA",
            Currency::TRY => "tr-TR",
            Currency::KRW => "ko-KR",
        }
    }

    /// Parse from ISO code
    pub fn from_code(code: &str) -> Result<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "JPY" => Ok(Currency::JPY),
            "CAD" => Ok(Currency::CAD),
            "AUD" => Ok(Currency::AUD),
            "CHF" => Ok(Currency::CHF),
            "CNY" => Ok(Currency::CNY),
            "BRL" => Ok(Currency::BRL),
            "MXN" => Ok(Currency::MXN),
            "INR" => Ok(Currency::INR),
            "RUB" => Ok(Currency::RUB),
            "ZAR" => Ok(Currency::ZAR),
            "TRY" => Ok(Currency::TRY),
            "KRW" => Ok(Currency::KRW),
            _ => Err(FxError::UnsupportedCurrency(code.to_string())),
        }
    }

    /// Get all supported currencies
    pub fn all() -> &'static [Currency] {
        &[
            Currency::USD,
            Currency::EUR,
            Currency::GBP,
            Currency::JPY,
            Currency::CAD,
            Currency::AUD,
            Currency::CHF,
            Currency::CNY,
            Currency::BRL,
            Currency::MXN,
            Currency::INR,
            Currency::RUB,
            Currency::ZAR,
            Currency::TRY,
            Currency::KRW,
        ]
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
