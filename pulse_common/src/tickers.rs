//! Ticker catalog shared between the generator and the view layer.
//!
//! The catalog is fixed: 25 symbols, each with the base price the generator
//! starts from and a display company name.

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::PulseError;

/// Set of supported ticker symbols.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    Display,
    EnumString,
    EnumIter,
    Hash,
    Eq,
    PartialEq,
)]
#[strum(ascii_case_insensitive)]
pub enum Ticker {
    AAPL,
    GOOG,
    MSFT,
    AMZN,
    TSLA,
    NVDA,
    META,
    NFLX,
    AMD,
    INTC,
    ORCL,
    CRM,
    ADBE,
    PYPL,
    UBER,
    LYFT,
    SPOT,
    TWTR,
    SNAP,
    PINS,
    SQ,
    SHOP,
    ZM,
    DOCU,
    RBLX,
}

impl Ticker {
    /// All catalog entries in declaration order.
    pub fn catalog() -> impl Iterator<Item = Ticker> {
        Ticker::iter()
    }

    /// Resolve a symbol string (case-insensitive) to a catalog entry.
    pub fn from_symbol(symbol: &str) -> Result<Ticker, PulseError> {
        symbol
            .trim()
            .parse::<Ticker>()
            .map_err(|_| PulseError::UnknownSymbol(symbol.to_string()))
    }

    /// Price the generator starts from and clamps around.
    pub fn base_price(self) -> f64 {
        match self {
            Ticker::AAPL => 175.50,
            Ticker::GOOG => 142.30,
            Ticker::MSFT => 378.85,
            Ticker::AMZN => 151.94,
            Ticker::TSLA => 248.50,
            Ticker::NVDA => 485.20,
            Ticker::META => 485.58,
            Ticker::NFLX => 485.90,
            Ticker::AMD => 144.25,
            Ticker::INTC => 44.12,
            Ticker::ORCL => 125.67,
            Ticker::CRM => 278.45,
            Ticker::ADBE => 567.89,
            Ticker::PYPL => 62.34,
            Ticker::UBER => 68.45,
            Ticker::LYFT => 12.56,
            Ticker::SPOT => 285.67,
            Ticker::TWTR => 53.70,
            Ticker::SNAP => 11.23,
            Ticker::PINS => 33.45,
            Ticker::SQ => 78.90,
            Ticker::SHOP => 45.67,
            Ticker::ZM => 65.43,
            Ticker::DOCU => 54.32,
            Ticker::RBLX => 42.10,
        }
    }

    /// Human readable company name.
    pub fn company_name(self) -> &'static str {
        match self {
            Ticker::AAPL => "Apple Inc.",
            Ticker::GOOG => "Alphabet Inc.",
            Ticker::MSFT => "Microsoft Corp.",
            Ticker::AMZN => "Amazon.com, Inc.",
            Ticker::TSLA => "Tesla, Inc.",
            Ticker::NVDA => "NVIDIA Corp.",
            Ticker::META => "Meta Platforms, Inc.",
            Ticker::NFLX => "Netflix, Inc.",
            Ticker::AMD => "Advanced Micro Devices, Inc.",
            Ticker::INTC => "Intel Corp.",
            Ticker::ORCL => "Oracle Corp.",
            Ticker::CRM => "Salesforce, Inc.",
            Ticker::ADBE => "Adobe Inc.",
            Ticker::PYPL => "PayPal Holdings, Inc.",
            Ticker::UBER => "Uber Technologies, Inc.",
            Ticker::LYFT => "Lyft, Inc.",
            Ticker::SPOT => "Spotify Technology S.A.",
            Ticker::TWTR => "Twitter, Inc.",
            Ticker::SNAP => "Snap Inc.",
            Ticker::PINS => "Pinterest, Inc.",
            Ticker::SQ => "Block, Inc.",
            Ticker::SHOP => "Shopify Inc.",
            Ticker::ZM => "Zoom Video Communications, Inc.",
            Ticker::DOCU => "DocuSign, Inc.",
            Ticker::RBLX => "Roblox Corp.",
        }
    }
}

/// Company name for an arbitrary wire symbol; symbols outside the catalog
/// are displayed as-is.
pub fn company_name(symbol: &str) -> String {
    Ticker::from_symbol(symbol)
        .map(|ticker| ticker.company_name().to_string())
        .unwrap_or_else(|_| symbol.to_string())
}
