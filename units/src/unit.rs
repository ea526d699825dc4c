use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, FromRepr};

use crate::config::COIN_DECIMALS;

// All fiat quotes share the same display precision
const FIAT_DECIMALS: u8 = 6;

// Rendered for unit ids that are not part of the registry
const UNKNOWN: &str = "???";

/// A display unit: the native coin first, then the quote currencies tracked
/// by the rate feed in alphabetical symbol order. The discriminant is the
/// stable id persisted in frontend settings.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumCount,
    EnumIter,
    FromRepr,
)]
#[repr(usize)]
pub enum Unit {
    Tos,
    Ars,
    Aud,
    Brl,
    Btc,
    Cad,
    Chf,
    Clp,
    Czk,
    Dkk,
    Eur,
    Gbp,
    Hkd,
    Huf,
    Idr,
    Ils,
    Inr,
    Jpy,
    Krw,
    Mxn,
    Myr,
    Nok,
    Nzd,
    Php,
    Pkr,
    Pln,
    Rub,
    Sek,
    Sgd,
    Thb,
    Try,
    Twd,
    Usd,
    Zar,
}

struct UnitInfo {
    symbol: &'static str,
    description: &'static str,
    decimals: u8,
}

// Single source of truth for per-unit metadata, indexed by discriminant.
// Must stay in declaration order of the enum above.
const UNIT_INFO: [UnitInfo; Unit::COUNT] = [
    UnitInfo { symbol: "TOS", description: "TOS", decimals: COIN_DECIMALS },
    UnitInfo { symbol: "ARS", description: "Argentine Peso", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "AUD", description: "Australian dollar", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "BRL", description: "Brazilian real", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "BTC", description: "Bitcoin", decimals: 8 },
    UnitInfo { symbol: "CAD", description: "Canadian dollar", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "CHF", description: "Swiss franc", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "CLP", description: "Chilean peso", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "CZK", description: "Czech koruna", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "DKK", description: "Danish krone", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "EUR", description: "Euro", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "GBP", description: "British pound", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "HKD", description: "Hong Kong dollar", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "HUF", description: "Hungarian forint", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "IDR", description: "Indonesian rupiah", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "ILS", description: "Israeli new shekel", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "INR", description: "Indian rupee", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "JPY", description: "Japanese Yen", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "KRW", description: "South Korean won", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "MXN", description: "Mexican peso", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "MYR", description: "Malaysian ringgit", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "NOK", description: "Norwegian krone", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "NZD", description: "New Zealand dollar", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "PHP", description: "Philippine peso", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "PKR", description: "Pakistani rupee", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "PLN", description: "Polish złoty", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "RUB", description: "Russian ruble", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "SEK", description: "Swedish krona", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "SGD", description: "Singapore dollar", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "THB", description: "Thai baht", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "TRY", description: "Turkish lira", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "TWD", description: "New Taiwan dollar", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "USD", description: "United States Dollar", decimals: FIAT_DECIMALS },
    UnitInfo { symbol: "ZAR", description: "South African rand", decimals: FIAT_DECIMALS },
];

impl Unit {
    pub const NATIVE: Unit = Unit::Tos;

    fn info(self) -> &'static UnitInfo {
        &UNIT_INFO[self as usize]
    }

    // Stable id as persisted in frontend settings
    pub fn id(self) -> usize {
        self as usize
    }

    /// Resolve a persisted id back to a unit. `None` for unknown ids.
    pub fn from_id(id: usize) -> Option<Self> {
        Self::from_repr(id)
    }

    /// Resolve a ticker symbol as found in the price index response
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|unit| unit.symbol() == symbol)
    }

    pub fn symbol(self) -> &'static str {
        self.info().symbol
    }

    pub fn description(self) -> &'static str {
        self.info().description
    }

    /// Number of fractional digits shown for this unit
    pub fn decimals(self) -> u8 {
        self.info().decimals
    }

    pub fn is_native(self) -> bool {
        self == Self::NATIVE
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// Defensive lookups for raw ids loaded from settings: frontends must always
// be able to render something, so unknown ids map to a sentinel instead of
// an error.

pub fn valid(id: usize) -> bool {
    Unit::from_id(id).is_some()
}

pub fn symbol_of(id: usize) -> &'static str {
    Unit::from_id(id).map_or(UNKNOWN, Unit::symbol)
}

pub fn description_of(id: usize) -> &'static str {
    Unit::from_id(id).map_or(UNKNOWN, Unit::description)
}

pub fn decimals_of(id: usize) -> u8 {
    Unit::from_id(id).map_or(0, Unit::decimals)
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_canonical_order() {
        let units: Vec<Unit> = Unit::iter().collect();
        assert_eq!(units[0], Unit::NATIVE);
        assert_eq!(units.len(), 34);

        // Quote units are sorted by symbol
        let symbols: Vec<&str> = units[1..].iter().map(|u| u.symbol()).collect();
        let mut sorted = symbols.clone();
        sorted.sort_unstable();
        assert_eq!(symbols, sorted);
    }

    #[test]
    fn test_ids_round_trip() {
        for unit in Unit::iter() {
            assert_eq!(Unit::from_id(unit.id()), Some(unit));
            assert!(valid(unit.id()));
        }
        assert_eq!(Unit::from_id(Unit::COUNT), None);
        assert!(!valid(9999));
    }

    #[test]
    fn test_lookups() {
        assert_eq!(Unit::Tos.symbol(), "TOS");
        assert_eq!(Unit::Eur.description(), "Euro");
        assert_eq!(Unit::Tos.decimals(), 8);
        assert_eq!(Unit::Btc.decimals(), 8);
        assert_eq!(Unit::Usd.decimals(), 6);
        assert_eq!(Unit::from_symbol("JPY"), Some(Unit::Jpy));
        assert_eq!(Unit::from_symbol("XXX"), None);
    }

    #[test]
    fn test_unknown_id_sentinels() {
        assert_eq!(symbol_of(9999), "???");
        assert_eq!(description_of(9999), "???");
        assert_eq!(decimals_of(9999), 0);
        assert_eq!(symbol_of(Unit::Gbp.id()), "GBP");
    }
}
