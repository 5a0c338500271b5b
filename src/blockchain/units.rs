//! Conversion between wei and the ether display unit.
//!
//! Balances are shown with six decimals. They are kept as an integer count of
//! micro-ether so that comparisons and deltas are exact.

use std::fmt;

use alloy::primitives::utils::{parse_units, ParseUnits};
use alloy::primitives::U256;

/// Number of decimals shown for balances and deltas.
pub const DISPLAY_DECIMALS: u32 = 6;

const MICROS_PER_ETHER: u64 = 1_000_000;
const WEI_PER_MICRO: u64 = 1_000_000_000_000;

/// An ether amount rounded to [`DISPLAY_DECIMALS`] places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Balance {
    micros: U256,
}

impl Balance {
    pub const ZERO: Self = Self { micros: U256::ZERO };

    /// Convert a wei amount, rounding half up to six decimals.
    pub fn from_wei(wei: U256) -> Self {
        let per_micro = U256::from(WEI_PER_MICRO);
        let half = U256::from(WEI_PER_MICRO / 2);
        Self {
            micros: wei.saturating_add(half) / per_micro,
        }
    }

    /// Build from a raw micro-ether count.
    pub fn from_micros(micros: u64) -> Self {
        Self {
            micros: U256::from(micros),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.micros.is_zero()
    }

    /// Amount by which `self` exceeds `earlier`, if it does.
    pub fn increase_since(&self, earlier: &Balance) -> Option<Balance> {
        if self > earlier {
            Some(Balance {
                micros: self.micros - earlier.micros,
            })
        } else {
            None
        }
    }

    /// Lossy float view, for gauges only.
    pub fn as_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(0.0)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = U256::from(MICROS_PER_ETHER);
        let whole = self.micros / scale;
        let frac = (self.micros % scale).as_limbs()[0];
        write!(f, "{}.{:06}", whole, frac)
    }
}

/// Why a user-entered amount was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// Not a decimal ether amount.
    Invalid(String),
    /// Zero or negative.
    NonPositive,
}

/// Parse a decimal ether amount (e.g. `"0.005"`) into wei.
pub fn parse_ether_amount(amount: &str) -> Result<U256, AmountError> {
    match parse_units(amount.trim(), "ether") {
        Ok(ParseUnits::U256(wei)) if !wei.is_zero() => Ok(wei),
        Ok(_) => Err(AmountError::NonPositive),
        Err(e) => Err(AmountError::Invalid(e.to_string())),
    }
}
