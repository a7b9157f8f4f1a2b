// Path: crates/types/src/amount.rs

//! Fixed-point monetary amounts.
//!
//! The wire format carries raw integer units; one network token equals
//! 1,000,000 raw units (6 fixed decimal places). Amounts are kept as raw
//! micro units internally and only rendered as decimals for display, so
//! comparisons and fee sums are exact integer arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw units per whole token.
pub const MICRO_PER_TOKEN: u64 = 1_000_000;

/// An unsigned balance or fee, in raw micro units.
#[derive(
    Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// Zero.
    pub const ZERO: Amount = Amount(0);

    /// Constructs an amount from raw micro units.
    pub const fn from_micro(micro: u64) -> Self {
        Self(micro)
    }

    /// Constructs an amount from a whole-token count.
    pub const fn from_tokens(tokens: u64) -> Self {
        Self(tokens * MICRO_PER_TOKEN)
    }

    /// The raw micro-unit value.
    pub const fn as_micro(&self) -> u64 {
        self.0
    }

    /// Saturating sum, used when totalling fees.
    pub const fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

    /// The signed difference `self - other`.
    pub fn delta_from(self, other: Amount) -> AmountDelta {
        AmountDelta((self.0 as i128 - other.0 as i128) as i64)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.0 / MICRO_PER_TOKEN, self.0 % MICRO_PER_TOKEN)
    }
}

/// A signed, not-yet-confirmed balance delta, in raw micro units.
#[derive(
    Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash,
)]
#[serde(transparent)]
pub struct AmountDelta(i64);

impl AmountDelta {
    /// An incoming (crediting) delta.
    pub fn incoming(amount: Amount) -> Self {
        Self(amount.as_micro() as i64)
    }

    /// An outgoing (debiting) delta.
    pub fn outgoing(amount: Amount) -> Self {
        Self(-(amount.as_micro() as i64))
    }

    /// The raw signed micro-unit value.
    pub const fn as_micro(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for AmountDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "+" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:06}", abs / MICRO_PER_TOKEN, abs % MICRO_PER_TOKEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_six_decimal_places() {
        assert_eq!(Amount::from_micro(1_500_000).to_string(), "1.500000");
        assert_eq!(Amount::from_micro(42).to_string(), "0.000042");
    }

    #[test]
    fn delta_sign_conventions() {
        let a = Amount::from_tokens(3);
        assert_eq!(AmountDelta::incoming(a).as_micro(), 3_000_000);
        assert_eq!(AmountDelta::outgoing(a).as_micro(), -3_000_000);
        assert_eq!(
            Amount::from_micro(500).delta_from(Amount::from_micro(800)).as_micro(),
            -300
        );
    }
}
