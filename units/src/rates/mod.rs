pub mod feed;

use std::sync::atomic::{AtomicI64, Ordering};

use log::debug;
use strum::EnumCount;

use crate::{config::COIN_VALUE, unit::Unit};

/// Per-unit scaling factors: atomic units of the native coin per 1.0 of the
/// display unit.
///
/// The native factor is a fixed constant. Fiat factors start at 0 ("rate
/// unavailable") until a feed refresh stores them. Every factor is an
/// independent atomic so formatting reads either the old or the new value,
/// never a torn one, and never blocks on an in-progress refresh.
///
/// The store carries no global state: callers construct one, share it behind
/// an `Arc` and hand it to the formatter, so tests run with fixed factors.
pub struct RateStore {
    factors: [AtomicI64; Unit::COUNT],
}

impl RateStore {
    pub fn new() -> Self {
        Self {
            factors: std::array::from_fn(|_| AtomicI64::new(0)),
        }
    }

    /// Scaling factor for a unit, 0 or negative meaning "rate unavailable"
    pub fn factor(&self, unit: Unit) -> i64 {
        if unit.is_native() {
            return COIN_VALUE as i64;
        }
        self.factors[unit.id()].load(Ordering::Relaxed)
    }

    /// Store the factor for a fiat unit. The native factor is fixed and
    /// writes to it are ignored.
    pub fn set_factor(&self, unit: Unit, factor: i64) {
        if unit.is_native() {
            debug!("Ignoring factor update for native unit");
            return;
        }
        self.factors[unit.id()].store(factor, Ordering::Relaxed);
    }

    pub fn is_available(&self, unit: Unit) -> bool {
        self.factor(unit) > 0
    }
}

impl Default for RateStore {
    fn default() -> Self {
        Self::new()
    }
}
