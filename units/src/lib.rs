//! Display unit registry, fixed-point amount formatting/parsing and the
//! background fiat rate feed used by wallet frontends.
//!
//! Amounts are always carried as a signed count of atomic units of the
//! native coin. Converting to and from a human readable decimal string is
//! done per display unit, each with its own scaling factor and precision.
//! Fiat factors are populated at runtime by [`rates::RateFeed`].

pub mod amount;
pub mod config;
pub mod rates;
pub mod unit;

pub use amount::{
    format, format_html_with_unit, format_with_unit, parse, Amount, ParseAmountError,
    SeparatorStyle, MAX_MONEY,
};
pub use rates::{
    feed::{FeedError, FeedEvent, RateFeed, SharedRateFeed},
    RateStore,
};
pub use unit::Unit;
