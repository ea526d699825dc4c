mod format;
mod parse;

pub use format::{format, format_html_with_unit, format_with_unit};
pub use parse::{parse, ParseAmountError};

use crate::config::MAXIMUM_SUPPLY;

/// Signed count of atomic units of the native coin
pub type Amount = i64;

/// Upper bound for amounts accepted by frontend input fields
pub const MAX_MONEY: Amount = MAXIMUM_SUPPLY as Amount;

// SI-style thin space used as thousands separator: locale independent and
// can't be confused with the decimal marker
pub const THIN_SPACE: char = '\u{2009}';
pub const THIN_SPACE_HTML: &str = "&thinsp;";

/// Policy for inserting thousands separators in the whole part of a
/// formatted amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparatorStyle {
    /// Never insert separators
    Never,
    /// Insert separators only when the whole part is longer than 4 digits
    #[default]
    Standard,
    /// Always insert separators
    Always,
}
