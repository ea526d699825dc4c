use std::time::Duration;

// 8 decimals numbers
pub const COIN_DECIMALS: u8 = 8;
// 100 000 000 to represent 1 TOS
pub const COIN_VALUE: u64 = 10u64.pow(COIN_DECIMALS as u32);
// 184M full coin
pub const MAXIMUM_SUPPLY: u64 = 184_000_000 * COIN_VALUE;

// Max length of the digit string (whole + zero-padded fraction) accepted by
// the amount parser. Longer numbers will exceed 63 bits.
pub const MAX_AMOUNT_DIGITS: usize = 18;

// Price index queried by the rate feed
// The quote symbols are appended from the unit registry
pub const PRICE_API_URL: &str = "https://min-api.cryptocompare.com/data/price?fsym=TOS&tsyms=";
// Quoted rates are inverted and scaled by this before being stored as factors
pub const RATE_SCALE: f64 = COIN_VALUE as f64;
// Default delay between two automatic price updates
// Consumers configuring a shorter period are expected to disable the feed instead
pub const PRICE_UPDATE_INTERVAL: Duration = Duration::from_secs(60);
// HTTP timeout for a single price index request
pub const PRICE_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
