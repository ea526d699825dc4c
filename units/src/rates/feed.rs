use std::{sync::Arc, time::Duration};

use indexmap::IndexMap;
use log::{debug, info, trace, warn};
use reqwest::Client;
use strum::IntoEnumIterator;
use thiserror::Error;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time::sleep,
};

use super::RateStore;
use crate::{
    config::{PRICE_API_URL, PRICE_FETCH_TIMEOUT, RATE_SCALE},
    unit::Unit,
};

// RateFeed must be behind an Arc to be stopped from the owner or from the
// background task
pub type SharedRateFeed = Arc<RateFeed>;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("rate feed is already running")]
    AlreadyRunning,
    #[error("price index request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("malformed rate for {symbol}: {value}")]
    MalformedRate { symbol: String, value: String },
}

/// Outcome of a refresh cycle, broadcast to subscribers
#[derive(Debug, Clone)]
pub enum FeedEvent {
    Refreshed { updated: usize },
    Failed { message: String },
}

/// Background fetcher for fiat scaling factors.
///
/// Periodically downloads the price index document (a flat JSON map of
/// `symbol -> decimal rate` quoted against the native coin), inverts each
/// rate and stores it in the shared [`RateStore`]. A failed refresh is
/// logged and broadcast but never propagated: the previous factors stay in
/// place, stale rates being preferable to none.
pub struct RateFeed {
    client: Client,
    store: Arc<RateStore>,
    url: String,
    task: Mutex<Option<JoinHandle<()>>>,
    events: broadcast::Sender<FeedEvent>,
}

impl RateFeed {
    /// Create a feed against the default price index
    pub fn new(store: Arc<RateStore>) -> SharedRateFeed {
        Self::with_url(store, price_index_url())
    }

    /// Create a feed against a custom price index URL
    pub fn with_url(store: Arc<RateStore>, url: String) -> SharedRateFeed {
        let client = Client::builder()
            .timeout(PRICE_FETCH_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        let (events, _) = broadcast::channel(16);

        Arc::new(Self {
            client,
            store,
            url,
            task: Mutex::new(None),
            events,
        })
    }

    /// Start the periodic refresh: one refresh immediately, then one per
    /// `interval`. Refresh failures are contained within the task.
    pub async fn start(self: &Arc<Self>, interval: Duration) -> Result<(), FeedError> {
        trace!("Starting rate feed");

        if self.is_running().await {
            return Err(FeedError::AlreadyRunning);
        }

        let zelf = Arc::clone(self);
        *self.task.lock().await = Some(tokio::spawn(async move {
            loop {
                match zelf.refresh().await {
                    Ok(updated) => {
                        if log::log_enabled!(log::Level::Info) {
                            info!("Fiat rates refreshed, {} factors updated", updated);
                        }
                        let _ = zelf.events.send(FeedEvent::Refreshed { updated });
                    }
                    Err(e) => {
                        // Previous factors stay in place until the next cycle
                        if log::log_enabled!(log::Level::Warn) {
                            warn!("Rate refresh failed: {}", e);
                        }
                        let _ = zelf.events.send(FeedEvent::Failed {
                            message: e.to_string(),
                        });
                    }
                }

                sleep(interval).await;
            }
        }));

        Ok(())
    }

    /// Stop the periodic refresh
    pub async fn stop(&self) {
        trace!("Stopping rate feed");
        if let Some(handle) = self.task.lock().await.take() {
            if handle.is_finished() {
                debug!("Rate feed task already finished");
            } else {
                handle.abort();
            }
        }
    }

    // check that we have a task and it has not finished
    pub async fn is_running(&self) -> bool {
        let task = self.task.lock().await;
        task.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Subscribe to refresh outcomes
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.events.subscribe()
    }

    /// Retrieve the store this feed writes to
    pub fn get_store(&self) -> &RateStore {
        &self.store
    }

    /// One fetch + apply cycle. Returns the number of factors updated.
    pub async fn refresh(&self) -> Result<usize, FeedError> {
        trace!("Refreshing fiat rates");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        let rates: IndexMap<String, String> = response.json().await?;
        apply_rates(&self.store, &rates)
    }
}

/// Store the factors found in a price index document.
///
/// Entries are applied one by one in document order; a malformed rate aborts
/// the walk, so factors before it keep their new value and factors after it
/// keep their old one. Each store is independently atomic. Symbols that are
/// not part of the registry are skipped.
pub fn apply_rates(
    store: &RateStore,
    rates: &IndexMap<String, String>,
) -> Result<usize, FeedError> {
    let mut updated = 0;
    for (symbol, value) in rates {
        let Some(unit) = Unit::from_symbol(symbol) else {
            debug!("Ignoring unknown currency {} in price index", symbol);
            continue;
        };
        if unit.is_native() {
            continue;
        }

        let rate = value
            .parse::<f64>()
            .ok()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .ok_or_else(|| FeedError::MalformedRate {
                symbol: symbol.clone(),
                value: value.clone(),
            })?;

        // The index quotes units of fiat per coin; the factor is atomic
        // units per 1.0 of fiat
        store.set_factor(unit, ((1.0 / rate) * RATE_SCALE).round() as i64);
        updated += 1;
    }

    Ok(updated)
}

// Price index URL with the quote list built from the registry, so the
// request can't drift from the supported units
fn price_index_url() -> String {
    let symbols: Vec<&str> = Unit::iter()
        .filter(|unit| !unit.is_native())
        .map(Unit::symbol)
        .collect();
    format!("{}{}", PRICE_API_URL, symbols.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates_doc(entries: &[(&str, &str)]) -> IndexMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_apply_rates_inverts_and_scales() {
        let store = RateStore::new();
        // 0.5 EUR per coin -> 1 EUR = 2 coins = 200 000 000 atomic units
        let updated = apply_rates(&store, &rates_doc(&[("EUR", "0.5"), ("USD", "4")])).unwrap();
        assert_eq!(updated, 2);
        assert_eq!(store.factor(Unit::Eur), 200_000_000);
        assert_eq!(store.factor(Unit::Usd), 25_000_000);
        // Units absent from the document are untouched
        assert_eq!(store.factor(Unit::Gbp), 0);
    }

    #[test]
    fn test_apply_wire_format_document() {
        // Shape of the actual index response: a flat map of decimal strings
        let doc: IndexMap<String, String> =
            serde_json::from_str(r#"{"BTC":"0.00002","EUR":"0.125"}"#).unwrap();

        let store = RateStore::new();
        let updated = apply_rates(&store, &doc).unwrap();
        assert_eq!(updated, 2);
        assert_eq!(store.factor(Unit::Btc), 5_000_000_000_000);
        assert_eq!(store.factor(Unit::Eur), 800_000_000);
    }

    #[test]
    fn test_apply_rates_skips_unknown_symbols() {
        let store = RateStore::new();
        let updated = apply_rates(&store, &rates_doc(&[("XYZ", "2"), ("JPY", "1")])).unwrap();
        assert_eq!(updated, 1);
        assert_eq!(store.factor(Unit::Jpy), 100_000_000);
    }

    #[test]
    fn test_apply_rates_aborts_on_malformed_entry() {
        let store = RateStore::new();
        store.set_factor(Unit::Usd, 11_111_111);

        let doc = rates_doc(&[("EUR", "0.5"), ("GBP", "not-a-number"), ("USD", "4")]);
        let err = apply_rates(&store, &doc).unwrap_err();
        assert!(matches!(err, FeedError::MalformedRate { symbol, .. } if symbol == "GBP"));

        // Entries before the failure were applied, entries after keep their
        // previous value
        assert_eq!(store.factor(Unit::Eur), 200_000_000);
        assert_eq!(store.factor(Unit::Gbp), 0);
        assert_eq!(store.factor(Unit::Usd), 11_111_111);
    }

    #[test]
    fn test_apply_rates_rejects_non_positive_rates() {
        let store = RateStore::new();
        assert!(matches!(
            apply_rates(&store, &rates_doc(&[("EUR", "0")])),
            Err(FeedError::MalformedRate { .. })
        ));
        assert!(matches!(
            apply_rates(&store, &rates_doc(&[("EUR", "-2")])),
            Err(FeedError::MalformedRate { .. })
        ));
    }

    #[test]
    fn test_price_index_url_lists_all_quotes() {
        let url = price_index_url();
        assert!(url.starts_with(PRICE_API_URL));
        assert!(url.contains("ARS"));
        assert!(url.ends_with("ZAR"));
        assert!(!url.contains("TOS,"));
    }

    #[tokio::test]
    async fn test_start_stop() {
        let feed = RateFeed::with_url(
            Arc::new(RateStore::new()),
            // Nothing listens here, every refresh fails and is contained
            "http://127.0.0.1:9/price".to_string(),
        );
        assert!(!feed.is_running().await);

        feed.start(Duration::from_secs(3600)).await.unwrap();
        assert!(feed.is_running().await);
        assert!(matches!(
            feed.start(Duration::from_secs(3600)).await,
            Err(FeedError::AlreadyRunning)
        ));

        feed.stop().await;
        assert!(!feed.is_running().await);
    }

    #[tokio::test]
    async fn test_failed_refresh_is_broadcast() {
        let store = Arc::new(RateStore::new());
        store.set_factor(Unit::Eur, 123);

        let feed = RateFeed::with_url(store, "http://127.0.0.1:9/price".to_string());
        let mut events = feed.subscribe();
        feed.start(Duration::from_secs(3600)).await.unwrap();

        assert!(matches!(
            events.recv().await.unwrap(),
            FeedEvent::Failed { .. }
        ));
        // A failed refresh leaves previous factors in place
        assert_eq!(feed.get_store().factor(Unit::Eur), 123);

        feed.stop().await;
    }
}
