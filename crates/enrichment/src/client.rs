use std::sync::Arc;

use annotations::{EnrichmentPayload, PinId, UNKNOWN_COUNTRY};
use foundation::geo::GeoPoint;
use tokio::sync::mpsc;
use tracing::warn;

use crate::service::{GeoServices, PlaceHit};

/// Async outcome delivered back to the frame loop.
///
/// Every variant is safe to apply on an arbitrary future frame: search
/// results are consumed by whoever still wants them, and enrichment for a
/// pin that no longer exists is discarded by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceUpdate {
    SearchResolved(PlaceHit),
    /// The query resolved but matched nothing: "place not found".
    SearchEmpty { query: String },
    /// The search request itself failed; surfaced the same way as no match.
    SearchFailed { query: String },
    Enriched { pin: PinId, payload: EnrichmentPayload },
    WeatherUnavailable { pin: PinId },
}

/// Fire-and-forget façade over [`GeoServices`].
///
/// Each call spawns an independent task; results re-enter the single
/// threaded frame loop through the unbounded channel handed out at
/// construction. Nothing here ever blocks the caller, and no failure
/// propagates as an error — only as a soft update.
pub struct EnrichmentClient {
    services: Arc<dyn GeoServices>,
    tx: mpsc::UnboundedSender<ServiceUpdate>,
}

impl EnrichmentClient {
    pub fn new(
        services: Arc<dyn GeoServices>,
    ) -> (Self, mpsc::UnboundedReceiver<ServiceUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { services, tx }, rx)
    }

    /// Starts a place search.
    ///
    /// Blank queries are rejected locally and return `false`; no network
    /// request is made.
    pub fn search(&self, query: &str) -> bool {
        let query = query.trim().to_owned();
        if query.is_empty() {
            return false;
        }

        let services = Arc::clone(&self.services);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let update = match services.search_place(query.clone()).await {
                Ok(hits) => match hits.into_iter().next() {
                    Some(hit) => ServiceUpdate::SearchResolved(hit),
                    None => ServiceUpdate::SearchEmpty { query },
                },
                Err(err) => {
                    warn!("place search for {query:?} failed: {err}");
                    ServiceUpdate::SearchFailed { query }
                }
            };
            let _ = tx.send(update);
        });
        true
    }

    /// Resolves the country code for a pin.
    ///
    /// Failure degrades to the `"zz"` sentinel, never an error.
    pub fn enrich_country(&self, pin: PinId, point: GeoPoint) {
        let services = Arc::clone(&self.services);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let code = match services.reverse_geocode(point).await {
                Ok(code) => code,
                Err(err) => {
                    warn!("reverse geocode for pin {pin} failed: {err}");
                    UNKNOWN_COUNTRY.to_owned()
                }
            };
            let _ = tx.send(ServiceUpdate::Enriched {
                pin,
                payload: EnrichmentPayload::Country(code),
            });
        });
    }

    /// Fetches current weather for a pin.
    pub fn enrich_weather(&self, pin: PinId, point: GeoPoint) {
        let services = Arc::clone(&self.services);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let update = match services.fetch_weather(point).await {
                Ok(report) => ServiceUpdate::Enriched {
                    pin,
                    payload: EnrichmentPayload::Weather(report),
                },
                Err(err) => {
                    warn!("weather fetch for pin {pin} failed: {err}");
                    ServiceUpdate::WeatherUnavailable { pin }
                }
            };
            let _ = tx.send(update);
        });
    }
}
