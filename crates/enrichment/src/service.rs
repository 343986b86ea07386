use std::future::Future;
use std::pin::Pin;

use annotations::WeatherReport;
use foundation::geo::GeoPoint;

use crate::error::EnrichmentError;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One place-search result.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceHit {
    pub point: GeoPoint,
    pub label: String,
}

/// The three external read-only geo services, behind one dyn-compatible
/// trait.
///
/// Implementations must be `Send + Sync` for use across async tasks; methods
/// return boxed futures for dyn-compatibility. Each operation is independent
/// and idempotent with respect to the pin it ultimately targets.
pub trait GeoServices: Send + Sync {
    /// Free-text place search. An empty result vec means "place not found".
    fn search_place(&self, query: String)
        -> BoxFuture<'_, Result<Vec<PlaceHit>, EnrichmentError>>;

    /// ISO 3166-1 alpha-2 country code (lowercase) for a point.
    fn reverse_geocode(&self, point: GeoPoint) -> BoxFuture<'_, Result<String, EnrichmentError>>;

    /// Current conditions at a point.
    fn fetch_weather(
        &self,
        point: GeoPoint,
    ) -> BoxFuture<'_, Result<WeatherReport, EnrichmentError>>;
}
