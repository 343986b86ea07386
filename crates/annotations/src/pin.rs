use foundation::geo::GeoPoint;
use scene::entity::RenderHandle;

/// Sentinel country code applied when reverse geocoding fails.
pub const UNKNOWN_COUNTRY: &str = "zz";

/// Stable pin identifier.
///
/// Journal pins inherit the id of the source journal record; manual pins get
/// a generated id from the store's monotonic counter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PinId(String);

impl PinId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PinKind {
    /// Placed from a search result; removable, carries live weather.
    Manual,
    /// Mirrors a stored journal entry; read-only from this subsystem.
    Journal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub summary: String,
}

/// Best-effort augmentation, absent until the async lookups resolve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    pub country_code: Option<String>,
    pub weather: Option<WeatherReport>,
}

/// One field of enrichment arriving from an async lookup.
///
/// Applying a payload overwrites only its own field, so deliveries are
/// commutative and idempotent per pin.
#[derive(Debug, Clone, PartialEq)]
pub enum EnrichmentPayload {
    Country(String),
    Weather(WeatherReport),
}

impl Enrichment {
    pub fn apply(&mut self, payload: EnrichmentPayload) {
        match payload {
            EnrichmentPayload::Country(code) => self.country_code = Some(code),
            EnrichmentPayload::Weather(report) => self.weather = Some(report),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub id: PinId,
    pub position: GeoPoint,
    pub kind: PinKind,
    pub label: String,
    pub description: Option<String>,
    pub enrichment: Enrichment,
    /// Scene entity backing this pin; internals owned by the scene manager.
    pub handle: RenderHandle,
}

impl Pin {
    pub fn is_removable(&self) -> bool {
        self.kind == PinKind::Manual
    }
}
