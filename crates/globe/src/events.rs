use annotations::PinId;
use scene::style::MapStyle;

/// Input from the surrounding UI.
///
/// The UI emits intents over this boundary instead of reaching into the
/// core, so the whole subsystem runs headless in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Search(String),
    /// Place a manual pin at the last successful search result.
    PlacePin,
    RemovePin(PinId),
    SetStyle(MapStyle),
    Click { x: f64, y: f64 },
    DragStart,
    DragEnd,
    Orbit { dx: f64, dy: f64 },
    Zoom { delta: f64 },
    ToggleRotation,
    Resize { width: f64, height: f64 },
}

/// Output consumed by the surrounding UI.
#[derive(Debug, Clone, PartialEq)]
pub enum GlobeEvent {
    PinSelected(PinId),
    PinDeselected,
    PlaceNotFound { query: String },
    WeatherUnavailable(PinId),
    /// A pin was requested with no prior successful search.
    SearchRequired,
}
