use std::collections::BTreeMap;

use crate::components::TextureId;

/// Named surface imagery for the globe sphere. Exactly one is active.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapStyle {
    Day,
    Night,
    Terrain,
    Street,
}

impl MapStyle {
    pub const ALL: [MapStyle; 4] = [
        MapStyle::Day,
        MapStyle::Night,
        MapStyle::Terrain,
        MapStyle::Street,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MapStyle::Day => "day",
            MapStyle::Night => "night",
            MapStyle::Terrain => "terrain",
            MapStyle::Street => "street",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStyle(pub String);

impl std::fmt::Display for UnknownStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown map style {:?}", self.0)
    }
}

impl std::error::Error for UnknownStyle {}

impl std::str::FromStr for MapStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MapStyle::ALL
            .into_iter()
            .find(|style| style.name() == s)
            .ok_or_else(|| UnknownStyle(s.to_owned()))
    }
}

/// Optional visual layers; load failure degrades instead of aborting.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Overlay {
    Clouds,
    Borders,
}

impl Overlay {
    pub fn name(&self) -> &'static str {
        match self {
            Overlay::Clouds => "clouds",
            Overlay::Borders => "borders",
        }
    }
}

/// Decoded RGBA8 image ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba,
        }
    }

    /// Single-color texture; enough for tests and headless catalogs.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            rgba.extend_from_slice(&color);
        }
        Self::new(width, height, rgba)
    }
}

/// Error type for texture catalog operations.
#[derive(Debug)]
pub struct TextureLoadError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for TextureLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TextureLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl TextureLoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Source of surface and overlay imagery.
///
/// Implementations decide where bytes come from (filesystem, procedural,
/// fixtures); the scene only cares about the decoded result.
pub trait TextureCatalog: Send {
    fn load(&self, style: MapStyle) -> Result<TextureData, TextureLoadError>;
    fn load_overlay(&self, overlay: Overlay) -> Result<TextureData, TextureLoadError>;
}

/// Owns every decoded texture for the lifetime of the scene.
#[derive(Debug, Default)]
pub struct TextureStore {
    textures: Vec<Option<TextureData>>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, data: TextureData) -> TextureId {
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(Some(data));
        id
    }

    pub fn get(&self, id: TextureId) -> Option<&TextureData> {
        self.textures.get(id.0 as usize).and_then(|t| t.as_ref())
    }

    pub fn dispose(&mut self, id: TextureId) -> bool {
        match self.textures.get_mut(id.0 as usize) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    pub fn resident_count(&self) -> usize {
        self.textures.iter().filter(|t| t.is_some()).count()
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }
}

/// Ticket for an in-flight style texture load.
///
/// Carries the controller generation at issue time; a ticket from before any
/// later style request is stale and its texture is discarded on arrival.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StyleTicket {
    style: MapStyle,
    generation: u64,
}

impl StyleTicket {
    pub fn style(&self) -> MapStyle {
        self.style
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StyleRequest {
    AlreadyActive,
    /// Texture was resident; the swap happened immediately.
    Swapped(TextureId),
    /// Texture must be loaded; complete with [`StyleController::complete`].
    Load(StyleTicket),
}

/// Pure state machine for the active map style.
///
/// Every `request` invalidates outstanding tickets, so a load finishing for
/// a style the user has already navigated away from is a no-op.
#[derive(Debug)]
pub struct StyleController {
    active: MapStyle,
    resident: BTreeMap<MapStyle, TextureId>,
    generation: u64,
}

impl StyleController {
    pub fn new(active: MapStyle, texture: TextureId) -> Self {
        let mut resident = BTreeMap::new();
        resident.insert(active, texture);
        Self {
            active,
            resident,
            generation: 0,
        }
    }

    pub fn active(&self) -> MapStyle {
        self.active
    }

    pub fn active_texture(&self) -> TextureId {
        self.resident[&self.active]
    }

    pub fn request(&mut self, style: MapStyle) -> StyleRequest {
        self.generation += 1;
        if style == self.active {
            return StyleRequest::AlreadyActive;
        }
        if let Some(&texture) = self.resident.get(&style) {
            self.active = style;
            return StyleRequest::Swapped(texture);
        }
        StyleRequest::Load(StyleTicket {
            style,
            generation: self.generation,
        })
    }

    /// Applies a finished load if its ticket is still current.
    ///
    /// Returns `false` when the ticket went stale; the caller should dispose
    /// the texture it allocated.
    pub fn complete(&mut self, ticket: StyleTicket, texture: TextureId) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.resident.insert(ticket.style, texture);
        self.active = ticket.style;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{MapStyle, StyleController, StyleRequest, TextureData, TextureStore};

    fn controller() -> (StyleController, TextureStore) {
        let mut store = TextureStore::new();
        let day = store.alloc(TextureData::solid(2, 2, [0, 0, 255, 255]));
        (StyleController::new(MapStyle::Day, day), store)
    }

    #[test]
    fn resident_style_swaps_immediately() {
        let (mut styles, mut store) = controller();
        let night = store.alloc(TextureData::solid(2, 2, [0, 0, 0, 255]));
        let StyleRequest::Load(ticket) = styles.request(MapStyle::Night) else {
            panic!("expected load ticket");
        };
        assert!(styles.complete(ticket, night));
        assert_eq!(styles.active(), MapStyle::Night);

        // Back to day: already resident, no ticket.
        assert!(matches!(
            styles.request(MapStyle::Day),
            StyleRequest::Swapped(_)
        ));
        assert_eq!(styles.active(), MapStyle::Day);
    }

    #[test]
    fn requesting_the_active_style_is_a_no_op() {
        let (mut styles, _store) = controller();
        assert_eq!(styles.request(MapStyle::Day), StyleRequest::AlreadyActive);
    }

    #[test]
    fn stale_ticket_is_discarded_on_arrival() {
        let (mut styles, mut store) = controller();
        let StyleRequest::Load(night_ticket) = styles.request(MapStyle::Night) else {
            panic!("expected load ticket");
        };
        // User switches again before the night texture arrives.
        let StyleRequest::Load(street_ticket) = styles.request(MapStyle::Street) else {
            panic!("expected load ticket");
        };

        let night = store.alloc(TextureData::solid(2, 2, [0, 0, 0, 255]));
        assert!(!styles.complete(night_ticket, night));
        assert_eq!(styles.active(), MapStyle::Day);

        let street = store.alloc(TextureData::solid(2, 2, [128, 128, 128, 255]));
        assert!(styles.complete(street_ticket, street));
        assert_eq!(styles.active(), MapStyle::Street);
    }

    #[test]
    fn style_names_round_trip() {
        for style in MapStyle::ALL {
            assert_eq!(style.name().parse::<MapStyle>().ok(), Some(style));
        }
        assert!("satellite".parse::<MapStyle>().is_err());
    }
}
