use std::collections::BTreeMap;

use foundation::geo::GeoPoint;
use scene::SceneManager;
use scene::entity::RenderHandle;
use tracing::debug;

use crate::pin::{Enrichment, EnrichmentPayload, Pin, PinId, PinKind};

/// Benign outcome of an invalid removal request. Never panics, never reaches
/// the frame step.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RemoveError {
    UnknownPin,
    /// Journal pins are read-only markers; only manual pins are removable.
    JournalPin,
}

impl std::fmt::Display for RemoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoveError::UnknownPin => write!(f, "no pin with that id"),
            RemoveError::JournalPin => write!(f, "journal pins cannot be removed"),
        }
    }
}

impl std::error::Error for RemoveError {}

/// Registry of placed pins, keyed by id.
///
/// Invariant: every pin holds exactly one live render handle; `remove`
/// detaches and disposes the handle in the same operation, so the scene can
/// never hold an orphaned pin entity.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    pins: BTreeMap<PinId, Pin>,
    by_handle: BTreeMap<RenderHandle, PinId>,
    next_manual: u64,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a pin mirroring a stored journal record.
    ///
    /// A duplicate id leaves the existing pin untouched.
    pub fn place_journal(
        &mut self,
        scene: &mut SceneManager,
        id: PinId,
        point: GeoPoint,
        label: impl Into<String>,
        description: Option<String>,
    ) -> PinId {
        if self.pins.contains_key(&id) {
            debug!("journal pin {id} already placed, skipping");
            return id;
        }
        self.place(scene, id.clone(), PinKind::Journal, point, label.into(), description);
        id
    }

    /// Places a user pin from a search result and returns its generated id.
    pub fn place_manual(
        &mut self,
        scene: &mut SceneManager,
        point: GeoPoint,
        label: impl Into<String>,
        description: Option<String>,
    ) -> PinId {
        self.next_manual += 1;
        let id = PinId::new(format!("manual-{}", self.next_manual));
        self.place(scene, id.clone(), PinKind::Manual, point, label.into(), description);
        id
    }

    fn place(
        &mut self,
        scene: &mut SceneManager,
        id: PinId,
        kind: PinKind,
        point: GeoPoint,
        label: String,
        description: Option<String>,
    ) {
        let handle = scene.add_pin(point);
        self.by_handle.insert(handle, id.clone());
        self.pins.insert(
            id.clone(),
            Pin {
                id,
                position: point,
                kind,
                label,
                description,
                enrichment: Enrichment::default(),
                handle,
            },
        );
    }

    /// Removes a manual pin, detaching and disposing its render handle.
    ///
    /// Removing a journal pin or an unknown id is a no-op reported as a
    /// benign error.
    pub fn remove(&mut self, scene: &mut SceneManager, id: &PinId) -> Result<(), RemoveError> {
        if !self
            .pins
            .get(id)
            .ok_or(RemoveError::UnknownPin)?
            .is_removable()
        {
            return Err(RemoveError::JournalPin);
        }

        if let Some(pin) = self.pins.remove(id) {
            self.by_handle.remove(&pin.handle);
            scene.remove_pin(pin.handle);
        }
        Ok(())
    }

    /// Merges an async enrichment result into an existing pin.
    ///
    /// Returns `false` when the pin no longer exists; late results are
    /// discarded silently rather than treated as errors.
    pub fn update_enrichment(&mut self, id: &PinId, payload: EnrichmentPayload) -> bool {
        match self.pins.get_mut(id) {
            Some(pin) => {
                pin.enrichment.apply(payload);
                true
            }
            None => {
                debug!("discarding enrichment for removed pin {id}");
                false
            }
        }
    }

    pub fn find_by_handle(&self, handle: RenderHandle) -> Option<&Pin> {
        let id = self.by_handle.get(&handle)?;
        self.pins.get(id)
    }

    pub fn get(&self, id: &PinId) -> Option<&Pin> {
        self.pins.get(id)
    }

    /// Pins in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Pin> {
        self.pins.values()
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Teardown: disposes every pin's render handle, journal pins included.
    pub fn dispose_all(&mut self, scene: &mut SceneManager) {
        for (_, pin) in std::mem::take(&mut self.pins) {
            scene.remove_pin(pin.handle);
        }
        self.by_handle.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{AnnotationStore, RemoveError};
    use crate::pin::{EnrichmentPayload, PinId, PinKind, WeatherReport};
    use foundation::geo::GeoPoint;
    use pretty_assertions::assert_eq;
    use scene::SceneManager;
    use scene::style::{MapStyle, Overlay, TextureCatalog, TextureData, TextureLoadError};

    struct SolidCatalog;

    impl TextureCatalog for SolidCatalog {
        fn load(&self, _style: MapStyle) -> Result<TextureData, TextureLoadError> {
            Ok(TextureData::solid(2, 2, [0, 0, 255, 255]))
        }

        fn load_overlay(&self, _overlay: Overlay) -> Result<TextureData, TextureLoadError> {
            Err(TextureLoadError::new("not bundled"))
        }
    }

    fn scene() -> SceneManager {
        SceneManager::new(Box::new(SolidCatalog)).expect("scene init")
    }

    #[test]
    fn journal_pin_removal_is_a_benign_no_op() {
        let mut scene = scene();
        let mut store = AnnotationStore::new();
        let id = store.place_journal(
            &mut scene,
            PinId::new("a"),
            GeoPoint::new(48.8566, 2.3522),
            "Paris Trip",
            Some("Paris, France".into()),
        );

        assert_eq!(store.remove(&mut scene, &id), Err(RemoveError::JournalPin));
        assert!(store.get(&id).is_some());
        assert_eq!(scene.pin_count(), 1);
    }

    #[test]
    fn manual_pin_removal_disposes_the_handle() {
        let mut scene = scene();
        let mut store = AnnotationStore::new();
        let id = store.place_manual(
            &mut scene,
            GeoPoint::new(35.6762, 139.6503),
            "Tokyo",
            None,
        );
        assert_eq!(scene.pin_count(), 1);

        store.remove(&mut scene, &id).expect("manual removal");
        assert!(store.get(&id).is_none());
        assert_eq!(store.len(), 0);
        assert_eq!(scene.pin_count(), 0);

        assert_eq!(
            store.remove(&mut scene, &id),
            Err(RemoveError::UnknownPin)
        );
    }

    #[test]
    fn late_enrichment_for_a_removed_pin_is_discarded() {
        let mut scene = scene();
        let mut store = AnnotationStore::new();
        let id = store.place_manual(&mut scene, GeoPoint::new(1.0, 2.0), "Spot", None);
        store.remove(&mut scene, &id).expect("manual removal");

        let applied = store.update_enrichment(
            &id,
            EnrichmentPayload::Weather(WeatherReport {
                temperature_c: 18.0,
                humidity_pct: 60.0,
                summary: "overcast".into(),
            }),
        );
        assert!(!applied);
        assert!(store.get(&id).is_none());
    }

    #[test]
    fn enrichment_merges_without_touching_the_handle() {
        let mut scene = scene();
        let mut store = AnnotationStore::new();
        let id = store.place_manual(&mut scene, GeoPoint::new(1.0, 2.0), "Spot", None);
        let handle = store.get(&id).unwrap().handle;

        assert!(store.update_enrichment(&id, EnrichmentPayload::Country("fr".into())));
        let pin = store.get(&id).unwrap();
        assert_eq!(pin.enrichment.country_code.as_deref(), Some("fr"));
        assert_eq!(pin.handle, handle);
    }

    #[test]
    fn handles_resolve_back_to_pins() {
        let mut scene = scene();
        let mut store = AnnotationStore::new();
        let id = store.place_journal(
            &mut scene,
            PinId::new("trip-1"),
            GeoPoint::new(-33.8688, 151.2093),
            "Sydney",
            None,
        );
        let handle = store.get(&id).unwrap().handle;

        let found = store.find_by_handle(handle).expect("pin by handle");
        assert_eq!(found.id, id);
        assert_eq!(found.kind, PinKind::Journal);
    }

    #[test]
    fn manual_ids_are_deterministic_and_unique() {
        let mut scene = scene();
        let mut store = AnnotationStore::new();
        let a = store.place_manual(&mut scene, GeoPoint::new(0.0, 1.0), "A", None);
        let b = store.place_manual(&mut scene, GeoPoint::new(0.0, 2.0), "B", None);
        assert_eq!(a.as_str(), "manual-1");
        assert_eq!(b.as_str(), "manual-2");
    }

    #[test]
    fn dispose_all_clears_scene_handles() {
        let mut scene = scene();
        let mut store = AnnotationStore::new();
        store.place_journal(&mut scene, PinId::new("j"), GeoPoint::new(5.0, 5.0), "J", None);
        store.place_manual(&mut scene, GeoPoint::new(6.0, 6.0), "M", None);

        store.dispose_all(&mut scene);
        assert!(store.is_empty());
        assert_eq!(scene.pin_count(), 0);
    }
}
