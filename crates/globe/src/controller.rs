use std::sync::Arc;

use annotations::{AnnotationStore, PinId};
use enrichment::{EnrichmentClient, GeoServices, PlaceHit, ServiceUpdate};
use render::{Camera3D, CameraDirector, RenderFrame, Renderer};
use runtime::{EventBus, Frame, Stamped};
use scene::style::TextureCatalog;
use scene::{SceneInitError, SceneManager};
use tokio::sync::mpsc;
use tracing::debug;

use crate::events::{GlobeEvent, Intent};
use crate::feed::JournalRecord;

/// Camera distance in globe radii for a search fly-to.
pub const FLY_DISTANCE_FACTOR: f64 = 2.25;
pub const FLY_DURATION_S: f64 = 2.0;

const DEFAULT_VIEWPORT: (f64, f64) = (800.0, 600.0);
const FRAME_DT_S: f64 = 1.0 / 60.0;

/// Orchestrator wiring the scene, pin store, camera director, and async
/// enrichment behind the intent/event boundary.
///
/// The frame step is the only place async outcomes are applied; it performs
/// no I/O and completes in bounded time.
pub struct GlobeController {
    scene: SceneManager,
    store: AnnotationStore,
    director: CameraDirector,
    client: EnrichmentClient,
    inbox: mpsc::UnboundedReceiver<ServiceUpdate>,
    bus: EventBus<GlobeEvent>,
    frame: Frame,
    last_search: Option<PlaceHit>,
    viewport: (f64, f64),
}

impl GlobeController {
    pub fn new(
        catalog: Box<dyn TextureCatalog>,
        services: Arc<dyn GeoServices>,
    ) -> Result<Self, SceneInitError> {
        let scene = SceneManager::new(catalog)?;
        let (client, inbox) = EnrichmentClient::new(services);
        Ok(Self {
            scene,
            store: AnnotationStore::new(),
            director: CameraDirector::default(),
            client,
            inbox,
            bus: EventBus::new(),
            frame: Frame::new(0, FRAME_DT_S),
            last_search: None,
            viewport: DEFAULT_VIEWPORT,
        })
    }

    /// Ingests the persisted journal feed.
    ///
    /// Records carrying the backend's `(0, 0)` "no location" sentinel are
    /// skipped. Journal pins get a country lookup for their flag indicator;
    /// weather stays manual-only (a stored trip has no live conditions worth
    /// showing).
    pub fn load_feed(&mut self, records: Vec<JournalRecord>) {
        for record in records {
            let point = record.location();
            if point.is_null_island() {
                continue;
            }
            let id = self.store.place_journal(
                &mut self.scene,
                PinId::new(record.id),
                point,
                record.title,
                Some(record.place_name),
            );
            self.client.enrich_country(id, point);
        }
    }

    pub fn handle(&mut self, intent: Intent) {
        match intent {
            Intent::Search(query) => {
                // Blank queries are rejected locally inside the client.
                self.client.search(&query);
            }
            Intent::PlacePin => match self.last_search.clone() {
                Some(hit) => self.place_manual_pin(hit),
                None => self.bus.emit(self.frame, GlobeEvent::SearchRequired),
            },
            Intent::RemovePin(id) => {
                if let Err(err) = self.store.remove(&mut self.scene, &id) {
                    debug!("pin removal rejected for {id}: {err}");
                }
            }
            Intent::SetStyle(style) => self.scene.set_style(style),
            Intent::Click { x, y } => self.click(x, y),
            Intent::DragStart => self.director.begin_drag(),
            Intent::DragEnd => self.director.end_drag(),
            Intent::Orbit { dx, dy } => self.director.orbit(dx, dy),
            Intent::Zoom { delta } => self.director.zoom(delta),
            Intent::ToggleRotation => self.director.toggle_rotation(),
            Intent::Resize { width, height } => self.viewport = (width, height),
        }
    }

    /// Advances one frame and returns the events it produced.
    ///
    /// Order: apply async outcomes, advance the camera, advance the scene
    /// (rotation gated by the director), drain the bus.
    pub fn step(&mut self, utc_hour: f64) -> Vec<Stamped<GlobeEvent>> {
        while let Ok(update) = self.inbox.try_recv() {
            self.apply_update(update);
        }

        self.director.update(self.frame.dt_s);
        self.scene
            .step(self.director.rotation_enabled(), utc_hour);

        let events = self.bus.drain();
        self.frame = self.frame.next();
        events
    }

    /// Collects the current frame's draw commands.
    pub fn render(&self) -> RenderFrame {
        Renderer::collect(&self.scene, self.director.camera())
    }

    pub fn camera(&self) -> &Camera3D {
        self.director.camera()
    }

    pub fn director(&self) -> &CameraDirector {
        &self.director
    }

    pub fn scene(&self) -> &SceneManager {
        &self.scene
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// Teardown: every pin handle and texture is released.
    pub fn dispose(&mut self) {
        self.store.dispose_all(&mut self.scene);
        self.scene.dispose();
    }

    fn place_manual_pin(&mut self, hit: PlaceHit) {
        let label = short_label(&hit.label);
        let id = self
            .store
            .place_manual(&mut self.scene, hit.point, label, Some(hit.label));
        self.client.enrich_country(id.clone(), hit.point);
        self.client.enrich_weather(id, hit.point);
    }

    fn click(&mut self, x: f64, y: f64) {
        let (width, height) = self.viewport;
        let picked = self
            .director
            .camera()
            .screen_ray(x, y, width, height)
            .and_then(|ray| self.scene.pick(ray))
            .and_then(|hit| self.store.find_by_handle(hit.handle));

        let event = match picked {
            Some(pin) => GlobeEvent::PinSelected(pin.id.clone()),
            None => GlobeEvent::PinDeselected,
        };
        self.bus.emit(self.frame, event);
    }

    fn apply_update(&mut self, update: ServiceUpdate) {
        match update {
            ServiceUpdate::SearchResolved(hit) => {
                self.director
                    .fly_to(hit.point, FLY_DISTANCE_FACTOR, FLY_DURATION_S);
                self.last_search = Some(hit);
            }
            ServiceUpdate::SearchEmpty { query } | ServiceUpdate::SearchFailed { query } => {
                self.bus
                    .emit(self.frame, GlobeEvent::PlaceNotFound { query });
            }
            ServiceUpdate::Enriched { pin, payload } => {
                // Discarded silently when the pin was removed meanwhile.
                self.store.update_enrichment(&pin, payload);
            }
            ServiceUpdate::WeatherUnavailable { pin } => {
                if self.store.get(&pin).is_some() {
                    self.bus
                        .emit(self.frame, GlobeEvent::WeatherUnavailable(pin));
                }
            }
        }
    }
}

/// First component of a display name ("Paris, Ile-de-France, France" ->
/// "Paris") for the pin label; the full name stays in the description.
fn short_label(display_name: &str) -> String {
    display_name
        .split(',')
        .next()
        .unwrap_or(display_name)
        .trim()
        .to_owned()
}
