//! Headless viewer: wires the globe core to a texture catalog, an optional
//! journal feed file, and a frame loop, logging the events it produces.
//!
//! Environment:
//! - `TEXTURE_ROOT` — directory with `day.jpg`, `night.jpg`, ... plus
//!   optional `clouds.jpg` / `borders.jpg`; falls back to built-in solid
//!   textures when unset.
//! - `GLOBE_FEED` — JSON file of journal records to pin at startup.
//! - `GLOBE_STYLE` — style to switch to mid-run (`night`, `terrain`, ...).
//! - First CLI argument — a place to search and then pin.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Timelike;
use enrichment::http::OpenGeoServices;
use globe::{GlobeController, Intent, JournalRecord};
use scene::style::{MapStyle, Overlay, TextureCatalog, TextureData, TextureLoadError};
use tracing::info;
use tracing_subscriber::EnvFilter;

const FRAMES: u64 = 600;
const PIN_AT_FRAME: u64 = 240;
const STYLE_AT_FRAME: u64 = 120;

/// Loads imagery from a directory of JPEGs.
struct FsCatalog {
    root: PathBuf,
}

impl FsCatalog {
    fn read(&self, name: &str) -> Result<TextureData, TextureLoadError> {
        let path = self.root.join(format!("{name}.jpg"));
        let img = image::open(&path).map_err(|err| {
            TextureLoadError::with_source(format!("failed to load {}", path.display()), err)
        })?;
        let rgba = img.to_rgba8();
        Ok(TextureData::new(rgba.width(), rgba.height(), rgba.into_raw()))
    }
}

impl TextureCatalog for FsCatalog {
    fn load(&self, style: MapStyle) -> Result<TextureData, TextureLoadError> {
        self.read(style.name())
    }

    fn load_overlay(&self, overlay: Overlay) -> Result<TextureData, TextureLoadError> {
        self.read(overlay.name())
    }
}

/// Solid-color fallback so the viewer runs without any assets on disk.
struct BuiltinCatalog;

impl TextureCatalog for BuiltinCatalog {
    fn load(&self, style: MapStyle) -> Result<TextureData, TextureLoadError> {
        let color = match style {
            MapStyle::Day => [30, 90, 200, 255],
            MapStyle::Night => [5, 5, 30, 255],
            MapStyle::Terrain => [80, 120, 60, 255],
            MapStyle::Street => [220, 220, 210, 255],
        };
        Ok(TextureData::solid(64, 32, color))
    }

    fn load_overlay(&self, overlay: Overlay) -> Result<TextureData, TextureLoadError> {
        Err(TextureLoadError::new(format!(
            "no built-in {} overlay",
            overlay.name()
        )))
    }
}

fn utc_hour() -> f64 {
    let now = chrono::Utc::now();
    now.hour() as f64 + now.minute() as f64 / 60.0
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let catalog: Box<dyn TextureCatalog> = match env::var("TEXTURE_ROOT") {
        Ok(root) => {
            info!("loading textures from {root}");
            Box::new(FsCatalog { root: root.into() })
        }
        Err(_) => Box::new(BuiltinCatalog),
    };

    let services = Arc::new(OpenGeoServices::new()?);
    let mut globe = GlobeController::new(catalog, services)?;

    if let Ok(path) = env::var("GLOBE_FEED") {
        let body = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read feed file {path}"))?;
        let records: Vec<JournalRecord> =
            serde_json::from_str(&body).context("failed to parse feed file")?;
        globe.load_feed(records);
        info!("placed {} journal pins", globe.store().len());
    }

    let query = env::args().nth(1);
    let searching = query.is_some();
    if let Some(query) = query {
        info!("searching for {query:?}");
        globe.handle(Intent::Search(query));
    }

    let style: Option<MapStyle> = match env::var("GLOBE_STYLE") {
        Ok(name) => Some(name.parse().context("bad GLOBE_STYLE")?),
        Err(_) => None,
    };

    let mut ticker = tokio::time::interval(Duration::from_millis(16));
    for frame in 0..FRAMES {
        ticker.tick().await;

        if let Some(style) = style {
            if frame == STYLE_AT_FRAME {
                info!("switching style to {}", style.name());
                globe.handle(Intent::SetStyle(style));
            }
        }

        if searching && frame == PIN_AT_FRAME {
            globe.handle(Intent::PlacePin);
        }

        for stamped in globe.step(utc_hour()) {
            info!("frame {}: {:?}", stamped.frame_index, stamped.event);
        }
    }

    let frame = globe.render();
    info!(
        "final frame: {} draw commands, rotation {:.3} rad, {} pins",
        frame.commands.len(),
        frame.globe_rotation_rad,
        globe.store().len()
    );
    for pin in globe.store().iter() {
        info!(
            "pin {}: {} [{}] country={:?} weather={:?}",
            pin.id,
            pin.label,
            if pin.is_removable() { "manual" } else { "journal" },
            pin.enrichment.country_code,
            pin.enrichment.weather.as_ref().map(|w| &w.summary)
        );
    }

    globe.dispose();
    Ok(())
}
