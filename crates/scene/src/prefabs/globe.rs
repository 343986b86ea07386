use foundation::math::Vec3;
use tracing::warn;

use crate::components::{Drawable3D, Material};
use crate::entity::RenderHandle;
use crate::manager::SceneInitError;
use crate::style::{MapStyle, Overlay, StyleController, TextureCatalog, TextureStore};
use crate::world::SceneWorld;

/// Unit sphere; every other radius in the scene is relative to this.
pub const GLOBE_RADIUS: f64 = 1.0;
pub const ATMOSPHERE_RADIUS: f64 = 1.05;
pub const CLOUD_RADIUS: f64 = 1.01;
pub const BORDER_RADIUS: f64 = 1.002;

pub const STAR_COUNT: usize = 5000;
pub const STAR_FIELD_EXTENT: f64 = 1000.0;
const STAR_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

const ATMOSPHERE_TINT: [f32; 4] = [0.2, 0.6, 1.0, 1.0];
const ATMOSPHERE_OPACITY: f32 = 0.3;
const CLOUD_OPACITY: f32 = 0.4;

/// Handles to the fixed globe layers, built once at initialization.
///
/// `clouds` and `borders` are absent when their imagery failed to load; the
/// globe renders without them.
#[derive(Debug)]
pub struct GlobeLayers {
    pub globe: RenderHandle,
    pub atmosphere: RenderHandle,
    pub stars: RenderHandle,
    pub clouds: Option<RenderHandle>,
    pub borders: Option<RenderHandle>,
}

pub fn build_globe(
    world: &mut SceneWorld,
    store: &mut TextureStore,
    catalog: &dyn TextureCatalog,
) -> Result<(GlobeLayers, StyleController), SceneInitError> {
    // The primary surface texture is the one load that must succeed.
    let surface = catalog
        .load(MapStyle::Day)
        .map_err(SceneInitError::SurfaceTexture)?;
    let surface_tex = store.alloc(surface);
    let styles = StyleController::new(MapStyle::Day, surface_tex);

    let globe = world.spawn();
    world.set_drawable(
        globe,
        Drawable3D::sphere(GLOBE_RADIUS, Material::textured(surface_tex)),
    );

    let atmosphere = world.spawn();
    world.set_drawable(
        atmosphere,
        Drawable3D::sphere(
            ATMOSPHERE_RADIUS,
            Material::tinted(ATMOSPHERE_TINT, ATMOSPHERE_OPACITY).with_back_side(),
        ),
    );

    let star_cloud = world.add_point_cloud(star_positions(STAR_COUNT, STAR_SEED));
    let stars = world.spawn();
    world.set_drawable(stars, Drawable3D::points(star_cloud, Material::flat([1.0; 4])));

    let clouds = match catalog.load_overlay(Overlay::Clouds) {
        Ok(data) => {
            let tex = store.alloc(data);
            let e = world.spawn();
            world.set_drawable(
                e,
                Drawable3D::sphere(
                    CLOUD_RADIUS,
                    Material::textured(tex).with_opacity(CLOUD_OPACITY),
                ),
            );
            Some(e)
        }
        Err(err) => {
            warn!("cloud layer unavailable, continuing without it: {err}");
            None
        }
    };

    let borders = match catalog.load_overlay(Overlay::Borders) {
        Ok(data) => {
            let tex = store.alloc(data);
            let e = world.spawn();
            world.set_drawable(
                e,
                Drawable3D::sphere(BORDER_RADIUS, Material::textured(tex)),
            );
            Some(e)
        }
        Err(err) => {
            warn!("border overlay unavailable, continuing without it: {err}");
            None
        }
    };

    Ok((
        GlobeLayers {
            globe,
            atmosphere,
            stars,
            clouds,
            borders,
        },
        styles,
    ))
}

/// Fixed-seed star field so scenes are reproducible across runs.
fn star_positions(count: usize, mut state: u64) -> Vec<Vec3> {
    let mut next_unit = move || {
        // xorshift64
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    (0..count)
        .map(|_| {
            Vec3::new(
                (next_unit() - 0.5) * 2.0 * STAR_FIELD_EXTENT,
                (next_unit() - 0.5) * 2.0 * STAR_FIELD_EXTENT,
                (next_unit() - 0.5) * 2.0 * STAR_FIELD_EXTENT,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{STAR_COUNT, STAR_FIELD_EXTENT, build_globe, star_positions};
    use crate::style::{
        MapStyle, Overlay, TextureCatalog, TextureData, TextureLoadError, TextureStore,
    };
    use crate::world::SceneWorld;

    struct StubCatalog {
        surface_ok: bool,
        overlays_ok: bool,
    }

    impl TextureCatalog for StubCatalog {
        fn load(&self, style: MapStyle) -> Result<TextureData, TextureLoadError> {
            if self.surface_ok {
                Ok(TextureData::solid(2, 2, [0, 0, 255, 255]))
            } else {
                Err(TextureLoadError::new(format!(
                    "no {} surface texture",
                    style.name()
                )))
            }
        }

        fn load_overlay(&self, overlay: Overlay) -> Result<TextureData, TextureLoadError> {
            if self.overlays_ok {
                Ok(TextureData::solid(2, 2, [255, 255, 255, 128]))
            } else {
                Err(TextureLoadError::new(format!("no {} overlay", overlay.name())))
            }
        }
    }

    #[test]
    fn builds_all_layers_when_textures_resolve() {
        let mut world = SceneWorld::new();
        let mut store = TextureStore::new();
        let catalog = StubCatalog {
            surface_ok: true,
            overlays_ok: true,
        };
        let (layers, styles) = build_globe(&mut world, &mut store, &catalog).expect("build");
        assert!(layers.clouds.is_some());
        assert!(layers.borders.is_some());
        assert_eq!(world.live_count(), 5);
        assert_eq!(styles.active(), MapStyle::Day);
        assert_eq!(store.resident_count(), 3);
    }

    #[test]
    fn overlay_failure_degrades_without_error() {
        let mut world = SceneWorld::new();
        let mut store = TextureStore::new();
        let catalog = StubCatalog {
            surface_ok: true,
            overlays_ok: false,
        };
        let (layers, _styles) = build_globe(&mut world, &mut store, &catalog).expect("build");
        assert!(layers.clouds.is_none());
        assert!(layers.borders.is_none());
        assert_eq!(world.live_count(), 3);
    }

    #[test]
    fn surface_failure_is_fatal() {
        let mut world = SceneWorld::new();
        let mut store = TextureStore::new();
        let catalog = StubCatalog {
            surface_ok: false,
            overlays_ok: true,
        };
        assert!(build_globe(&mut world, &mut store, &catalog).is_err());
    }

    #[test]
    fn star_field_is_deterministic_and_bounded() {
        let a = star_positions(STAR_COUNT, 42);
        let b = star_positions(STAR_COUNT, 42);
        assert_eq!(a, b);
        assert!(a.iter().all(|p| {
            p.x.abs() <= STAR_FIELD_EXTENT
                && p.y.abs() <= STAR_FIELD_EXTENT
                && p.z.abs() <= STAR_FIELD_EXTENT
        }));
    }
}
