use foundation::bounds::Aabb3;
use foundation::geo::GeoPoint;
use foundation::math::{Vec3, spherical};
use tracing::{debug, warn};

use crate::components::{Drawable3D, Material, TextureId};
use crate::entity::RenderHandle;
use crate::picking::{PickHit, PickItem, Ray, pick_ray};
use crate::prefabs::{GlobeLayers, build_globe};
use crate::style::{MapStyle, StyleRequest, TextureCatalog, TextureLoadError, TextureStore};
use crate::world::SceneWorld;

/// Idle spin advance per frame step.
pub const ROTATION_STEP_RAD: f64 = 0.002;
/// The star field drifts at a tenth of the globe rate.
pub const STAR_ROTATION_STEP_RAD: f64 = 0.0002;
/// Pins sit slightly above the surface so they are not z-fighting the sphere.
pub const PIN_SURFACE_RADIUS: f64 = 1.02;

const PIN_RADIUS: f64 = 0.015;
const PIN_HEIGHT: f64 = 0.05;
const PIN_PICK_EXTENT: f64 = 0.04;
const PIN_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// Initialization failure that aborts the subsystem.
///
/// Only the primary surface texture is allowed to be fatal; optional layers
/// degrade inside [`build_globe`].
#[derive(Debug)]
pub enum SceneInitError {
    SurfaceTexture(TextureLoadError),
}

impl std::fmt::Display for SceneInitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneInitError::SurfaceTexture(err) => {
                write!(f, "primary surface texture failed to load: {err}")
            }
        }
    }
}

impl std::error::Error for SceneInitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneInitError::SurfaceTexture(err) => Some(err),
        }
    }
}

/// Owner of the scene graph and the per-frame step.
///
/// Every other component talks to the scene exclusively through this facade:
/// `add_pin` / `remove_pin` / `set_style` / `step` / `pick`. No render handle
/// internals leak out.
pub struct SceneManager {
    world: SceneWorld,
    textures: TextureStore,
    styles: crate::style::StyleController,
    catalog: Box<dyn TextureCatalog>,
    layers: GlobeLayers,
    /// Spawn order retained; picking tie-breaks use it via slot sequences.
    pins: Vec<RenderHandle>,
    rotation_rad: f64,
    star_rotation_rad: f64,
    sun_dir: Vec3,
}

impl SceneManager {
    pub fn new(catalog: Box<dyn TextureCatalog>) -> Result<Self, SceneInitError> {
        let mut world = SceneWorld::new();
        let mut textures = TextureStore::new();
        let (layers, styles) = build_globe(&mut world, &mut textures, catalog.as_ref())?;

        Ok(Self {
            world,
            textures,
            styles,
            catalog,
            layers,
            pins: Vec::new(),
            rotation_rad: 0.0,
            star_rotation_rad: 0.0,
            sun_dir: sun_direction(12.0),
        })
    }

    /// Places a pin marker on the globe surface.
    ///
    /// The pin is parented to the rotating globe frame: its stored transform
    /// and bounds are globe-local, so it follows the idle spin.
    pub fn add_pin(&mut self, point: GeoPoint) -> RenderHandle {
        let local = spherical::to_vector(point, PIN_SURFACE_RADIUS);
        let handle = self.world.spawn();
        self.world
            .set_transform(handle, crate::components::Transform::translate(local));
        self.world.set_drawable(
            handle,
            Drawable3D::cone(PIN_RADIUS, PIN_HEIGHT, Material::flat(PIN_COLOR)),
        );
        self.world
            .set_bounds(handle, Aabb3::around(local.as_array(), PIN_PICK_EXTENT));
        self.pins.push(handle);
        handle
    }

    /// Detaches and disposes a pin in one operation.
    ///
    /// Stale or unknown handles return `false` and change nothing.
    pub fn remove_pin(&mut self, handle: RenderHandle) -> bool {
        if !self.world.despawn(handle) {
            debug!("ignoring removal of unknown render handle {handle:?}");
            return false;
        }
        self.pins.retain(|h| *h != handle);
        true
    }

    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    /// Switches the active surface imagery.
    ///
    /// The sphere geometry and every pin are untouched; only the globe
    /// material's texture changes. A load that resolves for a style the user
    /// has already navigated away from is discarded.
    pub fn set_style(&mut self, style: MapStyle) {
        match self.styles.request(style) {
            StyleRequest::AlreadyActive => {}
            StyleRequest::Swapped(texture) => self.apply_surface_texture(texture),
            StyleRequest::Load(ticket) => match self.catalog.load(style) {
                Ok(data) => {
                    let texture = self.textures.alloc(data);
                    if self.styles.complete(ticket, texture) {
                        self.apply_surface_texture(texture);
                    } else {
                        self.textures.dispose(texture);
                    }
                }
                Err(err) => warn!(
                    "{} style texture unavailable, keeping {}: {err}",
                    style.name(),
                    self.styles.active().name()
                ),
            },
        }
    }

    /// Points the globe material at `texture`, leaving geometry and every
    /// other component untouched.
    fn apply_surface_texture(&mut self, texture: TextureId) {
        let globe = self.layers.globe;
        if let Some(mut drawable) = self.world.drawable(globe) {
            drawable.material.texture = Some(texture);
            self.world.set_drawable(globe, drawable);
        }
    }

    pub fn active_style(&self) -> MapStyle {
        self.styles.active()
    }

    /// Advances one frame: idle spin (when enabled) and the sun light.
    ///
    /// The lit hemisphere is a pure function of the wall-clock UTC hour, not
    /// stored state, so it can never drift.
    pub fn step(&mut self, rotate: bool, utc_hour: f64) {
        if rotate {
            self.rotation_rad += ROTATION_STEP_RAD;
            self.star_rotation_rad += STAR_ROTATION_STEP_RAD;
        }
        self.sun_dir = sun_direction(utc_hour);
    }

    /// Tests a world-space ray against every live pin handle.
    ///
    /// The ray is transformed into the rotating globe frame first, since pin
    /// bounds are globe-local.
    pub fn pick(&self, ray: Ray) -> Option<PickHit> {
        let local_ray = Ray::new(
            rotate_y(ray.origin, -self.rotation_rad),
            rotate_y(ray.dir, -self.rotation_rad),
        );

        let items: Vec<PickItem> = self
            .pins
            .iter()
            .filter_map(|&handle| {
                let bounds = self.world.bounds(handle)?;
                let sequence = self.world.sequence(handle)?;
                Some(PickItem {
                    handle,
                    bounds,
                    sequence,
                })
            })
            .collect();

        pick_ray(&items, local_ray)
    }

    pub fn rotation_rad(&self) -> f64 {
        self.rotation_rad
    }

    pub fn star_rotation_rad(&self) -> f64 {
        self.star_rotation_rad
    }

    pub fn sun_dir(&self) -> Vec3 {
        self.sun_dir
    }

    pub fn layers(&self) -> &GlobeLayers {
        &self.layers
    }

    pub fn world(&self) -> &SceneWorld {
        &self.world
    }

    pub fn resident_texture_count(&self) -> usize {
        self.textures.resident_count()
    }

    /// Teardown: disposes every render handle and releases every texture.
    pub fn dispose(&mut self) {
        self.world.clear();
        self.textures.clear();
        self.pins.clear();
    }
}

/// Direction of sunlight from the UTC hour of day.
///
/// The subsolar point sits on the equator at the longitude where it is solar
/// noon: `(12 - hour) * 15` degrees.
pub fn sun_direction(utc_hour: f64) -> Vec3 {
    let hour = utc_hour.rem_euclid(24.0);
    let subsolar_lon = (12.0 - hour) * 15.0;
    spherical::to_vector(GeoPoint::new(0.0, subsolar_lon), 1.0)
}

fn rotate_y(v: Vec3, angle: f64) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(v.x * cos + v.z * sin, v.y, -v.x * sin + v.z * cos)
}
