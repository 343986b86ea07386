use foundation::math::Vec3;
use scene::SceneManager;
use scene::components::{Material, Shape3D, Transform};

use crate::camera::Camera3D;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderCommand {
    pub transform: Transform,
    pub shape: Shape3D,
    pub material: Material,
}

/// Flat command stream for one frame, consumed by whatever backend draws it.
#[derive(Debug)]
pub struct RenderFrame {
    pub commands: Vec<RenderCommand>,
    /// Rotation applied to globe-parented entities (sphere, overlays, pins).
    pub globe_rotation_rad: f64,
    pub star_rotation_rad: f64,
    pub sun_dir: Vec3,
}

pub struct Renderer;

impl Renderer {
    pub fn collect(scene: &SceneManager, _camera: &Camera3D) -> RenderFrame {
        let mut frame = RenderFrame {
            commands: Vec::new(),
            globe_rotation_rad: scene.rotation_rad(),
            star_rotation_rad: scene.star_rotation_rad(),
            sun_dir: scene.sun_dir(),
        };
        for (_, transform, drawable) in scene.world().drawables() {
            frame.commands.push(RenderCommand {
                transform,
                shape: drawable.shape,
                material: drawable.material,
            });
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::Renderer;
    use crate::camera::Camera3D;
    use foundation::geo::GeoPoint;
    use scene::SceneManager;
    use scene::components::Shape3D;
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

    #[test]
    fn collects_base_layers_and_pins() {
        let mut scene = SceneManager::new(Box::new(SolidCatalog)).expect("scene init");
        scene.add_pin(GeoPoint::new(48.8566, 2.3522));

        let frame = Renderer::collect(&scene, &Camera3D::default());
        // Sphere + atmosphere + stars + one pin.
        assert_eq!(frame.commands.len(), 4);
        assert!(
            frame
                .commands
                .iter()
                .any(|c| matches!(c.shape, Shape3D::Cone { .. }))
        );
        assert!(
            frame
                .commands
                .iter()
                .any(|c| matches!(c.shape, Shape3D::Points { .. }))
        );
    }

    #[test]
    fn frame_carries_rotation_and_sun_state() {
        let mut scene = SceneManager::new(Box::new(SolidCatalog)).expect("scene init");
        scene.step(true, 12.0);
        let frame = Renderer::collect(&scene, &Camera3D::default());
        assert_eq!(frame.globe_rotation_rad, scene.rotation_rad());
        assert!((frame.sun_dir.x - 1.0).abs() < 1e-12);
    }
}
