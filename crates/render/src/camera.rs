use foundation::math::Vec3;
use scene::picking::Ray;

const MIN_DISTANCE: f64 = 1.1;
const MAX_DISTANCE: f64 = 50.0;
const ORBIT_SENSITIVITY: f64 = 0.01;
const ELEVATION_LIMIT: f64 = std::f64::consts::FRAC_PI_2 - 0.01;

/// Perspective camera aimed at a target point (usually the globe center).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_rad: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for Camera3D {
    fn default() -> Self {
        // Three globe radii out, matching the initial framing of the globe.
        Self::look_at(
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::ZERO,
            75.0_f64.to_radians(),
            0.1,
            1000.0,
        )
    }
}

impl Camera3D {
    pub fn look_at(position: Vec3, target: Vec3, fov_y_rad: f64, near: f64, far: f64) -> Self {
        Self {
            position,
            target,
            fov_y_rad,
            near,
            far,
        }
    }

    pub fn distance(&self) -> f64 {
        (self.position - self.target).length()
    }

    /// Orbits around the target (mouse drag), keeping the distance fixed.
    ///
    /// Elevation is clamped short of the poles so the view never flips.
    pub fn orbit(&mut self, delta_x: f64, delta_y: f64) {
        let offset = self.position - self.target;
        let distance = offset.length();
        if distance <= 0.0 {
            return;
        }

        let mut azimuth = offset.x.atan2(offset.z);
        let mut elevation = (offset.y / distance).clamp(-1.0, 1.0).asin();

        azimuth += delta_x * ORBIT_SENSITIVITY;
        elevation = (elevation + delta_y * ORBIT_SENSITIVITY).clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);

        self.position = self.target
            + Vec3::new(
                distance * elevation.cos() * azimuth.sin(),
                distance * elevation.sin(),
                distance * elevation.cos() * azimuth.cos(),
            );
    }

    /// Zooms along the view axis (mouse wheel), clamped so the camera never
    /// enters the globe or drifts out of sight.
    pub fn zoom(&mut self, delta: f64) {
        let offset = self.position - self.target;
        let Some(dir) = offset.normalized() else {
            return;
        };
        let distance = (offset.length() * (1.0 - delta * 0.1)).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.position = self.target + dir.scale(distance);
    }

    /// Builds a world-space ray through a pointer position.
    ///
    /// `(x, y)` are in pixels with the origin at the top-left of the
    /// viewport. Returns `None` for a degenerate camera or viewport.
    pub fn screen_ray(&self, x: f64, y: f64, width: f64, height: f64) -> Option<Ray> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }

        let forward = (self.target - self.position).normalized()?;
        let up_hint = if forward.cross(Vec3::new(0.0, 1.0, 0.0)).length() > 1e-9 {
            Vec3::new(0.0, 1.0, 0.0)
        } else {
            Vec3::new(0.0, 0.0, 1.0)
        };
        let right = forward.cross(up_hint).normalized()?;
        let up = right.cross(forward);

        let ndc_x = 2.0 * x / width - 1.0;
        let ndc_y = 1.0 - 2.0 * y / height;
        let tan_half = (self.fov_y_rad * 0.5).tan();
        let aspect = width / height;

        let dir = (forward
            + right.scale(ndc_x * tan_half * aspect)
            + up.scale(ndc_y * tan_half))
        .normalized()?;

        Some(Ray::new(self.position, dir))
    }
}

#[cfg(test)]
mod tests {
    use super::Camera3D;
    use foundation::math::Vec3;

    #[test]
    fn center_ray_points_at_the_target() {
        let camera = Camera3D::default();
        let ray = camera.screen_ray(400.0, 300.0, 800.0, 600.0).expect("ray");
        assert_eq!(ray.origin, camera.position);
        // Looking down -Z toward the origin.
        assert!(ray.dir.z < -0.999);
        assert!(ray.dir.x.abs() < 1e-9);
        assert!(ray.dir.y.abs() < 1e-9);
    }

    #[test]
    fn orbit_preserves_distance() {
        let mut camera = Camera3D::default();
        let before = camera.distance();
        camera.orbit(35.0, -12.0);
        assert!((camera.distance() - before).abs() < 1e-9);
        assert_ne!(camera.position, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn zoom_clamps_inside_limits() {
        let mut camera = Camera3D::default();
        for _ in 0..200 {
            camera.zoom(1.0);
        }
        assert!((camera.distance() - 1.1).abs() < 1e-9);

        for _ in 0..200 {
            camera.zoom(-1.0);
        }
        assert!((camera.distance() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_viewport_yields_no_ray() {
        let camera = Camera3D::default();
        assert!(camera.screen_ray(0.0, 0.0, 0.0, 600.0).is_none());
    }
}
