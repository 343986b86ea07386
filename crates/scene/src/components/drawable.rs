use super::material::Material;

/// Handle into the scene's point-cloud geometry pool.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PointCloudId(pub u32);

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape3D {
    Sphere { radius: f64 },
    /// Surface marker, apex pointing away from the globe center.
    Cone { radius: f64, height: f64 },
    Points { cloud: PointCloudId },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Drawable3D {
    pub shape: Shape3D,
    pub material: Material,
}

impl Drawable3D {
    pub fn sphere(radius: f64, material: Material) -> Self {
        Self {
            shape: Shape3D::Sphere { radius },
            material,
        }
    }

    pub fn cone(radius: f64, height: f64, material: Material) -> Self {
        Self {
            shape: Shape3D::Cone { radius, height },
            material,
        }
    }

    pub fn points(cloud: PointCloudId, material: Material) -> Self {
        Self {
            shape: Shape3D::Points { cloud },
            material,
        }
    }
}
