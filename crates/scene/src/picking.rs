use foundation::bounds::Aabb3;
use foundation::math::Vec3;
use foundation::math::precision::stable_total_cmp_f64;

use crate::entity::RenderHandle;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

/// One pickable target: a pin handle with its globe-local bounds and the
/// spawn sequence used for tie-breaking.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickItem {
    pub handle: RenderHandle,
    pub bounds: Aabb3,
    pub sequence: u64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub handle: RenderHandle,
    pub distance: f64,
    pub point: Vec3,
}

/// Deterministic ray picking over pin bounds.
///
/// Ordering contract:
/// - The closest entry distance along the (normalized) ray wins.
/// - Exact distance ties resolve to the item with the lower spawn sequence.
///
/// The candidate set is small (one item per placed pin), so this is a plain
/// linear scan over slab tests rather than an acceleration structure.
pub fn pick_ray(items: &[PickItem], ray: Ray) -> Option<PickHit> {
    let dir = ray.dir.normalized()?;

    let mut best: Option<(f64, u64, RenderHandle)> = None;
    for item in items {
        let Some(t) = ray_aabb_hit_t(ray.origin, dir, item.bounds, 0.0, f64::INFINITY) else {
            continue;
        };

        best = match best {
            None => Some((t, item.sequence, item.handle)),
            Some((bt, bseq, bh)) => {
                let ord =
                    stable_total_cmp_f64(t, bt).then_with(|| item.sequence.cmp(&bseq));
                if ord.is_lt() {
                    Some((t, item.sequence, item.handle))
                } else {
                    Some((bt, bseq, bh))
                }
            }
        };
    }

    let (t, _seq, handle) = best?;
    Some(PickHit {
        handle,
        distance: t,
        point: ray.origin + dir.scale(t),
    })
}

fn ray_aabb_hit_t(
    origin: Vec3,
    dir: Vec3,
    bounds: Aabb3,
    mut t_min: f64,
    mut t_max: f64,
) -> Option<f64> {
    // Slabs intersection; returns entry distance.
    let origin = origin.as_array();
    let dir = dir.as_array();
    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        let (min, max) = (bounds.min[axis], bounds.max[axis]);

        if d.abs() < 1e-12 {
            if o < min || o > max {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t1 = (min - o) * inv;
        let mut t2 = (max - o) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }

        t_min = t_min.max(t1);
        t_max = t_max.min(t2);
        if t_max < t_min {
            return None;
        }
    }

    Some(t_min.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::{PickItem, Ray, pick_ray};
    use crate::entity::RenderHandle;
    use foundation::bounds::Aabb3;
    use foundation::handles::Handle;
    use foundation::math::Vec3;

    fn item(index: u32, sequence: u64, center: [f64; 3]) -> PickItem {
        PickItem {
            handle: RenderHandle(Handle::new(index, 0)),
            bounds: Aabb3::around(center, 1.0),
            sequence,
        }
    }

    #[test]
    fn picks_nearest_hit_regardless_of_item_order() {
        let near = item(0, 10, [5.0, 0.0, 0.0]);
        let far = item(1, 2, [10.0, 0.0, 0.0]);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));

        for items in [[near, far], [far, near]] {
            let hit = pick_ray(&items, ray).expect("hit");
            assert_eq!(hit.handle, near.handle);
            assert!(hit.distance >= 4.0 && hit.distance <= 6.0);
        }
    }

    #[test]
    fn exact_ties_resolve_to_lower_sequence() {
        let earlier = item(3, 1, [5.0, 0.0, 0.0]);
        let later = item(2, 7, [5.0, 0.0, 0.0]);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));

        let hit = pick_ray(&[later, earlier], ray).expect("hit");
        assert_eq!(hit.handle, earlier.handle);
    }

    #[test]
    fn misses_return_none() {
        let items = [item(0, 0, [5.0, 10.0, 0.0])];
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        assert!(pick_ray(&items, ray).is_none());
    }

    #[test]
    fn degenerate_direction_is_rejected() {
        let items = [item(0, 0, [5.0, 0.0, 0.0])];
        assert!(pick_ray(&items, Ray::new(Vec3::ZERO, Vec3::ZERO)).is_none());
    }
}
