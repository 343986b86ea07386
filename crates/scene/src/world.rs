use foundation::bounds::Aabb3;
use foundation::handles::Handle;
use foundation::math::Vec3;

use crate::components::{Drawable3D, PointCloudId, Transform};
use crate::entity::RenderHandle;

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    alive: bool,
    /// Monotonic spawn order, never reused. Picking ties resolve on it.
    sequence: u64,
    transform: Option<Transform>,
    drawable: Option<Drawable3D>,
    bounds: Option<Aabb3>,
}

/// Entity storage for the scene graph.
///
/// Slots are reused through a free list; each despawn bumps the slot's
/// generation so stale [`RenderHandle`]s stop resolving. All iteration is in
/// ascending slot-index order for determinism.
#[derive(Debug, Default)]
pub struct SceneWorld {
    slots: Vec<Slot>,
    free: Vec<u32>,
    next_sequence: u64,
    point_clouds: Vec<Vec<Vec3>>,
}

impl SceneWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self) -> RenderHandle {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.alive = true;
        slot.sequence = sequence;
        slot.transform = None;
        slot.drawable = None;
        slot.bounds = None;

        RenderHandle(Handle::new(index, slot.generation))
    }

    /// Despawns the entity and frees its slot.
    ///
    /// Returns `false` for stale or unknown handles; the world is unchanged.
    pub fn despawn(&mut self, handle: RenderHandle) -> bool {
        let Some(slot) = self.slot_mut(handle) else {
            return false;
        };
        slot.alive = false;
        slot.generation = slot.generation.wrapping_add(1);
        slot.transform = None;
        slot.drawable = None;
        slot.bounds = None;
        self.free.push(handle.index());
        true
    }

    pub fn alive(&self, handle: RenderHandle) -> bool {
        self.slot(handle).is_some()
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.alive).count()
    }

    pub fn set_transform(&mut self, handle: RenderHandle, transform: Transform) {
        if let Some(slot) = self.slot_mut(handle) {
            slot.transform = Some(transform);
        }
    }

    pub fn set_drawable(&mut self, handle: RenderHandle, drawable: Drawable3D) {
        if let Some(slot) = self.slot_mut(handle) {
            slot.drawable = Some(drawable);
        }
    }

    pub fn set_bounds(&mut self, handle: RenderHandle, bounds: Aabb3) {
        if let Some(slot) = self.slot_mut(handle) {
            slot.bounds = Some(bounds);
        }
    }

    pub fn transform(&self, handle: RenderHandle) -> Option<Transform> {
        self.slot(handle).and_then(|s| s.transform)
    }

    pub fn drawable(&self, handle: RenderHandle) -> Option<Drawable3D> {
        self.slot(handle).and_then(|s| s.drawable)
    }

    pub fn bounds(&self, handle: RenderHandle) -> Option<Aabb3> {
        self.slot(handle).and_then(|s| s.bounds)
    }

    pub fn sequence(&self, handle: RenderHandle) -> Option<u64> {
        self.slot(handle).map(|s| s.sequence)
    }

    pub fn add_point_cloud(&mut self, points: Vec<Vec3>) -> PointCloudId {
        let id = PointCloudId(self.point_clouds.len() as u32);
        self.point_clouds.push(points);
        id
    }

    pub fn point_cloud(&self, id: PointCloudId) -> Option<&[Vec3]> {
        self.point_clouds.get(id.0 as usize).map(|v| v.as_slice())
    }

    /// Live drawable entities in ascending slot-index order.
    pub fn drawables(&self) -> Vec<(RenderHandle, Transform, Drawable3D)> {
        let mut out = Vec::new();
        for (idx, slot) in self.slots.iter().enumerate() {
            if !slot.alive {
                continue;
            }
            let Some(drawable) = slot.drawable else {
                continue;
            };
            let transform = slot.transform.unwrap_or_else(Transform::identity);
            out.push((
                RenderHandle(Handle::new(idx as u32, slot.generation)),
                transform,
                drawable,
            ));
        }
        out
    }

    /// Drops every entity and point cloud.
    pub fn clear(&mut self) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.alive {
                slot.alive = false;
                slot.generation = slot.generation.wrapping_add(1);
                slot.transform = None;
                slot.drawable = None;
                slot.bounds = None;
                self.free.push(idx as u32);
            }
        }
        self.point_clouds.clear();
    }

    fn slot(&self, handle: RenderHandle) -> Option<&Slot> {
        let slot = self.slots.get(handle.index() as usize)?;
        (slot.alive && slot.generation == handle.generation()).then_some(slot)
    }

    fn slot_mut(&mut self, handle: RenderHandle) -> Option<&mut Slot> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        (slot.alive && slot.generation == handle.generation()).then_some(slot)
    }
}
