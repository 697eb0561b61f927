use bevy::log::debug;
use bevy_math::Vec2;

use super::SceneBackend;
use crate::garden::{PlantId, PositionPatch};

/// Which plant mesh the move handle is currently attached to.
#[derive(Debug)]
pub struct MoveGizmo<H> {
    attached: Option<(PlantId, H)>,
}

impl<H> Default for MoveGizmo<H> {
    fn default() -> Self {
        Self { attached: None }
    }
}

impl<H: Clone + PartialEq + std::fmt::Debug> MoveGizmo<H> {
    pub fn attached_plant(&self) -> Option<&PlantId> {
        self.attached.as_ref().map(|(id, _)| id)
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    /// Attach to `target`, or detach when `None`. Returns whether the
    /// backend was touched.
    pub fn sync<B>(&mut self, target: Option<(&PlantId, &H)>, scene: &mut B) -> bool
    where
        B: SceneBackend<Handle = H>,
    {
        let unchanged = matches!(
            (target, &self.attached),
            (Some((id, handle)), Some((current_id, current)))
                if current_id == id && current == handle
        );
        if unchanged {
            return false;
        }

        match target {
            Some((id, handle)) => {
                scene.attach_gizmo(handle);
                debug!("move gizmo attached to {}", id);
                self.attached = Some((id.clone(), handle.clone()));
                true
            }
            None => self.detach(scene),
        }
    }

    pub fn detach<B>(&mut self, scene: &mut B) -> bool
    where
        B: SceneBackend<Handle = H>,
    {
        if self.attached.take().is_some() {
            scene.detach_gizmo();
            true
        } else {
            false
        }
    }
}

/// An in-progress gizmo drag in ground coordinates `(x, z)`.
#[derive(Clone, Debug, PartialEq)]
pub struct GizmoDrag {
    pub plant_id: PlantId,
    /// Plant position minus the grab point, so the plant does not jump
    /// under the pointer.
    pub grab_offset: Vec2,
}

impl GizmoDrag {
    pub fn new(plant_id: PlantId, plant_xz: Vec2, grab_xz: Vec2) -> Self {
        Self {
            plant_id,
            grab_offset: plant_xz - grab_xz,
        }
    }

    pub fn patch_for(&self, pointer_xz: Vec2) -> PositionPatch {
        let target = pointer_xz + self.grab_offset;
        PositionPatch::xz(target.x, target.y)
    }
}
