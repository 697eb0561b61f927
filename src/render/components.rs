use bevy::prelude::*;

use super::backend::SceneHandle;
use crate::config::EditorConfig;
use crate::garden::PlantId;
use crate::scene::ViewKind;
use crate::view::ViewDriver;

/// Lives on each view's camera entity.
#[derive(Component)]
pub struct GardenView {
    pub driver: ViewDriver<SceneHandle>,
    /// Torus entity parented to the selected plant's mesh, plan view only.
    pub gizmo_entity: Option<Entity>,
}

impl GardenView {
    pub fn new(kind: ViewKind, config: &EditorConfig) -> Self {
        Self {
            driver: ViewDriver::new(kind, config),
            gizmo_entity: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> ViewKind {
        self.driver.kind()
    }
}

/// Render mesh of one plant in one view. The id is what picking resolves to.
#[derive(Component, Clone, Debug)]
pub struct PlantMesh {
    pub plant_id: PlantId,
}

#[derive(Component)]
pub struct OutlineMesh;

#[derive(Component)]
pub struct MoveHandle;

#[derive(Component)]
pub struct GroundPlane;

#[derive(Component)]
pub struct ViewLight;
