//! Domain state shared by both views: the plant collection and the camera.

pub mod camera;
pub mod plant;
pub mod store;

pub use camera::*;
pub use plant::*;
pub use store::*;

use crate::config::EditorConfig;

/// The one mutable context both view drivers are built against.
///
/// Views never hold plants; they read this context and keep derived meshes.
/// Change propagation goes through the stores' revision counters.
#[derive(Clone, Debug, Default)]
pub struct GardenContext {
    pub camera: CameraState,
    pub plants: PlantStore,
}

impl GardenContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        let mut garden = Self {
            camera: CameraState::from_config(&config.camera),
            plants: PlantStore::new(),
        };
        if config.seed_plant {
            garden.seed_default_plant();
        }
        garden
    }

    /// Add the starter plant when the garden is empty.
    pub fn seed_default_plant(&mut self) -> Option<PlantId> {
        if !self.plants.is_empty() {
            return None;
        }
        let plant = self.plants.create_plant(
            "Test Plant",
            PlantPosition::ORIGIN,
            Some(PlantColor::DEFAULT),
        );
        Some(plant.id().clone())
    }

    /// Combined revision, handy for "did anything change" checks.
    pub fn revision(&self) -> (u64, u64) {
        (self.camera.revision(), self.plants.revision())
    }
}
