use std::fmt;

use bevy_math::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scene::{MeshShape, MeshSpec, ViewKind};

/// Height at which plan-view meshes sit, regardless of the plant's `y`.
pub const PLAN_MESH_HEIGHT: f32 = 0.5;
pub const ELEVATION_CUBE_SIZE: f32 = 1.0;
pub const PLAN_SPHERE_RADIUS: f32 = 0.5;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantId(String);

impl PlantId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Fresh id: a UUIDv7 carries a millisecond timestamp plus random bits.
    pub fn generate() -> Self {
        Self(format!("plant-{}", Uuid::now_v7().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlantId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantPosition {
    pub x: f32,
    /// Height above ground; only the elevation view shows it.
    pub y: f32,
    pub z: f32,
}

impl PlantPosition {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl From<Vec3> for PlantPosition {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Partial position update: only the axes that are `Some` change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionPatch {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

impl PositionPatch {
    pub const fn x(x: f32) -> Self {
        Self {
            x: Some(x),
            y: None,
            z: None,
        }
    }

    pub const fn y(y: f32) -> Self {
        Self {
            x: None,
            y: Some(y),
            z: None,
        }
    }

    pub const fn z(z: f32) -> Self {
        Self {
            x: None,
            y: None,
            z: Some(z),
        }
    }

    pub const fn xz(x: f32, z: f32) -> Self {
        Self {
            x: Some(x),
            y: None,
            z: Some(z),
        }
    }

    pub fn apply(self, position: PlantPosition) -> PlantPosition {
        PlantPosition {
            x: self.x.unwrap_or(position.x),
            y: self.y.unwrap_or(position.y),
            z: self.z.unwrap_or(position.z),
        }
    }
}

/// Packed `0xRRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantColor(pub u32);

impl PlantColor {
    pub const DEFAULT: Self = Self(0x4a90d9);

    pub const fn rgb_u8(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        )
    }
}

impl Default for PlantColor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<PlantColor> for bevy::prelude::Color {
    #[inline]
    fn from(c: PlantColor) -> Self {
        let (r, g, b) = c.rgb_u8();
        bevy::prelude::Color::srgb_u8(r, g, b)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    id: PlantId,
    name: String,
    position: PlantPosition,
    color: PlantColor,
    selected: bool,
    is_moving: bool,
}

impl Plant {
    pub fn new(
        id: PlantId,
        name: impl Into<String>,
        position: PlantPosition,
        color: PlantColor,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            color,
            selected: false,
            is_moving: false,
        }
    }

    pub fn id(&self) -> &PlantId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> PlantPosition {
        self.position
    }

    pub fn color(&self) -> PlantColor {
        self.color
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    // Mutators stay crate-private: selection exclusivity is owned by the store.

    pub(crate) fn set_position(&mut self, patch: PositionPatch) -> bool {
        let next = patch.apply(self.position);
        let changed = next != self.position;
        self.position = next;
        changed
    }

    pub(crate) fn set_selected(&mut self, selected: bool) -> bool {
        let changed = self.selected != selected;
        self.selected = selected;
        changed
    }

    pub(crate) fn set_is_moving(&mut self, is_moving: bool) -> bool {
        let changed = self.is_moving != is_moving;
        self.is_moving = is_moving;
        changed
    }

    /// Flips only this plant; does not touch the rest of the collection.
    pub(crate) fn toggle_selected(&mut self) {
        self.selected = !self.selected;
    }

    /// Unit cube resting on the plant's height.
    pub fn elevation_mesh(&self) -> MeshSpec {
        MeshSpec {
            plant_id: self.id.clone(),
            shape: MeshShape::Cuboid {
                size: ELEVATION_CUBE_SIZE,
            },
            translation: self.elevation_translation(),
            color: self.color,
        }
    }

    /// Sphere at a fixed height above the ground plane.
    pub fn plan_mesh(&self) -> MeshSpec {
        MeshSpec {
            plant_id: self.id.clone(),
            shape: MeshShape::Sphere {
                radius: PLAN_SPHERE_RADIUS,
            },
            translation: self.plan_translation(),
            color: self.color,
        }
    }

    pub fn elevation_translation(&self) -> Vec3 {
        Vec3::new(
            self.position.x,
            self.position.y + ELEVATION_CUBE_SIZE * 0.5,
            self.position.z,
        )
    }

    pub fn plan_translation(&self) -> Vec3 {
        Vec3::new(self.position.x, PLAN_MESH_HEIGHT, self.position.z)
    }

    pub fn mesh_for(&self, view: ViewKind) -> MeshSpec {
        match view {
            ViewKind::Elevation => self.elevation_mesh(),
            ViewKind::Plan => self.plan_mesh(),
        }
    }

    pub fn translation_for(&self, view: ViewKind) -> Vec3 {
        match view {
            ViewKind::Elevation => self.elevation_translation(),
            ViewKind::Plan => self.plan_translation(),
        }
    }
}
