//! Render-side view of the garden.
//!
//! The renderer itself is external; everything here talks to it through
//! [`SceneBackend`]. Each view owns a [`ViewReconciler`] that keeps the
//! backend's mesh set equal to the plant collection.
//!
//! ```text
//! PlantStore ──(revision moved)──> ViewReconciler::reconcile
//!                                     ├─ dispose stale meshes + outlines
//!                                     ├─ create missing meshes
//!                                     ├─ move existing meshes
//!                                     ├─ (plan) outline sub-pass
//!                                     └─ (plan) gizmo attach / detach
//! ```

pub mod gizmo;
pub mod reconcile;

pub use gizmo::*;
pub use reconcile::*;

use bevy_math::{Ray3d, Vec3};

use crate::config::ViewStyle;
use crate::garden::{PlantColor, PlantId};
use crate::input::picking::{ray_aabb_hit_t, ray_sphere_hit_t};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Perspective view from the side, shows plant height.
    Elevation,
    /// Top-down orthographic view used for XZ placement.
    Plan,
}

impl ViewKind {
    pub const ALL: [ViewKind; 2] = [ViewKind::Elevation, ViewKind::Plan];

    /// Only the plan view draws selection outlines and the move gizmo.
    pub fn shows_selection(self) -> bool {
        matches!(self, ViewKind::Plan)
    }

    /// Render layer carrying this view's meshes (layer 0 is left to Bevy defaults).
    pub fn render_layer(self) -> usize {
        match self {
            ViewKind::Elevation => 1,
            ViewKind::Plan => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewKind::Elevation => "elevation",
            ViewKind::Plan => "plan",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeshShape {
    Cuboid { size: f32 },
    Sphere { radius: f32 },
}

impl MeshShape {
    /// Distance along `ray` to this shape centered at `center`, scaled uniformly.
    ///
    /// The editor only hits spheres (plan picking). Cuboids answer for hosts
    /// that pick elevation meshes with [`perspective_ray`](crate::input::picking::perspective_ray).
    pub fn hit(&self, ray: &Ray3d, center: Vec3, scale: f32) -> Option<f32> {
        match *self {
            MeshShape::Cuboid { size } => {
                let half = Vec3::splat(size * scale * 0.5);
                ray_aabb_hit_t(ray.origin, *ray.direction, center - half, center + half)
            }
            MeshShape::Sphere { radius } => ray_sphere_hit_t(ray, center, radius * scale),
        }
    }
}

/// Everything the renderer needs to build one plant mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshSpec {
    /// Tag used to map hit-test results back to the plant.
    pub plant_id: PlantId,
    pub shape: MeshShape,
    pub translation: Vec3,
    pub color: PlantColor,
}

/// Highlight drawn behind a selected plant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutlineSpec {
    pub color: PlantColor,
    /// Uniform scale relative to the source mesh.
    pub scale: f32,
}

impl Default for OutlineSpec {
    fn default() -> Self {
        Self {
            color: PlantColor(0xffff00),
            scale: 1.2,
        }
    }
}

impl From<&ViewStyle> for OutlineSpec {
    fn from(style: &ViewStyle) -> Self {
        Self {
            color: style.outline_color,
            scale: style.outline_scale,
        }
    }
}

/// Scene-graph operations a view needs from the renderer.
///
/// `dispose` must both detach the mesh from the scene and free its
/// geometry and material.
pub trait SceneBackend {
    type Handle: Clone + PartialEq + std::fmt::Debug;

    fn create_mesh(&mut self, spec: &MeshSpec) -> Self::Handle;

    fn set_translation(&mut self, handle: &Self::Handle, translation: Vec3);

    /// Clone `source`'s geometry with a highlight material, scaled up and
    /// placed at `translation`.
    fn create_outline(
        &mut self,
        source: &Self::Handle,
        translation: Vec3,
        spec: &OutlineSpec,
    ) -> Self::Handle;

    fn dispose(&mut self, handle: Self::Handle);

    fn attach_gizmo(&mut self, target: &Self::Handle);

    fn detach_gizmo(&mut self);
}
