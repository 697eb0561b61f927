//! [`SceneBackend`] over Bevy entities and assets.

use bevy::prelude::*;
use bevy_asset::Assets;
use bevy_camera::visibility::RenderLayers;
use bevy_mesh::Mesh;
use bevy_render::render_resource::Face;

use super::components::{MoveHandle, OutlineMesh, PlantMesh};
use super::resources::GizmoAssets;
use crate::garden::PLAN_SPHERE_RADIUS;
use crate::scene::{MeshShape, MeshSpec, OutlineSpec, SceneBackend, ViewKind};

/// One spawned mesh entity together with the assets it owns.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneHandle {
    pub entity: Entity,
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
    /// Uniform scale kept across translation updates.
    pub scale: f32,
}

impl SceneHandle {
    fn transform(&self, translation: Vec3) -> Transform {
        Transform::from_translation(translation).with_scale(Vec3::splat(self.scale))
    }
}

/// Short-lived view of the ECS handed to one view's reconciler.
pub struct BevyScene<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    meshes: &'a mut Assets<Mesh>,
    materials: &'a mut Assets<StandardMaterial>,
    gizmo_assets: &'a GizmoAssets,
    gizmo_entity: &'a mut Option<Entity>,
    layers: RenderLayers,
}

impl<'a, 'w, 's> BevyScene<'a, 'w, 's> {
    pub fn new(
        view: ViewKind,
        commands: &'a mut Commands<'w, 's>,
        meshes: &'a mut Assets<Mesh>,
        materials: &'a mut Assets<StandardMaterial>,
        gizmo_assets: &'a GizmoAssets,
        gizmo_entity: &'a mut Option<Entity>,
    ) -> Self {
        Self {
            commands,
            meshes,
            materials,
            gizmo_assets,
            gizmo_entity,
            layers: RenderLayers::layer(view.render_layer()),
        }
    }

    fn build_mesh(shape: MeshShape) -> Mesh {
        match shape {
            MeshShape::Cuboid { size } => Cuboid::new(size, size, size).into(),
            MeshShape::Sphere { radius } => Sphere::new(radius).mesh().uv(32, 18),
        }
    }
}

impl SceneBackend for BevyScene<'_, '_, '_> {
    type Handle = SceneHandle;

    fn create_mesh(&mut self, spec: &MeshSpec) -> SceneHandle {
        let mesh = self.meshes.add(Self::build_mesh(spec.shape));
        let material = self.materials.add(StandardMaterial {
            base_color: spec.color.into(),
            perceptual_roughness: 0.6,
            ..default()
        });

        let entity = self
            .commands
            .spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_translation(spec.translation),
                PlantMesh {
                    plant_id: spec.plant_id.clone(),
                },
                self.layers.clone(),
            ))
            .id();

        SceneHandle {
            entity,
            mesh,
            material,
            scale: 1.0,
        }
    }

    fn set_translation(&mut self, handle: &SceneHandle, translation: Vec3) {
        if let Ok(mut entity) = self.commands.get_entity(handle.entity) {
            entity.insert(handle.transform(translation));
        }
    }

    fn create_outline(
        &mut self,
        source: &SceneHandle,
        translation: Vec3,
        spec: &OutlineSpec,
    ) -> SceneHandle {
        let geometry = self
            .meshes
            .get(&source.mesh)
            .cloned()
            .unwrap_or_else(|| Sphere::new(PLAN_SPHERE_RADIUS).mesh().uv(32, 18));
        let mesh = self.meshes.add(geometry);
        // Front faces culled so only the enlarged back shell shows around the plant.
        let material = self.materials.add(StandardMaterial {
            base_color: spec.color.into(),
            unlit: true,
            cull_mode: Some(Face::Front),
            ..default()
        });

        let transform =
            Transform::from_translation(translation).with_scale(Vec3::splat(spec.scale));
        let entity = self
            .commands
            .spawn((
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                transform,
                OutlineMesh,
                self.layers.clone(),
            ))
            .id();

        SceneHandle {
            entity,
            mesh,
            material,
            scale: spec.scale,
        }
    }

    fn dispose(&mut self, handle: SceneHandle) {
        if let Ok(mut entity) = self.commands.get_entity(handle.entity) {
            entity.try_despawn();
        }
        self.meshes.remove(&handle.mesh);
        self.materials.remove(&handle.material);
    }

    fn attach_gizmo(&mut self, target: &SceneHandle) {
        self.detach_gizmo();
        let gizmo = self
            .commands
            .spawn((
                Mesh3d(self.gizmo_assets.mesh.clone()),
                MeshMaterial3d(self.gizmo_assets.material.clone()),
                Transform::default(),
                MoveHandle,
                self.layers.clone(),
            ))
            .id();
        if let Ok(mut parent) = self.commands.get_entity(target.entity) {
            parent.add_child(gizmo);
        }
        *self.gizmo_entity = Some(gizmo);
    }

    fn detach_gizmo(&mut self) {
        if let Some(gizmo) = self.gizmo_entity.take() {
            if let Ok(mut entity) = self.commands.get_entity(gizmo) {
                entity.try_despawn();
            }
        }
    }
}
