//! Scene backend that records mutations instead of rendering.

#![allow(dead_code)]

use std::collections::HashMap;

use bevy_math::Vec3;
use garden_views::scene::{MeshSpec, OutlineSpec, SceneBackend};

#[derive(Default, Debug)]
pub struct CountingScene {
    next: u64,
    pub mutations: usize,
    pub meshes: HashMap<u64, Vec3>,
    pub gizmo: Option<u64>,
}

impl CountingScene {
    pub fn take_mutations(&mut self) -> usize {
        std::mem::take(&mut self.mutations)
    }

    pub fn live(&self) -> usize {
        self.meshes.len()
    }
}

impl SceneBackend for CountingScene {
    type Handle = u64;

    fn create_mesh(&mut self, spec: &MeshSpec) -> u64 {
        self.next += 1;
        self.mutations += 1;
        self.meshes.insert(self.next, spec.translation);
        self.next
    }

    fn set_translation(&mut self, handle: &u64, translation: Vec3) {
        self.mutations += 1;
        self.meshes.insert(*handle, translation);
    }

    fn create_outline(&mut self, _source: &u64, translation: Vec3, _spec: &OutlineSpec) -> u64 {
        self.next += 1;
        self.mutations += 1;
        self.meshes.insert(self.next, translation);
        self.next
    }

    fn dispose(&mut self, handle: u64) {
        self.mutations += 1;
        self.meshes.remove(&handle);
    }

    fn attach_gizmo(&mut self, target: &u64) {
        self.mutations += 1;
        self.gizmo = Some(*target);
    }

    fn detach_gizmo(&mut self) {
        self.mutations += 1;
        self.gizmo = None;
    }
}
