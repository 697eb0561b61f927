use std::collections::{HashMap, HashSet};

use bevy::log::{debug, trace};
use bevy_math::{Ray3d, Vec3};

use super::{MeshShape, MoveGizmo, OutlineSpec, SceneBackend, ViewKind};
use crate::garden::{PlantId, PlantStore};

#[derive(Debug)]
struct Outline<H> {
    handle: H,
    translation: Vec3,
}

#[derive(Debug)]
struct MeshSlot<H> {
    mesh: H,
    shape: MeshShape,
    translation: Vec3,
    outline: Option<Outline<H>>,
}

/// Counts of scene-graph mutations performed by one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub removed: usize,
    pub added: usize,
    pub moved: usize,
    pub outlines_added: usize,
    pub outlines_removed: usize,
    pub outlines_moved: usize,
    pub gizmo_changes: usize,
}

impl ReconcileReport {
    pub fn mutations(&self) -> usize {
        self.removed
            + self.added
            + self.moved
            + self.outlines_added
            + self.outlines_removed
            + self.outlines_moved
            + self.gizmo_changes
    }

    pub fn is_noop(&self) -> bool {
        self.mutations() == 0
    }
}

/// Per-view cache of render meshes keyed by plant id.
///
/// After every [`reconcile`](Self::reconcile) the cached id set equals the
/// store's id set. Running a pass without an intervening store change
/// performs no backend calls.
#[derive(Debug)]
pub struct ViewReconciler<H> {
    view: ViewKind,
    cache: HashMap<PlantId, MeshSlot<H>>,
    outline: OutlineSpec,
    gizmo: MoveGizmo<H>,
}

impl<H: Clone + PartialEq + std::fmt::Debug> ViewReconciler<H> {
    pub fn new(view: ViewKind, outline: OutlineSpec) -> Self {
        Self {
            view,
            cache: HashMap::new(),
            outline,
            gizmo: MoveGizmo::default(),
        }
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn contains(&self, id: &PlantId) -> bool {
        self.cache.contains_key(id)
    }

    pub fn cached_ids(&self) -> impl Iterator<Item = &PlantId> + '_ {
        self.cache.keys()
    }

    pub fn handle_of(&self, id: &PlantId) -> Option<&H> {
        self.cache.get(id).map(|slot| &slot.mesh)
    }

    pub fn outline_of(&self, id: &PlantId) -> Option<&H> {
        self.cache
            .get(id)
            .and_then(|slot| slot.outline.as_ref())
            .map(|o| &o.handle)
    }

    pub fn gizmo(&self) -> &MoveGizmo<H> {
        &self.gizmo
    }

    /// Bring the backend in line with `plants`.
    ///
    /// `gizmo_enabled` is false until the view's surface exists; while
    /// false the gizmo stays detached.
    pub fn reconcile<B>(
        &mut self,
        plants: &PlantStore,
        scene: &mut B,
        gizmo_enabled: bool,
    ) -> ReconcileReport
    where
        B: SceneBackend<Handle = H>,
    {
        let mut report = ReconcileReport::default();

        // Removals first, so an id never has two live meshes.
        let current: HashSet<&PlantId> = plants.ids().collect();
        let mut stale: Vec<PlantId> = self
            .cache
            .keys()
            .filter(|id| !current.contains(id))
            .cloned()
            .collect();
        stale.sort();

        for id in stale {
            let Some(slot) = self.cache.remove(&id) else {
                continue;
            };
            if let Some(outline) = slot.outline {
                scene.dispose(outline.handle);
                report.outlines_removed += 1;
            }
            scene.dispose(slot.mesh);
            report.removed += 1;
        }

        for plant in plants.plant_list() {
            match self.cache.get_mut(plant.id()) {
                Some(slot) => {
                    let translation = plant.translation_for(self.view);
                    if slot.translation != translation {
                        scene.set_translation(&slot.mesh, translation);
                        slot.translation = translation;
                        report.moved += 1;
                    }
                }
                None => {
                    let spec = plant.mesh_for(self.view);
                    let mesh = scene.create_mesh(&spec);
                    self.cache.insert(
                        plant.id().clone(),
                        MeshSlot {
                            mesh,
                            shape: spec.shape,
                            translation: spec.translation,
                            outline: None,
                        },
                    );
                    report.added += 1;
                }
            }
        }

        if self.view.shows_selection() {
            let selected = plants.selected_plant().map(|p| p.id().clone());
            self.sync_outlines(plants, selected.as_ref(), scene, &mut report);

            let target = if gizmo_enabled {
                selected
                    .as_ref()
                    .and_then(|id| self.cache.get(id).map(|slot| (id, &slot.mesh)))
            } else {
                None
            };
            if self.gizmo.sync(target, scene) {
                report.gizmo_changes += 1;
            }
        }

        if report.is_noop() {
            trace!("{} view: reconcile no-op", self.view.label());
        } else {
            debug!("{} view reconciled: {:?}", self.view.label(), report);
        }
        report
    }

    fn sync_outlines<B>(
        &mut self,
        plants: &PlantStore,
        selected: Option<&PlantId>,
        scene: &mut B,
        report: &mut ReconcileReport,
    ) where
        B: SceneBackend<Handle = H>,
    {
        for id in plants.ids() {
            let Some(slot) = self.cache.get_mut(id) else {
                continue;
            };
            let translation = slot.translation;

            if selected == Some(id) {
                if let Some(outline) = slot.outline.as_mut() {
                    if outline.translation != translation {
                        scene.set_translation(&outline.handle, translation);
                        outline.translation = translation;
                        report.outlines_moved += 1;
                    }
                } else {
                    let handle = scene.create_outline(&slot.mesh, translation, &self.outline);
                    slot.outline = Some(Outline {
                        handle,
                        translation,
                    });
                    report.outlines_added += 1;
                }
            } else if let Some(outline) = slot.outline.take() {
                scene.dispose(outline.handle);
                report.outlines_removed += 1;
            }
        }
    }

    /// Dispose everything this view created. Used on teardown.
    pub fn clear<B>(&mut self, scene: &mut B) -> ReconcileReport
    where
        B: SceneBackend<Handle = H>,
    {
        let mut report = ReconcileReport::default();
        if self.gizmo.detach(scene) {
            report.gizmo_changes += 1;
        }

        let mut slots: Vec<_> = self.cache.drain().collect();
        slots.sort_by(|a, b| a.0.cmp(&b.0));
        for (_, slot) in slots {
            if let Some(outline) = slot.outline {
                scene.dispose(outline.handle);
                report.outlines_removed += 1;
            }
            scene.dispose(slot.mesh);
            report.removed += 1;
        }
        report
    }

    /// Nearest cached mesh hit by `ray`.
    pub fn pick(&self, ray: &Ray3d) -> Option<PlantId> {
        self.cache
            .iter()
            .filter_map(|(id, slot)| {
                slot.shape
                    .hit(ray, slot.translation, 1.0)
                    .filter(|t| *t >= 0.0)
                    .map(|t| (id, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)))
            .map(|(id, _)| id.clone())
    }

    /// The gizmo's plant and mesh center when `ray` lands inside its grab radius.
    pub fn gizmo_grab(&self, ray: &Ray3d, grab_factor: f32) -> Option<(PlantId, Vec3)> {
        let id = self.gizmo.attached_plant()?;
        let slot = self.cache.get(id)?;
        slot.shape
            .hit(ray, slot.translation, grab_factor.max(1.0))
            .map(|_| (id.clone(), slot.translation))
    }
}
