//! Per-view driver: projection, reconciliation and input for one pane.

use bevy::log::{debug, info};
use bevy_math::Vec2;

use crate::config::EditorConfig;
use crate::garden::{CameraState, GardenContext, OrthographicFrame, PerspectivePose};
use crate::input::{PointerButton, PointerController};
use crate::layout::ViewportRect;
use crate::scene::{OutlineSpec, ReconcileReport, SceneBackend, ViewKind, ViewReconciler};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SurfaceState {
    /// Waiting for the renderer to mount a drawable surface.
    #[default]
    Pending,
    Ready,
    Disposed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewProjection {
    Orthographic(OrthographicFrame),
    Perspective(PerspectivePose),
}

impl ViewProjection {
    pub fn for_view(kind: ViewKind, camera: &CameraState, aspect: f32) -> Self {
        match kind {
            ViewKind::Plan => ViewProjection::Orthographic(camera.orthographic(aspect)),
            ViewKind::Elevation => ViewProjection::Perspective(camera.perspective(aspect)),
        }
    }
}

/// What one [`ViewDriver::sync`] call produced.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewSync {
    /// New camera projection, when the camera or viewport changed.
    pub projection: Option<ViewProjection>,
    pub report: ReconcileReport,
}

/// Owns everything one view derives from the shared [`GardenContext`].
///
/// The driver polls the context once per frame through [`sync`](Self::sync)
/// and only does work when a revision moved since the previous call.
#[derive(Debug)]
pub struct ViewDriver<H> {
    kind: ViewKind,
    reconciler: ViewReconciler<H>,
    controller: PointerController,
    viewport: ViewportRect,
    state: SurfaceState,
    seen_camera: Option<u64>,
    seen_plants: Option<u64>,
}

impl<H: Clone + PartialEq + std::fmt::Debug> ViewDriver<H> {
    pub fn new(kind: ViewKind, config: &EditorConfig) -> Self {
        Self {
            kind,
            reconciler: ViewReconciler::new(kind, OutlineSpec::from(&config.style)),
            controller: PointerController::new(kind, config.interaction.clone()),
            viewport: ViewportRect::default(),
            state: SurfaceState::Pending,
            seen_camera: None,
            seen_plants: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    #[inline]
    pub fn state(&self) -> SurfaceState {
        self.state
    }

    #[inline]
    pub fn viewport(&self) -> ViewportRect {
        self.viewport
    }

    pub fn reconciler(&self) -> &ViewReconciler<H> {
        &self.reconciler
    }

    pub fn controller(&self) -> &PointerController {
        &self.controller
    }

    /// Returns whether the rectangle changed. A change forces a new projection.
    pub fn set_viewport(&mut self, viewport: ViewportRect) -> bool {
        if self.viewport == viewport {
            return false;
        }
        self.viewport = viewport;
        self.seen_camera = None;
        true
    }

    /// The renderer's surface exists; deferred gizmo attachment may proceed.
    pub fn surface_ready(&mut self) {
        if self.state == SurfaceState::Pending {
            info!("{} view surface ready", self.kind.label());
            self.state = SurfaceState::Ready;
            self.seen_plants = None;
        }
    }

    pub fn projection(&self, camera: &CameraState) -> ViewProjection {
        ViewProjection::for_view(self.kind, camera, self.viewport.aspect())
    }

    pub fn sync<B>(&mut self, garden: &GardenContext, scene: &mut B) -> ViewSync
    where
        B: SceneBackend<Handle = H>,
    {
        let mut out = ViewSync::default();
        if self.state == SurfaceState::Disposed {
            return out;
        }

        let camera_rev = garden.camera.revision();
        if self.seen_camera != Some(camera_rev) && !self.viewport.is_empty() {
            out.projection = Some(self.projection(&garden.camera));
            self.seen_camera = Some(camera_rev);
        }

        let plants_rev = garden.plants.revision();
        if self.seen_plants != Some(plants_rev) {
            out.report = self.reconciler.reconcile(
                &garden.plants,
                scene,
                self.state == SurfaceState::Ready,
            );
            self.seen_plants = Some(plants_rev);
        }

        out
    }

    pub fn pointer_down(&mut self, button: PointerButton, position: Vec2, garden: &mut GardenContext) {
        if self.state != SurfaceState::Disposed {
            self.controller
                .pointer_down(button, position, &self.viewport, garden, &self.reconciler);
        }
    }

    pub fn pointer_move(&mut self, position: Vec2, garden: &mut GardenContext) {
        if self.state != SurfaceState::Disposed {
            self.controller.pointer_move(position, &self.viewport, garden);
        }
    }

    pub fn pointer_up(&mut self, position: Vec2, garden: &mut GardenContext) {
        if self.state != SurfaceState::Disposed {
            self.controller
                .pointer_up(position, &self.viewport, garden, &self.reconciler);
        }
    }

    pub fn pointer_leave(&mut self, garden: &mut GardenContext) {
        if self.state != SurfaceState::Disposed {
            self.controller.pointer_leave(garden);
        }
    }

    pub fn wheel(&mut self, delta: f32, garden: &mut GardenContext) {
        if self.state != SurfaceState::Disposed {
            self.controller.wheel(delta, garden);
        }
    }

    /// Tear the view down: cancel input in progress, detach the gizmo and
    /// dispose every mesh this view created. Calling it again does nothing.
    pub fn dispose<B>(&mut self, garden: &mut GardenContext, scene: &mut B) -> ReconcileReport
    where
        B: SceneBackend<Handle = H>,
    {
        if self.state == SurfaceState::Disposed {
            return ReconcileReport::default();
        }
        self.controller.pointer_leave(garden);
        let report = self.reconciler.clear(scene);
        self.state = SurfaceState::Disposed;
        debug!("{} view disposed: {:?}", self.kind.label(), report);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::garden::{PlantPosition, PositionPatch};
    use crate::scene::testing::{Op, RecordingScene};

    fn driver(kind: ViewKind) -> ViewDriver<u32> {
        let mut driver = ViewDriver::new(kind, &EditorConfig::default());
        driver.set_viewport(ViewportRect::new(Vec2::ZERO, Vec2::new(800.0, 400.0)));
        driver
    }

    #[test]
    fn first_sync_builds_projection_and_meshes() {
        let mut garden = GardenContext::new();
        garden.seed_default_plant();
        let mut scene = RecordingScene::default();
        let mut view = driver(ViewKind::Plan);

        let out = view.sync(&garden, &mut scene);
        let Some(ViewProjection::Orthographic(frame)) = out.projection else {
            panic!("plan view should be orthographic");
        };
        assert_eq!(frame.height(), 10.0);
        assert_eq!(frame.width(), 20.0);
        assert_eq!(out.report.added, 1);
    }

    #[test]
    fn unchanged_context_produces_nothing() {
        let mut garden = GardenContext::new();
        garden.seed_default_plant();
        let mut scene = RecordingScene::default();
        let mut view = driver(ViewKind::Elevation);

        view.sync(&garden, &mut scene);
        scene.take_ops();
        let out = view.sync(&garden, &mut scene);

        assert_eq!(out, ViewSync::default());
        assert!(scene.ops.is_empty());
    }

    #[test]
    fn both_views_observe_one_mutation() {
        let mut garden = GardenContext::new();
        let id = garden.seed_default_plant().unwrap();
        let mut scene = RecordingScene::default();
        let mut plan = driver(ViewKind::Plan);
        let mut elevation = driver(ViewKind::Elevation);
        plan.sync(&garden, &mut scene);
        elevation.sync(&garden, &mut scene);

        garden.plants.update_plant_position(&id, PositionPatch::x(2.0));
        garden.camera.zoom_by(1.1);

        let p = plan.sync(&garden, &mut scene);
        let e = elevation.sync(&garden, &mut scene);
        assert_eq!(p.report.moved, 1);
        assert_eq!(e.report.moved, 1);
        assert!(p.projection.is_some());
        assert!(matches!(e.projection, Some(ViewProjection::Perspective(_))));
    }

    #[test]
    fn gizmo_attaches_after_surface_ready() {
        let mut garden = GardenContext::new();
        let id = garden.seed_default_plant().unwrap();
        garden.plants.select_plant(&id);
        let mut scene = RecordingScene::default();
        let mut plan = driver(ViewKind::Plan);

        plan.sync(&garden, &mut scene);
        assert_eq!(scene.gizmo, None);

        plan.surface_ready();
        let out = plan.sync(&garden, &mut scene);
        assert_eq!(out.report.gizmo_changes, 1);
        assert_eq!(scene.gizmo, plan.reconciler().handle_of(&id).copied());
    }

    #[test]
    fn zero_sized_pane_skips_projection() {
        let garden = GardenContext::new();
        let mut scene = RecordingScene::default();
        let mut view = ViewDriver::<u32>::new(ViewKind::Plan, &EditorConfig::default());

        assert!(view.sync(&garden, &mut scene).projection.is_none());

        view.set_viewport(ViewportRect::new(Vec2::ZERO, Vec2::new(300.0, 300.0)));
        assert!(view.sync(&garden, &mut scene).projection.is_some());
    }

    #[test]
    fn resize_recomputes_projection() {
        let garden = GardenContext::new();
        let mut scene = RecordingScene::default();
        let mut view = driver(ViewKind::Elevation);
        view.sync(&garden, &mut scene);

        view.set_viewport(ViewportRect::new(Vec2::ZERO, Vec2::new(400.0, 400.0)));
        let Some(ViewProjection::Perspective(pose)) = view.sync(&garden, &mut scene).projection
        else {
            panic!("elevation view should be perspective");
        };
        assert_eq!(pose.aspect, 1.0);
    }

    #[test]
    fn dispose_is_idempotent_and_final() {
        let mut garden = GardenContext::new();
        let id = garden.seed_default_plant().unwrap();
        garden.plants.select_plant(&id);
        let mut scene = RecordingScene::default();
        let mut plan = driver(ViewKind::Plan);
        plan.surface_ready();
        plan.sync(&garden, &mut scene);
        scene.take_ops();

        let report = plan.dispose(&mut garden, &mut scene);
        assert_eq!(report.removed, 1);
        assert_eq!(report.outlines_removed, 1);
        assert_eq!(scene.live_count(), 0);
        assert!(scene.take_ops().contains(&Op::Detach));

        assert!(plan.dispose(&mut garden, &mut scene).is_noop());
        garden
            .plants
            .create_plant("late", PlantPosition::ORIGIN, None);
        assert!(plan.sync(&garden, &mut scene).report.is_noop());
        assert!(scene.ops.is_empty());
        assert_eq!(plan.state(), SurfaceState::Disposed);
    }

    #[test]
    fn dispose_while_pending_cancels_gizmo_attach() {
        let mut garden = GardenContext::new();
        let id = garden.seed_default_plant().unwrap();
        garden.plants.select_plant(&id);
        let mut scene = RecordingScene::default();
        let mut plan = driver(ViewKind::Plan);

        plan.dispose(&mut garden, &mut scene);
        plan.surface_ready();
        let out = plan.sync(&garden, &mut scene);

        assert!(out.report.is_noop());
        assert!(scene.ops.is_empty());
        assert_eq!(scene.gizmo, None);
        assert_eq!(plan.state(), SurfaceState::Disposed);
    }

    #[test]
    fn late_surface_after_dispose_attaches_nothing() {
        let mut garden = GardenContext::new();
        let id = garden.seed_default_plant().unwrap();
        garden.plants.select_plant(&id);
        let mut scene = RecordingScene::default();
        let mut plan = driver(ViewKind::Plan);

        // Meshes and outline exist before the surface does; the gizmo waits.
        plan.sync(&garden, &mut scene);
        assert!(!scene.take_ops().iter().any(|op| matches!(op, Op::Attach(_))));

        plan.dispose(&mut garden, &mut scene);
        assert_eq!(scene.live_count(), 0);
        scene.take_ops();

        plan.surface_ready();
        garden.plants.update_plant_position(&id, PositionPatch::x(2.0));
        plan.sync(&garden, &mut scene);

        assert!(scene.ops.is_empty());
        assert_eq!(scene.gizmo, None);
    }

    #[test]
    fn dispose_ends_gizmo_drag() {
        let mut garden = GardenContext::new();
        let id = garden.seed_default_plant().unwrap();
        garden.plants.select_plant(&id);
        let mut scene = RecordingScene::default();
        let mut plan = driver(ViewKind::Plan);
        plan.surface_ready();
        plan.sync(&garden, &mut scene);

        // Pane center is the camera target, where the plant sits.
        plan.pointer_down(PointerButton::Primary, Vec2::new(400.0, 200.0), &mut garden);
        assert!(garden.plants.get_plant(&id).unwrap().is_moving());

        plan.dispose(&mut garden, &mut scene);
        assert!(!garden.plants.get_plant(&id).unwrap().is_moving());
    }
}
