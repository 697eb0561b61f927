//! Pointer and wheel handling for one view.
//!
//! The controller is a small state machine fed with window-space pointer
//! positions. It mutates the shared [`GardenContext`] directly; the views
//! pick the changes up on their next sync.

pub mod picking;

use bevy::log::{debug, trace};
use bevy_math::Vec2;

use crate::config::InteractionConfig;
use crate::garden::{GardenContext, PLAN_MESH_HEIGHT};
use crate::layout::ViewportRect;
use crate::scene::{GizmoDrag, ViewKind, ViewReconciler};

pub use picking::{ground_point, perspective_ray, plan_ray};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Other(u16),
}

impl PointerButton {
    /// DOM-style button code: 0 primary, 1 middle.
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => PointerButton::Primary,
            1 => PointerButton::Middle,
            other => PointerButton::Other(other),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionMode {
    /// Any press pans the camera immediately.
    PanZoom,
    /// A still click selects; movement past the threshold pans.
    SelectAndMove,
}

#[derive(Clone, Debug, Default, PartialEq)]
enum DragState {
    #[default]
    Idle,
    Pressed {
        origin: Vec2,
        last: Vec2,
    },
    Panning {
        last: Vec2,
    },
    Gizmo(GizmoDrag),
}

#[derive(Clone, Debug)]
pub struct PointerController {
    view: ViewKind,
    settings: InteractionConfig,
    state: DragState,
}

impl PointerController {
    pub fn new(view: ViewKind, settings: InteractionConfig) -> Self {
        Self {
            view,
            settings,
            state: DragState::Idle,
        }
    }

    pub fn mode(&self, garden: &GardenContext) -> InteractionMode {
        match self.view {
            ViewKind::Plan if !garden.plants.is_empty() => InteractionMode::SelectAndMove,
            _ => InteractionMode::PanZoom,
        }
    }

    /// A press, pan or gizmo drag is in progress.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.state, DragState::Panning { .. })
    }

    pub fn gizmo_drag(&self) -> Option<&GizmoDrag> {
        match &self.state {
            DragState::Gizmo(drag) => Some(drag),
            _ => None,
        }
    }

    pub fn pointer_down<H>(
        &mut self,
        button: PointerButton,
        position: Vec2,
        viewport: &ViewportRect,
        garden: &mut GardenContext,
        targets: &ViewReconciler<H>,
    ) where
        H: Clone + PartialEq + std::fmt::Debug,
    {
        if self.gizmo_drag().is_some() {
            return;
        }

        match (self.mode(garden), button) {
            (_, PointerButton::Other(_)) => {}
            (InteractionMode::PanZoom, _) | (InteractionMode::SelectAndMove, PointerButton::Middle) => {
                self.state = DragState::Panning { last: position };
            }
            (InteractionMode::SelectAndMove, PointerButton::Primary) => {
                if let Some(drag) = self.try_grab_gizmo(position, viewport, garden, targets) {
                    debug!("gizmo drag started on {}", drag.plant_id);
                    garden.plants.set_plant_moving(&drag.plant_id, true);
                    self.state = DragState::Gizmo(drag);
                } else {
                    self.state = DragState::Pressed {
                        origin: position,
                        last: position,
                    };
                }
            }
        }
    }

    pub fn pointer_move(
        &mut self,
        position: Vec2,
        viewport: &ViewportRect,
        garden: &mut GardenContext,
    ) {
        match &mut self.state {
            DragState::Idle => {}
            DragState::Pressed { origin, last } => {
                if position.distance(*origin) > self.settings.drag_threshold_px {
                    let from = *origin;
                    self.state = DragState::Panning { last: position };
                    pan_by(garden, position - from, viewport);
                } else {
                    *last = position;
                }
            }
            DragState::Panning { last } => {
                let delta = position - *last;
                *last = position;
                pan_by(garden, delta, viewport);
            }
            DragState::Gizmo(drag) => {
                let held = garden
                    .plants
                    .get_plant(&drag.plant_id)
                    .is_some_and(|p| p.is_selected());
                if !held {
                    debug!("gizmo target {} gone or deselected, ending drag", drag.plant_id);
                    if let DragState::Gizmo(drag) = std::mem::take(&mut self.state) {
                        end_gizmo_drag(&drag, garden);
                    }
                    return;
                }
                let ray = plan_ray(&garden.camera, viewport.to_ndc(position), viewport.aspect());
                if let Some(pointer_xz) = ground_point(&ray, PLAN_MESH_HEIGHT) {
                    garden
                        .plants
                        .update_plant_position(&drag.plant_id, drag.patch_for(pointer_xz));
                }
            }
        }
    }

    pub fn pointer_up<H>(
        &mut self,
        position: Vec2,
        viewport: &ViewportRect,
        garden: &mut GardenContext,
        targets: &ViewReconciler<H>,
    ) where
        H: Clone + PartialEq + std::fmt::Debug,
    {
        match std::mem::take(&mut self.state) {
            DragState::Pressed { .. } => self.click(position, viewport, garden, targets),
            DragState::Gizmo(drag) => end_gizmo_drag(&drag, garden),
            DragState::Panning { .. } | DragState::Idle => {}
        }
    }

    /// Pointer left the view: cancel whatever was in progress without clicking.
    pub fn pointer_leave(&mut self, garden: &mut GardenContext) {
        if let DragState::Gizmo(drag) = std::mem::take(&mut self.state) {
            end_gizmo_drag(&drag, garden);
        }
    }

    /// Positive `delta` is scroll-down and zooms out.
    pub fn wheel(&mut self, delta: f32, garden: &mut GardenContext) {
        if self.gizmo_drag().is_some() || !delta.is_finite() {
            return;
        }
        let speed = self.settings.zoom_speed;
        if delta > 0.0 {
            garden.camera.zoom_by(1.0 + speed);
        } else if delta < 0.0 {
            garden.camera.zoom_by(1.0 - speed);
        }
        trace!("{} wheel -> zoom {}", self.view.label(), garden.camera.zoom());
    }

    fn click<H>(
        &self,
        position: Vec2,
        viewport: &ViewportRect,
        garden: &mut GardenContext,
        targets: &ViewReconciler<H>,
    ) where
        H: Clone + PartialEq + std::fmt::Debug,
    {
        let ray = plan_ray(&garden.camera, viewport.to_ndc(position), viewport.aspect());
        match targets.pick(&ray) {
            Some(id) => {
                debug!("selected {}", id);
                garden.plants.select_plant(&id);
            }
            None => garden.plants.deselect_all(),
        }
    }

    fn try_grab_gizmo<H>(
        &self,
        position: Vec2,
        viewport: &ViewportRect,
        garden: &GardenContext,
        targets: &ViewReconciler<H>,
    ) -> Option<GizmoDrag>
    where
        H: Clone + PartialEq + std::fmt::Debug,
    {
        let ray = plan_ray(&garden.camera, viewport.to_ndc(position), viewport.aspect());
        let (id, center) = targets.gizmo_grab(&ray, self.settings.gizmo_grab_factor)?;
        let plant = garden.plants.get_plant(&id)?;
        let grab_xz = ground_point(&ray, center.y)?;
        let at = plant.position();
        Some(GizmoDrag::new(id, Vec2::new(at.x, at.z), grab_xz))
    }
}

fn pan_by(garden: &mut GardenContext, pixel_delta: Vec2, viewport: &ViewportRect) {
    let world = garden
        .camera
        .screen_delta_to_world(pixel_delta, viewport.height());
    garden.camera.pan(world.x, world.y);
}

fn end_gizmo_drag(drag: &GizmoDrag, garden: &mut GardenContext) {
    debug!("gizmo drag ended on {}", drag.plant_id);
    garden.plants.set_plant_moving(&drag.plant_id, false);
}
