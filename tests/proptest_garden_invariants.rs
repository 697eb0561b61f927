//! Property-based invariant tests for the shared garden state and the
//! per-view reconciler:
//!
//! 1. Zoom stays within bounds for any pan / zoom sequence.
//! 2. Exclusive select leaves exactly the target selected, or nothing.
//! 3. Toggling never produces more than one selected plant.
//! 4. A second reconcile pass without store changes is a no-op.
//! 5. The mesh cache mirrors the store after every pass.

mod common;

use std::collections::BTreeSet;

use common::CountingScene;
use garden_views::garden::{CameraState, PlantId, PlantPosition, PlantStore, PositionPatch};
use garden_views::scene::{OutlineSpec, ViewKind, ViewReconciler};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
enum CameraOp {
    Pan(f32, f32),
    ZoomBy(f32),
    SetZoom(f32),
}

fn camera_op() -> impl Strategy<Value = CameraOp> {
    prop_oneof![
        (-100.0f32..100.0, -100.0f32..100.0).prop_map(|(x, z)| CameraOp::Pan(x, z)),
        (0.01f32..10.0).prop_map(CameraOp::ZoomBy),
        (-1000.0f32..1000.0).prop_map(CameraOp::SetZoom),
    ]
}

#[derive(Clone, Debug)]
enum StoreOp {
    Create(f32, f32),
    Remove(usize),
    Select(usize),
    Toggle(usize),
    Move(usize, f32),
    DeselectAll,
}

fn store_op() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        (-10.0f32..10.0, -10.0f32..10.0).prop_map(|(x, z)| StoreOp::Create(x, z)),
        (0usize..8).prop_map(StoreOp::Remove),
        (0usize..8).prop_map(StoreOp::Select),
        (0usize..8).prop_map(StoreOp::Toggle),
        (0usize..8, -10.0f32..10.0).prop_map(|(i, x)| StoreOp::Move(i, x)),
        Just(StoreOp::DeselectAll),
    ]
}

/// Index into the current ids, wrapping; falls back to an unknown id.
fn pick_id(store: &PlantStore, i: usize) -> PlantId {
    let ids: Vec<_> = store.ids().cloned().collect();
    if ids.is_empty() {
        PlantId::new("unknown")
    } else {
        ids[i % ids.len()].clone()
    }
}

fn apply(store: &mut PlantStore, op: &StoreOp) {
    match *op {
        StoreOp::Create(x, z) => {
            store.create_plant("p", PlantPosition::new(x, 0.0, z), None);
        }
        StoreOp::Remove(i) => {
            let id = pick_id(store, i);
            store.remove_plant(&id);
        }
        StoreOp::Select(i) => {
            let id = pick_id(store, i);
            store.select_plant(&id);
        }
        StoreOp::Toggle(i) => {
            let id = pick_id(store, i);
            store.toggle_plant_selection(&id);
        }
        StoreOp::Move(i, x) => {
            let id = pick_id(store, i);
            store.update_plant_position(&id, PositionPatch::x(x));
        }
        StoreOp::DeselectAll => store.deselect_all(),
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Zoom bounds
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn zoom_stays_in_bounds(ops in prop::collection::vec(camera_op(), 0..64)) {
        let mut camera = CameraState::new();
        for op in &ops {
            match *op {
                CameraOp::Pan(x, z) => camera.pan(x, z),
                CameraOp::ZoomBy(f) => camera.zoom_by(f),
                CameraOp::SetZoom(z) => camera.set_zoom(z),
            }
            prop_assert!(
                camera.min_zoom() <= camera.zoom() && camera.zoom() <= camera.max_zoom(),
                "zoom {} escaped bounds after {:?}", camera.zoom(), op
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Exclusive select
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn select_is_exclusive(
        setup in prop::collection::vec(store_op(), 0..32),
        target in 0usize..8,
        unknown in any::<bool>(),
    ) {
        let mut store = PlantStore::new();
        for op in &setup {
            apply(&mut store, op);
        }

        let id = if unknown { PlantId::new("not-in-store") } else { pick_id(&store, target) };
        store.select_plant(&id);

        let selected: Vec<_> = store.selected_plants().into_iter().map(|p| p.id().clone()).collect();
        if store.contains(&id) {
            prop_assert_eq!(selected, vec![id]);
        } else {
            prop_assert!(selected.is_empty());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Toggle never multi-selects
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn toggle_keeps_at_most_one_selected(ops in prop::collection::vec(store_op(), 0..64)) {
        let mut store = PlantStore::new();
        for op in &ops {
            apply(&mut store, op);
            prop_assert!(store.selected_plants().len() <= 1, "multi-select after {:?}", op);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4 + 5. Reconciliation idempotence and cache == store
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn reconcile_mirrors_store(
        ops in prop::collection::vec(store_op(), 0..48),
        plan in any::<bool>(),
    ) {
        let kind = if plan { ViewKind::Plan } else { ViewKind::Elevation };
        let mut view = ViewReconciler::<u64>::new(kind, OutlineSpec::default());
        let mut scene = CountingScene::default();
        let mut store = PlantStore::new();

        for op in &ops {
            apply(&mut store, op);
            view.reconcile(&store, &mut scene, true);

            let cached: BTreeSet<_> = view.cached_ids().cloned().collect();
            let expected: BTreeSet<_> = store.ids().cloned().collect();
            prop_assert_eq!(&cached, &expected);

            let outlines = usize::from(plan && store.selected_plant().is_some());
            prop_assert_eq!(scene.live(), store.len() + outlines);

            scene.take_mutations();
            let again = view.reconcile(&store, &mut scene, true);
            prop_assert!(again.is_noop());
            prop_assert_eq!(scene.take_mutations(), 0);
        }
    }
}
