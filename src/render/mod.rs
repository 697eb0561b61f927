pub mod backend;
pub mod components;
pub mod resources;
pub mod systems;

pub use backend::*;
pub use components::*;
pub use resources::*;
use systems::*;

use bevy::prelude::*;

use crate::scene::ViewKind;

/// A view camera and its viewport now exist, so deferred work may attach to it.
#[derive(Message, Clone, Copy, Debug)]
pub struct SurfaceReady {
    pub view: Entity,
    pub kind: ViewKind,
}

/// Ask a view to release everything it rendered.
#[derive(Message, Clone, Copy, Debug)]
pub struct DisposeView {
    pub view: Entity,
}

#[derive(Default)]
pub struct GardenRenderPlugin;

impl Plugin for GardenRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EditorSettings>()
            .init_resource::<GardenRes>()
            .init_resource::<SplitLayoutRes>()
            .init_resource::<PointerCapture>()
            .add_message::<SurfaceReady>()
            .add_message::<DisposeView>()
            .add_systems(Startup, (setup_lighting, setup_gizmo_assets, setup_views))
            .add_systems(
                Update,
                (
                    update_view_layout,
                    mark_surfaces_ready,
                    route_pointer_input,
                    handle_shortcuts,
                    sync_views,
                )
                    .chain(),
            )
            .add_systems(Last, dispose_views);
    }
}
