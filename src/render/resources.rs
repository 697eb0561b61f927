use bevy::prelude::*;

use crate::config::EditorConfig;
use crate::garden::GardenContext;
use crate::layout::SplitLayout;

/// Brightness Bevy's ambient light gets per unit of configured intensity.
const AMBIENT_BRIGHTNESS_SCALE: f32 = 500.0;
const AMBIENT_INTENSITY: f32 = 0.6;

#[derive(Resource, Clone, Debug, Default)]
pub struct EditorSettings(pub EditorConfig);

/// The garden shared by both views.
#[derive(Resource, Clone, Debug)]
pub struct GardenRes(pub GardenContext);

impl GardenRes {
    pub fn new(garden: GardenContext) -> Self {
        Self(garden)
    }
}

impl FromWorld for GardenRes {
    fn from_world(world: &mut World) -> Self {
        let config = world
            .get_resource::<EditorSettings>()
            .map(|s| s.0.clone())
            .unwrap_or_default();
        Self(GardenContext::from_config(&config))
    }
}

#[derive(Resource, Clone, Debug)]
pub struct SplitLayoutRes(pub SplitLayout);

impl FromWorld for SplitLayoutRes {
    fn from_world(world: &mut World) -> Self {
        let layout = world
            .get_resource::<EditorSettings>()
            .map(|s| SplitLayout::from_config(&s.0.layout))
            .unwrap_or_default();
        Self(layout)
    }
}

/// Who owns the pointer between press and release.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capture {
    Divider,
    View {
        entity: Entity,
        button: MouseButton,
    },
}

#[derive(Resource, Default, Debug)]
pub struct PointerCapture {
    pub capture: Option<Capture>,
    pub last_cursor: Option<Vec2>,
}

#[derive(Resource)]
pub struct GizmoAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

pub fn setup_lighting(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        brightness: AMBIENT_INTENSITY * AMBIENT_BRIGHTNESS_SCALE,
        ..default()
    });
}

pub fn setup_gizmo_assets(
    mut commands: Commands,
    settings: Res<EditorSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let radius = crate::garden::PLAN_SPHERE_RADIUS * settings.0.interaction.gizmo_grab_factor;
    let mesh = meshes.add(Torus::new(radius - 0.05, radius + 0.05));
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.95, 0.35, 0.2),
        unlit: true,
        ..default()
    });
    commands.insert_resource(GizmoAssets { mesh, material });
}
