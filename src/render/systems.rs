use super::*;
use bevy::app::AppExit;
use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::window::{CursorLeft, PrimaryWindow};
use bevy_camera::visibility::RenderLayers;
use bevy_camera::{OrthographicProjection, PerspectiveProjection, Projection, ScalingMode, Viewport};
use bevy_math::UVec2;

use crate::garden::{CAMERA_FAR, CAMERA_NEAR, ELEVATION_FOV_DEGREES};
use crate::input::PointerButton;
use crate::layout::ViewportRect;
use crate::scene::ViewKind;
use crate::view::{SurfaceState, ViewProjection};

const GROUND_SIZE: f32 = 2000.0;
const DIRECTIONAL_ILLUMINANCE: f32 = 0.8 * 10_000.0;

/// Spawn both view cameras, their lights and the plan ground plane.
pub fn setup_views(
    mut commands: Commands,
    settings: Res<EditorSettings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let config = &settings.0;

    for kind in ViewKind::ALL {
        let layers = RenderLayers::layer(kind.render_layer());
        // Cameras sharing a window clear the whole target, so only the
        // first one clears; the plan pane paints its background with a ground plane.
        let (order, clear_color, projection) = match kind {
            ViewKind::Elevation => (
                0,
                ClearColorConfig::Custom(config.style.elevation_background.into()),
                Projection::from(PerspectiveProjection {
                    fov: ELEVATION_FOV_DEGREES.to_radians(),
                    near: CAMERA_NEAR,
                    far: CAMERA_FAR,
                    ..default()
                }),
            ),
            ViewKind::Plan => (
                1,
                ClearColorConfig::None,
                Projection::from(OrthographicProjection {
                    scaling_mode: ScalingMode::FixedVertical {
                        viewport_height: config.camera.zoom,
                    },
                    near: CAMERA_NEAR,
                    far: CAMERA_FAR,
                    ..OrthographicProjection::default_3d()
                }),
            ),
        };

        commands.spawn((
            Camera3d::default(),
            Camera {
                order,
                clear_color,
                is_active: false,
                ..default()
            },
            projection,
            Transform::default(),
            layers.clone(),
            GardenView::new(kind, config),
            Name::new(format!("{}_camera", kind.label())),
        ));

        commands.spawn((
            DirectionalLight {
                illuminance: DIRECTIONAL_ILLUMINANCE,
                ..default()
            },
            Transform::from_xyz(5.0, 10.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
            ViewLight,
            layers,
        ));
    }

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: config.style.plan_background.into(),
            unlit: true,
            ..default()
        })),
        Transform::default(),
        GroundPlane,
        RenderLayers::layer(ViewKind::Plan.render_layer()),
    ));
}

/// Logical pane rectangle to a physical camera viewport, clipped to the
/// window. `None` when nothing would be visible.
pub fn physical_viewport(rect: &ViewportRect, scale: f32, window_px: UVec2) -> Option<Viewport> {
    if rect.is_empty() || window_px.x == 0 || window_px.y == 0 {
        return None;
    }
    let pos = UVec2::new(
        (rect.min.x * scale).round().max(0.0) as u32,
        (rect.min.y * scale).round().max(0.0) as u32,
    )
    .min(window_px - UVec2::ONE);
    let size = UVec2::new(
        (rect.width() * scale).round() as u32,
        (rect.height() * scale).round() as u32,
    )
    .min(window_px - pos);

    if size.x == 0 || size.y == 0 {
        return None;
    }
    Some(Viewport {
        physical_position: pos,
        physical_size: size,
        depth: 0.0..1.0,
    })
}

/// Recompute pane rectangles on resize or divider drag.
pub fn update_view_layout(
    windows: Query<&Window, With<PrimaryWindow>>,
    layout: Res<SplitLayoutRes>,
    mut views: Query<(Entity, &mut GardenView, &mut Camera)>,
    mut ready: MessageWriter<SurfaceReady>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let panes = layout.0.panes(Vec2::new(window.width(), window.height()));
    let scale = window.resolution.scale_factor();
    let window_px = UVec2::new(window.physical_width(), window.physical_height());

    for (entity, mut view, mut camera) in views.iter_mut() {
        let rect = match view.kind() {
            ViewKind::Elevation => panes.top,
            ViewKind::Plan => panes.bottom,
        };
        if !view.driver.set_viewport(rect) {
            continue;
        }

        match physical_viewport(&rect, scale, window_px) {
            Some(viewport) => {
                camera.viewport = Some(viewport);
                camera.is_active = true;
                if view.driver.state() == SurfaceState::Pending {
                    ready.write(SurfaceReady {
                        view: entity,
                        kind: view.kind(),
                    });
                }
            }
            None => {
                debug!("{} pane is empty, camera inactive", view.kind().label());
                camera.is_active = false;
            }
        }
    }
}

pub fn mark_surfaces_ready(
    mut ready: MessageReader<SurfaceReady>,
    mut views: Query<&mut GardenView>,
) {
    for msg in ready.read() {
        if let Ok(mut view) = views.get_mut(msg.view) {
            view.driver.surface_ready();
        }
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Route mouse input to the divider or to the view under the cursor.
pub fn route_pointer_input(
    windows: Query<&Window, With<PrimaryWindow>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut wheel: MessageReader<MouseWheel>,
    mut cursor_left: MessageReader<CursorLeft>,
    mut garden: ResMut<GardenRes>,
    mut layout: ResMut<SplitLayoutRes>,
    mut pointer: ResMut<PointerCapture>,
    mut views: Query<(Entity, &mut GardenView)>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let window_size = Vec2::new(window.width(), window.height());
    let cursor = window.cursor_position();
    let garden = &mut garden.0;

    if cursor_left.read().count() > 0 {
        for (_, mut view) in views.iter_mut() {
            view.driver.pointer_leave(garden);
        }
        pointer.capture = None;
        pointer.last_cursor = None;
        wheel.clear();
        return;
    }

    let capture = pointer.capture;
    match capture {
        Some(Capture::Divider) => {
            if let Some(cursor) = cursor {
                layout.0.drag_to(cursor.y, window_size.y);
            }
            if mouse.just_released(MouseButton::Left) {
                pointer.capture = None;
            }
        }
        Some(Capture::View { entity, button }) => {
            if let Ok((_, mut view)) = views.get_mut(entity) {
                let position = cursor.or(pointer.last_cursor);
                if let Some(position) = position {
                    if cursor.is_some() && cursor != pointer.last_cursor {
                        view.driver.pointer_move(position, garden);
                    }
                    if mouse.just_released(button) {
                        view.driver.pointer_up(position, garden);
                        pointer.capture = None;
                    }
                }
            } else {
                pointer.capture = None;
            }
        }
        None => {
            if let Some(cursor) = cursor {
                for button in [MouseButton::Left, MouseButton::Middle] {
                    if !mouse.just_pressed(button) || pointer.capture.is_some() {
                        continue;
                    }
                    if button == MouseButton::Left && layout.0.divider_hit(cursor, window_size) {
                        pointer.capture = Some(Capture::Divider);
                        continue;
                    }
                    let Some(pb) = pointer_button(button) else {
                        continue;
                    };
                    for (entity, mut view) in views.iter_mut() {
                        if view.driver.viewport().contains(cursor) {
                            view.driver.pointer_down(pb, cursor, garden);
                            pointer.capture = Some(Capture::View { entity, button });
                            break;
                        }
                    }
                }
            }
        }
    }

    // Wheel goes to the captured view, else the view under the cursor.
    let captured = match pointer.capture {
        Some(Capture::View { entity, .. }) => Some(entity),
        _ => None,
    };
    for ev in wheel.read() {
        // Bevy reports scroll-up as positive y; the controller wants scroll-down positive.
        let delta = -ev.y;
        for (entity, mut view) in views.iter_mut() {
            let targeted = match (captured, cursor) {
                (Some(captured), _) => captured == entity,
                (None, Some(cursor)) => view.driver.viewport().contains(cursor),
                (None, None) => false,
            };
            if targeted {
                view.driver.wheel(delta, garden);
            }
        }
    }

    pointer.last_cursor = cursor;
}

/// Escape deselects, Delete / Backspace removes the selected plant.
pub fn handle_shortcuts(keys: Res<ButtonInput<KeyCode>>, mut garden: ResMut<GardenRes>) {
    if keys.just_pressed(KeyCode::Escape) {
        garden.0.plants.deselect_all();
    }
    if keys.any_just_pressed([KeyCode::Delete, KeyCode::Backspace]) {
        let selected = garden.0.plants.selected_plant().map(|p| p.id().clone());
        if let Some(id) = selected {
            if let Some(plant) = garden.0.plants.remove_plant(&id) {
                info!("removed plant {} ({})", plant.id(), plant.name());
            }
        }
    }
}

/// Poll the shared garden once per frame and push changes into each view.
pub fn sync_views(
    mut commands: Commands,
    garden: Res<GardenRes>,
    gizmo_assets: Res<GizmoAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut views: Query<(&mut GardenView, &mut Transform, &mut Projection)>,
) {
    for (mut view, mut transform, mut projection) in views.iter_mut() {
        let GardenView {
            driver,
            gizmo_entity,
        } = &mut *view;
        let mut scene = BevyScene::new(
            driver.kind(),
            &mut commands,
            &mut meshes,
            &mut materials,
            &gizmo_assets,
            gizmo_entity,
        );
        let out = driver.sync(&garden.0, &mut scene);

        match out.projection {
            Some(ViewProjection::Orthographic(frame)) => {
                *transform =
                    Transform::from_translation(frame.eye).looking_at(frame.look_at, Vec3::NEG_Z);
                if let Projection::Orthographic(ortho) = &mut *projection {
                    ortho.scaling_mode = ScalingMode::FixedVertical {
                        viewport_height: frame.height(),
                    };
                    ortho.near = frame.near;
                    ortho.far = frame.far;
                }
            }
            Some(ViewProjection::Perspective(pose)) => {
                *transform = Transform::from_translation(pose.eye).looking_at(pose.look_at, Vec3::Y);
                if let Projection::Perspective(persp) = &mut *projection {
                    persp.fov = pose.fov_y;
                    persp.aspect_ratio = pose.aspect;
                    persp.near = pose.near;
                    persp.far = pose.far;
                }
            }
            None => {}
        }
    }
}

/// Tear down views on request or when the app exits.
pub fn dispose_views(
    mut commands: Commands,
    mut requests: MessageReader<DisposeView>,
    mut exit: MessageReader<AppExit>,
    mut garden: ResMut<GardenRes>,
    gizmo_assets: Res<GizmoAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut views: Query<(Entity, &mut GardenView, &mut Camera)>,
) {
    let exiting = exit.read().count() > 0;
    let targets: Vec<Entity> = requests.read().map(|r| r.view).collect();
    if !exiting && targets.is_empty() {
        return;
    }

    for (entity, mut view, mut camera) in views.iter_mut() {
        if !exiting && !targets.contains(&entity) {
            continue;
        }
        let GardenView {
            driver,
            gizmo_entity,
        } = &mut *view;
        let mut scene = BevyScene::new(
            driver.kind(),
            &mut commands,
            &mut meshes,
            &mut materials,
            &gizmo_assets,
            gizmo_entity,
        );
        driver.dispose(&mut garden.0, &mut scene);
        camera.is_active = false;
    }
}
