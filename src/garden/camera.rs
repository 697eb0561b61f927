use bevy_math::{Vec2, Vec3};

use crate::config::CameraConfig;

pub const MIN_ZOOM: f32 = 2.0;
pub const MAX_ZOOM: f32 = 100.0;
pub const DEFAULT_ZOOM: f32 = 10.0;

/// The elevation camera sits 45° above its target, so its distance is
/// `zoom * sqrt(2)`.
pub const DISTANCE_TO_ZOOM_FACTOR: f32 = std::f32::consts::SQRT_2;

pub const PLAN_CAMERA_HEIGHT: f32 = 10.0;
pub const ELEVATION_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;

/// Pan target and zoom shared by the elevation and plan views.
///
/// Each view interprets `zoom` differently (visible world height in plan,
/// distance / sqrt(2) in elevation), but there is only one number.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraState {
    target_x: f32,
    target_z: f32,
    zoom: f32,
    min_zoom: f32,
    max_zoom: f32,
    revision: u64,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            target_x: 0.0,
            target_z: 0.0,
            zoom: DEFAULT_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            revision: 0,
        }
    }
}

impl CameraState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom zoom bounds. Inverted bounds are swapped; a non-positive or
    /// non-finite bound falls back to the default for that side.
    pub fn with_bounds(min_zoom: f32, max_zoom: f32) -> Self {
        let min_zoom = if min_zoom.is_finite() && min_zoom > 0.0 {
            min_zoom
        } else {
            MIN_ZOOM
        };
        let max_zoom = if max_zoom.is_finite() && max_zoom > 0.0 {
            max_zoom
        } else {
            MAX_ZOOM
        };
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };

        Self {
            zoom: DEFAULT_ZOOM.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
            ..Self::default()
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self::with_bounds(config.min_zoom, config.max_zoom);
        camera.set_target(config.target[0], config.target[1]);
        camera.set_zoom(config.zoom);
        camera.revision = 0;
        camera
    }

    #[inline]
    pub fn target_x(&self) -> f32 {
        self.target_x
    }

    #[inline]
    pub fn target_z(&self) -> f32 {
        self.target_z
    }

    /// Ground-plane look-at point as `(x, z)`.
    #[inline]
    pub fn target(&self) -> Vec2 {
        Vec2::new(self.target_x, self.target_z)
    }

    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    #[inline]
    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    #[inline]
    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    /// Bumped by every mutation that changed a value.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_target(&mut self, x: f32, z: f32) {
        if !x.is_finite() || !z.is_finite() {
            return;
        }
        if self.target_x != x || self.target_z != z {
            self.target_x = x;
            self.target_z = z;
            self.revision += 1;
        }
    }

    /// Deltas are in world units; the pointer controller converts pixels.
    pub fn pan(&mut self, dx: f32, dz: f32) {
        self.set_target(self.target_x + dx, self.target_z + dz);
    }

    /// Out-of-range requests land on the nearest bound. NaN is ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_nan() {
            return;
        }
        let zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if zoom != self.zoom {
            self.zoom = zoom;
            self.revision += 1;
        }
    }

    /// `factor > 1` zooms out, `factor < 1` zooms in. Non-positive factors are ignored.
    pub fn zoom_by(&mut self, factor: f32) {
        if !(factor > 0.0) || !factor.is_finite() {
            return;
        }
        self.set_zoom(self.zoom * factor);
    }

    pub fn pixels_per_unit(&self, viewport_height_px: f32) -> f32 {
        viewport_height_px / self.zoom
    }

    /// Convert a pointer delta in pixels into a pan delta in world units `(dx, dz)`.
    ///
    /// The sign is inverted so that content follows the pointer.
    pub fn screen_delta_to_world(&self, pixel_delta: Vec2, viewport_height_px: f32) -> Vec2 {
        if !(viewport_height_px > 0.0) {
            return Vec2::ZERO;
        }
        -pixel_delta / self.pixels_per_unit(viewport_height_px)
    }

    pub fn elevation_distance(&self) -> f32 {
        self.zoom * DISTANCE_TO_ZOOM_FACTOR
    }

    /// Top-down orthographic frame for the plan view.
    ///
    /// Screen-right is world +X and screen-up is world -Z.
    pub fn orthographic(&self, aspect: f32) -> OrthographicFrame {
        let aspect = sanitize_aspect(aspect);
        let half_height = self.zoom * 0.5;
        let half_width = half_height * aspect;

        OrthographicFrame {
            left: -half_width,
            right: half_width,
            top: half_height,
            bottom: -half_height,
            eye: Vec3::new(self.target_x, PLAN_CAMERA_HEIGHT, self.target_z),
            look_at: Vec3::new(self.target_x, 0.0, self.target_z),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }

    /// 45° perspective pose for the elevation view.
    pub fn perspective(&self, aspect: f32) -> PerspectivePose {
        let look_at = Vec3::new(self.target_x, 0.0, self.target_z);
        PerspectivePose {
            eye: look_at + Vec3::new(0.0, self.zoom, self.zoom),
            look_at,
            fov_y: ELEVATION_FOV_DEGREES.to_radians(),
            aspect: sanitize_aspect(aspect),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrthographicFrame {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub eye: Vec3,
    pub look_at: Vec3,
    pub near: f32,
    pub far: f32,
}

impl OrthographicFrame {
    #[inline]
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Ground point `(x, z)` under a normalized device coordinate.
    pub fn ndc_to_ground(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            self.eye.x + ndc.x * self.width() * 0.5,
            self.eye.z - ndc.y * self.height() * 0.5,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerspectivePose {
    pub eye: Vec3,
    pub look_at: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectivePose {
    pub fn distance(&self) -> f32 {
        self.eye.distance(self.look_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn zoom_by_within_bounds() {
        let mut camera = CameraState::new();
        camera.zoom_by(1.1);
        assert!(approx(camera.zoom(), 11.0));
    }

    #[test]
    fn repeated_zoom_out_clamps_at_max() {
        let mut camera = CameraState::new();
        for _ in 0..100 {
            camera.zoom_by(1.1);
        }
        assert_eq!(camera.zoom(), MAX_ZOOM);
    }

    #[test]
    fn repeated_zoom_in_clamps_at_min() {
        let mut camera = CameraState::new();
        for _ in 0..100 {
            camera.zoom_by(0.9);
        }
        assert_eq!(camera.zoom(), MIN_ZOOM);
    }

    #[test]
    fn invalid_factors_are_ignored() {
        let mut camera = CameraState::new();
        camera.zoom_by(0.0);
        camera.zoom_by(-2.0);
        camera.zoom_by(f32::NAN);
        camera.set_zoom(f32::NAN);
        assert_eq!(camera.zoom(), DEFAULT_ZOOM);
        assert_eq!(camera.revision(), 0);
    }

    #[test]
    fn set_zoom_clamps_both_ways() {
        let mut camera = CameraState::new();
        camera.set_zoom(0.5);
        assert_eq!(camera.zoom(), MIN_ZOOM);
        camera.set_zoom(f32::INFINITY);
        assert_eq!(camera.zoom(), MAX_ZOOM);
    }

    #[test]
    fn pan_accumulates() {
        let mut camera = CameraState::new();
        camera.pan(1.0, -2.0);
        camera.pan(0.5, 0.5);
        assert_eq!(camera.target(), Vec2::new(1.5, -1.5));
    }

    #[test]
    fn revision_moves_only_on_change() {
        let mut camera = CameraState::new();
        camera.set_target(0.0, 0.0);
        camera.set_zoom(DEFAULT_ZOOM);
        assert_eq!(camera.revision(), 0);

        camera.pan(1.0, 0.0);
        assert_eq!(camera.revision(), 1);

        camera.set_zoom(MAX_ZOOM);
        camera.zoom_by(1.5);
        assert_eq!(camera.revision(), 2);
    }

    #[test]
    fn pixel_delta_converts_through_zoom() {
        let camera = CameraState::new();
        assert_eq!(camera.pixels_per_unit(500.0), 50.0);

        let world = camera.screen_delta_to_world(Vec2::new(0.0, 100.0), 500.0);
        assert_eq!(world, Vec2::new(0.0, -2.0));
    }

    #[test]
    fn zero_height_viewport_produces_no_pan() {
        let camera = CameraState::new();
        assert_eq!(
            camera.screen_delta_to_world(Vec2::new(10.0, 10.0), 0.0),
            Vec2::ZERO
        );
    }

    #[test]
    fn inverted_bounds_are_swapped() {
        let camera = CameraState::with_bounds(50.0, 5.0);
        assert_eq!(camera.min_zoom(), 5.0);
        assert_eq!(camera.max_zoom(), 50.0);
        assert_eq!(camera.zoom(), DEFAULT_ZOOM);
    }

    #[test]
    fn config_zoom_is_clamped() {
        let config = CameraConfig {
            min_zoom: 4.0,
            max_zoom: 8.0,
            zoom: 20.0,
            target: [3.0, -1.0],
        };
        let camera = CameraState::from_config(&config);
        assert_eq!(camera.zoom(), 8.0);
        assert_eq!(camera.target(), Vec2::new(3.0, -1.0));
        assert_eq!(camera.revision(), 0);
    }

    #[test]
    fn orthographic_height_tracks_zoom() {
        let mut camera = CameraState::new();
        camera.set_target(2.0, 3.0);
        let frame = camera.orthographic(2.0);

        assert!(approx(frame.height(), 10.0));
        assert!(approx(frame.width(), 20.0));
        assert_eq!(frame.eye, Vec3::new(2.0, PLAN_CAMERA_HEIGHT, 3.0));
        assert_eq!(frame.ndc_to_ground(Vec2::ZERO), Vec2::new(2.0, 3.0));
        // Top edge of the screen is further north (-Z).
        assert_eq!(frame.ndc_to_ground(Vec2::new(0.0, 1.0)), Vec2::new(2.0, -2.0));
    }

    #[test]
    fn perspective_distance_is_zoom_times_sqrt2() {
        let camera = CameraState::new();
        let pose = camera.perspective(1.5);
        assert!(approx(pose.distance(), DEFAULT_ZOOM * DISTANCE_TO_ZOOM_FACTOR));
        assert!(approx(camera.elevation_distance(), pose.distance()));
        assert_eq!(pose.look_at, Vec3::ZERO);
    }

    #[test]
    fn degenerate_aspect_falls_back() {
        let camera = CameraState::new();
        assert_eq!(camera.perspective(f32::NAN).aspect, 1.0);
        assert!(approx(camera.orthographic(0.0).width(), 10.0));
    }
}
