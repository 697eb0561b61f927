//! Ray construction and primitive hit tests for pointer picking.

use bevy_math::{Dir3, Ray3d, Vec2, Vec3};

use crate::garden::{CameraState, PerspectivePose};

/// Pick ray for the plan view: starts at the orthographic eye height above
/// the ground point under `ndc` and points straight down.
pub fn plan_ray(camera: &CameraState, ndc: Vec2, aspect: f32) -> Ray3d {
    let frame = camera.orthographic(aspect);
    let ground = frame.ndc_to_ground(ndc);
    Ray3d {
        origin: Vec3::new(ground.x, frame.eye.y, ground.y),
        direction: Dir3::NEG_Y,
    }
}

/// Pick ray through `ndc` for a perspective pose. `None` when the pose is
/// degenerate (eye on the target).
///
/// The elevation view only pans and zooms, so the editor never calls this.
/// It is public for hosts that pick in the elevation view themselves,
/// together with [`ViewReconciler::pick`](crate::scene::ViewReconciler::pick).
pub fn perspective_ray(pose: &PerspectivePose, ndc: Vec2) -> Option<Ray3d> {
    let forward = (pose.look_at - pose.eye).try_normalize()?;
    let right = forward.cross(Vec3::Y).try_normalize()?;
    let up = right.cross(forward);
    let half = (pose.fov_y * 0.5).tan();

    let dir = forward + right * (ndc.x * half * pose.aspect) + up * (ndc.y * half);
    Some(Ray3d {
        origin: pose.eye,
        direction: Dir3::new(dir).ok()?,
    })
}

/// Where `ray` crosses the horizontal plane `y = plane_y`, as `(x, z)`.
pub fn ground_point(ray: &Ray3d, plane_y: f32) -> Option<Vec2> {
    let dy = ray.direction.y;
    if dy.abs() < f32::EPSILON {
        return None;
    }
    let t = (plane_y - ray.origin.y) / dy;
    if t < 0.0 {
        return None;
    }
    let p = ray.get_point(t);
    Some(Vec2::new(p.x, p.z))
}

// Slab-method ray–AABB intersection, returns Some(t) or None
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = Vec3::new(
        if ray_direction.x != 0.0 { 1.0 / ray_direction.x } else { f32::INFINITY },
        if ray_direction.y != 0.0 { 1.0 / ray_direction.y } else { f32::INFINITY },
        if ray_direction.z != 0.0 { 1.0 / ray_direction.z } else { f32::INFINITY },
    );

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    for axis in 0..3 {
        let (mut t0, mut t1) = (
            (min[axis] - ray_origin[axis]) * inv[axis],
            (max[axis] - ray_origin[axis]) * inv[axis],
        );
        if t0.is_nan() || t1.is_nan() {
            // Parallel ray grazing a face: treat as inside the slab.
            continue;
        }
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }
    Some(if t_near >= 0.0 { t_near } else { t_far })
}

/// Nearest non-negative distance along `ray` to a sphere.
pub fn ray_sphere_hit_t(ray: &Ray3d, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(*ray.direction);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let t0 = -b - root;
    let t1 = -b + root;
    if t1 < 0.0 {
        None
    } else if t0 >= 0.0 {
        Some(t0)
    } else {
        Some(t1)
    }
}
