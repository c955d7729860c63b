//! Pinhole perspective projection
//!
//! The only place world coordinates become screen coordinates. Renderer code
//! never does its own perspective math.

use glam::{Vec2, Vec3};

use crate::consts::*;

/// Result of projecting a world point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Screen position in canvas pixels
    pub pos: Vec2,
    /// Pixels per world unit at this depth
    pub scale: f32,
    /// False when the point is behind (or too close to) the camera
    pub visible: bool,
}

impl Projected {
    const HIDDEN: Self = Self {
        pos: Vec2::ZERO,
        scale: 0.0,
        visible: false,
    };
}

/// Camera looking down +z from `(0, camera_height, -camera_distance)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub canvas_width: f32,
    pub horizon_y: f32,
    pub camera_height: f32,
    pub camera_distance: f32,
    pub fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            horizon_y: HORIZON_Y,
            camera_height: CAMERA_HEIGHT,
            camera_distance: CAMERA_DISTANCE,
            fov: FOV,
        }
    }
}

impl Camera {
    /// Map a world point to the screen.
    #[inline]
    pub fn project(&self, x: f32, y: f32, z: f32) -> Projected {
        let depth = z + self.camera_distance;
        if depth <= MIN_DEPTH {
            return Projected::HIDDEN;
        }
        let scale = self.fov / depth;
        Projected {
            pos: Vec2::new(
                self.canvas_width / 2.0 + x * scale,
                self.horizon_y + (self.camera_height - y) * scale,
            ),
            scale,
            visible: true,
        }
    }

    #[inline]
    pub fn project_point(&self, p: Vec3) -> Projected {
        self.project(p.x, p.y, p.z)
    }

    /// Smallest world z that still projects
    pub fn near_z(&self) -> f32 {
        MIN_DEPTH - self.camera_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_centre_line_projects_to_canvas_centre() {
        let cam = Camera::default();
        let p = cam.project(0.0, CAMERA_HEIGHT, 500.0);
        assert!(p.visible);
        assert_eq!(p.pos, Vec2::new(CANVAS_WIDTH / 2.0, HORIZON_Y));
    }

    #[test]
    fn test_depth_guard_boundary() {
        let cam = Camera::default();
        // depth == 10 exactly is hidden
        assert!(!cam.project(0.0, 0.0, MIN_DEPTH - CAMERA_DISTANCE).visible);
        assert!(cam.project(0.0, 0.0, MIN_DEPTH - CAMERA_DISTANCE + 0.01).visible);
        assert!(!cam.project(0.0, 0.0, -1000.0).visible);
    }

    #[test]
    fn test_known_values() {
        let cam = Camera::default();
        // depth 250 -> scale 1.6
        let p = cam.project(100.0, 0.0, 100.0);
        assert!((p.scale - 1.6).abs() < 1e-6);
        assert!((p.pos.x - (300.0 + 160.0)).abs() < 1e-4);
        assert!((p.pos.y - (300.0 + 320.0)).abs() < 1e-4);
    }

    #[test]
    fn test_ground_recedes_toward_horizon() {
        let cam = Camera::default();
        let near = cam.project(0.0, 0.0, 0.0);
        let far = cam.project(0.0, 0.0, 3000.0);
        assert!(near.pos.y > far.pos.y);
        assert!(far.pos.y > HORIZON_Y);
    }

    proptest! {
        #[test]
        fn prop_hidden_iff_depth_at_most_guard(z in -2000.0f32..5000.0) {
            let cam = Camera::default();
            let p = cam.project(0.0, 0.0, z);
            prop_assert_eq!(p.visible, z + CAMERA_DISTANCE > MIN_DEPTH);
        }

        #[test]
        fn prop_scale_positive_and_decreasing(z in -139.0f32..5000.0, dz in 1.0f32..1000.0) {
            let cam = Camera::default();
            let a = cam.project(0.0, 0.0, z);
            let b = cam.project(0.0, 0.0, z + dz);
            prop_assert!(a.visible && b.visible);
            prop_assert!(a.scale > 0.0 && b.scale > 0.0);
            prop_assert!(b.scale < a.scale);
        }
    }
}
