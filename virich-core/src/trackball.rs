//! Pointer-driven trackball rotation.
//!
//! Dragging across the viewport rolls a virtual sphere centred on the
//! viewport; the accumulated rotation becomes the view matrix.

use nalgebra::{Matrix4, Point2, Unit, UnitQuaternion, Vector3};

use crate::transform::Transform;

#[derive(Debug, Clone)]
pub struct TrackballRotator {
    width: f32,
    height: f32,
    view_distance: f32,
    rotation: UnitQuaternion<f32>,
    drag_from: Option<Vector3<f32>>,
}

impl TrackballRotator {
    pub fn new(width: f32, height: f32, view_distance: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            view_distance,
            rotation: UnitQuaternion::identity(),
            drag_from: None,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        self.drag_from = None;
    }

    /// Current view matrix: accumulated rotation, then the view distance
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Transform::translation_matrix(0.0, 0.0, -self.view_distance) * self.rotation.to_homogeneous()
    }

    pub fn rotation(&self) -> UnitQuaternion<f32> {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: UnitQuaternion<f32>) {
        self.rotation = rotation;
    }

    pub fn reset(&mut self) {
        self.rotation = UnitQuaternion::identity();
        self.drag_from = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.drag_from = Some(self.project_to_ball(Point2::new(x, y)));
    }

    /// Roll the ball toward the new pointer position.
    ///
    /// Returns whether the rotation changed.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        let Some(from) = self.drag_from else {
            return false;
        };
        let to = self.project_to_ball(Point2::new(x, y));
        self.drag_from = Some(to);

        match UnitQuaternion::rotation_between(&from, &to) {
            Some(delta) if delta.angle() > 0.0 => {
                self.rotation = delta * self.rotation;
                true
            }
            _ => false,
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag_from = None;
    }

    /// Apply a fixed rotation about a view-space axis
    pub fn rotate_by(&mut self, axis: Vector3<f32>, angle: f32) {
        if let Some(axis) = Unit::try_new(axis, f32::EPSILON) {
            self.rotation = UnitQuaternion::from_axis_angle(&axis, angle) * self.rotation;
        }
    }

    /// Map a viewport position onto the unit ball, or its rim when outside
    fn project_to_ball(&self, p: Point2<f32>) -> Vector3<f32> {
        let radius = self.width.min(self.height) / 2.0;
        let x = (p.x - self.width / 2.0) / radius;
        let y = (self.height / 2.0 - p.y) / radius;

        let planar = x * x + y * y;
        if planar >= 1.0 {
            Vector3::new(x, y, 0.0).normalize()
        } else {
            Vector3::new(x, y, (1.0 - planar).sqrt())
        }
    }
}

impl Default for TrackballRotator {
    fn default() -> Self {
        Self::new(1.0, 1.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_initial_view_is_identity() {
        let trackball = TrackballRotator::new(100.0, 100.0, 0.0);
        assert!((trackball.view_matrix() - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut trackball = TrackballRotator::new(100.0, 100.0, 0.0);
        assert!(!trackball.pointer_move(80.0, 50.0));
        assert!(!trackball.is_dragging());
    }

    #[test]
    fn test_horizontal_drag_turns_about_y() {
        let mut trackball = TrackballRotator::new(100.0, 100.0, 0.0);
        trackball.pointer_down(50.0, 50.0);
        assert!(trackball.pointer_move(70.0, 50.0));
        trackball.pointer_up();

        let axis = trackball.rotation().axis().unwrap();
        assert!((axis.y - 1.0).abs() < 1e-4);
        // the front of the ball follows the pointer to the right
        let front = trackball.view_matrix().transform_point(&Point3::new(0.0, 0.0, 1.0));
        assert!(front.x > 0.0);
    }

    #[test]
    fn test_view_distance_translates() {
        let trackball = TrackballRotator::new(10.0, 10.0, 5.0);
        let p = trackball.view_matrix().transform_point(&Point3::origin());
        assert!((p.z + 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_reset() {
        let mut trackball = TrackballRotator::default();
        trackball.rotate_by(Vector3::x(), 0.5);
        assert!(trackball.rotation().angle() > 0.4);
        trackball.reset();
        assert_eq!(trackball.rotation().angle(), 0.0);
    }
}
