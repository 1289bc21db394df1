/// Camera framing and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::transform::Transform;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    Orthographic,
    #[default]
    Perspective,
}

/// Fixed scene framing around the interactive view rotation.
///
/// The surface is tilted about `tilt_axis`, pushed `distance` units down the
/// negative z axis and projected with a narrow frustum that only spans
/// `near..far`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
    pub tilt_axis: [f32; 3],
    pub tilt_angle: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            fov: PI / 8.0,
            aspect: 1.0,
            near: 8.0,
            far: 12.0,
            distance: 10.0,
            tilt_axis: [0.707, 0.707, 0.0],
            tilt_angle: 0.7,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Same framing with the aspect ratio of a viewport
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
        self
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let half_height = self.distance * (self.fov / 2.0).tan();
                let half_width = half_height * self.aspect;
                Matrix4::new_orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Tilt then push the scene in front of the camera
    pub fn framing_matrix(&self) -> Matrix4<f32> {
        let [x, y, z] = self.tilt_axis;
        let tilt = Transform::axis_rotation(&Vector3::new(x, y, z), self.tilt_angle);
        Transform::translation_matrix(0.0, 0.0, -self.distance) * tilt
    }

    /// Combine an interactive view rotation with the fixed framing
    pub fn scene_matrix(&self, view: &Matrix4<f32>) -> Matrix4<f32> {
        Transform::mvp_matrix(view, &self.framing_matrix(), &self.projection_matrix())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Project a 3D point to 2D screen space
///
/// Returns `(x, y, depth)` with depth in normalized device units, or `None`
/// when the point falls outside the view volume.
pub fn project_to_screen(
    point: &Point3<f32>,
    mvp: &Matrix4<f32>,
    width: u32,
    height: u32,
) -> Option<(f32, f32, f32)> {
    let clip = mvp * point.to_homogeneous();

    // Prevent division by near-zero w
    if clip.w.abs() < 1e-6 {
        return None;
    }

    let ndc = clip.xyz() / clip.w;
    if ndc.iter().any(|c| !(-1.0..=1.0).contains(c)) {
        return None;
    }

    let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;

    Some((screen_x, screen_y, ndc.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new().with_aspect(2.0);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
        assert_eq!(Camera::new().with_aspect(0.0).aspect, 1.0);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::new();
        let mvp = camera.scene_matrix(&Matrix4::identity());
        let (x, y, depth) = project_to_screen(&Point3::origin(), &mvp, 80, 40).unwrap();
        assert!((x - 40.0).abs() < 1e-3);
        assert!((y - 20.0).abs() < 1e-3);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_point_behind_far_plane_clipped() {
        let camera = Camera::new();
        let mvp = camera.scene_matrix(&Matrix4::identity());
        let tilt = camera.framing_matrix();
        // anything pushed past z = -12 in eye space is beyond the far plane
        let inverse = tilt.try_inverse().unwrap();
        let far_point = inverse.transform_point(&Point3::new(0.0, 0.0, -13.0));
        assert!(project_to_screen(&far_point, &mvp, 80, 40).is_none());
    }

    #[test]
    fn test_orthographic_keeps_origin_centered() {
        let camera = Camera {
            mode: ProjectionMode::Orthographic,
            ..Camera::new()
        };
        let mvp = camera.scene_matrix(&Matrix4::identity());
        let (x, y, _) = project_to_screen(&Point3::origin(), &mvp, 100, 100).unwrap();
        assert!((x - 50.0).abs() < 1e-3);
        assert!((y - 50.0).abs() < 1e-3);
    }
}
