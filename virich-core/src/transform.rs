/// 3D transformation matrices
use nalgebra::{Matrix4, Unit, Vector3};

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix about an arbitrary axis (normalized here)
    pub fn axis_rotation(axis: &Vector3<f32>, angle: f32) -> Matrix4<f32> {
        match Unit::try_new(*axis, f32::EPSILON) {
            Some(axis) => Matrix4::from_axis_angle(&axis, angle),
            None => Matrix4::identity(),
        }
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }

    /// Column-major flat copy, the layout matrix uniforms expect
    pub fn to_column_major(matrix: &Matrix4<f32>) -> [f32; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(matrix.as_slice());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_axis_rotation_quarter_turn() {
        let rotation = Transform::axis_rotation(&Vector3::new(0.0, 0.0, 2.0), FRAC_PI_2);
        let p = rotation.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_zero_axis_is_identity() {
        let rotation = Transform::axis_rotation(&Vector3::zeros(), 1.0);
        assert!((rotation - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_mvp_order() {
        let model = Transform::translation_matrix(1.0, 0.0, 0.0);
        let view = Transform::translation_matrix(0.0, 0.0, -10.0);
        let mvp = Transform::mvp_matrix(&model, &view, &Matrix4::identity());
        let p = mvp.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(2.0, 0.0, -10.0)).norm() < 1e-6);
    }

    #[test]
    fn test_column_major_translation() {
        let flat = Transform::to_column_major(&Transform::translation_matrix(1.0, 2.0, 3.0));
        assert_eq!(&flat[12..15], &[1.0, 2.0, 3.0]);
        assert_eq!(flat[15], 1.0);
    }
}
