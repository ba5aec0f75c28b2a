//! Perspective projection.
//!
//! [`perspective`] builds a symmetric-frustum projection matrix in OpenGL clip-space
//! convention (right handed eye space, `z` mapped to `[-1, 1]` between the near and
//! far planes). The result is a plain column-major `[f32; 16]` ready to be uploaded
//! with `glUniformMatrix4fv` without transposition.

use glam::Mat4;

/// Reasons a set of frustum parameters is rejected.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("projection parameters must be finite")]
    NonFinite,
    #[error("vertical field of view must be in (0, pi) radians, got {0}")]
    FieldOfView(f32),
    #[error("aspect ratio must be positive, got {0}")]
    Aspect(f32),
    #[error("near plane must be positive, got {0}")]
    Near(f32),
    #[error("far plane ({far}) must lie beyond the near plane ({near})")]
    Far { near: f32, far: f32 },
}

fn validate(fov_y: f32, aspect: f32, near: f32, far: f32) -> Result<(), ProjectionError> {
    if !(fov_y.is_finite() && aspect.is_finite() && near.is_finite() && far.is_finite()) {
        return Err(ProjectionError::NonFinite);
    }
    if fov_y <= 0.0 || fov_y >= std::f32::consts::PI {
        return Err(ProjectionError::FieldOfView(fov_y));
    }
    if aspect <= 0.0 {
        return Err(ProjectionError::Aspect(aspect));
    }
    if near <= 0.0 {
        return Err(ProjectionError::Near(near));
    }
    if far <= near {
        return Err(ProjectionError::Far { near, far });
    }
    Ok(())
}

/// Computes the column-major perspective matrix for the given vertical field of view
/// (radians), aspect ratio (width / height) and near/far plane distances.
pub fn perspective(
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
) -> Result<[f32; 16], ProjectionError> {
    validate(fov_y, aspect, near, far)?;
    Ok(frustum(fov_y, aspect, near, far))
}

fn frustum(fov_y: f32, aspect: f32, near: f32, far: f32) -> [f32; 16] {
    // Extents of the near plane
    let top = (fov_y / 2.0).tan() * near;
    let bottom = -top;
    let right = top * aspect;
    let left = -right;

    [
        // Column 0
        (2.0 * near) / (right - left),
        0.0,
        0.0,
        0.0,
        // Column 1
        0.0,
        (2.0 * near) / (top - bottom),
        0.0,
        0.0,
        // Column 2
        (right + left) / (right - left),
        (top + bottom) / (top - bottom),
        -(far + near) / (far - near),
        -1.0,
        // Column 3
        0.0,
        0.0,
        -(2.0 * far * near) / (far - near),
        0.0,
    ]
}

/// Validated frustum parameters.
///
/// Holding a [`Projection`] guarantees that [`Projection::matrix`] never divides by
/// zero, so the per-frame path does not need to handle errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Projection {
    /// Creates a new projection, rejecting degenerate frusta.
    pub fn new(fov_y: f32, aspect: f32, near: f32, far: f32) -> Result<Self, ProjectionError> {
        validate(fov_y, aspect, near, far)?;
        Ok(Self {
            fov_y,
            aspect,
            near,
            far,
        })
    }

    /// Replaces the aspect ratio, leaving the projection untouched on error.
    pub fn set_aspect(&mut self, aspect: f32) -> Result<(), ProjectionError> {
        validate(self.fov_y, aspect, self.near, self.far)?;
        self.aspect = aspect;
        Ok(())
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Returns the column-major projection matrix.
    pub fn matrix(&self) -> [f32; 16] {
        frustum(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Returns the projection matrix as a [`glam::Mat4`].
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols_array(&self.matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() <= EPSILON * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_fixed_entries() {
        let inputs = [
            (45f32.to_radians(), 1.0, 0.1, 50.0),
            (90f32.to_radians(), 16.0 / 9.0, 0.5, 1000.0),
            (10f32.to_radians(), 0.25, 2.0, 3.0),
            (170f32.to_radians(), 4.0, 0.01, 0.02),
        ];
        for (fov_y, aspect, near, far) in inputs {
            let m = perspective(fov_y, aspect, near, far).unwrap();
            assert_eq!(m[11], -1.0);
            assert_eq!(m[15], 0.0);
            for i in [1, 2, 3, 4, 6, 7, 12, 13] {
                assert_eq!(m[i], 0.0, "entry {i} should be zero");
            }
            // Symmetric frustum: no off-center terms
            assert_eq!(m[8], 0.0);
            assert_eq!(m[9], 0.0);
        }
    }

    #[test]
    fn test_right_angle_fov_has_unit_scale() {
        let m = perspective(90f32.to_radians(), 1.0, 0.1, 50.0).unwrap();
        assert!(approx_eq(m[0], 1.0), "m[0] = {}", m[0]);
        assert!(approx_eq(m[5], 1.0), "m[5] = {}", m[5]);
    }

    #[test]
    fn test_horizontal_scale_follows_aspect() {
        for aspect in [0.5, 4.0 / 3.0, 16.0 / 9.0, 3.0] {
            let m = perspective(60f32.to_radians(), aspect, 0.1, 100.0).unwrap();
            assert!(approx_eq(m[0], m[5] / aspect), "aspect {aspect}: {} vs {}", m[0], m[5]);
        }
    }

    #[test]
    fn test_depth_term_approaches_orthographic_limit() {
        let mut previous = f32::NEG_INFINITY;
        for far in [10.0, 100.0, 1e3, 1e4] {
            let m = perspective(45f32.to_radians(), 1.0, 0.1, far).unwrap();
            assert!(m[10] < -1.0);
            assert!(m[10] > previous);
            previous = m[10];
        }
        assert!((previous + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_planes_map_to_clip_range() {
        let (near, far) = (0.1, 50.0);
        let m = Projection::new(45f32.to_radians(), 1.0, near, far)
            .unwrap()
            .to_mat4();
        let near_clip = m * glam::Vec4::new(0.0, 0.0, -near, 1.0);
        let far_clip = m * glam::Vec4::new(0.0, 0.0, -far, 1.0);
        assert!((near_clip.z / near_clip.w + 1.0).abs() < 1e-4);
        assert!((far_clip.z / far_clip.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_matches_glam() {
        let (fov_y, aspect, near, far) = (45f32.to_radians(), 820.0 / 600.0, 0.1, 50.0);
        let ours = perspective(fov_y, aspect, near, far).unwrap();
        let theirs = Mat4::perspective_rh_gl(fov_y, aspect, near, far).to_cols_array();
        for (i, (a, b)) in ours.iter().zip(theirs.iter()).enumerate() {
            assert!(approx_eq(*a, *b), "entry {i}: {a} vs {b}");
        }
    }

    #[test]
    fn test_degenerate_inputs_are_rejected() {
        let fov = 45f32.to_radians();
        assert_eq!(
            perspective(fov, 1.0, 1.0, 1.0),
            Err(ProjectionError::Far { near: 1.0, far: 1.0 })
        );
        assert_eq!(
            perspective(fov, 1.0, 2.0, 1.0),
            Err(ProjectionError::Far { near: 2.0, far: 1.0 })
        );
        assert_eq!(perspective(fov, 1.0, 0.0, 1.0), Err(ProjectionError::Near(0.0)));
        assert_eq!(perspective(fov, 0.0, 0.1, 1.0), Err(ProjectionError::Aspect(0.0)));
        assert_eq!(perspective(0.0, 1.0, 0.1, 1.0), Err(ProjectionError::FieldOfView(0.0)));
        assert_eq!(
            perspective(fov, f32::NAN, 0.1, 1.0),
            Err(ProjectionError::NonFinite)
        );
        assert_eq!(
            perspective(fov, 1.0, 0.1, f32::INFINITY),
            Err(ProjectionError::NonFinite)
        );
    }

    #[test]
    fn test_set_aspect_keeps_previous_on_error() {
        let mut projection = Projection::new(45f32.to_radians(), 1.0, 0.1, 50.0).unwrap();
        assert!(projection.set_aspect(0.0).is_err());
        assert_eq!(projection.aspect(), 1.0);
        projection.set_aspect(2.0).unwrap();
        assert_eq!(projection.aspect(), 2.0);
        let m = projection.matrix();
        assert!(approx_eq(m[0], m[5] / 2.0));
    }
}
