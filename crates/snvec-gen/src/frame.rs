//! Rotation of locally sampled directions into the detector frame.

use std::f64::consts::PI;

use snvec_core::{RandomSource, Vec3};

/// Rotation whose columns are the spherical basis (e_θ, e_φ, e_r) of a direction.
///
/// A local vector along +z maps onto the direction itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRotation {
    columns: [Vec3; 3],
}

impl FrameRotation {
    /// Rotation for the unit vector `direction`.
    pub fn from_direction(direction: Vec3) -> Self {
        let theta = direction[2].clamp(-1.0, 1.0).acos();
        let phi = direction[1].atan2(direction[0]);
        let (st, ct) = theta.sin_cos();
        let (sp, cp) = phi.sin_cos();
        Self {
            columns: [
                [ct * cp, ct * sp, -st],
                [-sp, cp, 0.0],
                [st * cp, st * sp, ct],
            ],
        }
    }

    /// Rotates a local vector into the lab frame.
    pub fn rotate(&self, local: Vec3) -> Vec3 {
        let [a, b, c] = self.columns;
        [
            a[0] * local[0] + b[0] * local[1] + c[0] * local[2],
            a[1] * local[0] + b[1] * local[1] + c[1] * local[2],
            a[2] * local[0] + b[2] * local[1] + c[2] * local[2],
        ]
    }

    /// Lab-frame unit vector for polar angle `theta` and azimuth `phi` about the axis.
    pub fn apply(&self, theta: f64, phi: f64) -> Vec3 {
        self.rotate(unit_from_angles(theta, phi))
    }
}

/// Unit vector for spherical angles.
pub fn unit_from_angles(theta: f64, phi: f64) -> Vec3 {
    let (st, ct) = theta.sin_cos();
    let (sp, cp) = phi.sin_cos();
    [st * cp, st * sp, ct]
}

/// Direction drawn uniformly on the sphere.
pub fn isotropic_direction<R: RandomSource + ?Sized>(rng: &mut R) -> Vec3 {
    let cos_theta = rng.uniform(-1.0, 1.0);
    let phi = rng.uniform(0.0, 2.0 * PI);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    [sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta]
}

#[cfg(test)]
mod tests {
    use super::*;
    use snvec_core::event::norm;

    fn close(a: Vec3, b: Vec3) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-12)
    }

    #[test]
    fn local_axis_maps_to_direction() {
        for direction in [
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
            [1.0, 0.0, 0.0],
            [0.6, 0.0, 0.8],
            [0.48, 0.6, 0.64],
        ] {
            let rotation = FrameRotation::from_direction(direction);
            assert!(close(rotation.apply(0.0, 0.3), direction));
        }
    }

    #[test]
    fn rotation_preserves_length_and_angle() {
        let direction = [0.48, 0.6, 0.64];
        let rotation = FrameRotation::from_direction(direction);
        let out = rotation.apply(0.7, -2.0);
        assert!((norm(out) - 1.0).abs() < 1e-12);
        let cos = out[0] * direction[0] + out[1] * direction[1] + out[2] * direction[2];
        assert!((cos - 0.7f64.cos()).abs() < 1e-12);
    }
}
