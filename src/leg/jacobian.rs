// Central finite-difference Jacobians of the geometry solves, and the
// velocity-to-joint-speed mapping built on them.

use nalgebra::{Matrix3, Vector3};
use tracing::warn;

use crate::config::LegGeometry;
use crate::leg::kinematics::{self, FootPosition, JointAngles, KinematicsError};

/// Default central-difference step. Small enough that truncation error is
/// negligible in f64, large enough to stay clear of cancellation.
pub const DEFAULT_STEP: f64 = 1e-6;

/// Below this |det J| the linkage is close to a collinear pose and the
/// velocity mapping amplifies noise.
const SINGULARITY_DET_THRESHOLD: f64 = 1e-3;

/// Central finite difference of a vector map: column i is
/// `(f(v + h*e_i) - f(v - h*e_i)) / 2h`.
fn central_difference<F>(f: F, v: &Vector3<f64>, step: f64) -> Result<Matrix3<f64>, KinematicsError>
where
    F: Fn(&Vector3<f64>) -> Result<Vector3<f64>, KinematicsError>,
{
    let mut jacobian = Matrix3::zeros();
    for i in 0..3 {
        let mut plus = *v;
        let mut minus = *v;
        plus[i] += step;
        minus[i] -= step;
        let column = (f(&plus)? - f(&minus)?) / (2.0 * step);
        jacobian.set_column(i, &column);
    }
    Ok(jacobian)
}

/// d(angle)/d(position) at `position`, wrapping the inverse solve. This is
/// the direction the velocity mapping uses.
pub fn position_jacobian(
    geom: &LegGeometry,
    position: &FootPosition,
) -> Result<Matrix3<f64>, KinematicsError> {
    position_jacobian_with_step(geom, position, DEFAULT_STEP)
}

pub fn position_jacobian_with_step(
    geom: &LegGeometry,
    position: &FootPosition,
    step: f64,
) -> Result<Matrix3<f64>, KinematicsError> {
    central_difference(|p| kinematics::inverse(geom, p), position, step)
}

/// d(position)/d(angle) at `angle`, wrapping the forward solve.
pub fn angle_jacobian(
    geom: &LegGeometry,
    angle: &JointAngles,
) -> Result<Matrix3<f64>, KinematicsError> {
    angle_jacobian_with_step(geom, angle, DEFAULT_STEP)
}

pub fn angle_jacobian_with_step(
    geom: &LegGeometry,
    angle: &JointAngles,
    step: f64,
) -> Result<Matrix3<f64>, KinematicsError> {
    central_difference(|a| kinematics::forward(geom, a), angle, step)
}

/// Map a foot velocity to joint angular velocity: `omega = J(position) * v`.
///
/// Purely a linear map application; the Jacobian is evaluated at the
/// position sample passed in, so callers must hand in the same sample they
/// derived the velocity from. Near-singular poses are logged but not
/// rejected.
pub fn vel2omg(
    geom: &LegGeometry,
    position: &FootPosition,
    velocity: &Vector3<f64>,
) -> Result<Vector3<f64>, KinematicsError> {
    let jacobian = position_jacobian(geom, position)?;
    let det = jacobian.determinant();
    if det.abs() < SINGULARITY_DET_THRESHOLD {
        warn!(
            det,
            ?position,
            "Jacobian near-singular; velocity mapping may amplify noise"
        );
    }
    Ok(jacobian * velocity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom() -> LegGeometry {
        LegGeometry::default()
    }

    #[test]
    fn position_jacobian_matches_analytic_hip_row() {
        // Row 0 is d(axis1)/d(x,y,z); axis1 = atan2(y, -z) has the closed
        // form gradient (0, -z/(y^2+z^2), y/(y^2+z^2)).
        let g = geom();
        let p = Vector3::new(0.03, 0.01, -0.17);
        let j = position_jacobian(&g, &p).unwrap();
        let denom = p.y * p.y + p.z * p.z;
        assert!((j[(0, 0)] - 0.0).abs() < 1e-6);
        assert!((j[(0, 1)] - (-p.z / denom)).abs() < 1e-5);
        assert!((j[(0, 2)] - (p.y / denom)).abs() < 1e-5);
    }

    #[test]
    fn jacobians_are_mutual_inverses() {
        // Chain rule: d(pos)/d(ang) * d(ang)/d(pos) = I at matched
        // configurations.
        let g = geom();
        let p = Vector3::new(0.03, 0.01, -0.17);
        let angles = kinematics::inverse(&g, &p).unwrap();
        let jp = position_jacobian(&g, &p).unwrap();
        let ja = angle_jacobian(&g, &angles).unwrap();
        let product = ja * jp;
        let err = (product - Matrix3::identity()).amax();
        println!("|Ja*Jp - I| = {err:e}");
        assert!(err < 1e-6);
    }

    #[test]
    fn estimate_is_stable_across_step_sizes() {
        let g = geom();
        let p = Vector3::new(0.03, 0.01, -0.17);
        let fine = position_jacobian_with_step(&g, &p, 1e-6).unwrap();
        let coarse = position_jacobian_with_step(&g, &p, 1e-4).unwrap();
        assert!((fine - coarse).amax() < 1e-4);
    }

    #[test]
    fn vel2omg_is_plain_matrix_vector_product() {
        let g = geom();
        let p = Vector3::new(0.03, 0.01, -0.17);
        let v = Vector3::new(0.05, 0.0, 0.02);
        let omega = vel2omg(&g, &p, &v).unwrap();
        let expected = position_jacobian(&g, &p).unwrap() * v;
        assert!((omega - expected).amax() < 1e-12);
    }

    #[test]
    fn domain_failure_propagates() {
        let g = geom();
        let err = vel2omg(&g, &Vector3::new(0.3, 0.0, -0.3), &Vector3::zeros()).unwrap_err();
        assert!(matches!(err, KinematicsError::Degenerate { .. }));
    }
}
