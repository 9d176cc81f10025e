// Closed-form leg kinematics.
//
// The leg is a five-bar linkage in the sagittal plane, swung sideways about
// the x axis by axis 1. Axis 2 drives the rear crank carrying the shank
// through the knee; axis 3 drives the front crank, coupled into the shank by
// a passive rod. Both directions derive from the same `LegGeometry`, so
// `inverse(forward(a)) == a` away from degenerate poses.
//
// Unit:
//   Length : meter
//   Angle  : rad
//
//   Z        Y
//   |      /
//   |    /
//   |  /
//   +------> X
//
// Crank angles are measured from the +x axis into the lower half-plane, so
// both lie in [0, pi] over the working envelope.

use nalgebra::Vector3;
use thiserror::Error;

use crate::config::LegGeometry;

/// Joint angles `[axis1, axis2, axis3]` in radians.
pub type JointAngles = Vector3<f64>;
/// Foot position in the leg-local frame, meters.
pub type FootPosition = Vector3<f64>;

/// Geometry solve failures.
#[derive(Debug, Error, PartialEq)]
pub enum KinematicsError {
    /// A law-of-cosines argument left [-1, 1]: the requested configuration
    /// is unreachable or the linkage is collinear (degenerate).
    #[error("degenerate linkage configuration: law-of-cosines argument {value} outside [-1, 1]")]
    Degenerate { value: f64 },
}

/// acos with an explicit domain check, so degenerate triangles surface as a
/// typed error instead of NaN.
fn checked_acos(value: f64) -> Result<f64, KinematicsError> {
    if !(-1.0..=1.0).contains(&value) {
        return Err(KinematicsError::Degenerate { value });
    }
    Ok(value.acos())
}

/// Forward kinematics: joint angles to foot position.
pub fn forward(geom: &LegGeometry, angle: &JointAngles) -> Result<FootPosition, KinematicsError> {
    let (a1, a2, a3) = (angle.x, angle.y, angle.z);
    let l1 = geom.crank;
    let dist = geom.pivot_distance;
    let shank = geom.shank_upper + geom.shank_lower;

    // Crank tips in the sagittal plane: rear pivot at the origin, front
    // pivot at (pivot_distance, 0), feet-side below the pivot line.
    let qx = l1 * a2.cos();
    let qz = -l1 * a2.sin();
    let rx = dist - l1 * a3.cos();
    let rz = -l1 * a3.sin();

    // f: knee to front pivot, law of cosines over (crank, pivot_distance).
    let f = (l1 * l1 + dist * dist - 2.0 * l1 * dist * a2.cos()).sqrt();
    // g: knee to front crank tip, from the projected link vectors.
    let g = (rx - qx).hypot(rz - qz);

    // Combined bend angle psi at the knee: the angle from knee->front-pivot
    // to knee->rod-tip, plus the angle from knee->rod-tip to the shank.
    let theta1 = checked_acos((f * f + g * g - l1 * l1) / (2.0 * f * g))?;
    let theta2 = checked_acos(
        (geom.shank_upper * geom.shank_upper + g * g - geom.rod * geom.rod)
            / (2.0 * geom.shank_upper * g),
    )?;
    let psi = theta1 + theta2;

    let knee_to_pivot = (-qz).atan2(dist - qx);
    let phi = knee_to_pivot - psi;

    let x = qx + shank * phi.cos();
    let zp = qz + shank * phi.sin();

    // Swing the sagittal plane sideways about x by axis 1, then align the
    // derivation plane with the chassis frame.
    Ok(Vector3::new(
        x + geom.frame_offset_x,
        -zp * a1.sin(),
        zp * a1.cos(),
    ))
}

/// Inverse kinematics: foot position to joint angles.
pub fn inverse(geom: &LegGeometry, position: &FootPosition) -> Result<JointAngles, KinematicsError> {
    let tx = position.x - geom.frame_offset_x;
    let (ty, tz) = (position.y, position.z);
    let l1 = geom.crank;
    let dist = geom.pivot_distance;

    // Project onto the sagittal plane: planar radius and hip swing angle.
    let z_proj = ty.hypot(tz);
    let x1 = tx.hypot(z_proj);
    let a1 = ty.atan2(-tz);

    // First triangle: rear pivot, crank, target. The raw arctangent lands in
    // (-pi/2, pi/2]; add pi when negative to stay in the lower half-plane.
    let mut alpha2 = (z_proj / tx).atan();
    if alpha2 < 0.0 {
        alpha2 += std::f64::consts::PI;
    }
    let shank = geom.shank_upper + geom.shank_lower;
    let beta2 = checked_acos((x1 * x1 + l1 * l1 - shank * shank) / (2.0 * x1 * l1))?;
    let a2 = alpha2 + beta2;

    // Knee point, then the coupling point P interpolated between knee and
    // target, weighted by the two shank segments (the passive link joins
    // the shank there).
    let qx = l1 * a2.cos();
    let qz = -l1 * a2.sin();
    let px = (qx * geom.shank_lower + tx * geom.shank_upper) / (geom.shank_lower + geom.shank_upper);
    let pz = (qz * geom.shank_lower + (-z_proj) * geom.shank_upper)
        / (geom.shank_lower + geom.shank_upper);

    // Second triangle at the front pivot, same quadrant correction.
    let x2 = (dist - px).hypot(pz);
    let mut alpha3 = (-pz / (dist - px)).atan();
    if alpha3 < 0.0 {
        alpha3 += std::f64::consts::PI;
    }
    let beta3 = checked_acos((x2 * x2 + l1 * l1 - geom.rod * geom.rod) / (2.0 * x2 * l1))?;
    let a3 = alpha3 + beta3;

    Ok(Vector3::new(a1, a2, a3))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom() -> LegGeometry {
        LegGeometry::default()
    }

    // Workspace targets verified reachable and non-degenerate.
    const TARGETS: [[f64; 3]; 6] = [
        [0.02, 0.0, -0.16],
        [0.05, 0.01, -0.17],
        [0.08, 0.0, -0.18],
        [-0.03, 0.02, -0.16],
        [0.04, 0.03, -0.20],
        [0.0, 0.0, -0.1654],
    ];

    #[test]
    fn round_trip_over_workspace() {
        let g = geom();
        for t in TARGETS {
            let target = Vector3::new(t[0], t[1], t[2]);
            let angles = inverse(&g, &target).unwrap();
            let back = forward(&g, &angles).unwrap();
            let err = (back - target).amax();
            println!("target {:?} angles {:?} err {err:e}", t, angles);
            assert!(err < 1e-9, "round trip error {err} for {t:?}");
        }
    }

    #[test]
    fn known_pose_solves_to_expected_angles() {
        let g = geom();
        let a = inverse(&g, &Vector3::new(0.02, 0.0, -0.16)).unwrap();
        assert!((a.x - 0.0).abs() < 1e-12);
        assert!((a.y - 3.0172376590430314).abs() < 1e-9);
        assert!((a.z - 1.8643724880991832).abs() < 1e-9);
    }

    #[test]
    fn hip_angle_is_exact_sagittal_rotation() {
        let g = geom();
        let a = inverse(&g, &Vector3::new(0.04, 0.03, -0.2)).unwrap();
        assert!((a.x - (0.03f64).atan2(0.2)).abs() < 1e-12);
    }

    #[test]
    fn quadrant_correction_behind_pivot() {
        // Target behind the rear pivot: alpha2's raw arctangent is negative
        // and must be shifted by pi.
        let g = geom();
        let target = Vector3::new(-0.03, 0.02, -0.16);
        let a = inverse(&g, &target).unwrap();
        assert!(a.y > std::f64::consts::FRAC_PI_2);
        assert!((a.y - 3.291238556110816).abs() < 1e-9);
        let back = forward(&g, &a).unwrap();
        assert!((back - target).amax() < 1e-9);
    }

    #[test]
    fn inverse_rejects_unreachable_target() {
        let g = geom();
        let err = inverse(&g, &Vector3::new(0.3, 0.0, -0.3)).unwrap_err();
        assert!(matches!(err, KinematicsError::Degenerate { .. }));
    }

    #[test]
    fn inverse_rejects_target_inside_linkage() {
        let g = geom();
        let err = inverse(&g, &Vector3::new(0.0, 0.0, -0.01)).unwrap_err();
        assert!(matches!(err, KinematicsError::Degenerate { .. }));
    }

    #[test]
    fn forward_rejects_collinear_crank_pose() {
        // Crank tips nearly coincident: the rod triangle collapses.
        let g = geom();
        let err = forward(&g, &Vector3::new(0.0, 1.03, 1.04)).unwrap_err();
        assert!(matches!(err, KinematicsError::Degenerate { .. }));
    }

    #[test]
    fn frame_offset_shifts_both_directions_consistently() {
        let mut g = geom();
        g.frame_offset_x = 0.01;
        let target = Vector3::new(0.06, 0.01, -0.17);
        let angles = inverse(&g, &target).unwrap();
        let back = forward(&g, &angles).unwrap();
        assert!((back - target).amax() < 1e-9);

        // Same pose without the offset solves to the same angles shifted in x.
        let g0 = geom();
        let angles0 = inverse(&g0, &Vector3::new(0.05, 0.01, -0.17)).unwrap();
        assert!((angles - angles0).amax() < 1e-12);
    }
}
