// Parametric swing trajectory for one leg.
//
// A degree-4 Bezier blend between the lift-off point and the touch-down
// point, with boundary velocities matched to the body's forward motion and a
// peak control point setting the foot lift.

use nalgebra::Vector3;
use serde::Serialize;

use crate::config::GaitConfig;

/// Output of one gait sample.
///
/// `velocity` is the curve derivative per unit of the phase parameter, not
/// per second; divide by `leg_period` for m/s. `reserved` is always zero and
/// only keeps the output shape symmetric with the other 3x3 results.
#[derive(Debug, Clone, Serialize)]
pub struct GaitStatus {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub reserved: Vector3<f64>,
}

/// Generates foot position/velocity samples over one swing cycle.
#[derive(Debug, Clone)]
pub struct GaitGenerator {
    cfg: GaitConfig,
}

impl GaitGenerator {
    pub fn new(cfg: GaitConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &GaitConfig {
        &self.cfg
    }

    /// The five Bezier control points for the current configuration.
    fn control_points(&self) -> [Vector3<f64>; 5] {
        let cfg = &self.cfg;
        let leave_point = Vector3::zeros();
        let leave_velocity = Vector3::new(-cfg.body_velocity, 0.0, 0.0);
        let entry_point = Vector3::new(
            cfg.body_velocity * (3.0 * cfg.leg_period + 4.0 * cfg.control_dt),
            0.0,
            0.0,
        );
        let entry_velocity = Vector3::new(-cfg.body_velocity, 0.0, 0.0);
        let peak_point = Vector3::new(0.0, 0.0, cfg.lift_height);

        [
            leave_point,
            (leave_velocity * cfg.leg_period + 4.0 * leave_point) / 4.0,
            0.1 * leave_point + 0.9 * entry_point + peak_point,
            (-entry_velocity * cfg.leg_period + 4.0 * entry_point) / 4.0,
            entry_point,
        ]
    }

    /// Sample the swing trajectory at normalized phase `t` in [0, 1]
    /// (clamped at the boundary).
    pub fn status(&self, t: f64) -> GaitStatus {
        let t = t.clamp(0.0, 1.0);
        let [p0, p1, p2, p3, p4] = self.control_points();
        let s = 1.0 - t;

        // Degree-4 Bernstein blend.
        let mut position = p0 * s.powi(4)
            + p1 * 4.0 * t * s.powi(3)
            + p2 * 6.0 * t.powi(2) * s.powi(2)
            + p3 * 4.0 * t.powi(3) * s
            + p4 * t.powi(4);

        // Hodograph: degree-3 blend of the control point differences,
        // scaled by the curve degree.
        let mut velocity = (p1 - p0) * 4.0 * s.powi(3)
            + (p2 - p1) * 12.0 * t * s.powi(2)
            + (p3 - p2) * 12.0 * t.powi(2) * s
            + (p4 - p3) * 4.0 * t.powi(3);

        // The swing stays in the sagittal plane.
        position.y = 0.0;
        velocity.y = 0.0;

        // Align the trajectory midpoint with the motor centerline.
        position.x -= self.cfg.centerline_offset_x;
        position.z -= self.cfg.centerline_offset_z;

        GaitStatus {
            position,
            velocity,
            reserved: Vector3::zeros(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> GaitGenerator {
        GaitGenerator::new(GaitConfig::default())
    }

    #[test]
    fn lift_off_matches_centerline_alignment() {
        let status = generator().status(0.0);
        assert!((status.position - Vector3::new(-0.0057, 0.0, -0.1654)).amax() < 1e-12);
    }

    #[test]
    fn touch_down_lands_at_entry_point() {
        // entry x = body_velocity * (3*leg_period + 4*control_dt) = 0.158
        let status = generator().status(1.0);
        assert!((status.position - Vector3::new(0.158 - 0.0057, 0.0, -0.1654)).amax() < 1e-12);
    }

    #[test]
    fn boundary_velocities_match_body_motion() {
        // At the boundaries the hodograph reduces to 4*(p1-p0) and
        // 4*(p4-p3), i.e. the leave/entry velocity scaled by the period,
        // expressed per unit of the phase parameter t.
        let gait = generator();
        let start = gait.status(0.0);
        let end = gait.status(1.0);
        assert!((start.velocity.x - (-0.05)).abs() < 1e-12);
        assert!((end.velocity.x - (-0.05)).abs() < 1e-12);
        assert_eq!(start.velocity.y, 0.0);
        assert_eq!(start.velocity.z, 0.0);
    }

    #[test]
    fn foot_lifts_mid_swing() {
        let gait = generator();
        let mid = gait.status(0.5);
        assert!(mid.position.z > gait.status(0.0).position.z);
        assert!((mid.position.z - (-0.14665)).abs() < 1e-9);
    }

    #[test]
    fn reserved_slot_is_always_zero() {
        for t in [0.0, 0.3, 0.7, 1.0] {
            assert_eq!(generator().status(t).reserved, Vector3::zeros());
        }
    }

    #[test]
    fn phase_is_clamped_to_cycle() {
        let gait = generator();
        assert_eq!(gait.status(-0.5).position, gait.status(0.0).position);
        assert_eq!(gait.status(1.5).position, gait.status(1.0).position);
    }
}
