// Leg geometry, gait timing, and motor calibration configuration.
//
// All values live in one immutable `LegConfig` handed to the leg at
// construction; nothing here is mutated afterwards. Defaults match the
// measured prototype leg.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

// Runtime loop frequency (demo control loop)
pub const LOOP_HZ: u64 = 50;

// Serde defaults -----------------------------------------------------------

const fn default_pivot_distance() -> f64 {
    0.0816
}
const fn default_crank() -> f64 {
    0.08
}
const fn default_rod() -> f64 {
    0.13
}
const fn default_shank_upper() -> f64 {
    0.10
}
const fn default_shank_lower() -> f64 {
    0.08
}
const fn default_body_velocity() -> f64 {
    0.1
}
const fn default_leg_period() -> f64 {
    0.5
}
const fn default_control_dt() -> f64 {
    1.0 / LOOP_HZ as f64
}
const fn default_lift_height() -> f64 {
    0.05
}
const fn default_centerline_offset_x() -> f64 {
    0.0057
}
const fn default_centerline_offset_z() -> f64 {
    0.1654
}
const fn default_position_fullscale() -> f64 {
    32768.0
}
const fn default_velocity_fullscale() -> f64 {
    160.0
}
fn default_axis2_offset() -> f64 {
    127.0 * PI / 180.0
}
const fn default_axis3_offset() -> f64 {
    PI / 2.0
}
const fn default_homing_speed() -> i32 {
    55
}
const fn default_max_joint_speed() -> f64 {
    4.0 * PI
}

// Geometry -----------------------------------------------------------------

/// Canonical link lengths of one leg, in meters.
///
/// The rear crank (axis 2) and front crank (axis 3) sit on pivots
/// `pivot_distance` apart. The rear crank carries the shank through the
/// knee; the front crank couples into the shank via the passive rod. Both
/// the forward and inverse solvers derive from this single set, so they are
/// exact mutual inverses over the leg's workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegGeometry {
    /// Distance between the rear and front crank pivots.
    #[serde(default = "default_pivot_distance")]
    pub pivot_distance: f64,

    /// Length of each actuator crank (both cranks are identical).
    #[serde(default = "default_crank")]
    pub crank: f64,

    /// Passive rod from the front crank tip to the shank coupling point.
    #[serde(default = "default_rod")]
    pub rod: f64,

    /// Knee to coupling point along the shank.
    #[serde(default = "default_shank_upper")]
    pub shank_upper: f64,

    /// Coupling point to foot along the shank.
    #[serde(default = "default_shank_lower")]
    pub shank_lower: f64,

    /// Alignment of the derivation plane's x axis with the chassis frame.
    /// Forward kinematics adds it, inverse subtracts it.
    #[serde(default)]
    pub frame_offset_x: f64,
}

impl Default for LegGeometry {
    fn default() -> Self {
        Self {
            pivot_distance: default_pivot_distance(),
            crank: default_crank(),
            rod: default_rod(),
            shank_upper: default_shank_upper(),
            shank_lower: default_shank_lower(),
            frame_offset_x: 0.0,
        }
    }
}

// Gait ---------------------------------------------------------------------

/// Swing-cycle parameters for the Bezier gait trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaitConfig {
    /// Nominal body forward velocity in m/s.
    #[serde(default = "default_body_velocity")]
    pub body_velocity: f64,

    /// Duration of one swing cycle in seconds.
    #[serde(default = "default_leg_period")]
    pub leg_period: f64,

    /// Control tick duration in seconds.
    #[serde(default = "default_control_dt")]
    pub control_dt: f64,

    /// Maximum foot lift height during swing, in meters.
    #[serde(default = "default_lift_height")]
    pub lift_height: f64,

    /// Subtracted from x to center the trajectory on the motor centerline.
    #[serde(default = "default_centerline_offset_x")]
    pub centerline_offset_x: f64,

    /// Subtracted from z to center the trajectory on the motor centerline.
    #[serde(default = "default_centerline_offset_z")]
    pub centerline_offset_z: f64,
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            body_velocity: default_body_velocity(),
            leg_period: default_leg_period(),
            control_dt: default_control_dt(),
            lift_height: default_lift_height(),
            centerline_offset_x: default_centerline_offset_x(),
            centerline_offset_z: default_centerline_offset_z(),
        }
    }
}

// Calibration --------------------------------------------------------------

/// Mechanical offsets and command-unit scale factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Position command counts per pi radians.
    #[serde(default = "default_position_fullscale")]
    pub position_fullscale: f64,

    /// Velocity command counts per 2*pi rad/s.
    #[serde(default = "default_velocity_fullscale")]
    pub velocity_fullscale: f64,

    /// Mechanical zero offset of axis 2 (127 degrees, in radians).
    #[serde(default = "default_axis2_offset")]
    pub axis2_offset: f64,

    /// Mechanical zero offset of axis 3 (pi/2 radians).
    #[serde(default = "default_axis3_offset")]
    pub axis3_offset: f64,

    /// Velocity command issued while an actuator seeks its zero reference,
    /// in command counts.
    #[serde(default = "default_homing_speed")]
    pub homing_speed: i32,

    /// Maximum joint angular speed accepted on the velocity path, rad/s.
    #[serde(default = "default_max_joint_speed")]
    pub max_joint_speed: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            position_fullscale: default_position_fullscale(),
            velocity_fullscale: default_velocity_fullscale(),
            axis2_offset: default_axis2_offset(),
            axis3_offset: default_axis3_offset(),
            homing_speed: default_homing_speed(),
            max_joint_speed: default_max_joint_speed(),
        }
    }
}

// LegConfig ----------------------------------------------------------------

/// Complete configuration for one leg instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegConfig {
    #[serde(default)]
    pub geometry: LegGeometry,
    #[serde(default)]
    pub gait: GaitConfig,
    #[serde(default)]
    pub calibration: CalibrationConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_prototype_leg() {
        let cfg = LegConfig::default();
        assert_eq!(cfg.geometry.pivot_distance, 0.0816);
        assert_eq!(cfg.geometry.crank, 0.08);
        assert_eq!(cfg.gait.control_dt, 0.02);
        assert!((cfg.calibration.axis2_offset - 2.2165681500327987).abs() < 1e-12);
        assert_eq!(cfg.calibration.homing_speed, 55);
    }

    #[test]
    fn empty_json_deserializes_to_defaults() {
        let cfg: LegConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, LegConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg: LegConfig = serde_json::from_str(r#"{"gait": {"leg_period": 0.8}}"#).unwrap();
        assert_eq!(cfg.gait.leg_period, 0.8);
        assert_eq!(cfg.gait.lift_height, 0.05);
        assert_eq!(cfg.geometry, LegGeometry::default());
    }
}
