// One leg's command authority: joint-limit validation, mechanical offset
// calibration, physical-to-count conversion, and the homing sequence for the
// leg's two active actuators.

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::Vector3;
use thiserror::Error;
use tracing::{debug, info};

use crate::actuator::{Actuator, ControlMode};
use crate::config::LegConfig;
use crate::leg::jacobian;
use crate::leg::kinematics::{self, FootPosition, JointAngles, KinematicsError};

/// Command failures. All abort before any actuator call.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),

    #[error("joint {axis} angle {angle} rad outside [{min}, {max}] rad")]
    JointLimit {
        axis: u8,
        angle: f64,
        min: f64,
        max: f64,
    },

    #[error("joint {axis} speed {omega} rad/s exceeds limit {limit} rad/s")]
    SpeedLimit { axis: u8, omega: f64, limit: f64 },
}

pub type Result<T> = std::result::Result<T, CommandError>;

/// Homing progress of one actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomingState {
    /// Driving at the homing speed, zero reference not yet found.
    Seeking,
    /// Zero reference found; actuator holding position.
    Zeroed,
}

/// Convert a calibrated angle to integer position counts
/// (`fullscale` counts per pi radians). Truncates toward zero; that bias is
/// the documented policy, pinned by the conversion tests.
fn rad_to_position_counts(angle: f64, fullscale: f64) -> i32 {
    (angle * fullscale / PI) as i32
}

/// Convert an angular velocity to integer velocity counts
/// (`fullscale` counts per 2*pi rad/s). Truncates toward zero.
fn radps_to_velocity_counts(omega: f64, fullscale: f64) -> i32 {
    (omega * fullscale / (2.0 * PI)) as i32
}

/// One leg: two borrowed actuator handles plus the immutable configuration.
///
/// `beta` drives joint axis 2 (rear crank), `alpha` drives joint axis 3
/// (front crank). Axis 1 (hip swing) is a reserved extension point: its
/// command is calibrated and logged but never transmitted. The `&mut`
/// borrows give this instance exclusive command authority over its
/// actuators for its lifetime.
pub struct LegGroup<'m, A: Actuator> {
    cfg: LegConfig,
    alpha: &'m mut A,
    beta: &'m mut A,
    alpha_homing: HomingState,
    beta_homing: HomingState,
}

impl<'m, A: Actuator> LegGroup<'m, A> {
    pub fn new(cfg: LegConfig, alpha: &'m mut A, beta: &'m mut A) -> Self {
        Self {
            cfg,
            alpha,
            beta,
            alpha_homing: HomingState::Seeking,
            beta_homing: HomingState::Seeking,
        }
    }

    pub fn config(&self) -> &LegConfig {
        &self.cfg
    }

    /// Enable or disable torque on both actuators.
    pub fn torque_enable(&mut self, on: bool) {
        info!(on, "setting leg torque");
        self.alpha.torque_enable(on);
        self.beta.torque_enable(on);
    }

    fn check_limit(axis: u8, angle: f64, min: f64, max: f64) -> Result<()> {
        if !(min..=max).contains(&angle) {
            return Err(CommandError::JointLimit {
                axis,
                angle,
                min,
                max,
            });
        }
        Ok(())
    }

    /// Command the leg to hold the given joint angles.
    ///
    /// Validates the mechanical ranges first; a violation aborts with no
    /// actuator call and no mode change.
    pub fn move_angle(&mut self, angle: &JointAngles) -> Result<()> {
        Self::check_limit(1, angle.x, -FRAC_PI_2, FRAC_PI_2)?;
        Self::check_limit(2, angle.y, 0.0, PI)?;
        Self::check_limit(3, angle.z, 0.0, PI)?;

        let cal = &self.cfg.calibration;
        // Mechanical zero offsets: both distal axes are mounted mirrored
        // relative to the angle convention of the solver.
        let motor_angle_2 = cal.axis2_offset - angle.y;
        let motor_angle_3 = cal.axis3_offset - angle.z;
        // Axis 1 is reserved: calibrated but not transmitted.
        let motor_angle_1 = 0.0;

        let counts_1 = rad_to_position_counts(motor_angle_1, cal.position_fullscale);
        let counts_2 = rad_to_position_counts(motor_angle_2, cal.position_fullscale);
        let counts_3 = rad_to_position_counts(motor_angle_3, cal.position_fullscale);
        debug!(counts_1, counts_2, counts_3, "position command");

        self.alpha.set_control_mode(ControlMode::Position);
        self.beta.set_control_mode(ControlMode::Position);
        self.alpha.set_goal_position(counts_3);
        self.beta.set_goal_position(counts_2);
        Ok(())
    }

    /// Command the leg's joint angular velocities.
    ///
    /// The transmitted axes are validated against the configured speed
    /// limit, mirroring the position path's abort-before-side-effect policy.
    pub fn move_angular_velocity(&mut self, omega: &Vector3<f64>) -> Result<()> {
        let cal = &self.cfg.calibration;
        for (axis, value) in [(2u8, omega.y), (3u8, omega.z)] {
            if value.abs() > cal.max_joint_speed {
                return Err(CommandError::SpeedLimit {
                    axis,
                    omega: value,
                    limit: cal.max_joint_speed,
                });
            }
        }

        let counts_2 = radps_to_velocity_counts(omega.y, cal.velocity_fullscale);
        let counts_3 = radps_to_velocity_counts(omega.z, cal.velocity_fullscale);
        debug!(counts_2, counts_3, "velocity command");

        self.alpha.set_control_mode(ControlMode::Velocity);
        self.beta.set_control_mode(ControlMode::Velocity);
        self.alpha.set_goal_velocity(counts_3);
        self.beta.set_goal_velocity(counts_2);
        Ok(())
    }

    /// Solve inverse kinematics for `position` and hold the result.
    pub fn move_position(&mut self, position: &FootPosition) -> Result<()> {
        let angle = kinematics::inverse(&self.cfg.geometry, position)?;
        self.move_angle(&angle)
    }

    /// Map a foot velocity at `position` to joint speeds and command them.
    ///
    /// The Jacobian is evaluated at the position sample passed in; within
    /// one control tick that sample must predate the velocity target.
    pub fn move_velocity(&mut self, position: &FootPosition, velocity: &Vector3<f64>) -> Result<()> {
        let omega = jacobian::vel2omg(&self.cfg.geometry, position, velocity)?;
        self.move_angular_velocity(&omega)
    }

    /// Advance the homing sequence by one non-blocking pass.
    ///
    /// While an actuator is `Seeking` it is driven in velocity mode at the
    /// homing speed; on the poll where its zero reference appears it gets a
    /// zero-velocity command and is switched to position hold. Returns true
    /// once both actuators (and the permanently satisfied reserved third
    /// slot) are `Zeroed`. There is no timeout: a stalled actuator keeps
    /// the result false and the caller owns retry policy.
    pub fn poll_homing(&mut self) -> bool {
        self.alpha_homing = Self::home_one("alpha", self.alpha, self.alpha_homing, &self.cfg);
        self.beta_homing = Self::home_one("beta", self.beta, self.beta_homing, &self.cfg);

        self.alpha_homing == HomingState::Zeroed && self.beta_homing == HomingState::Zeroed
    }

    fn home_one(name: &str, act: &mut A, state: HomingState, cfg: &LegConfig) -> HomingState {
        if state == HomingState::Zeroed {
            return state;
        }
        act.poll_zero_calibration();
        if act.is_zeroed() {
            info!(actuator = name, "zero reference found, holding position");
            act.set_goal_velocity(0);
            act.set_control_mode(ControlMode::Position);
            HomingState::Zeroed
        } else {
            debug!(actuator = name, "seeking zero reference");
            act.set_control_mode(ControlMode::Velocity);
            act.set_goal_velocity(cfg.calibration.homing_speed);
            HomingState::Seeking
        }
    }

    /// Whether the homing sequence has completed.
    pub fn is_homed(&self) -> bool {
        self.alpha_homing == HomingState::Zeroed && self.beta_homing == HomingState::Zeroed
    }
}
