// Leg control module
//
// Provides:
// - Closed-form forward/inverse kinematics for the five-bar leg linkage
// - Finite-difference Jacobians and foot-velocity to joint-speed mapping
// - Bezier swing trajectory generation
// - Calibrated actuator command translation and the homing sequence

pub mod gait;
pub mod group;
pub mod jacobian;
pub mod kinematics;

pub use gait::{GaitGenerator, GaitStatus};
pub use group::{CommandError, HomingState, LegGroup};
pub use jacobian::{angle_jacobian, position_jacobian, vel2omg};
pub use kinematics::{forward, inverse, FootPosition, JointAngles, KinematicsError};
