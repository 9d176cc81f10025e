// Per-leg kinematics and motion command runtime for a quadruped leg.
//
// The leg core is pure computation over an immutable `LegConfig`; actuator
// side effects go through the borrowed `Actuator` handles held by
// `LegGroup`.

pub mod actuator;
pub mod config;
pub mod leg;
pub mod runtime;

pub use actuator::{Actuator, ControlMode, SimActuator};
pub use config::{CalibrationConfig, GaitConfig, LegConfig, LegGeometry};
pub use leg::{GaitGenerator, LegGroup};
