// Actuator capability surface.
//
// The leg core commands actuators through this trait and never owns the
// hardware: transport, encoder feedback, and fault handling all live in the
// caller's driver. `SimActuator` is the software stand-in used by the demo
// runtime and tests.

/// Control modes understood by the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// Hold a commanded position (counts).
    Position,
    /// Track a commanded velocity (counts).
    Velocity,
}

/// Capability set the leg core requires from one actuator.
///
/// Implementations are borrowed by the leg for the duration of a command;
/// the leg never manages the handle's lifetime.
pub trait Actuator {
    fn torque_enable(&mut self, on: bool);

    fn set_control_mode(&mut self, mode: ControlMode);

    /// Goal position in integer command counts.
    fn set_goal_position(&mut self, counts: i32);

    /// Goal velocity in integer command counts.
    fn set_goal_velocity(&mut self, counts: i32);

    /// Advance the actuator's internal zero-reference detection.
    fn poll_zero_calibration(&mut self);

    /// Whether the zero reference has been found.
    fn is_zeroed(&self) -> bool;
}

/// Software actuator model for running the leg without hardware.
///
/// Records the last mode and goals, and reports zeroed after a configurable
/// number of calibration polls.
#[derive(Debug, Clone)]
pub struct SimActuator {
    pub torque_on: bool,
    pub mode: ControlMode,
    pub goal_position: i32,
    pub goal_velocity: i32,
    polls_until_zero: u32,
    zeroed: bool,
}

impl SimActuator {
    /// An actuator that finds its zero after `polls_until_zero` calibration
    /// polls.
    pub fn new(polls_until_zero: u32) -> Self {
        Self {
            torque_on: false,
            mode: ControlMode::Position,
            goal_position: 0,
            goal_velocity: 0,
            polls_until_zero,
            zeroed: polls_until_zero == 0,
        }
    }
}

impl Actuator for SimActuator {
    fn torque_enable(&mut self, on: bool) {
        self.torque_on = on;
    }

    fn set_control_mode(&mut self, mode: ControlMode) {
        self.mode = mode;
    }

    fn set_goal_position(&mut self, counts: i32) {
        self.goal_position = counts;
    }

    fn set_goal_velocity(&mut self, counts: i32) {
        self.goal_velocity = counts;
    }

    fn poll_zero_calibration(&mut self) {
        if !self.zeroed {
            if self.polls_until_zero > 0 {
                self.polls_until_zero -= 1;
            }
            self.zeroed = self.polls_until_zero == 0;
        }
    }

    fn is_zeroed(&self) -> bool {
        self.zeroed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_actuator_zeroes_after_configured_polls() {
        let mut act = SimActuator::new(2);
        assert!(!act.is_zeroed());
        act.poll_zero_calibration();
        assert!(!act.is_zeroed());
        act.poll_zero_calibration();
        assert!(act.is_zeroed());
        // stays zeroed
        act.poll_zero_calibration();
        assert!(act.is_zeroed());
    }

    #[test]
    fn sim_actuator_records_commands() {
        let mut act = SimActuator::new(0);
        act.torque_enable(true);
        act.set_control_mode(ControlMode::Velocity);
        act.set_goal_velocity(-42);
        assert!(act.torque_on);
        assert_eq!(act.mode, ControlMode::Velocity);
        assert_eq!(act.goal_velocity, -42);
    }
}
