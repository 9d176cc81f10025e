// Demo control loop: home the leg, then play one swing cycle.
//
// Ticks at the configured control rate. Each tick first completes the homing
// sequence; once the leg is homed, gait samples are converted to position
// commands. Pose commands are never issued before homing reports complete.

use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info};

use crate::actuator::Actuator;
use crate::config::LegConfig;
use crate::leg::gait::GaitGenerator;
use crate::leg::group::{CommandError, LegGroup};

/// Home the leg, then command one full swing cycle of the gait trajectory.
pub async fn run<A: Actuator>(
    cfg: LegConfig,
    alpha: &mut A,
    beta: &mut A,
) -> Result<(), CommandError> {
    let gait = GaitGenerator::new(cfg.gait.clone());
    let dt = cfg.gait.control_dt;
    let period = cfg.gait.leg_period;
    let mut leg = LegGroup::new(cfg, alpha, beta);

    let mut tick = interval(Duration::from_secs_f64(dt));

    info!(
        "runtime started: {:.0} Hz loop, {period}s swing cycle",
        1.0 / dt
    );

    leg.torque_enable(true);

    // Phase 1: homing. Poll until both actuators report zeroed.
    let mut polls = 0u32;
    while !leg.poll_homing() {
        polls += 1;
        debug!(polls, "homing in progress");
        tick.tick().await;
    }
    info!(polls, "homing complete");

    // Phase 2: one swing cycle, position commands from the gait trajectory.
    let mut t = 0.0;
    while t <= 1.0 {
        let status = gait.status(t);
        leg.move_position(&status.position)?;
        debug!(t, position = ?status.position, "gait tick");
        t += dt / period;
        tick.tick().await;
    }

    info!("swing cycle complete");
    Ok(())
}
