// Dump swing trajectory samples as JSON lines.
//
// Usage:
//   cargo run --example gait_dump -- --samples 50
//   cargo run --example gait_dump -- --period 0.8 --lift 0.07

use clap::Parser;
use quadleg_runtime::{GaitConfig, GaitGenerator};

#[derive(Parser)]
#[command(about = "Sample the leg swing trajectory and print JSON lines")]
struct Args {
    /// Number of samples over one swing cycle
    #[arg(long, default_value_t = 20)]
    samples: usize,

    /// Override the swing cycle duration in seconds
    #[arg(long)]
    period: Option<f64>,

    /// Override the peak foot lift height in meters
    #[arg(long)]
    lift: Option<f64>,
}

fn main() {
    let args = Args::parse();

    let mut cfg = GaitConfig::default();
    if let Some(period) = args.period {
        cfg.leg_period = period;
    }
    if let Some(lift) = args.lift {
        cfg.lift_height = lift;
    }

    let gait = GaitGenerator::new(cfg);
    for i in 0..=args.samples {
        let t = i as f64 / args.samples as f64;
        let status = gait.status(t);
        let line = serde_json::json!({
            "t": t,
            "position": [status.position.x, status.position.y, status.position.z],
            "velocity": [status.velocity.x, status.velocity.y, status.velocity.z],
        });
        println!("{line}");
    }
}
