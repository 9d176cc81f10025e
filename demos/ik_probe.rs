// Solve inverse kinematics for a target foot position and print the joint
// angles, the local Jacobian, and the calibrated round trip.
//
// Usage:
//   cargo run --example ik_probe -- 0.05 0.0 -0.17

use clap::Parser;
use nalgebra::Vector3;
use quadleg_runtime::leg::{forward, inverse, position_jacobian};
use quadleg_runtime::LegGeometry;

#[derive(Parser)]
#[command(about = "Probe the leg kinematics at a target foot position")]
struct Args {
    /// Target x in meters (leg-local frame)
    x: f64,
    /// Target y in meters
    y: f64,
    /// Target z in meters (negative is below the pivots)
    z: f64,
}

fn main() {
    let args = Args::parse();
    let geom = LegGeometry::default();
    let target = Vector3::new(args.x, args.y, args.z);

    let angles = match inverse(&geom, &target) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("inverse kinematics failed: {e}");
            std::process::exit(1);
        }
    };
    println!(
        "angles  [rad]: {:+.5} {:+.5} {:+.5}",
        angles.x, angles.y, angles.z
    );
    println!(
        "angles  [deg]: {:+.2} {:+.2} {:+.2}",
        angles.x.to_degrees(),
        angles.y.to_degrees(),
        angles.z.to_degrees()
    );

    match forward(&geom, &angles) {
        Ok(p) => println!("round trip    : {:+.6} {:+.6} {:+.6}", p.x, p.y, p.z),
        Err(e) => eprintln!("forward check failed: {e}"),
    }

    match position_jacobian(&geom, &target) {
        Ok(j) => println!("d(angle)/d(pos):\n{j:.4}"),
        Err(e) => eprintln!("jacobian failed: {e}"),
    }
}
