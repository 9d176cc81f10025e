use quadleg_runtime::{LegConfig, SimActuator};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // No hardware attached: run the leg against simulated actuators.
    let cfg = LegConfig::default();
    let mut alpha = SimActuator::new(5);
    let mut beta = SimActuator::new(3);

    if let Err(e) = quadleg_runtime::runtime::run(cfg, &mut alpha, &mut beta).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
