//! Run an autonomous city for a simulated minute and print the outcome.
//!
//! Run with: cargo run -p traffic_core --example scenario_run

use traffic_core::scenario::{AutoSpawnConfig, ScenarioParams};
use traffic_core::simulation::Simulation;

fn main() {
    const TICKS: usize = 3600;
    const DT_SECS: f64 = 1.0 / 60.0;

    let params = ScenarioParams::default()
        .with_seed(123)
        .with_auto_spawn(AutoSpawnConfig {
            enabled: true,
            ..AutoSpawnConfig::default()
        });
    let mut sim = Simulation::new(params);

    for _ in 0..TICKS {
        sim.tick(DT_SECS);
    }

    let snapshot = sim.snapshot();
    println!("--- Autonomous run ({TICKS} ticks, seed 123) ---");
    println!("Simulated time: {:.1} s", snapshot.time_secs);
    println!(
        "Drivers: {} ({} idle, {} to rider, {} on ride)",
        snapshot.counts.total_drivers(),
        snapshot.counts.drivers_idle,
        snapshot.counts.drivers_going_to_rider,
        snapshot.counts.drivers_on_ride,
    );
    println!(
        "Riders: {} | active rides: {}",
        snapshot.counts.total_riders(),
        snapshot.stats.active_rides,
    );
    println!(
        "Completed rides: {} | earnings: {:.0} | rating: {:.2}",
        snapshot.stats.completed_rides, snapshot.stats.earnings, snapshot.stats.rating,
    );
    println!(
        "Total driver distance: {:.0} units",
        snapshot.stats.total_driver_distance
    );

    match serde_json::to_string_pretty(&snapshot.stats) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to serialize stats: {err}"),
    }
}
