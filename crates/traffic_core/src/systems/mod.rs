pub mod assignment;
pub mod movement;
pub mod stuck_sweep;
pub mod telemetry_snapshot;

pub use assignment::{assign_driver_to_waiting_ride, assign_nearest_driver, assignment_system};
pub use movement::movement_system;
pub use stuck_sweep::stuck_sweep_system;
pub use telemetry_snapshot::telemetry_snapshot_system;
