pub mod clock;
pub mod ecs;
pub mod grid;
pub mod pricing;
pub mod routing;
pub mod runner;
pub mod scenario;
pub mod simulation;
pub mod spawner;
pub mod systems;
pub mod telemetry;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;
