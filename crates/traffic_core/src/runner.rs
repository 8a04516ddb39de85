//! Tick loop wiring: system ordering and the per-tick entry point.

use bevy_ecs::prelude::{apply_deferred, IntoSystemConfigs, Schedule, World};

use crate::clock::TickClock;
use crate::systems::{
    assignment_system, movement_system, stuck_sweep_system, telemetry_snapshot_system,
};

/// Build the per-tick schedule. Movement runs first so completed rides free
/// their drivers before assignment, and deferred despawns are applied before
/// the sweep and dispatcher see the world.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            movement_system,
            apply_deferred,
            stuck_sweep_system,
            apply_deferred,
            assignment_system,
            telemetry_snapshot_system,
        )
            .chain(),
    );
    schedule
}

/// Advance the clock by one tick of `real_dt_secs` wall time and run every
/// system once.
pub fn run_tick(world: &mut World, schedule: &mut Schedule, real_dt_secs: f64) {
    world.resource_mut::<TickClock>().advance(real_dt_secs);
    schedule.run(world);
}
