//! Periodic heartbeat log and rolling snapshot capture for headless runs.

use bevy_ecs::prelude::{Query, Res, ResMut, Without};
use log::debug;

use crate::clock::TickClock;
use crate::ecs::{Driver, DriverActivity, Position, RideRequest, Rider};
use crate::scenario::SweepConfig;
use crate::telemetry::{
    DriverSnapshot, RideSnapshot, RiderSnapshot, SimSnapshot, SimSnapshotConfig, SimSnapshots,
    SimTelemetry,
};

#[allow(clippy::too_many_arguments)]
pub fn telemetry_snapshot_system(
    clock: Res<TickClock>,
    sweep: Res<SweepConfig>,
    config: Res<SimSnapshotConfig>,
    telemetry: Res<SimTelemetry>,
    mut snapshots: ResMut<SimSnapshots>,
    drivers: Query<(&Driver, &DriverActivity, &Position)>,
    riders: Query<(&Rider, &Position), Without<Driver>>,
    rides: Query<&RideRequest>,
) {
    if sweep.interval_ticks > 0 && clock.ticks() % sweep.interval_ticks == 0 {
        debug!(
            "t={:.1}s tick={} drivers={} riders={} rides={} earnings={:.0} rating={:.2}",
            clock.now_secs(),
            clock.ticks(),
            drivers.iter().count(),
            riders.iter().count(),
            rides.iter().count(),
            telemetry.earnings,
            telemetry.rating,
        );
    }

    let due = match snapshots.last_snapshot_at {
        Some(last) => clock.now_secs() - last >= config.interval_secs,
        None => true,
    };
    if !due {
        return;
    }

    let snapshot = SimSnapshot::from_parts(
        clock.now_secs(),
        clock.ticks(),
        &telemetry,
        drivers
            .iter()
            .map(|(d, a, p)| DriverSnapshot::capture(d, a, p.0))
            .collect(),
        riders
            .iter()
            .map(|(r, p)| RiderSnapshot::capture(r, p.0))
            .collect(),
        rides.iter().map(RideSnapshot::capture).collect(),
    );
    snapshots.push(snapshot, config.max_snapshots);
}
