//! Periodic stuck-ride sweep. Assigned rides that have outlived the timeout
//! without completing are abandoned: the driver and rider return to idle
//! and the request is despawned.

use bevy_ecs::prelude::{Commands, Entity, Query, Res, ResMut, Without};
use log::warn;

use crate::clock::TickClock;
use crate::ecs::{Driver, DriverActivity, RideRequest, Rider, RiderState};
use crate::scenario::{StuckRideConfig, SweepConfig};
use crate::telemetry::SimTelemetry;

pub fn stuck_sweep_system(
    mut commands: Commands,
    clock: Res<TickClock>,
    stuck: Res<StuckRideConfig>,
    sweep: Res<SweepConfig>,
    mut telemetry: ResMut<SimTelemetry>,
    mut drivers: Query<(Entity, &mut DriverActivity)>,
    mut riders: Query<&mut Rider, Without<Driver>>,
    rides: Query<(Entity, &RideRequest)>,
) {
    if sweep.interval_ticks == 0 || clock.ticks() % sweep.interval_ticks != 0 {
        return;
    }

    let now = clock.now_secs();
    for (ride_entity, ride) in rides.iter() {
        let Some(driver_entity) = ride.assigned_driver else {
            continue;
        };
        let age = now - ride.created_at;
        if age <= stuck.timeout_secs {
            continue;
        }

        warn!(
            "abandoning stuck ride #{} after {:.0}s in {:?}",
            ride.id, age, ride.status
        );
        if let Ok((_, mut activity)) = drivers.get_mut(driver_entity) {
            *activity = DriverActivity::Idle;
        }
        if let Ok(mut rider) = riders.get_mut(ride.rider) {
            rider.state = RiderState::Idle;
        }
        commands.entity(ride_entity).despawn();
        telemetry.stuck_rides_cleaned += 1;
    }
}
