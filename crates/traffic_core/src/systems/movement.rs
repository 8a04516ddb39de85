//! Per-tick movement: drivers advance toward their targets, riders in a car
//! move with it, and arrivals trigger the pickup and dropoff transitions.

use bevy_ecs::prelude::{Commands, Entity, Query, Res, ResMut, Without};
use log::info;

use crate::clock::TickClock;
use crate::ecs::{
    Driver, DriverActivity, DriverKind, Position, RideRequest, RideStatus, Rider, RiderState,
};
use crate::grid::WorldPoint;
use crate::routing::{RoutePath, Router};
use crate::telemetry::{CompletedRideRecord, RatingConfig, SimTelemetry};

/// Ground drivers count as arrived within this distance of a waypoint or
/// target, in world units.
pub const GROUND_ARRIVAL_EPSILON: f64 = 10.0;

/// Air drivers fly faster, so they get a wider arrival band to avoid
/// overshoot oscillation.
pub const AIR_ARRIVAL_EPSILON: f64 = 20.0;

/// Outcome of one movement step.
struct Step {
    position: WorldPoint,
    moved: f64,
    arrived: bool,
}

/// Move from `from` straight toward `to`, covering at most `max_step`.
fn move_toward(from: WorldPoint, to: WorldPoint, max_step: f64) -> (WorldPoint, f64) {
    let distance = from.distance_to(to);
    if distance <= max_step || distance == 0.0 {
        return (to, distance);
    }
    let t = max_step / distance;
    let next = WorldPoint::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
    (next, max_step)
}

/// Ground step: follow the road route waypoint by waypoint, consuming at
/// most one waypoint per tick. Arrival is route exhaustion.
fn step_ground(position: WorldPoint, route: &mut RoutePath, budget: f64) -> Step {
    match route.current() {
        Some(waypoint) => {
            let (next, moved) = move_toward(position, waypoint, budget);
            if next.distance_to(waypoint) < GROUND_ARRIVAL_EPSILON {
                route.advance();
            }
            Step {
                position: next,
                moved,
                arrived: route.is_finished(),
            }
        }
        None => Step {
            position,
            moved: 0.0,
            arrived: true,
        },
    }
}

/// Air step: fly straight at the target, arriving inside the epsilon band.
fn step_direct(position: WorldPoint, target: WorldPoint, budget: f64) -> Step {
    if position.distance_to(target) < AIR_ARRIVAL_EPSILON {
        return Step {
            position,
            moved: 0.0,
            arrived: true,
        };
    }
    let (next, moved) = move_toward(position, target, budget);
    let arrived = next.distance_to(target) < AIR_ARRIVAL_EPSILON;
    Step {
        position: next,
        moved,
        arrived,
    }
}

fn step_driver(
    driver: &Driver,
    activity: &mut DriverActivity,
    position: WorldPoint,
    router: &mut Router,
    dt: f64,
) -> Step {
    let budget = driver.speed * dt;
    match activity {
        DriverActivity::Idle => Step {
            position,
            moved: 0.0,
            arrived: false,
        },
        DriverActivity::GoingToRider { target, route }
        | DriverActivity::OnRide { target, route } => match driver.kind {
            DriverKind::Ground => {
                let target = *target;
                let route = route.get_or_insert_with(|| router.find_path(position, target));
                step_ground(position, route, budget)
            }
            DriverKind::Air => step_direct(position, *target, budget),
        },
    }
}

/// Advance every active driver and apply arrival transitions. A driver
/// arriving at the pickup point boards its rider; arriving at the dropoff
/// completes the ride, records telemetry and despawns the request.
#[allow(clippy::too_many_arguments)]
pub fn movement_system(
    mut commands: Commands,
    clock: Res<TickClock>,
    mut router: ResMut<Router>,
    mut telemetry: ResMut<SimTelemetry>,
    rating: Res<RatingConfig>,
    mut drivers: Query<(Entity, &Driver, &mut DriverActivity, &mut Position)>,
    mut riders: Query<(&mut Rider, &mut Position), Without<Driver>>,
    mut rides: Query<(Entity, &mut RideRequest)>,
) {
    let dt = clock.delta_secs();
    if dt <= 0.0 {
        return;
    }

    for (driver_entity, driver, mut activity, mut position) in drivers.iter_mut() {
        if activity.is_idle() {
            continue;
        }

        let step = step_driver(driver, &mut activity, position.0, &mut router, dt);
        position.0 = step.position;
        telemetry.total_driver_distance += step.moved;

        // Riders being driven move with the car.
        if let DriverActivity::OnRide { .. } = *activity {
            if let Some((_, ride)) = rides
                .iter_mut()
                .find(|(_, r)| r.assigned_driver == Some(driver_entity))
            {
                if let Ok((_, mut rider_pos)) = riders.get_mut(ride.rider) {
                    rider_pos.0 = position.0;
                }
            }
        }

        if !step.arrived {
            continue;
        }

        let found = rides
            .iter_mut()
            .find(|(_, r)| r.assigned_driver == Some(driver_entity));
        let Some((ride_entity, mut ride)) = found else {
            debug_assert!(false, "active driver #{} has no ride", driver.id);
            *activity = DriverActivity::Idle;
            continue;
        };

        match ride.status {
            RideStatus::GoingToRider => {
                // Pickup: snap both to the pickup point and start the trip.
                position.0 = ride.pickup;
                if let Ok((mut rider, mut rider_pos)) = riders.get_mut(ride.rider) {
                    rider.state = RiderState::InRide;
                    rider_pos.0 = ride.pickup;
                }
                ride.status = RideStatus::InRide;
                *activity = DriverActivity::OnRide {
                    target: ride.dropoff,
                    route: None,
                };
                info!("driver #{} picked up ride #{}", driver.id, ride.id);
            }
            RideStatus::InRide => {
                position.0 = ride.dropoff;
                let mut rider_id = 0;
                if let Ok((mut rider, mut rider_pos)) = riders.get_mut(ride.rider) {
                    rider.state = RiderState::Idle;
                    rider_pos.0 = ride.dropoff;
                    rider_id = rider.id;
                }
                *activity = DriverActivity::Idle;

                let duration_secs = clock.now_secs() - ride.created_at;
                telemetry.record_completion(
                    CompletedRideRecord {
                        ride_id: ride.id,
                        driver_id: driver.id,
                        rider_id,
                        fare: ride.fare,
                        distance: ride.pickup.distance_to(ride.dropoff),
                        duration_secs,
                        completed_at: clock.now_secs(),
                    },
                    &rating,
                );
                commands.entity(ride_entity).despawn();
                info!(
                    "driver #{} completed ride #{} (fare {:.0}, {:.1}s)",
                    driver.id, ride.id, ride.fare, duration_secs
                );
            }
            RideStatus::WaitingForPickup => {
                debug_assert!(false, "assigned ride #{} still WaitingForPickup", ride.id);
            }
        }
    }
}
