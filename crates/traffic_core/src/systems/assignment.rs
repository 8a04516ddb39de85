//! Greedy dispatch: waiting rides claim their nearest idle driver of the
//! required kind, oldest request first. Each sweep tracks claimed drivers so
//! two rides never grab the same driver in one pass.

use std::collections::HashSet;

use bevy_ecs::prelude::{Entity, World};
use log::info;

use crate::ecs::{Driver, DriverActivity, DriverKind, Position, RideRequest, RideStatus};
use crate::grid::WorldPoint;

/// Match every unassigned ride it can. Runs as an exclusive system after
/// movement, and is also invoked directly when a ride or driver is created.
pub fn assignment_system(world: &mut World) {
    assign_waiting_rides(world);
}

pub fn assign_waiting_rides(world: &mut World) {
    let mut waiting: Vec<(Entity, DriverKind, WorldPoint, f64)> = world
        .query::<(Entity, &RideRequest)>()
        .iter(world)
        .filter(|(_, ride)| ride.assigned_driver.is_none())
        .map(|(entity, ride)| (entity, ride.kind, ride.pickup, ride.created_at))
        .collect();
    waiting.sort_by(|a, b| a.3.total_cmp(&b.3));

    let mut claimed: HashSet<Entity> = HashSet::new();
    for (ride_entity, kind, pickup, _) in waiting {
        if let Some(driver_entity) = nearest_idle_driver(world, kind, pickup, &claimed) {
            claimed.insert(driver_entity);
            apply_match(world, ride_entity, driver_entity);
        }
    }
}

/// Try to match one specific unassigned ride. Returns whether a driver was
/// found.
pub fn assign_nearest_driver(world: &mut World, ride_entity: Entity) -> bool {
    let Some(ride) = world.get::<RideRequest>(ride_entity) else {
        return false;
    };
    if ride.assigned_driver.is_some() {
        return false;
    }
    let (kind, pickup) = (ride.kind, ride.pickup);
    match nearest_idle_driver(world, kind, pickup, &HashSet::new()) {
        Some(driver_entity) => {
            apply_match(world, ride_entity, driver_entity);
            true
        }
        None => false,
    }
}

/// Give a freshly idle (or freshly spawned) driver the oldest waiting ride
/// of its kind, if any. Returns whether a ride was assigned.
pub fn assign_driver_to_waiting_ride(world: &mut World, driver_entity: Entity) -> bool {
    let idle = world
        .get::<DriverActivity>(driver_entity)
        .map(|a| a.is_idle())
        .unwrap_or(false);
    let Some(driver) = world.get::<Driver>(driver_entity) else {
        return false;
    };
    if !idle {
        return false;
    }
    let kind = driver.kind;

    let oldest = world
        .query::<(Entity, &RideRequest)>()
        .iter(world)
        .filter(|(_, ride)| ride.assigned_driver.is_none() && ride.kind == kind)
        .min_by(|a, b| a.1.created_at.total_cmp(&b.1.created_at))
        .map(|(entity, _)| entity);
    match oldest {
        Some(ride_entity) => {
            apply_match(world, ride_entity, driver_entity);
            true
        }
        None => false,
    }
}

fn nearest_idle_driver(
    world: &mut World,
    kind: DriverKind,
    pickup: WorldPoint,
    claimed: &HashSet<Entity>,
) -> Option<Entity> {
    world
        .query::<(Entity, &Driver, &DriverActivity, &Position)>()
        .iter(world)
        .filter(|(entity, driver, activity, _)| {
            driver.kind == kind && activity.is_idle() && !claimed.contains(entity)
        })
        .min_by(|a, b| {
            a.3 .0
                .distance_to(pickup)
                .total_cmp(&b.3 .0.distance_to(pickup))
        })
        .map(|(entity, ..)| entity)
}

fn apply_match(world: &mut World, ride_entity: Entity, driver_entity: Entity) {
    let Some(mut ride) = world.get_mut::<RideRequest>(ride_entity) else {
        return;
    };
    let pickup = ride.pickup;
    let ride_id = ride.id;
    ride.assigned_driver = Some(driver_entity);
    ride.status = RideStatus::GoingToRider;
    ride.debug_assert_consistent();

    if let Some(mut activity) = world.get_mut::<DriverActivity>(driver_entity) {
        *activity = DriverActivity::GoingToRider {
            target: pickup,
            route: None,
        };
    }
    let driver_id = world
        .get::<Driver>(driver_entity)
        .map(|d| d.id)
        .unwrap_or(0);
    info!("driver #{driver_id} assigned to ride #{ride_id}");
}
