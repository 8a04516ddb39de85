#![allow(dead_code)]

use bevy_ecs::prelude::{Entity, World};
use traffic_core::ecs::{DriverKind, RideRequest, RideStatus};
use traffic_core::grid::WorldPoint;
use traffic_core::test_helpers::{create_ride, spawn_idle_driver_at, spawn_rider_at};

/// A point on the test grid's first intersection.
pub fn origin() -> WorldPoint {
    WorldPoint::new(100.0, 100.0)
}

/// A point near the far corner of the test grid.
pub fn far_corner() -> WorldPoint {
    WorldPoint::new(400.0, 400.0)
}

pub fn ground_driver_at(world: &mut World, position: WorldPoint) -> Entity {
    spawn_idle_driver_at(world, DriverKind::Ground, position)
}

pub fn air_driver_at(world: &mut World, position: WorldPoint) -> Entity {
    spawn_idle_driver_at(world, DriverKind::Air, position)
}

pub fn rider_at(world: &mut World, position: WorldPoint) -> Entity {
    spawn_rider_at(world, position)
}

/// A waiting ride request from `pickup` to `dropoff` for a rider spawned at
/// the pickup point. Returns `(rider, ride)`.
pub fn waiting_ride(
    world: &mut World,
    kind: DriverKind,
    pickup: WorldPoint,
    dropoff: WorldPoint,
) -> (Entity, Entity) {
    let rider = spawn_rider_at(world, pickup);
    let ride = create_ride(world, rider, kind, pickup, dropoff);
    (rider, ride)
}

pub fn ride_status(world: &World, ride: Entity) -> Option<RideStatus> {
    world.get::<RideRequest>(ride).map(|r| r.status)
}

pub fn assigned_driver(world: &World, ride: Entity) -> Option<Entity> {
    world.get::<RideRequest>(ride).and_then(|r| r.assigned_driver)
}
