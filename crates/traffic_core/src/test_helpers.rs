//! Fixtures for tests and benches: deterministic scenario parameters and
//! direct entity spawning at known positions.

use bevy_ecs::prelude::{Entity, World};

use crate::clock::TickClock;
use crate::ecs::{DriverKind, IdAllocator, RideRequest, RideStatus};
use crate::grid::{GridConfig, WorldPoint};
use crate::pricing::{quote_fare, PricingConfig};
use crate::scenario::{DriverSpeeds, ScenarioParams, WorldBounds};
use crate::spawner;

/// A 4x4 intersection grid starting at (100, 100) with 100-unit spacing.
pub fn small_grid() -> GridConfig {
    GridConfig {
        first_road_x: 100.0,
        first_road_y: 100.0,
        vertical_spacing: 100.0,
        horizontal_spacing: 100.0,
        vertical_roads: 4,
        horizontal_roads: 4,
        road_width: 32.0,
    }
}

/// Deterministic parameters over the small grid, sized so routes stay short.
pub fn small_params() -> ScenarioParams {
    ScenarioParams::default()
        .with_seed(1)
        .with_grid(small_grid())
        .with_bounds(WorldBounds {
            width: 500.0,
            height: 500.0,
            spawn_margin: 50.0,
        })
}

/// Spawn an idle driver of `kind` at an exact position.
pub fn spawn_idle_driver_at(world: &mut World, kind: DriverKind, position: WorldPoint) -> Entity {
    let speed = world.resource::<DriverSpeeds>().for_kind(kind);
    let id = world.resource_mut::<IdAllocator>().next_driver_id();
    world
        .spawn(spawner::driver_bundle(id, kind, speed, position))
        .id()
}

/// Spawn an idle rider at an exact position.
pub fn spawn_rider_at(world: &mut World, position: WorldPoint) -> Entity {
    let id = world.resource_mut::<IdAllocator>().next_rider_id();
    world.spawn(spawner::rider_bundle(id, position)).id()
}

/// Spawn an unassigned ride request for `rider` with the quoted fare and the
/// current clock time.
pub fn create_ride(
    world: &mut World,
    rider: Entity,
    kind: DriverKind,
    pickup: WorldPoint,
    dropoff: WorldPoint,
) -> Entity {
    let pricing = *world.resource::<PricingConfig>();
    let fare = match quote_fare(&pricing, pickup, dropoff) {
        Ok(fare) => fare,
        Err(err) => panic!("fixture ride must have finite coordinates: {err}"),
    };
    let created_at = world.resource::<TickClock>().now_secs();
    let id = world.resource_mut::<IdAllocator>().next_ride_id();
    world
        .spawn(RideRequest {
            id,
            kind,
            rider,
            pickup,
            dropoff,
            fare,
            status: RideStatus::WaitingForPickup,
            assigned_driver: None,
            created_at,
        })
        .id()
}
