//! The `Simulation` facade: owns the ECS world and schedule and exposes the
//! commands a frontend needs (spawning, ride requests, ticking, snapshots).

use std::error::Error;
use std::fmt;

use bevy_ecs::prelude::{Entity, World};
use log::{info, warn};
use rand::Rng;

use crate::clock::TickClock;
use crate::ecs::{
    Driver, DriverActivity, DriverKind, IdAllocator, Position, RideRequest, RideStatus, Rider,
    RiderState,
};
use crate::grid::WorldPoint;
use crate::pricing::{quote_fare, PricingConfig};
use crate::runner;
use crate::scenario::{
    build_scenario, AutoSpawnConfig, DriverSpeeds, ScenarioParams, SpawnRng, WorldBounds,
};
use crate::spawner;
use crate::systems::{assign_driver_to_waiting_ride, assign_nearest_driver};
use crate::telemetry::{
    DriverSnapshot, RideSnapshot, RiderSnapshot, SimSnapshot, SimSnapshots, SimTelemetry,
};

/// Errors from [`Simulation::request_ride`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    /// Every rider is already waiting or riding.
    NoIdleRider,
    /// Pickup or dropoff coordinates were not finite.
    InvalidCoordinates,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::NoIdleRider => write!(f, "no idle rider available"),
            RequestError::InvalidCoordinates => write!(f, "ride coordinates are not finite"),
        }
    }
}

impl Error for RequestError {}

/// One ride-hailing simulation instance. Multiple instances are fully
/// independent; no state is shared between them.
pub struct Simulation {
    world: World,
    schedule: bevy_ecs::schedule::Schedule,
    rider_timer: f64,
    driver_timer: f64,
    ride_timer: f64,
}

impl Simulation {
    pub fn new(params: ScenarioParams) -> Self {
        let mut world = World::new();
        build_scenario(&mut world, params);
        Self {
            world,
            schedule: runner::simulation_schedule(),
            rider_timer: 0.0,
            driver_timer: 0.0,
            ride_timer: 0.0,
        }
    }

    /// Spawn an idle rider at a random in-bounds position. Returns its
    /// display id.
    pub fn spawn_rider(&mut self) -> u32 {
        let bounds = *self.world.resource::<WorldBounds>();
        let position = {
            let mut rng = self.world.resource_mut::<SpawnRng>();
            spawner::random_point_in_bounds(&mut rng.0, &bounds)
        };
        let id = self.world.resource_mut::<IdAllocator>().next_rider_id();
        self.world.spawn(spawner::rider_bundle(id, position));
        info!("spawned rider #{id} at ({:.0}, {:.0})", position.x, position.y);
        id
    }

    /// Spawn an idle driver at a random in-bounds position. If a ride of the
    /// driver's kind is already waiting, the driver is dispatched to it
    /// immediately.
    pub fn spawn_driver(&mut self, kind: DriverKind) -> u32 {
        let bounds = *self.world.resource::<WorldBounds>();
        let speed = self.world.resource::<DriverSpeeds>().for_kind(kind);
        let position = {
            let mut rng = self.world.resource_mut::<SpawnRng>();
            spawner::random_point_in_bounds(&mut rng.0, &bounds)
        };
        let id = self.world.resource_mut::<IdAllocator>().next_driver_id();
        let entity = self
            .world
            .spawn(spawner::driver_bundle(id, kind, speed, position))
            .id();
        info!(
            "spawned {:?} driver #{id} at ({:.0}, {:.0})",
            kind, position.x, position.y
        );
        assign_driver_to_waiting_ride(&mut self.world, entity);
        id
    }

    /// Create a ride request for a random idle rider to a random dropoff,
    /// requiring a driver of `kind`. The request is dispatched immediately
    /// when an idle driver exists; otherwise it waits for the next sweep.
    pub fn request_ride(&mut self, kind: DriverKind) -> Result<u32, RequestError> {
        let now = self.world.resource::<TickClock>().now_secs();
        let bounds = *self.world.resource::<WorldBounds>();
        let pricing = *self.world.resource::<PricingConfig>();

        let idle: Vec<(Entity, WorldPoint)> = self
            .world
            .query::<(Entity, &Rider, &Position)>()
            .iter(&self.world)
            .filter(|(_, rider, _)| rider.state == RiderState::Idle)
            .map(|(entity, _, position)| (entity, position.0))
            .collect();
        if idle.is_empty() {
            return Err(RequestError::NoIdleRider);
        }

        let (rider_entity, pickup, dropoff) = {
            let mut rng = self.world.resource_mut::<SpawnRng>();
            let (entity, pickup) = idle[rng.0.gen_range(0..idle.len())];
            let dropoff = spawner::random_point_in_bounds(&mut rng.0, &bounds);
            (entity, pickup, dropoff)
        };
        let fare = quote_fare(&pricing, pickup, dropoff)
            .map_err(|_| RequestError::InvalidCoordinates)?;

        if let Some(mut rider) = self.world.get_mut::<Rider>(rider_entity) {
            rider.state = RiderState::Waiting;
        }
        let id = self.world.resource_mut::<IdAllocator>().next_ride_id();
        let ride_entity = self
            .world
            .spawn(RideRequest {
                id,
                kind,
                rider: rider_entity,
                pickup,
                dropoff,
                fare,
                status: RideStatus::WaitingForPickup,
                assigned_driver: None,
                created_at: now,
            })
            .id();
        info!(
            "ride #{id} requested: ({:.0}, {:.0}) -> ({:.0}, {:.0}), fare {fare:.0}",
            pickup.x, pickup.y, dropoff.x, dropoff.y
        );
        if !assign_nearest_driver(&mut self.world, ride_entity) {
            warn!("ride #{id} has no idle {kind:?} driver, waiting for dispatch");
        }
        Ok(id)
    }

    /// Remove every driver, rider and ride and reset telemetry, snapshots
    /// and id counters. Configuration and the clock are untouched.
    pub fn clean_map(&mut self) {
        let mut entities: Vec<Entity> = self
            .world
            .query::<(Entity, &Driver)>()
            .iter(&self.world)
            .map(|(e, _)| e)
            .collect();
        entities.extend(
            self.world
                .query::<(Entity, &Rider)>()
                .iter(&self.world)
                .map(|(e, _)| e),
        );
        entities.extend(
            self.world
                .query::<(Entity, &RideRequest)>()
                .iter(&self.world)
                .map(|(e, _)| e),
        );
        let removed = entities.len();
        for entity in entities {
            self.world.despawn(entity);
        }
        self.world.resource_mut::<SimTelemetry>().reset();
        self.world.resource_mut::<IdAllocator>().reset();
        self.world.resource_mut::<SimSnapshots>().clear();
        info!("map cleaned, removed {removed} entities");
    }

    /// Advance the simulation by one tick of `real_dt_secs` wall time.
    pub fn tick(&mut self, real_dt_secs: f64) {
        let auto = *self.world.resource::<AutoSpawnConfig>();
        if auto.enabled {
            let multiplier = self.world.resource::<TickClock>().speed_multiplier();
            self.auto_spawn(real_dt_secs.max(0.0) * multiplier, &auto);
        }
        runner::run_tick(&mut self.world, &mut self.schedule, real_dt_secs);
    }

    /// Autonomous mode: spawn riders, drivers and ride requests on their own
    /// cadence, respecting the population caps.
    fn auto_spawn(&mut self, dt: f64, auto: &AutoSpawnConfig) {
        self.rider_timer += dt;
        self.driver_timer += dt;
        self.ride_timer += dt;

        if self.rider_timer >= auto.rider_interval_secs {
            self.rider_timer = 0.0;
            if self.rider_count() < auto.max_riders {
                self.spawn_rider();
            }
        }
        if self.driver_timer >= auto.driver_interval_secs {
            self.driver_timer = 0.0;
            if self.driver_count() < auto.max_drivers {
                let kind = self.random_kind();
                self.spawn_driver(kind);
            }
        }
        if self.ride_timer >= auto.ride_interval_secs {
            self.ride_timer = 0.0;
            if self.ride_count() < auto.max_active_rides {
                let kind = self.random_kind();
                // No idle rider just means we try again next interval.
                let _ = self.request_ride(kind);
            }
        }
    }

    fn random_kind(&mut self) -> DriverKind {
        let mut rng = self.world.resource_mut::<SpawnRng>();
        if rng.0.gen_bool(0.5) {
            DriverKind::Ground
        } else {
            DriverKind::Air
        }
    }

    /// Capture the full current state for rendering.
    pub fn snapshot(&mut self) -> SimSnapshot {
        let time_secs = self.world.resource::<TickClock>().now_secs();
        let ticks = self.world.resource::<TickClock>().ticks();
        let drivers: Vec<DriverSnapshot> = self
            .world
            .query::<(&Driver, &DriverActivity, &Position)>()
            .iter(&self.world)
            .map(|(d, a, p)| DriverSnapshot::capture(d, a, p.0))
            .collect();
        let riders: Vec<RiderSnapshot> = self
            .world
            .query::<(&Rider, &Position)>()
            .iter(&self.world)
            .map(|(r, p)| RiderSnapshot::capture(r, p.0))
            .collect();
        let rides: Vec<RideSnapshot> = self
            .world
            .query::<&RideRequest>()
            .iter(&self.world)
            .map(RideSnapshot::capture)
            .collect();
        let telemetry = self.world.resource::<SimTelemetry>();
        SimSnapshot::from_parts(time_secs, ticks, telemetry, drivers, riders, rides)
    }

    pub fn set_speed_multiplier(&mut self, multiplier: f64) {
        self.world
            .resource_mut::<TickClock>()
            .set_speed_multiplier(multiplier);
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.world.resource::<TickClock>().speed_multiplier()
    }

    pub fn now_secs(&self) -> f64 {
        self.world.resource::<TickClock>().now_secs()
    }

    pub fn earnings(&self) -> f64 {
        self.world.resource::<SimTelemetry>().earnings
    }

    pub fn rating(&self) -> f64 {
        self.world.resource::<SimTelemetry>().rating
    }

    pub fn completed_ride_count(&self) -> usize {
        self.world.resource::<SimTelemetry>().completed_rides.len()
    }

    pub fn driver_count(&mut self) -> usize {
        self.world.query::<&Driver>().iter(&self.world).count()
    }

    pub fn rider_count(&mut self) -> usize {
        self.world.query::<&Rider>().iter(&self.world).count()
    }

    /// Active (not yet completed or abandoned) ride requests.
    pub fn ride_count(&mut self) -> usize {
        self.world.query::<&RideRequest>().iter(&self.world).count()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
