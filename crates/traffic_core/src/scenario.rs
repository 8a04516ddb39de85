//! Scenario parameters and world construction. All tunables live in
//! resources so tests can build small deterministic worlds.

use bevy_ecs::prelude::{Resource, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::clock::TickClock;
use crate::ecs::{DriverKind, IdAllocator};
use crate::grid::GridConfig;
use crate::pricing::PricingConfig;
use crate::routing::Router;
use crate::telemetry::{RatingConfig, SimSnapshotConfig, SimSnapshots, SimTelemetry};

/// Playable world extent. Entities spawn inside the margin so they never
/// start clipped against an edge.
#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f64,
    pub height: f64,
    pub spawn_margin: f64,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            width: 2400.0,
            height: 1600.0,
            spawn_margin: 100.0,
        }
    }
}

/// Movement speeds per driver kind, in world units per simulated second.
#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
pub struct DriverSpeeds {
    pub ground: f64,
    pub air: f64,
}

impl Default for DriverSpeeds {
    fn default() -> Self {
        Self {
            ground: 150.0,
            air: 200.0,
        }
    }
}

impl DriverSpeeds {
    pub fn for_kind(&self, kind: DriverKind) -> f64 {
        match kind {
            DriverKind::Ground => self.ground,
            DriverKind::Air => self.air,
        }
    }
}

/// Rides older than the timeout that still have not picked their rider up
/// are abandoned by the periodic sweep.
#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
pub struct StuckRideConfig {
    pub timeout_secs: f64,
}

impl Default for StuckRideConfig {
    fn default() -> Self {
        Self { timeout_secs: 30.0 }
    }
}

/// Cadence of periodic maintenance work (stuck-ride sweep, heartbeat log).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Resource, Serialize, Deserialize)]
pub struct SweepConfig {
    pub interval_ticks: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self { interval_ticks: 60 }
    }
}

/// Autonomous mode: the simulation spawns riders, drivers and ride requests
/// on its own, up to the configured population caps.
#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
pub struct AutoSpawnConfig {
    pub enabled: bool,
    pub max_riders: usize,
    pub max_drivers: usize,
    pub max_active_rides: usize,
    pub rider_interval_secs: f64,
    pub driver_interval_secs: f64,
    pub ride_interval_secs: f64,
}

impl Default for AutoSpawnConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_riders: 30,
            max_drivers: 30,
            max_active_rides: 50,
            rider_interval_secs: 2.0,
            driver_interval_secs: 3.0,
            ride_interval_secs: 1.5,
        }
    }
}

/// Seeded RNG shared by all random placement and autonomous decisions, so a
/// scenario replays identically for a given seed.
#[derive(Debug, Resource)]
pub struct SpawnRng(pub StdRng);

/// Everything needed to build a simulation world.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioParams {
    pub seed: u64,
    pub grid: GridConfig,
    pub bounds: WorldBounds,
    pub speeds: DriverSpeeds,
    pub pricing: PricingConfig,
    pub rating: RatingConfig,
    pub stuck: StuckRideConfig,
    pub sweep: SweepConfig,
    pub auto_spawn: AutoSpawnConfig,
    pub snapshot: SimSnapshotConfig,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            seed: 42,
            grid: GridConfig::default(),
            bounds: WorldBounds::default(),
            speeds: DriverSpeeds::default(),
            pricing: PricingConfig::default(),
            rating: RatingConfig::default(),
            stuck: StuckRideConfig::default(),
            sweep: SweepConfig::default(),
            auto_spawn: AutoSpawnConfig::default(),
            snapshot: SimSnapshotConfig::default(),
        }
    }
}

impl ScenarioParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_bounds(mut self, bounds: WorldBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_speeds(mut self, speeds: DriverSpeeds) -> Self {
        self.speeds = speeds;
        self
    }

    pub fn with_stuck_timeout(mut self, timeout_secs: f64) -> Self {
        self.stuck.timeout_secs = timeout_secs;
        self
    }

    pub fn with_auto_spawn(mut self, auto_spawn: AutoSpawnConfig) -> Self {
        self.auto_spawn = auto_spawn;
        self
    }
}

/// Insert every resource a simulation world needs.
pub fn build_scenario(world: &mut World, params: ScenarioParams) {
    world.insert_resource(params.grid);
    world.insert_resource(Router::new(params.grid));
    world.insert_resource(params.bounds);
    world.insert_resource(params.speeds);
    world.insert_resource(params.pricing);
    world.insert_resource(params.rating);
    world.insert_resource(params.stuck);
    world.insert_resource(params.sweep);
    world.insert_resource(params.auto_spawn);
    world.insert_resource(params.snapshot);
    world.insert_resource(SimSnapshots::default());
    world.insert_resource(SimTelemetry::default());
    world.insert_resource(TickClock::default());
    world.insert_resource(IdAllocator::default());
    world.insert_resource(SpawnRng(StdRng::seed_from_u64(params.seed)));
}
