#![allow(dead_code)]

use bevy_ecs::prelude::World;
use traffic_core::grid::GridConfig;
use traffic_core::scenario::{build_scenario, AutoSpawnConfig, ScenarioParams, WorldBounds};
use traffic_core::test_helpers::{small_grid, small_params};

/// Builder that populates an ECS world with every shared resource the
/// systems expect, over a small deterministic grid.
#[derive(Debug)]
pub struct TestWorldBuilder {
    params: ScenarioParams,
}

impl Default for TestWorldBuilder {
    fn default() -> Self {
        Self {
            params: small_params(),
        }
    }
}

impl TestWorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params.seed = seed;
        self
    }

    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.params.grid = grid;
        self
    }

    pub fn with_bounds(mut self, bounds: WorldBounds) -> Self {
        self.params.bounds = bounds;
        self
    }

    pub fn with_stuck_timeout(mut self, timeout_secs: f64) -> Self {
        self.params.stuck.timeout_secs = timeout_secs;
        self
    }

    pub fn with_sweep_interval(mut self, interval_ticks: u64) -> Self {
        self.params.sweep.interval_ticks = interval_ticks;
        self
    }

    pub fn with_auto_spawn(mut self, auto_spawn: AutoSpawnConfig) -> Self {
        self.params.auto_spawn = auto_spawn;
        self
    }

    pub fn params(&self) -> ScenarioParams {
        self.params
    }

    pub fn build(self) -> World {
        let mut world = World::new();
        build_scenario(&mut world, self.params);
        world
    }
}

/// The default test grid, re-exported for assertions on snapping.
pub fn test_grid() -> GridConfig {
    small_grid()
}
