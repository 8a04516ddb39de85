//! Router: A* over the intersection grid with an LRU cache of successful
//! routes, plus the consumed-by-index [`RoutePath`] type.
//!
//! Only successful routes are cached. Exhausting the search space (which
//! cannot happen on a fully connected rectangular grid, but is handled
//! defensively) degrades to a direct two-point route and is logged as a
//! warning, never a hard failure.

use std::num::NonZeroUsize;

use bevy_ecs::prelude::Resource;
use log::warn;
use lru::LruCache;
use pathfinding::prelude::astar;

use crate::grid::{GridConfig, Intersection, WorldPoint};

/// Cached routes, keyed by snapped endpoint pair.
const ROUTE_CACHE_SIZE: usize = 5_000;

/// Cost scale: world units are multiplied by 1000 and rounded so A* costs
/// stay integral while preserving fractional road spacings.
const COST_SCALE: f64 = 1000.0;

/// An ordered sequence of waypoints consumed front-to-back by the tick loop.
/// Immutable once computed; discarded and recomputed on status transitions.
#[derive(Debug, Clone)]
pub struct RoutePath {
    waypoints: Vec<WorldPoint>,
    next: usize,
}

impl RoutePath {
    pub fn new(waypoints: Vec<WorldPoint>) -> Self {
        debug_assert!(!waypoints.is_empty(), "a route has at least one waypoint");
        Self { waypoints, next: 0 }
    }

    /// The waypoint currently being driven toward, if any remain.
    pub fn current(&self) -> Option<WorldPoint> {
        self.waypoints.get(self.next).copied()
    }

    /// Move the waypoint pointer past the current waypoint.
    pub fn advance(&mut self) {
        if self.next < self.waypoints.len() {
            self.next += 1;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.waypoints.len()
    }

    /// Waypoints not yet consumed (for path visualization).
    pub fn remaining(&self) -> &[WorldPoint] {
        &self.waypoints[self.next..]
    }

    pub fn waypoints(&self) -> &[WorldPoint] {
        &self.waypoints
    }
}

/// Grid router owned by one simulation instance.
#[derive(Resource)]
pub struct Router {
    grid: GridConfig,
    cache: LruCache<(Intersection, Intersection), Vec<Intersection>>,
}

impl Router {
    pub fn new(grid: GridConfig) -> Self {
        let size = NonZeroUsize::new(ROUTE_CACHE_SIZE).expect("cache size must be non-zero");
        Self {
            grid,
            cache: LruCache::new(size),
        }
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Compute a route from `start` to `goal` along the road grid.
    ///
    /// Both endpoints are snapped to their nearest intersections. Identical
    /// snaps yield the degenerate two-waypoint route; otherwise A* with
    /// Manhattan edge cost and heuristic. Search exhaustion falls back to
    /// the direct two-point route.
    pub fn find_path(&mut self, start: WorldPoint, goal: WorldPoint) -> RoutePath {
        let from = self.grid.nearest_intersection(start.x, start.y);
        let to = self.grid.nearest_intersection(goal.x, goal.y);

        if from == to {
            let p = self.grid.point(from);
            return RoutePath::new(vec![p, p]);
        }

        if let Some(cells) = self.cache.get(&(from, to)) {
            let waypoints = cells.iter().map(|i| self.grid.point(*i)).collect();
            return RoutePath::new(waypoints);
        }

        let grid = self.grid;
        let result = astar(
            &from,
            |i| {
                grid.neighbors(*i)
                    .into_iter()
                    .map(|n| (n, edge_cost(&grid, *i, n)))
                    .collect::<Vec<_>>()
            },
            |i| heuristic_cost(&grid, *i, to),
            |i| *i == to,
        );

        match result {
            Some((cells, _cost)) => {
                let waypoints = cells.iter().map(|i| self.grid.point(*i)).collect();
                self.cache.put((from, to), cells);
                RoutePath::new(waypoints)
            }
            None => {
                warn!(
                    "no road path from ({:.0}, {:.0}) to ({:.0}, {:.0}), using direct route",
                    start.x, start.y, goal.x, goal.y
                );
                RoutePath::new(vec![self.grid.point(from), self.grid.point(to)])
            }
        }
    }
}

/// Cost of one grid step. Adjacent intersections differ in exactly one axis,
/// so the step length is the spacing on that axis.
fn edge_cost(grid: &GridConfig, a: Intersection, b: Intersection) -> u64 {
    let spacing = if a.col != b.col {
        grid.vertical_spacing
    } else {
        grid.horizontal_spacing
    };
    (spacing * COST_SCALE).round() as u64
}

/// Manhattan distance to the goal in the same scaled units as [`edge_cost`],
/// so the heuristic is exact on an obstacle-free grid (admissible and
/// consistent).
fn heuristic_cost(grid: &GridConfig, from: Intersection, to: Intersection) -> u64 {
    let dc = from.col.abs_diff(to.col) as u64;
    let dr = from.row.abs_diff(to.row) as u64;
    dc * (grid.vertical_spacing * COST_SCALE).round() as u64
        + dr * (grid.horizontal_spacing * COST_SCALE).round() as u64
}
