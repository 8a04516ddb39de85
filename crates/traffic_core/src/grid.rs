//! Road grid: the fixed set of intersections implied by regularly spaced
//! horizontal/vertical roads, plus coordinate snapping.
//!
//! The grid is fixed at construction; every intersection's world coordinates
//! are a deterministic function of its `(col, row)` indices.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

/// A point in world coordinates (pixels in the original city layout).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other` in world units.
    pub fn distance_to(self, other: WorldPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An intersection identified by its grid indices: `col` indexes vertical
/// roads (x axis), `row` indexes horizontal roads (y axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Intersection {
    pub col: usize,
    pub row: usize,
}

/// Layout of the road grid. Defaults match the original city: 16 vertical
/// roads every 140 units starting at x=100, 14 horizontal roads every
/// 100 units starting at y=100, roads 32 units wide.
#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
pub struct GridConfig {
    /// X coordinate of the first (leftmost) vertical road centerline.
    pub first_road_x: f64,
    /// Y coordinate of the first (topmost) horizontal road centerline.
    pub first_road_y: f64,
    /// X distance between consecutive vertical roads.
    pub vertical_spacing: f64,
    /// Y distance between consecutive horizontal roads.
    pub horizontal_spacing: f64,
    /// Number of vertical roads (columns of intersections).
    pub vertical_roads: usize,
    /// Number of horizontal roads (rows of intersections).
    pub horizontal_roads: usize,
    pub road_width: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            first_road_x: 100.0,
            first_road_y: 100.0,
            vertical_spacing: 140.0,
            horizontal_spacing: 100.0,
            vertical_roads: 16,
            horizontal_roads: 14,
            road_width: 32.0,
        }
    }
}

impl GridConfig {
    /// Centerline x of the vertical road at `col`.
    pub fn road_x(&self, col: usize) -> f64 {
        self.first_road_x + col as f64 * self.vertical_spacing
    }

    /// Centerline y of the horizontal road at `row`.
    pub fn road_y(&self, row: usize) -> f64 {
        self.first_road_y + row as f64 * self.horizontal_spacing
    }

    /// World coordinates of an intersection.
    pub fn point(&self, i: Intersection) -> WorldPoint {
        WorldPoint::new(self.road_x(i.col), self.road_y(i.row))
    }

    pub fn intersection_count(&self) -> usize {
        self.vertical_roads * self.horizontal_roads
    }

    /// The intersection nearest to `(x, y)`, choosing the closest vertical
    /// and horizontal road independently per axis. Total for finite inputs;
    /// out-of-bounds coordinates clamp to the grid edge.
    pub fn nearest_intersection(&self, x: f64, y: f64) -> Intersection {
        let col = nearest_index(x, self.first_road_x, self.vertical_spacing, self.vertical_roads);
        let row = nearest_index(
            y,
            self.first_road_y,
            self.horizontal_spacing,
            self.horizontal_roads,
        );
        Intersection { col, row }
    }

    /// The up-to-4 grid-adjacent intersections, excluding any outside the grid.
    pub fn neighbors(&self, i: Intersection) -> Vec<Intersection> {
        let mut out = Vec::with_capacity(4);
        if i.row > 0 {
            out.push(Intersection {
                col: i.col,
                row: i.row - 1,
            });
        }
        if i.row + 1 < self.horizontal_roads {
            out.push(Intersection {
                col: i.col,
                row: i.row + 1,
            });
        }
        if i.col > 0 {
            out.push(Intersection {
                col: i.col - 1,
                row: i.row,
            });
        }
        if i.col + 1 < self.vertical_roads {
            out.push(Intersection {
                col: i.col + 1,
                row: i.row,
            });
        }
        out
    }

    /// True if `(x, y)` lies within half the road width of any horizontal or
    /// vertical road centerline. Used by building/placement logic.
    pub fn is_on_road(&self, x: f64, y: f64) -> bool {
        let threshold = self.road_width / 2.0;
        for row in 0..self.horizontal_roads {
            if (y - self.road_y(row)).abs() < threshold {
                return true;
            }
        }
        for col in 0..self.vertical_roads {
            if (x - self.road_x(col)).abs() < threshold {
                return true;
            }
        }
        false
    }
}

fn nearest_index(value: f64, first: f64, spacing: f64, count: usize) -> usize {
    debug_assert!(count > 0, "grid must have at least one road per axis");
    let raw = ((value - first) / spacing).round();
    if raw <= 0.0 {
        0
    } else {
        (raw as usize).min(count - 1)
    }
}
