use bevy_ecs::prelude::{Component, Entity, Resource};
use serde::{Deserialize, Serialize};

use crate::grid::WorldPoint;
use crate::routing::RoutePath;

/// Driver propulsion: ground drivers follow road-grid routes, air drivers
/// fly point-to-point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriverKind {
    Ground,
    Air,
}

/// Flat status view of a driver, derived from [`DriverActivity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriverStatus {
    Idle,
    GoingToRider,
    OnRide,
}

/// What a driver is currently doing. The active variants carry the movement
/// target and the road route (ground drivers only; `None` until the tick
/// loop computes one, and cleared on every status transition so a fresh
/// route is computed).
#[derive(Debug, Component)]
pub enum DriverActivity {
    Idle,
    GoingToRider {
        target: WorldPoint,
        route: Option<RoutePath>,
    },
    OnRide {
        target: WorldPoint,
        route: Option<RoutePath>,
    },
}

impl DriverActivity {
    pub fn status(&self) -> DriverStatus {
        match self {
            DriverActivity::Idle => DriverStatus::Idle,
            DriverActivity::GoingToRider { .. } => DriverStatus::GoingToRider,
            DriverActivity::OnRide { .. } => DriverStatus::OnRide,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, DriverActivity::Idle)
    }

    pub fn target(&self) -> Option<WorldPoint> {
        match self {
            DriverActivity::Idle => None,
            DriverActivity::GoingToRider { target, .. } | DriverActivity::OnRide { target, .. } => {
                Some(*target)
            }
        }
    }

    pub fn route(&self) -> Option<&RoutePath> {
        match self {
            DriverActivity::Idle => None,
            DriverActivity::GoingToRider { route, .. } | DriverActivity::OnRide { route, .. } => {
                route.as_ref()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Component)]
pub struct Driver {
    pub id: u32,
    pub kind: DriverKind,
    /// Movement speed in world units per simulated second.
    pub speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiderState {
    Idle,
    Waiting,
    InRide,
}

#[derive(Debug, Clone, Copy, Component)]
pub struct Rider {
    pub id: u32,
    pub state: RiderState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RideStatus {
    WaitingForPickup,
    GoingToRider,
    InRide,
}

/// A ride request. Invariant: `assigned_driver` is `Some` iff `status` is
/// not `WaitingForPickup`. Despawned on completion or stuck-ride cleanup.
#[derive(Debug, Clone, Copy, Component)]
pub struct RideRequest {
    pub id: u32,
    /// Required driver kind, chosen when the ride was requested.
    pub kind: DriverKind,
    pub rider: Entity,
    pub pickup: WorldPoint,
    pub dropoff: WorldPoint,
    pub fare: f64,
    pub status: RideStatus,
    pub assigned_driver: Option<Entity>,
    /// Simulation time (seconds) when the request was created.
    pub created_at: f64,
}

impl RideRequest {
    /// Assignment/status consistency check; fails loudly in development.
    pub fn debug_assert_consistent(&self) {
        debug_assert_eq!(
            self.assigned_driver.is_some(),
            self.status != RideStatus::WaitingForPickup,
            "ride #{}: assigned_driver must be set iff the ride is past WaitingForPickup",
            self.id
        );
    }
}

/// World position of a driver or rider.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Position(pub WorldPoint);

/// Monotonic display-ID counters, owned per simulation world so independent
/// simulations never share state.
#[derive(Debug, Resource)]
pub struct IdAllocator {
    next_driver: u32,
    next_rider: u32,
    next_ride: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next_driver: 1,
            next_rider: 1,
            next_ride: 1,
        }
    }
}

impl IdAllocator {
    pub fn next_driver_id(&mut self) -> u32 {
        let id = self.next_driver;
        self.next_driver += 1;
        id
    }

    pub fn next_rider_id(&mut self) -> u32 {
        let id = self.next_rider;
        self.next_rider += 1;
        id
    }

    pub fn next_ride_id(&mut self) -> u32 {
        let id = self.next_ride;
        self.next_ride += 1;
        id
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
