//! Telemetry: earnings, rating, completed-ride records and read-only
//! snapshots consumed by rendering layers.

use std::collections::VecDeque;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::ecs::{Driver, DriverActivity, DriverKind, DriverStatus, Rider, RiderState, RideRequest, RideStatus};
use crate::grid::WorldPoint;

/// Rating update parameters. The delta rewards faster-than-expected rides:
/// with `ratio = min(duration / expected, 2.0)`, the delta is
/// `max(min_delta, 0.5 − (ratio − 1.0) × 0.2)` and the rating is capped at
/// `max_rating`.
#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
pub struct RatingConfig {
    pub expected_ride_secs: f64,
    pub min_delta: f64,
    pub max_rating: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            expected_ride_secs: 30.0,
            min_delta: 0.1,
            max_rating: 5.0,
        }
    }
}

impl RatingConfig {
    pub fn delta_for(&self, duration_secs: f64) -> f64 {
        let ratio = (duration_secs / self.expected_ride_secs).min(2.0);
        (0.5 - (ratio - 1.0) * 0.2).max(self.min_delta)
    }
}

/// One completed ride, recorded when the driver reaches dropoff.
#[derive(Debug, Clone, Serialize)]
pub struct CompletedRideRecord {
    pub ride_id: u32,
    pub driver_id: u32,
    pub rider_id: u32,
    pub fare: f64,
    /// Euclidean pickup→dropoff distance in world units.
    pub distance: f64,
    /// Simulated seconds from request creation to dropoff.
    pub duration_secs: f64,
    pub completed_at: f64,
}

/// Aggregate simulation telemetry. Rating starts at 5.0 and never exceeds
/// the configured cap.
#[derive(Debug, Resource)]
pub struct SimTelemetry {
    pub earnings: f64,
    pub rating: f64,
    pub completed_rides: Vec<CompletedRideRecord>,
    /// Total distance traveled by all drivers, in world units.
    pub total_driver_distance: f64,
    pub stuck_rides_cleaned: u64,
}

impl Default for SimTelemetry {
    fn default() -> Self {
        Self {
            earnings: 0.0,
            rating: 5.0,
            completed_rides: Vec::new(),
            total_driver_distance: 0.0,
            stuck_rides_cleaned: 0,
        }
    }
}

impl SimTelemetry {
    pub fn record_completion(&mut self, record: CompletedRideRecord, rating: &RatingConfig) {
        self.earnings += record.fare;
        self.rating = (self.rating + rating.delta_for(record.duration_secs)).min(rating.max_rating);
        self.completed_rides.push(record);
    }

    /// Back to initial values (map clean).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Per-status entity counts at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimCounts {
    pub drivers_idle: usize,
    pub drivers_going_to_rider: usize,
    pub drivers_on_ride: usize,
    pub riders_idle: usize,
    pub riders_waiting: usize,
    pub riders_in_ride: usize,
    pub rides_waiting_for_pickup: usize,
    pub rides_going_to_rider: usize,
    pub rides_in_ride: usize,
}

impl SimCounts {
    pub fn add_driver(&mut self, status: DriverStatus) {
        match status {
            DriverStatus::Idle => self.drivers_idle += 1,
            DriverStatus::GoingToRider => self.drivers_going_to_rider += 1,
            DriverStatus::OnRide => self.drivers_on_ride += 1,
        }
    }

    pub fn add_rider(&mut self, state: RiderState) {
        match state {
            RiderState::Idle => self.riders_idle += 1,
            RiderState::Waiting => self.riders_waiting += 1,
            RiderState::InRide => self.riders_in_ride += 1,
        }
    }

    pub fn add_ride(&mut self, status: RideStatus) {
        match status {
            RideStatus::WaitingForPickup => self.rides_waiting_for_pickup += 1,
            RideStatus::GoingToRider => self.rides_going_to_rider += 1,
            RideStatus::InRide => self.rides_in_ride += 1,
        }
    }

    pub fn total_drivers(&self) -> usize {
        self.drivers_idle + self.drivers_going_to_rider + self.drivers_on_ride
    }

    pub fn total_riders(&self) -> usize {
        self.riders_idle + self.riders_waiting + self.riders_in_ride
    }

    pub fn total_rides(&self) -> usize {
        self.rides_waiting_for_pickup + self.rides_going_to_rider + self.rides_in_ride
    }
}

/// Read-only projection of one driver.
#[derive(Debug, Clone, Serialize)]
pub struct DriverSnapshot {
    pub id: u32,
    pub kind: DriverKind,
    pub position: WorldPoint,
    pub status: DriverStatus,
    pub target: Option<WorldPoint>,
    /// Remaining route waypoints, for path visualization.
    pub waypoints: Vec<WorldPoint>,
}

impl DriverSnapshot {
    pub fn capture(driver: &Driver, activity: &DriverActivity, position: WorldPoint) -> Self {
        Self {
            id: driver.id,
            kind: driver.kind,
            position,
            status: activity.status(),
            target: activity.target(),
            waypoints: activity
                .route()
                .map(|r| r.remaining().to_vec())
                .unwrap_or_default(),
        }
    }
}

/// Read-only projection of one rider.
#[derive(Debug, Clone, Serialize)]
pub struct RiderSnapshot {
    pub id: u32,
    pub position: WorldPoint,
    pub state: RiderState,
}

impl RiderSnapshot {
    pub fn capture(rider: &Rider, position: WorldPoint) -> Self {
        Self {
            id: rider.id,
            position,
            state: rider.state,
        }
    }
}

/// Read-only projection of one ride request.
#[derive(Debug, Clone, Serialize)]
pub struct RideSnapshot {
    pub id: u32,
    pub kind: DriverKind,
    pub pickup: WorldPoint,
    pub dropoff: WorldPoint,
    pub fare: f64,
    pub status: RideStatus,
    pub assigned: bool,
    pub created_at: f64,
}

impl RideSnapshot {
    pub fn capture(ride: &RideRequest) -> Self {
        Self {
            id: ride.id,
            kind: ride.kind,
            pickup: ride.pickup,
            dropoff: ride.dropoff,
            fare: ride.fare,
            status: ride.status,
            assigned: ride.assigned_driver.is_some(),
            created_at: ride.created_at,
        }
    }
}

/// Aggregate stats exposed alongside entity snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct SimStats {
    pub earnings: f64,
    pub rating: f64,
    pub active_rides: usize,
    pub completed_rides: usize,
    pub total_driver_distance: f64,
    pub elapsed_secs: f64,
}

/// Full simulation state at one instant, refreshed once per frame by the
/// rendering layer.
#[derive(Debug, Clone, Serialize)]
pub struct SimSnapshot {
    pub time_secs: f64,
    pub ticks: u64,
    pub counts: SimCounts,
    pub stats: SimStats,
    pub drivers: Vec<DriverSnapshot>,
    pub riders: Vec<RiderSnapshot>,
    pub rides: Vec<RideSnapshot>,
}

impl SimSnapshot {
    /// Assemble a snapshot from captured entity projections, deriving counts
    /// and aggregate stats.
    pub fn from_parts(
        time_secs: f64,
        ticks: u64,
        telemetry: &SimTelemetry,
        drivers: Vec<DriverSnapshot>,
        riders: Vec<RiderSnapshot>,
        rides: Vec<RideSnapshot>,
    ) -> Self {
        let mut counts = SimCounts::default();
        for d in &drivers {
            counts.add_driver(d.status);
        }
        for r in &riders {
            counts.add_rider(r.state);
        }
        for r in &rides {
            counts.add_ride(r.status);
        }
        let stats = SimStats {
            earnings: telemetry.earnings,
            rating: telemetry.rating,
            active_rides: rides.iter().filter(|r| r.assigned).count(),
            completed_rides: telemetry.completed_rides.len(),
            total_driver_distance: telemetry.total_driver_distance,
            elapsed_secs: time_secs,
        };
        Self {
            time_secs,
            ticks,
            counts,
            stats,
            drivers,
            riders,
            rides,
        }
    }
}

/// Rolling snapshot capture configuration.
#[derive(Debug, Clone, Copy, Resource, Serialize, Deserialize)]
pub struct SimSnapshotConfig {
    /// Simulated seconds between captured snapshots.
    pub interval_secs: f64,
    pub max_snapshots: usize,
}

impl Default for SimSnapshotConfig {
    fn default() -> Self {
        Self {
            interval_secs: 1.0,
            max_snapshots: 10_000,
        }
    }
}

/// Bounded rolling snapshot buffer for headless runs.
#[derive(Debug, Default, Resource)]
pub struct SimSnapshots {
    pub snapshots: VecDeque<SimSnapshot>,
    pub last_snapshot_at: Option<f64>,
}

impl SimSnapshots {
    pub fn push(&mut self, snapshot: SimSnapshot, max: usize) {
        self.last_snapshot_at = Some(snapshot.time_secs);
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > max {
            self.snapshots.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.last_snapshot_at = None;
    }
}
