//! Fare calculation for ride requests.

use std::error::Error;
use std::fmt;

use bevy_ecs::prelude::Resource;
use log::error;
use serde::{Deserialize, Serialize};

use crate::grid::WorldPoint;

/// Fare per world unit of pickup→dropoff Euclidean distance.
pub const RATE_PER_UNIT: f64 = 0.1;

/// Fare floor in currency units.
pub const MINIMUM_FARE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Resource, Serialize, Deserialize)]
pub struct PricingConfig {
    pub rate_per_unit: f64,
    pub minimum_fare: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            rate_per_unit: RATE_PER_UNIT,
            minimum_fare: MINIMUM_FARE,
        }
    }
}

/// Errors from fare calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FareError {
    /// Pickup or dropoff coordinates were NaN/non-finite; the ride must not
    /// be created, since a NaN fare would poison the state machine.
    NonFiniteCoordinates,
}

impl fmt::Display for FareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FareError::NonFiniteCoordinates => {
                write!(f, "pickup/dropoff coordinates are not finite")
            }
        }
    }
}

impl Error for FareError {}

/// Fare for a trip: `round(distance × rate)`, never below the minimum fare.
/// Deterministic in the pickup/dropoff pair. Rejects non-finite inputs at
/// this boundary so NaN never propagates into entity state.
pub fn quote_fare(
    config: &PricingConfig,
    pickup: WorldPoint,
    dropoff: WorldPoint,
) -> Result<f64, FareError> {
    if !pickup.is_finite() || !dropoff.is_finite() {
        error!(
            "rejecting ride quote with non-finite coordinates: pickup=({}, {}) dropoff=({}, {})",
            pickup.x, pickup.y, dropoff.x, dropoff.y
        );
        return Err(FareError::NonFiniteCoordinates);
    }
    let distance = pickup.distance_to(dropoff);
    Ok((distance * config.rate_per_unit).round().max(config.minimum_fare))
}
