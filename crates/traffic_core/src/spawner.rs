//! Entity spawning helpers: random placement inside world bounds and the
//! component bundles for drivers and riders.

use rand::Rng;

use crate::ecs::{Driver, DriverActivity, DriverKind, Position, Rider, RiderState};
use crate::grid::WorldPoint;
use crate::scenario::WorldBounds;

/// Uniform random point inside the spawnable area (bounds minus margin).
pub fn random_point_in_bounds<R: Rng>(rng: &mut R, bounds: &WorldBounds) -> WorldPoint {
    let x = rng.gen_range(bounds.spawn_margin..bounds.width - bounds.spawn_margin);
    let y = rng.gen_range(bounds.spawn_margin..bounds.height - bounds.spawn_margin);
    WorldPoint::new(x, y)
}

/// Components for a freshly spawned idle driver.
pub fn driver_bundle(
    id: u32,
    kind: DriverKind,
    speed: f64,
    position: WorldPoint,
) -> (Driver, DriverActivity, Position) {
    (
        Driver { id, kind, speed },
        DriverActivity::Idle,
        Position(position),
    )
}

/// Components for a freshly spawned idle rider.
pub fn rider_bundle(id: u32, position: WorldPoint) -> (Rider, Position) {
    (
        Rider {
            id,
            state: RiderState::Idle,
        },
        Position(position),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_points_respect_the_margin() {
        let bounds = WorldBounds::default();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let p = random_point_in_bounds(&mut rng, &bounds);
            assert!(p.x >= bounds.spawn_margin && p.x <= bounds.width - bounds.spawn_margin);
            assert!(p.y >= bounds.spawn_margin && p.y <= bounds.height - bounds.spawn_margin);
        }
    }

    #[test]
    fn bundles_start_idle() {
        let (driver, activity, _) =
            driver_bundle(1, DriverKind::Ground, 150.0, WorldPoint::new(0.0, 0.0));
        assert_eq!(driver.id, 1);
        assert!(activity.is_idle());

        let (rider, _) = rider_bundle(3, WorldPoint::new(5.0, 5.0));
        assert_eq!(rider.state, RiderState::Idle);
    }
}
