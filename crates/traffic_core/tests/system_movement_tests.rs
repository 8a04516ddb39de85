mod support;

use support::entities::{air_driver_at, ground_driver_at, waiting_ride};
use support::world::TestWorldBuilder;
use traffic_core::ecs::{
    DriverActivity, DriverKind, DriverStatus, Position, RideRequest, RideStatus, Rider, RiderState,
};
use traffic_core::grid::WorldPoint;
use traffic_core::runner::{run_tick, simulation_schedule};
use traffic_core::systems::assignment_system;
use traffic_core::telemetry::SimTelemetry;

const DT: f64 = 0.1;

#[test]
fn air_driver_completes_a_full_trip() {
    let mut world = TestWorldBuilder::new().build();
    let mut schedule = simulation_schedule();

    let driver = air_driver_at(&mut world, WorldPoint::new(100.0, 100.0));
    let (rider, ride) = waiting_ride(
        &mut world,
        DriverKind::Air,
        WorldPoint::new(100.0, 100.0),
        WorldPoint::new(300.0, 100.0),
    );
    let fare = world.get::<RideRequest>(ride).unwrap().fare;
    assignment_system(&mut world);

    for _ in 0..40 {
        run_tick(&mut world, &mut schedule, DT);
    }

    // Ride completed and despawned, both parties idle at the dropoff.
    assert!(world.get::<RideRequest>(ride).is_none());
    assert!(world.get::<DriverActivity>(driver).unwrap().is_idle());
    assert_eq!(
        world.get::<Position>(driver).unwrap().0,
        WorldPoint::new(300.0, 100.0)
    );
    assert_eq!(world.get::<Rider>(rider).unwrap().state, RiderState::Idle);
    assert_eq!(
        world.get::<Position>(rider).unwrap().0,
        WorldPoint::new(300.0, 100.0)
    );

    let telemetry = world.resource::<SimTelemetry>();
    assert_eq!(telemetry.completed_rides.len(), 1);
    assert_eq!(telemetry.earnings, fare);
    assert!(telemetry.total_driver_distance > 0.0);
    let record = &telemetry.completed_rides[0];
    assert_eq!(record.distance, 200.0);
    assert!(record.duration_secs > 0.0);
}

#[test]
fn ground_driver_follows_the_road_grid() {
    let mut world = TestWorldBuilder::new().build();
    let mut schedule = simulation_schedule();

    let driver = ground_driver_at(&mut world, WorldPoint::new(100.0, 100.0));
    let (_, ride) = waiting_ride(
        &mut world,
        DriverKind::Ground,
        WorldPoint::new(300.0, 300.0),
        WorldPoint::new(100.0, 300.0),
    );
    assignment_system(&mut world);

    let mut saw_route = false;
    for _ in 0..400 {
        run_tick(&mut world, &mut schedule, DT);
        if let Some(activity) = world.get::<DriverActivity>(driver) {
            if let Some(route) = activity.route() {
                saw_route = true;
                // Route waypoints sit on intersections of the 4x4 grid.
                for wp in route.waypoints() {
                    assert_eq!((wp.x - 100.0) % 100.0, 0.0);
                    assert_eq!((wp.y - 100.0) % 100.0, 0.0);
                }
            }
        }
        if world.get::<RideRequest>(ride).is_none() {
            break;
        }
    }

    assert!(saw_route, "ground driver must compute a road route");
    assert!(world.get::<RideRequest>(ride).is_none(), "trip must finish");
    assert!(world.get::<DriverActivity>(driver).unwrap().is_idle());
    assert_eq!(
        world.get::<Position>(driver).unwrap().0,
        WorldPoint::new(100.0, 300.0)
    );
}

#[test]
fn rider_moves_with_the_car_during_the_trip() {
    let mut world = TestWorldBuilder::new().build();
    let mut schedule = simulation_schedule();

    let driver = air_driver_at(&mut world, WorldPoint::new(100.0, 100.0));
    let (rider, ride) = waiting_ride(
        &mut world,
        DriverKind::Air,
        WorldPoint::new(100.0, 100.0),
        WorldPoint::new(400.0, 400.0),
    );
    assignment_system(&mut world);

    let mut saw_in_ride = false;
    for _ in 0..60 {
        run_tick(&mut world, &mut schedule, DT);
        let Some(request) = world.get::<RideRequest>(ride) else {
            break;
        };
        if request.status == RideStatus::InRide {
            saw_in_ride = true;
            assert_eq!(
                world.get::<Position>(rider).unwrap().0,
                world.get::<Position>(driver).unwrap().0,
                "rider rides along with the car"
            );
            assert_eq!(
                world.get::<Rider>(rider).unwrap().state,
                RiderState::InRide
            );
        }
    }
    assert!(saw_in_ride, "trip must pass through the in-ride phase");
}

#[test]
fn pickup_switches_driver_to_the_dropoff_leg() {
    let mut world = TestWorldBuilder::new().build();
    let mut schedule = simulation_schedule();

    let driver = air_driver_at(&mut world, WorldPoint::new(100.0, 100.0));
    let (_, ride) = waiting_ride(
        &mut world,
        DriverKind::Air,
        WorldPoint::new(100.0, 100.0),
        WorldPoint::new(400.0, 100.0),
    );
    assignment_system(&mut world);

    // Driver starts on the pickup point, so the first tick boards the rider.
    run_tick(&mut world, &mut schedule, DT);

    let activity = world.get::<DriverActivity>(driver).unwrap();
    assert_eq!(activity.status(), DriverStatus::OnRide);
    assert_eq!(activity.target(), Some(WorldPoint::new(400.0, 100.0)));
    assert_eq!(
        world.get::<RideRequest>(ride).unwrap().status,
        RideStatus::InRide
    );
}

#[test]
fn idle_drivers_do_not_move() {
    let mut world = TestWorldBuilder::new().build();
    let mut schedule = simulation_schedule();

    let driver = ground_driver_at(&mut world, WorldPoint::new(250.0, 250.0));
    for _ in 0..20 {
        run_tick(&mut world, &mut schedule, DT);
    }

    assert_eq!(
        world.get::<Position>(driver).unwrap().0,
        WorldPoint::new(250.0, 250.0)
    );
    assert_eq!(
        world.resource::<SimTelemetry>().total_driver_distance,
        0.0
    );
}
