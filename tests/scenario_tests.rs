//! End-to-end steering scenarios run through a real flock.

use clearpath_boids::neighbors::{self, Neighborhood};
use clearpath_boids::steering;
use clearpath_boids::{AgentParams, Boid, Flock, GridParams, Obstacle, VectorExt};
use nannou::prelude::*;

fn flock() -> Flock {
    Flock::new(&GridParams::default()).unwrap()
}

fn quiet_params() -> AgentParams {
    AgentParams {
        flocking: false,
        damping: false,
        ..AgentParams::default()
    }
}

#[test]
fn closing_agents_see_a_collision_at_the_first_step() {
    let params = AgentParams {
        radius: 0.5,
        avoidance_distance: 10.0,
        max_speed: 1.0,
        ..AgentParams::default()
    };
    let mut flock = flock();
    let a = flock.add_agent(Boid::new(Vec3::ZERO, Vec3::X, params).unwrap());
    let b = flock.add_agent(Boid::new(Vec3::new(1.0, 0.0, 0.0), -Vec3::X, params).unwrap());

    for (me, other_x) in [(a, 1.0), (b, -1.0)] {
        let boid = flock.agent(me).unwrap();
        let data = neighbors::collect(me, boid, &flock).unwrap();
        let collision = data.nearest_collision.expect("collision predicted");
        assert!(!collision.is_zero());
        assert!(collision.x * other_x > 0.0);
    }
}

#[test]
fn lone_agent_at_home_does_nothing() {
    let mut flock = flock();
    let position = Vec3::new(30.0, -20.0, 0.0);
    let mut boid = Boid::new(position, Vec3::X, AgentParams::default()).unwrap();
    boid.set_home_location(position).unwrap();
    let id = flock.add_agent(boid);

    let boid = flock.agent(id).unwrap();
    let facing = boid.velocity().unit();
    let data = neighbors::collect(id, boid, &flock).unwrap();
    assert_eq!(data.count, 0);
    assert_eq!(steering::collision_avoidance(data.nearest_collision, facing), Vec3::ZERO);
    assert_eq!(steering::match_flock_velocity(Vec3::ZERO, boid.params().max_acceleration, facing), Vec3::ZERO);
    assert_eq!(steering::match_flock_centre(Vec3::ZERO, facing), Vec3::ZERO);
    assert_eq!(
        steering::seek_towards(boid.position(), boid.home_location(), boid.params().home_distance, facing),
        Vec3::ZERO
    );

    flock.tick(1.0).unwrap();
    assert_eq!(flock.agent(id).unwrap().acceleration(), Vec3::ZERO);
}

#[test]
fn distant_agent_turns_towards_home() {
    let home = Vec3::new(200.0, 0.0, 0.0);
    let facing = Vec3::Y;
    let seek = steering::seek_towards(Vec3::ZERO, home, 50.0, facing);
    assert!((seek - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5);

    let params = AgentParams {
        home_distance: 50.0,
        ..quiet_params()
    };
    let mut boid = Boid::new(Vec3::ZERO, facing, params).unwrap();
    boid.set_home_location(home).unwrap();
    let mut flock = flock();
    let id = flock.add_agent(boid);

    flock.tick(1.0).unwrap();
    let acceleration = flock.agent(id).unwrap().acceleration();
    assert!((acceleration - Vec3::X).length() < 1e-5);
}

#[test]
fn obstacle_ahead_pushes_the_agent_aside() {
    let mut flock = flock();
    let id = flock.add_agent(Boid::new(Vec3::ZERO, Vec3::X, quiet_params()).unwrap());
    flock.add_obstacle(Obstacle::new(Vec3::new(10.0, 0.5, 0.0), 2.0).unwrap());

    let boid = flock.agent(id).unwrap();
    let acceleration = boid.steer(id, &flock).unwrap();
    assert!((acceleration - -Vec3::Y).length() < 1e-5);
}

#[test]
fn clear_path_turns_away_from_a_blocked_heading() {
    let params = AgentParams {
        clear_path: true,
        radius: 0.5,
        ..quiet_params()
    };
    let mut flock = flock();
    let id = flock.add_agent(Boid::new(Vec3::ZERO, Vec3::X, params).unwrap());
    flock.add_obstacle(Obstacle::new(Vec3::new(10.0, 0.0, 0.0), 1.0).unwrap());

    let boid = flock.agent(id).unwrap();
    let acceleration = boid.steer(id, &flock).unwrap();
    let chosen = boid.velocity() + acceleration;
    assert!(chosen.y.abs() > 0.1);
    assert!((chosen.length() - 1.0).abs() < 1e-4);
}

#[test]
fn agents_leaving_the_grid_are_still_tracked() {
    let params = AgentParams {
        home_distance: 10_000.0,
        ..quiet_params()
    };
    let mut flock = flock();
    let (_, top_right) = flock.grid().bounds();
    let start = Vec3::new(top_right.x - 1.0, 0.0, 0.0);
    let id = flock.add_agent(Boid::new(start, Vec3::X, params).unwrap());

    for _ in 0..5 {
        flock.tick(1.0).unwrap();
    }

    let boid = flock.agent(id).unwrap();
    assert!(boid.position().x > top_right.x);
    assert_eq!(flock.grid().oob().agents(), &[id]);
    assert_eq!(flock.grid().agent_membership(id), 1);
}

#[test]
fn settings_reach_every_agent() {
    let mut flock = flock();
    for i in 0..5 {
        flock.add_agent(Boid::new(Vec3::new(i as f32 * 10.0, 0.0, 0.0), Vec3::X, AgentParams::default()).unwrap());
    }
    let slow = AgentParams {
        max_speed: 0.25,
        ..AgentParams::default()
    };
    flock.apply_settings(&slow, 2.0).unwrap();
    flock.tick(1.0).unwrap();
    for (_, boid) in flock.agents() {
        assert!((boid.velocity().length() - 0.25).abs() < 1e-5);
    }
}
