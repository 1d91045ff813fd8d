use nbody_trajectories::Vector2;
use nbody_trajectories::constants::{AU_M, G};
use nbody_trajectories::export::ProfileSet;
use nbody_trajectories::orbits::{circular_speed, orbital_period};
use nbody_trajectories::propagator::{
    Body, CancelToken, ConfigurationError, Frame, NewtonianGravity, RunState, Simulation,
    SimulationConfig, SimulationError, SourceSets, StepObserver,
};
use nbody_trajectories::rotation::Rotation2;

fn config(dt_s: f64, duration_s: f64, export_interval_s: f64, frame: Frame) -> SimulationConfig {
    SimulationConfig {
        dt_s,
        duration_s,
        export_interval_s,
        frame,
    }
}

fn binary() -> Vec<Body> {
    vec![
        Body::new("Earth", 5.9724e24, Vector2::ZERO, Vector2::ZERO),
        Body::new(
            "Moon",
            7.342e22,
            Vector2::new(3.844e8, 0.0),
            Vector2::new(0.0, 1_022.0),
        ),
    ]
}

fn simulation(bodies: Vec<Body>, config: SimulationConfig) -> Simulation {
    let sources = SourceSets::complete(bodies.len());
    Simulation::new(bodies, sources, NewtonianGravity::new(G), config).expect("valid simulation")
}

#[test]
fn circular_orbit_closes_after_one_period() {
    let earth_mass = 5.9724e24;
    let radius = 6.778e6;
    let mu = G * earth_mass;
    let period = orbital_period(mu, radius);
    let start = Vector2::new(radius, 0.0);
    let bodies = vec![
        Body::new("Earth", earth_mass, Vector2::ZERO, Vector2::ZERO),
        Body::new(
            "Satellite",
            100.0,
            start,
            Vector2::new(0.0, circular_speed(mu, radius)),
        ),
    ];

    let mut sim = simulation(bodies, config(0.1, period, 60.0, Frame::Inertial));
    let trajectory = sim.run().expect("run completes");
    assert_eq!(sim.state(), RunState::Completed);
    assert!(!trajectory.samples.is_empty());

    let end = sim.bodies()[1].position - sim.bodies()[0].position;
    let miss = (end - start).magnitude();
    assert!(miss < 1e-3 * radius, "orbit missed closure by {miss} m");
}

#[test]
fn samples_land_on_export_boundaries() {
    let mut sim = simulation(binary(), config(1.0, 10.0, 3.0, Frame::Inertial));
    let trajectory = sim.run().expect("run completes");

    assert_eq!(sim.steps(), 10);
    let ticks: Vec<usize> = trajectory.samples.iter().map(|s| s.tick).collect();
    let times: Vec<f64> = trajectory.samples.iter().map(|s| s.elapsed_s).collect();
    assert_eq!(ticks, vec![0, 1, 2, 3]);
    assert_eq!(times, vec![0.0, 3.0, 6.0, 9.0]);
}

#[test]
fn zero_angular_speed_matches_the_inertial_frame() {
    let mut inertial = simulation(binary(), config(60.0, 86_400.0, 600.0, Frame::Inertial));
    let mut rotating = simulation(
        binary(),
        config(60.0, 86_400.0, 600.0, Frame::Rotating { angular_speed: 0.0 }),
    );
    let a = inertial.run().expect("inertial run");
    let b = rotating.run().expect("rotating run");
    assert_eq!(a.samples, b.samples);
}

#[test]
fn rotating_frame_turns_samples_by_elapsed_angle() {
    let omega = 2.0 * std::f64::consts::PI / (27.3 * 86_400.0);
    let mut inertial = simulation(binary(), config(60.0, 86_400.0, 3_600.0, Frame::Inertial));
    let mut rotating = simulation(
        binary(),
        config(60.0, 86_400.0, 3_600.0, Frame::Rotating { angular_speed: omega }),
    );
    let a = inertial.run().expect("inertial run");
    let b = rotating.run().expect("rotating run");

    assert_eq!(a.samples.len(), b.samples.len());
    for (plain, turned) in a.samples.iter().zip(&b.samples) {
        let rotation = Rotation2::from_angle(-omega * plain.elapsed_s);
        for (p, q) in plain.positions.iter().zip(&turned.positions) {
            assert_eq!(p.rotate(&rotation), *q);
        }
    }
}

#[test]
fn coincident_bodies_fail_without_samples() {
    let bodies = vec![
        Body::new("A", 1.0e20, Vector2::new(1.0, 1.0), Vector2::ZERO),
        Body::new("B", 1.0e20, Vector2::new(1.0, 1.0), Vector2::ZERO),
    ];
    let mut sim = simulation(bodies, config(1.0, 10.0, 1.0, Frame::Inertial));

    let err = sim.run().expect_err("collision");
    assert!(matches!(err, SimulationError::Collision(_)));
    assert_eq!(sim.state(), RunState::Failed);
    assert!(sim.samples().is_empty());
    assert_eq!(sim.failure(), Some(&err));
}

#[test]
fn finished_runs_refuse_more_steps() {
    let mut sim = simulation(binary(), config(1.0, 2.0, 1.0, Frame::Inertial));
    sim.run().expect("run completes");
    assert_eq!(
        sim.step(),
        Err(SimulationError::Finished(RunState::Completed))
    );
}

#[test]
fn stepping_moves_through_the_lifecycle() {
    let mut sim = simulation(binary(), config(1.0, 2.0, 1.0, Frame::Inertial));
    assert_eq!(sim.state(), RunState::Initializing);
    assert_eq!(sim.step(), Ok(RunState::Running));
    assert_eq!(sim.step(), Ok(RunState::Completed));
    assert_eq!(sim.samples().len(), 2);
}

#[test]
fn cancelled_token_stops_the_run() {
    let token = CancelToken::new();
    token.cancel();
    let mut sim = simulation(binary(), config(1.0, 100.0, 1.0, Frame::Inertial));

    let err = sim.run_with_cancel(&token).expect_err("cancelled");
    assert_eq!(err, SimulationError::Cancelled { step: 0 });
    assert_eq!(sim.state(), RunState::Cancelled);
    assert_eq!(sim.summary("test").status, "cancelled");
}

#[test]
fn non_finite_state_is_reported_as_degeneracy() {
    let bodies = vec![
        Body::new("A", 1.0e20, Vector2::ZERO, Vector2::ZERO),
        Body::new("B", 1.0e20, Vector2::new(1.0, 0.0), Vector2::ZERO),
    ];
    // A step this long overflows the velocity on the first update.
    let mut sim = simulation(bodies, config(1.0e300, 2.0e300, 1.0e300, Frame::Inertial));
    let err = sim.run().expect_err("degenerate");
    assert!(matches!(err, SimulationError::ArithmeticDegeneracy { step: 0, .. }));
    assert_eq!(sim.state(), RunState::Failed);
}

#[test]
fn invalid_timing_is_rejected_before_stepping() {
    let cases = [
        (config(0.0, 10.0, 1.0, Frame::Inertial), ConfigurationError::InvalidTimeStep(0.0)),
        (config(1.0, -1.0, 1.0, Frame::Inertial), ConfigurationError::InvalidDuration(-1.0)),
        (
            config(1.0, 10.0, 0.5, Frame::Inertial),
            ConfigurationError::ExportIntervalBelowStep {
                export_interval_s: 0.5,
                dt_s: 1.0,
            },
        ),
    ];
    for (config, expected) in cases {
        let err = Simulation::new(
            binary(),
            SourceSets::complete(2),
            NewtonianGravity::new(G),
            config,
        )
        .expect_err("invalid config");
        assert_eq!(err, SimulationError::Configuration(expected));
    }

    let zero_rate = SimulationConfig::from_steps_per_second(0.0, 10.0, 1.0, Frame::Inertial);
    assert!(matches!(
        zero_rate.validate(),
        Err(ConfigurationError::InvalidTimeStep(_))
    ));
}

#[test]
fn invalid_bodies_and_sources_are_rejected() {
    let empty = Simulation::new(
        Vec::new(),
        SourceSets::complete(0),
        NewtonianGravity::new(G),
        config(1.0, 10.0, 1.0, Frame::Inertial),
    );
    assert!(matches!(
        empty,
        Err(SimulationError::Configuration(ConfigurationError::NoBodies))
    ));

    let mismatched = Simulation::new(
        binary(),
        SourceSets::complete(3),
        NewtonianGravity::new(G),
        config(1.0, 10.0, 1.0, Frame::Inertial),
    );
    assert!(matches!(
        mismatched,
        Err(SimulationError::Configuration(ConfigurationError::Sources(_)))
    ));

    let mut negative = binary();
    negative[1].mass = -1.0;
    let err = Simulation::new(
        negative,
        SourceSets::complete(2),
        NewtonianGravity::new(G),
        config(1.0, 10.0, 1.0, Frame::Inertial),
    );
    assert!(matches!(
        err,
        Err(SimulationError::Configuration(ConfigurationError::InvalidMass { .. }))
    ));
}

#[test]
fn summary_tracks_extremes_and_final_state() {
    let mut sim = simulation(binary(), config(600.0, 86_400.0, 3_600.0, Frame::Inertial));
    sim.run().expect("run completes");
    let summary = sim.summary("binary");

    assert_eq!(summary.status, "completed");
    assert_eq!(summary.steps, 144);
    assert_eq!(summary.samples, 24);
    assert!(summary.error.is_none());
    let moon = &summary.bodies[1];
    assert_eq!(moon.name, "Moon");
    assert!(moon.min_distance_m <= moon.max_distance_m);
    assert!(moon.min_speed_m_s <= moon.max_speed_m_s);
    assert_eq!(moon.final_position_m[0], sim.bodies()[1].position.x);
}

#[test]
fn collision_after_sampling_keeps_earlier_samples_only() {
    // Massless bodies coast head-on and meet exactly at the origin after two steps.
    let bodies = || {
        vec![
            Body::new("A", 0.0, Vector2::new(-2.0, 0.0), Vector2::new(1.0, 0.0)),
            Body::new("B", 0.0, Vector2::new(2.0, 0.0), Vector2::new(-1.0, 0.0)),
        ]
    };

    let mut sim = simulation(bodies(), config(1.0, 10.0, 1.0, Frame::Inertial));
    assert_eq!(sim.step(), Ok(RunState::Running));
    assert_eq!(sim.step(), Ok(RunState::Running));
    assert_eq!(sim.samples().len(), 2);
    assert_eq!(sim.bodies()[0].position, sim.bodies()[1].position);

    assert!(matches!(sim.step(), Err(SimulationError::Collision(_))));
    assert_eq!(sim.state(), RunState::Failed);
    assert_eq!(sim.samples().len(), 2);
    assert_eq!(sim.step(), Err(SimulationError::Finished(RunState::Failed)));
    assert_eq!(sim.samples().len(), 2);

    let mut fresh = simulation(bodies(), config(1.0, 10.0, 1.0, Frame::Inertial));
    let err = fresh.run().expect_err("collision");
    assert!(matches!(err, SimulationError::Collision(_)));
    assert_eq!(fresh.samples().len(), 2);
    assert_eq!(fresh.summary("head_on").samples, 2);
}

#[test]
fn very_long_runs_construct_without_reserving_every_sample() {
    for duration_s in [1.0e12, 1.0e300] {
        let sim = simulation(binary(), config(1.0, duration_s, 1.0, Frame::Inertial));
        assert_eq!(sim.state(), RunState::Initializing);
        assert!(sim.samples().is_empty());
    }
}

#[test]
fn whitespace_in_body_names_is_rejected() {
    let mut bodies = binary();
    bodies[1].name = "Halley Comet".to_string();
    let err = Simulation::new(
        bodies,
        SourceSets::complete(2),
        NewtonianGravity::new(G),
        config(1.0, 10.0, 1.0, Frame::Inertial),
    )
    .expect_err("invalid name");
    assert_eq!(
        err,
        SimulationError::Configuration(ConfigurationError::InvalidBodyName(
            "Halley Comet".to_string()
        ))
    );
}

#[test]
fn frame_transform_with_zero_speed_is_identity() {
    let positions = [Vector2::new(3.844e8, -1.5e3), Vector2::new(-4.67e6, 2.0)];
    let still = Frame::Rotating { angular_speed: 0.0 };
    assert_eq!(
        still.transform(positions, 86_400.0),
        Frame::Inertial.transform(positions, 86_400.0)
    );
    assert_eq!(Frame::Inertial.transform(positions, 1.0e6), positions.to_vec());
}

#[test]
fn profiles_record_the_state_before_every_step() {
    let mut sim = simulation(binary(), config(600.0, 6_000.0, 600.0, Frame::Inertial));
    let sinks: Vec<Vec<u8>> = vec![Vec::new(), Vec::new()];
    let mut profiles = ProfileSet::from_writers(sinks).expect("profiles");
    sim.run_observed(None, &mut profiles).expect("run completes");
    assert_eq!(profiles.lines(), 10);

    let files: Vec<String> = profiles
        .finish()
        .expect("flush")
        .into_iter()
        .map(|bytes| String::from_utf8(bytes).expect("utf8"))
        .collect();
    let earth: Vec<&str> = files[0].lines().collect();
    let moon: Vec<&str> = files[1].lines().collect();

    assert_eq!(earth[0], "#||pos (a.u.)||, ||vel (m/s)||");
    assert_eq!(earth[1], "0.0,0.0");
    assert_eq!(moon[1], format!("{:?},{:?}", 3.844e8 / AU_M, 1_022.0));
    assert_eq!(moon.len(), 11);
}

struct FailAt(u64);

impl StepObserver for FailAt {
    type Error = String;

    fn observe(&mut self, step: u64, _bodies: &[Body]) -> Result<(), String> {
        if step == self.0 {
            Err("disk full".to_string())
        } else {
            Ok(())
        }
    }
}

#[test]
fn observer_failure_fails_the_run() {
    let mut sim = simulation(binary(), config(1.0, 10.0, 1.0, Frame::Inertial));
    let err = sim.run_observed(None, &mut FailAt(3)).expect_err("observer error");
    assert_eq!(
        err,
        SimulationError::Observer {
            step: 3,
            message: "disk full".to_string()
        }
    );
    assert_eq!(sim.state(), RunState::Failed);
    assert_eq!(sim.samples().len(), 3);
}
