use approx::assert_abs_diff_eq;
use nalgebra as na;
use orbitprop::constants::{MU_EARTH, PI, TWO_PI};
use orbitprop::physics::energy::{calculate_angular_momentum, calculate_energy};
use orbitprop::physics::orbital::OrbitalMechanics;
use orbitprop::{
    AngleUnit, Anomaly, CentralBody, ClassicalElements, FixedStepRk4, OrbitPropagator,
    PropagationError, PropagationState, PropagatorConfig, State,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use test_case::test_case;

fn circular_state(r: f64, mu: f64) -> State {
    State::new(
        na::Vector3::new(r, 0.0, 0.0),
        na::Vector3::new(0.0, (mu / r).sqrt(), 0.0),
    )
}

fn angle_diff(a: f64, b: f64) -> f64 {
    ((a - b + PI).rem_euclid(TWO_PI) - PI).abs()
}

#[test_case(5400.0, 60.0; "even division")]
#[test_case(1000.0, 7.0; "uneven division")]
#[test_case(86_400.0, 100.0; "one day")]
fn sample_count_and_spacing(tspan: f64, dt: f64) {
    let earth = CentralBody::earth();
    let config = PropagatorConfig::from_state(circular_state(7000.0, earth.mu), tspan, dt);
    let propagator = OrbitPropagator::new(config, &earth).unwrap();

    let expected = (tspan / dt).ceil() as usize;
    assert_eq!(propagator.n_steps(), expected);
    assert_eq!(propagator.trajectory().filled(), expected);
    assert!(propagator.is_complete());

    for (k, t) in propagator.times().iter().enumerate() {
        assert_eq!(*t, k as f64 * dt);
    }
    assert!(*propagator.times().last().unwrap() < tspan);
}

#[test]
fn circular_orbit_returns_to_start_after_one_period() {
    let earth = CentralBody::earth();
    let r0 = 7000.0;
    let y0 = circular_state(r0, earth.mu);
    let period = TWO_PI * (r0.powi(3) / earth.mu).sqrt();
    let dt = period / 1000.0;

    let config = PropagatorConfig::from_state(y0, 2.0 * period, dt);
    let propagator = OrbitPropagator::new(config, &earth).unwrap();
    assert!(propagator.is_complete());

    // Sample 1000 sits one period after the start
    let positions = propagator.positions();
    assert_abs_diff_eq!(propagator.times()[1000], period, epsilon = 1e-9);
    assert_abs_diff_eq!(positions[1000], y0.position, epsilon = 1e-3);

    // Radius stays constant and the body moves at the circular rate
    for (k, r) in positions.iter().enumerate() {
        assert_abs_diff_eq!(r.magnitude(), r0, epsilon = 1e-4);
        let expected_angle = TWO_PI * k as f64 / 1000.0;
        assert!(angle_diff(r.y.atan2(r.x), expected_angle) < 1e-7);
    }
}

#[test]
fn energy_and_angular_momentum_conserved() {
    let earth = CentralBody::earth();
    let elements = ClassicalElements::from_vector6(&na::Vector6::new(
        12_000.0, 0.4, 63.4, 120.0, 270.0, 10.0,
    ));
    let period = OrbitalMechanics::compute_orbital_period(12_000.0, earth.mu);
    let config = PropagatorConfig::from_elements(elements, AngleUnit::Degrees, 2.0 * period, 30.0);
    let propagator = OrbitPropagator::new(config, &earth).unwrap();
    assert!(propagator.is_complete());

    let states = propagator.trajectory().states();
    let e0 = calculate_energy(&states[0], earth.mu);
    let h0 = calculate_angular_momentum(&states[0]).magnitude();
    assert_abs_diff_eq!(e0, -earth.mu / 24_000.0, epsilon = 1e-9);

    for state in states {
        let energy_error = (calculate_energy(state, earth.mu) - e0).abs() / e0.abs();
        let momentum_error = (calculate_angular_momentum(state).magnitude() - h0).abs() / h0;
        assert!(energy_error < 1e-8, "energy drift {}", energy_error);
        assert!(momentum_error < 1e-8, "angular momentum drift {}", momentum_error);
    }
}

#[test]
fn true_anomaly_history_advances_monotonically_over_one_orbit() {
    let earth = CentralBody::earth();
    let elements =
        ClassicalElements::from_vector6(&na::Vector6::new(9000.0, 0.2, 30.0, 0.0, 0.0, 0.0));
    let period = OrbitalMechanics::compute_orbital_period(9000.0, earth.mu);
    let config = PropagatorConfig::from_elements(elements, AngleUnit::Degrees, period, 60.0);
    let propagator = OrbitPropagator::new(config, &earth).unwrap();

    let anomalies = propagator.true_anomalies();
    assert!(anomalies.iter().all(|nu| (0.0..TWO_PI).contains(nu)));
    assert!(angle_diff(anomalies[0], 0.0) < 1e-9);
    for pair in anomalies[1..].windows(2) {
        assert!(pair[1] > pair[0]);
    }
}

#[test]
fn radial_infall_halts_with_partial_trajectory() {
    let earth = CentralBody::earth();
    let r0 = 7000.0;
    let y0 = State::new(na::Vector3::new(r0, 0.0, 0.0), na::Vector3::zeros());
    // Free-fall time to the centre
    let t_ff = PI / 2.0 * (r0.powi(3) / (2.0 * earth.mu)).sqrt();

    let config = PropagatorConfig::from_state(y0, 2.0 * t_ff, 10.0);
    let propagator = OrbitPropagator::new(config, &earth).unwrap();

    assert_eq!(propagator.status(), PropagationState::Complete);
    assert!(!propagator.is_complete());
    assert!(matches!(
        propagator.halt_reason(),
        Some(PropagationError::Singularity { .. }) | Some(PropagationError::Integration(_))
    ));

    let trajectory = propagator.trajectory();
    assert!(trajectory.filled() < propagator.n_steps());
    assert!(trajectory.filled() as f64 * 10.0 <= t_ff + 10.0);

    for sample in trajectory.samples() {
        assert!(sample.x.is_finite() && sample.vx.is_finite());
        assert_eq!(sample.true_anomaly, 0.0);
    }
    // Unfilled tail stays at its allocated zero value
    for state in &trajectory.states()[trajectory.filled()..] {
        assert_eq!(*state, State::zero());
    }
}

#[test]
fn circular_true_anomaly_is_deterministic() {
    let state = circular_state(7000.0, MU_EARTH);
    let results: Vec<_> = (0..5)
        .map(|_| OrbitalMechanics::true_anomaly(&state, MU_EARTH))
        .collect();
    assert!(results
        .iter()
        .all(|r| matches!(r, Err(PropagationError::DegenerateOrbit { .. }))));

    let fallbacks: Vec<f64> = (0..5)
        .map(|_| OrbitalMechanics::true_anomaly_or_fallback(&state, MU_EARTH))
        .collect();
    assert!(fallbacks.iter().all(|&nu| nu == fallbacks[0]));
}

#[test]
fn random_elements_round_trip_through_true_anomaly() {
    let mut rng = StdRng::seed_from_u64(0x0b17);
    for _ in 0..200 {
        let e: f64 = rng.gen_range(0.001..0.95);
        let rp: f64 = rng.gen_range(6600.0..20_000.0);
        let nu: f64 = rng.gen_range(0.0..TWO_PI);
        let elements = ClassicalElements {
            semi_major_axis: rp / (1.0 - e),
            eccentricity: e,
            inclination: rng.gen_range(0.0..PI),
            raan: rng.gen_range(0.0..TWO_PI),
            arg_periapsis: rng.gen_range(0.0..TWO_PI),
            anomaly: Anomaly::True(nu),
        };

        let (r, v) =
            OrbitalMechanics::keplerian_to_cartesian(&elements, AngleUnit::Radians, MU_EARTH)
                .unwrap();
        let recovered = OrbitalMechanics::true_anomaly(&State::new(r, v), MU_EARTH).unwrap();
        assert!(angle_diff(recovered, nu) < 1e-6, "e={} nu={} got {}", e, nu, recovered);
    }
}

#[test]
fn elements_in_degrees_and_radians_agree() {
    let earth = CentralBody::earth();
    let degrees =
        ClassicalElements::from_vector6(&na::Vector6::new(8000.0, 0.1, 45.0, 30.0, 60.0, 90.0));
    let radians = ClassicalElements::from_vector6(&na::Vector6::new(
        8000.0,
        0.1,
        45.0_f64.to_radians(),
        30.0_f64.to_radians(),
        60.0_f64.to_radians(),
        90.0_f64.to_radians(),
    ));

    let a = OrbitPropagator::new(
        PropagatorConfig::from_elements(degrees, AngleUnit::Degrees, 10.0, 10.0),
        &earth,
    )
    .unwrap();
    let b = OrbitPropagator::new(
        PropagatorConfig::from_elements(radians, AngleUnit::Radians, 10.0, 10.0),
        &earth,
    )
    .unwrap();
    assert_abs_diff_eq!(a.initial_state().position, b.initial_state().position, epsilon = 1e-9);
    assert_abs_diff_eq!(a.initial_state().velocity, b.initial_state().velocity, epsilon = 1e-12);
}

#[test]
fn fixed_step_integrator_can_be_substituted() {
    let moon = CentralBody::moon();
    let y0 = circular_state(2000.0, moon.mu);
    let config = PropagatorConfig::from_state(y0, 3600.0, 60.0);

    let propagator = OrbitPropagator::with_integrator(config, &moon, |dynamics, state0| {
        FixedStepRk4::new(dynamics, 0.0, state0, 5.0)
    })
    .unwrap();

    assert!(propagator.is_complete());
    assert_eq!(propagator.central_body().name, "moon");
    let e0 = calculate_energy(&y0, moon.mu);
    for state in propagator.trajectory().states() {
        assert_abs_diff_eq!(calculate_energy(state, moon.mu), e0, epsilon = 1e-8);
    }
}

#[test]
fn independent_propagators_run_concurrently() {
    let earth = CentralBody::earth();
    let radii = [6800.0, 7200.0, 8000.0, 12_000.0];

    let finals: Vec<na::Vector3<f64>> = std::thread::scope(|scope| {
        let handles: Vec<_> = radii
            .iter()
            .map(|&r| {
                let earth = &earth;
                scope.spawn(move || {
                    let config =
                        PropagatorConfig::from_state(circular_state(r, earth.mu), 3000.0, 100.0);
                    let propagator = OrbitPropagator::new(config, earth).unwrap();
                    *propagator.positions().last().unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (r, position) in radii.iter().zip(finals.iter()) {
        assert_abs_diff_eq!(position.magnitude(), *r, epsilon = 1e-4);
    }
}
