use csv::Writer;
use nalgebra as na;
use orbitprop::physics::energy::{calculate_angular_momentum, calculate_energy};
use orbitprop::physics::orbital::OrbitalMechanics;
use orbitprop::{AngleUnit, BodyTable, ClassicalElements, OrbitPropagator, PropagatorConfig};
use std::error::Error;
use std::fs::{self, File};
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let bodies = BodyTable::builtin();
    let earth = bodies.get("earth")?;

    let perigee_alt = 400.0; // km
    let apogee_alt = 4000.0; // km
    let ra = earth.radius + apogee_alt;
    let rp = earth.radius + perigee_alt;
    let a = (ra + rp) / 2.0;
    let e = (ra - rp) / (ra + rp);

    let elements = ClassicalElements::from_vector6(&na::Vector6::new(
        a,    // semi-major axis
        e,    // eccentricity
        51.6, // inclination (ISS-like)
        40.0, // RAAN
        20.0, // argument of periapsis
        0.0,  // true anomaly (starting at perigee)
    ));

    let period = OrbitalMechanics::compute_orbital_period(a, earth.mu);
    let tspan = 3.0 * period;
    let dt = 10.0;

    let config = PropagatorConfig::from_elements(elements, AngleUnit::Degrees, tspan, dt);
    let propagator = OrbitPropagator::new(config, earth)?;

    if let Some(reason) = propagator.halt_reason() {
        log::warn!("Trajectory is incomplete: {}", reason);
    }

    let trajectory = propagator.trajectory();
    let initial = propagator.initial_state();
    let initial_energy = calculate_energy(initial, earth.mu);
    let initial_angular_momentum = calculate_angular_momentum(initial);

    let (max_energy_error, max_momentum_error) = trajectory.states()[..trajectory.filled()]
        .iter()
        .map(|state| {
            let energy_error =
                (calculate_energy(state, earth.mu) - initial_energy).abs() / initial_energy.abs();
            let angular_momentum_error = (calculate_angular_momentum(state)
                - initial_angular_momentum)
                .magnitude()
                / initial_angular_momentum.magnitude();
            (energy_error, angular_momentum_error)
        })
        .fold((0.0_f64, 0.0_f64), |(e_max, h_max), (e, h)| (e_max.max(e), h_max.max(h)));

    log::info!(
        "Propagated {:.1} orbits of {:.1} min about {}: \
         max relative energy error {:e}, angular momentum error {:e}",
        tspan / period,
        period / 60.0,
        earth.name,
        max_energy_error,
        max_momentum_error
    );
    log::info!("Largest position component: {:.1} km", trajectory.max_abs_position());

    // Create output directory if it doesn't exist
    let output_dir = Path::new("output");
    fs::create_dir_all(output_dir)?;

    let file = File::create(output_dir.join("trajectory.csv"))?;
    let mut writer = Writer::from_writer(file);
    for sample in trajectory.samples() {
        writer.serialize(sample)?;
    }
    writer.flush()?;
    log::info!("Trajectory has been written to output/trajectory.csv");

    Ok(())
}
