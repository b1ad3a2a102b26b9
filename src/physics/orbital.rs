use crate::constants::{
    ANGULAR_MOMENTUM_TOLERANCE, ECCENTRICITY_TOLERANCE, KEPLER_MAX_ITERATIONS, KEPLER_TOLERANCE,
    PI, TWO_PI,
};
use crate::errors::PropagationError;
use crate::models::elements::{Anomaly, ClassicalElements};
use crate::models::state::State;
use crate::numerics::angles::{wrap_two_pi, AngleUnit};
use nalgebra as na;

pub struct OrbitalMechanics;

/// Angle from `reference` to `r` measured about the orbit normal `h_hat`.
fn angle_in_plane(
    h_hat: &na::Vector3<f64>,
    reference: &na::Vector3<f64>,
    r: &na::Vector3<f64>,
) -> f64 {
    h_hat.dot(&reference.cross(r)).atan2(reference.dot(r))
}

#[allow(non_snake_case)]
impl OrbitalMechanics {
    /// Eccentricity vector `((v² - mu/r) r - (r·v) v) / mu`, pointing at periapsis.
    pub fn eccentricity_vector(
        r: &na::Vector3<f64>,
        v: &na::Vector3<f64>,
        mu: f64,
    ) -> na::Vector3<f64> {
        let r_mag = r.magnitude();
        let v_mag = v.magnitude();
        ((v_mag * v_mag - mu / r_mag) * r - r.dot(v) * v) / mu
    }

    /// True anomaly of `state` in radians, in [0, 2π).
    ///
    /// Fails with `DegenerateOrbit` when the orbit is circular (no periapsis to
    /// measure from) or rectilinear (no orbit plane).
    pub fn true_anomaly(state: &State, mu: f64) -> Result<f64, PropagationError> {
        let r = &state.position;
        let v = &state.velocity;
        let h = r.cross(v);
        let h_mag = h.magnitude();
        let e_vec = Self::eccentricity_vector(r, v, mu);
        let e = e_vec.magnitude();

        if h_mag < ANGULAR_MOMENTUM_TOLERANCE || e < ECCENTRICITY_TOLERANCE || !e.is_finite() {
            return Err(PropagationError::DegenerateOrbit {
                eccentricity: e,
                angular_momentum: h_mag,
            });
        }

        Ok(wrap_two_pi(angle_in_plane(&(h / h_mag), &e_vec, r)))
    }

    /// True anomaly with a defined value for degenerate states.
    ///
    /// Circular orbits return the argument of latitude (from the ascending node,
    /// or from +x for equatorial orbits). Rectilinear states return 0.
    pub fn true_anomaly_or_fallback(state: &State, mu: f64) -> f64 {
        match Self::true_anomaly(state, mu) {
            Ok(nu) => nu,
            Err(_) => {
                let r = &state.position;
                let h = r.cross(&state.velocity);
                let h_mag = h.magnitude();
                if h_mag < ANGULAR_MOMENTUM_TOLERANCE || !h_mag.is_finite() {
                    return 0.0;
                }
                let h_hat = h / h_mag;
                let n = na::Vector3::z().cross(&h);
                let reference = if n.magnitude() < ANGULAR_MOMENTUM_TOLERANCE {
                    na::Vector3::x()
                } else {
                    n
                };
                wrap_two_pi(angle_in_plane(&h_hat, &reference, r))
            }
        }
    }

    /// Converts Cartesian state (position and velocity) to Keplerian orbital elements
    /// with angles in radians. Circular orbits report `arg_periapsis = 0` and
    /// measure the anomaly from the node; parabolic orbits report an infinite
    /// semi-major axis.
    pub fn cartesian_to_keplerian(
        r: &na::Vector3<f64>,
        v: &na::Vector3<f64>,
        mu: f64,
    ) -> Result<ClassicalElements, PropagationError> {
        // Calculate angular momentum vector
        let h = r.cross(v);
        let h_mag = h.magnitude();

        let r_mag = r.magnitude();
        let v_mag = v.magnitude();
        let e_vec = Self::eccentricity_vector(r, v, mu);
        let e = e_vec.magnitude();

        if r_mag == 0.0 || h_mag < ANGULAR_MOMENTUM_TOLERANCE {
            return Err(PropagationError::DegenerateOrbit {
                eccentricity: e,
                angular_momentum: h_mag,
            });
        }

        // Calculate node vector
        let n = na::Vector3::z().cross(&h);
        let n_mag = n.magnitude();

        let specific_energy = v_mag * v_mag / 2.0 - mu / r_mag;
        let semi_major_axis = if specific_energy.abs() < f64::EPSILON * mu / r_mag {
            f64::INFINITY
        } else {
            -mu / (2.0 * specific_energy)
        };

        let inclination = (h.z / h_mag).clamp(-1.0, 1.0).acos();

        let raan = if n_mag < ANGULAR_MOMENTUM_TOLERANCE {
            0.0
        } else {
            wrap_two_pi(n.y.atan2(n.x))
        };

        let h_hat = h / h_mag;
        let arg_periapsis = if e < ECCENTRICITY_TOLERANCE {
            0.0
        } else if n_mag < ANGULAR_MOMENTUM_TOLERANCE {
            wrap_two_pi(angle_in_plane(&h_hat, &na::Vector3::x(), &e_vec))
        } else {
            wrap_two_pi(angle_in_plane(&h_hat, &n, &e_vec))
        };

        let nu = Self::true_anomaly_or_fallback(&State::new(*r, *v), mu);

        Ok(ClassicalElements {
            semi_major_axis,
            eccentricity: e,
            inclination,
            raan,
            arg_periapsis,
            anomaly: Anomaly::True(nu),
        })
    }

    pub fn compute_orbital_period(a: f64, mu: f64) -> f64 {
        TWO_PI * (a.powi(3) / mu).sqrt()
    }

    pub fn compute_circular_velocity(r: f64, mu: f64) -> f64 {
        (mu / r).sqrt()
    }

    // Anomaly conversion functions
    pub fn true_to_eccentric_anomaly(nu: f64, e: f64) -> f64 {
        if e < ECCENTRICITY_TOLERANCE {
            return wrap_two_pi(nu);
        }

        let E = ((1.0 - e * e).sqrt() * nu.sin()).atan2(e + nu.cos());
        wrap_two_pi(E)
    }

    pub fn eccentric_to_true_anomaly(E: f64, e: f64) -> f64 {
        let nu =
            2.0 * ((1.0 + e).sqrt() * (E / 2.0).sin()).atan2((1.0 - e).sqrt() * (E / 2.0).cos());
        wrap_two_pi(nu)
    }

    pub fn eccentric_to_mean_anomaly(E: f64, e: f64) -> f64 {
        wrap_two_pi(E - e * E.sin())
    }

    pub fn mean_to_eccentric_anomaly(M: f64, e: f64, tolerance: f64, max_iterations: usize) -> f64 {
        let M = wrap_two_pi(M);
        if e < ECCENTRICITY_TOLERANCE {
            return M;
        }

        // Initial guess
        let mut E = if M < PI { M + e / 2.0 } else { M - e / 2.0 };

        // Newton-Raphson iteration
        for _ in 0..max_iterations {
            let delta = (E - e * E.sin() - M) / (1.0 - e * E.cos());
            E -= delta;
            if delta.abs() <= tolerance {
                break;
            }
        }

        wrap_two_pi(E)
    }

    /// Converts Keplerian orbital elements to Cartesian state vectors.
    ///
    /// The perifocal state is rotated through `Rz(raan) · Rx(i) · Rz(argp)`
    /// into the central body's inertial frame. Returns (position, velocity)
    /// in km and km/s.
    pub fn keplerian_to_cartesian(
        elements: &ClassicalElements,
        unit: AngleUnit,
        mu: f64,
    ) -> Result<(na::Vector3<f64>, na::Vector3<f64>), PropagationError> {
        if !(mu > 0.0) || !mu.is_finite() {
            return Err(PropagationError::InvalidElements(format!(
                "gravitational parameter must be positive, got {}",
                mu
            )));
        }
        if !elements.is_finite() {
            return Err(PropagationError::InvalidElements(
                "elements must be finite".to_string(),
            ));
        }

        let elements = elements.to_radians(unit);
        let a = elements.semi_major_axis;
        let e = elements.eccentricity;

        if e < 0.0 {
            return Err(PropagationError::InvalidElements(format!(
                "eccentricity must be non-negative, got {}",
                e
            )));
        }
        if e < 1.0 && a <= 0.0 {
            return Err(PropagationError::InvalidElements(format!(
                "semi-major axis must be positive for an elliptical orbit, got {}",
                a
            )));
        }
        if e == 1.0 {
            return Err(PropagationError::InvalidElements(
                "parabolic orbits cannot be described by a semi-major axis".to_string(),
            ));
        }
        if e > 1.0 && a >= 0.0 {
            return Err(PropagationError::InvalidElements(format!(
                "semi-major axis must be negative for a hyperbolic orbit, got {}",
                a
            )));
        }

        let nu = match elements.anomaly {
            Anomaly::True(nu) => nu,
            Anomaly::Eccentric(_) | Anomaly::Mean(_) if e > 1.0 => {
                return Err(PropagationError::InvalidElements(
                    "eccentric and mean anomalies are only supported for elliptical orbits"
                        .to_string(),
                ))
            }
            Anomaly::Eccentric(E) => Self::eccentric_to_true_anomaly(E, e),
            Anomaly::Mean(M) => {
                let E =
                    Self::mean_to_eccentric_anomaly(M, e, KEPLER_TOLERANCE, KEPLER_MAX_ITERATIONS);
                Self::eccentric_to_true_anomaly(E, e)
            }
        };

        let denominator = 1.0 + e * nu.cos();
        if denominator <= 0.0 {
            return Err(PropagationError::InvalidElements(format!(
                "true anomaly {} rad lies beyond the hyperbolic asymptote",
                nu
            )));
        }

        // Calculate position and velocity in orbital plane
        let p = a * (1.0 - e * e);
        let r_mag = p / denominator;
        let r_orbital = na::Vector3::new(r_mag * nu.cos(), r_mag * nu.sin(), 0.0);
        let v_orbital = na::Vector3::new(
            -(mu / p).sqrt() * nu.sin(),
            (mu / p).sqrt() * (e + nu.cos()),
            0.0,
        );

        // Rotation matrices
        let rot_omega =
            na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), elements.arg_periapsis);
        let rot_i = na::Rotation3::from_axis_angle(&na::Vector3::x_axis(), elements.inclination);
        let rot_omega_cap = na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), elements.raan);

        // Transform to inertial frame
        let transform = rot_omega_cap * rot_i * rot_omega;
        Ok((transform * r_orbital, transform * v_orbital))
    }
}
