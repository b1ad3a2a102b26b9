use nalgebra as na;

/// Point-mass gravitational acceleration `-mu r / |r|³` (km/s²).
pub fn gravity_acceleration(position: &na::Vector3<f64>, mu: f64) -> na::Vector3<f64> {
    let r: f64 = position.magnitude();
    position * (-mu / (r * r * r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MU_EARTH, R_EARTH};
    use approx::assert_abs_diff_eq;

    #[test]
    fn surface_gravity_points_inward() {
        let a = gravity_acceleration(&na::Vector3::new(0.0, 0.0, R_EARTH), MU_EARTH);
        assert_abs_diff_eq!(a, na::Vector3::new(0.0, 0.0, -0.009_798_7), epsilon = 1e-6);
    }
}
