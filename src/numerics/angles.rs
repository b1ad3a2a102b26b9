use crate::constants::TWO_PI;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    Degrees,
    Radians,
}

impl AngleUnit {
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleUnit::Degrees => angle.to_radians(),
            AngleUnit::Radians => angle,
        }
    }
}

/// Wraps an angle into [0, 2π).
pub fn wrap_two_pi(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TWO_PI);
    // rem_euclid can round up to exactly 2π for tiny negative inputs
    if wrapped >= TWO_PI {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PI;
    use approx::assert_abs_diff_eq;
    use test_case::test_case;

    #[test_case(0.0, 0.0; "zero")]
    #[test_case(-PI / 2.0, 1.5 * PI; "negative quarter turn")]
    #[test_case(TWO_PI, 0.0; "full turn")]
    #[test_case(5.0 * PI, PI; "multiple turns")]
    fn wraps_into_range(angle: f64, expected: f64) {
        assert_abs_diff_eq!(wrap_two_pi(angle), expected, epsilon = 1e-12);
    }

    #[test]
    fn tiny_negative_wraps_below_two_pi() {
        let wrapped = wrap_two_pi(-1e-18);
        assert!((0.0..TWO_PI).contains(&wrapped));
    }

    #[test]
    fn unit_conversion() {
        assert_abs_diff_eq!(AngleUnit::Degrees.to_radians(180.0), PI, epsilon = 1e-15);
        assert_eq!(AngleUnit::Radians.to_radians(1.25), 1.25);
    }
}
