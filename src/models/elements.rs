use crate::numerics::angles::AngleUnit;
use nalgebra as na;

/// Position of the body along its orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anomaly {
    True(f64),
    Eccentric(f64),
    Mean(f64),
}

impl Anomaly {
    pub fn value(&self) -> f64 {
        match *self {
            Anomaly::True(v) | Anomaly::Eccentric(v) | Anomaly::Mean(v) => v,
        }
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        match self {
            Anomaly::True(v) => Anomaly::True(f(v)),
            Anomaly::Eccentric(v) => Anomaly::Eccentric(f(v)),
            Anomaly::Mean(v) => Anomaly::Mean(f(v)),
        }
    }
}

/// Classical (Keplerian) orbital elements.
///
/// Angles are stored in whatever unit they were supplied in; the unit travels
/// alongside the set and is resolved by [`ClassicalElements::to_radians`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassicalElements {
    pub semi_major_axis: f64, // km, negative for hyperbolic orbits
    pub eccentricity: f64,
    pub inclination: f64,
    pub raan: f64,
    pub arg_periapsis: f64,
    pub anomaly: Anomaly,
}

impl ClassicalElements {
    /// Builds the set from `[a, e, i, raan, argp, nu]`, the last entry a true anomaly.
    pub fn from_vector6(elements: &na::Vector6<f64>) -> Self {
        ClassicalElements {
            semi_major_axis: elements[0],
            eccentricity: elements[1],
            inclination: elements[2],
            raan: elements[3],
            arg_periapsis: elements[4],
            anomaly: Anomaly::True(elements[5]),
        }
    }

    pub fn to_vector6(&self) -> na::Vector6<f64> {
        na::Vector6::new(
            self.semi_major_axis,
            self.eccentricity,
            self.inclination,
            self.raan,
            self.arg_periapsis,
            self.anomaly.value(),
        )
    }

    pub fn to_radians(&self, unit: AngleUnit) -> Self {
        ClassicalElements {
            inclination: unit.to_radians(self.inclination),
            raan: unit.to_radians(self.raan),
            arg_periapsis: unit.to_radians(self.arg_periapsis),
            anomaly: self.anomaly.map(|a| unit.to_radians(a)),
            ..*self
        }
    }

    pub fn is_finite(&self) -> bool {
        self.to_vector6().iter().all(|c| c.is_finite())
    }
}
