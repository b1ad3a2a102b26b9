use nalgebra as na;

/// Cartesian state of the orbiting body relative to the central body's centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub position: na::Vector3<f64>, // km
    pub velocity: na::Vector3<f64>, // km/s
}

impl State {
    pub fn new(position: na::Vector3<f64>, velocity: na::Vector3<f64>) -> Self {
        State { position, velocity }
    }

    pub fn zero() -> Self {
        State {
            position: na::Vector3::zeros(),
            velocity: na::Vector3::zeros(),
        }
    }

    /// Splits a raw 6-component state: components 0-2 are position, 3-5 velocity.
    pub fn from_vector6(y: &na::Vector6<f64>) -> Self {
        State {
            position: na::Vector3::new(y[0], y[1], y[2]),
            velocity: na::Vector3::new(y[3], y[4], y[5]),
        }
    }

    pub fn to_vector6(&self) -> na::Vector6<f64> {
        na::Vector6::new(
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(self.velocity.iter()).all(|c| c.is_finite())
    }

    pub fn components(&self) -> [f64; 6] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
        ]
    }
}

impl From<[f64; 6]> for State {
    fn from(y: [f64; 6]) -> Self {
        State::from_vector6(&na::Vector6::from(y))
    }
}

impl std::ops::Add for State {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        State {
            position: self.position + other.position,
            velocity: self.velocity + other.velocity,
        }
    }
}

impl std::ops::Mul<f64> for State {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        State {
            position: self.position * scalar,
            velocity: self.velocity * scalar,
        }
    }
}
