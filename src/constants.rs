pub const G: f64 = 6.67430e-20; // Gravitational constant (km³/kg/s²)

// Earth
pub const MU_EARTH: f64 = 398_600.4418; // km³/s²
pub const R_EARTH: f64 = 6378.0; // Equatorial radius (km)
pub const M_EARTH: f64 = 5.972e24; // kg

// Thresholds below which an orbit is treated as circular or rectilinear
pub const ECCENTRICITY_TOLERANCE: f64 = 1e-10;
pub const ANGULAR_MOMENTUM_TOLERANCE: f64 = 1e-10; // km²/s

// Kepler equation solver
pub const KEPLER_TOLERANCE: f64 = 1e-14;
pub const KEPLER_MAX_ITERATIONS: usize = 50;

// Upper bound on output samples per propagation
pub const MAX_SAMPLES: usize = 10_000_000;

// Math
pub const PI: f64 = std::f64::consts::PI;
pub const TWO_PI: f64 = std::f64::consts::TAU;
