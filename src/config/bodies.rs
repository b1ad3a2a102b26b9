use crate::constants::{G, M_EARTH, MU_EARTH, R_EARTH};
use crate::errors::PropagationError;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// Physical parameters of the attracting body. Only `mu` enters the dynamics;
/// the rest is carried for consumers such as plotting.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CentralBody {
    pub name: String,
    pub mu: f64,     // km³/s²
    pub radius: f64, // km
    #[serde(default)]
    pub mass: Option<f64>, // kg
}

impl CentralBody {
    pub fn new(name: &str, mu: f64, radius: f64) -> Self {
        CentralBody {
            name: name.to_string(),
            mu,
            radius,
            mass: None,
        }
    }

    fn from_mass(name: &str, mass: f64, radius: f64) -> Self {
        CentralBody {
            name: name.to_string(),
            mu: G * mass,
            radius,
            mass: Some(mass),
        }
    }

    pub fn earth() -> Self {
        CentralBody {
            name: "earth".to_string(),
            mu: MU_EARTH,
            radius: R_EARTH,
            mass: Some(M_EARTH),
        }
    }

    pub fn sun() -> Self {
        CentralBody::from_mass("sun", 1.989e30, 695_700.0)
    }

    pub fn moon() -> Self {
        CentralBody {
            mu: 4902.8,
            ..CentralBody::from_mass("moon", 7.342e22, 1737.4)
        }
    }

    pub fn validate(&self) -> Result<(), PropagationError> {
        if !(self.mu > 0.0) || !self.mu.is_finite() {
            return Err(PropagationError::InvalidConfiguration(format!(
                "central body '{}' must have a positive gravitational parameter, got {}",
                self.name, self.mu
            )));
        }
        if !(self.radius >= 0.0) || !self.radius.is_finite() {
            return Err(PropagationError::InvalidConfiguration(format!(
                "central body '{}' must have a non-negative radius, got {}",
                self.name, self.radius
            )));
        }
        Ok(())
    }
}

/// Immutable lookup of central bodies by lower-case name.
#[derive(Debug, Clone, Default)]
pub struct BodyTable {
    bodies: HashMap<String, CentralBody>,
}

impl BodyTable {
    /// Sun, Earth and Moon plus the inner planets and Jupiter.
    pub fn builtin() -> Self {
        let bodies = [
            CentralBody::sun(),
            CentralBody::earth(),
            CentralBody::moon(),
            CentralBody::new("mercury", 22_031.86, 2439.7),
            CentralBody::new("venus", 324_858.59, 6051.8),
            CentralBody::new("mars", 42_828.37, 3389.5),
            CentralBody::new("jupiter", 126_686_534.0, 69_911.0),
        ];
        bodies.into_iter().collect()
    }

    /// Reads `name,mu,radius[,mass]` records with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, PropagationError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = BodyTable::default();
        for result in rdr.deserialize() {
            let body: CentralBody = result?;
            body.validate()?;
            table.bodies.insert(body.name.to_lowercase(), body);
        }
        Ok(table)
    }

    pub fn get(&self, name: &str) -> Result<&CentralBody, PropagationError> {
        self.bodies
            .get(&name.to_lowercase())
            .ok_or_else(|| PropagationError::UnknownBody(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl FromIterator<CentralBody> for BodyTable {
    fn from_iter<I: IntoIterator<Item = CentralBody>>(iter: I) -> Self {
        BodyTable {
            bodies: iter
                .into_iter()
                .map(|body| (body.name.to_lowercase(), body))
                .collect(),
        }
    }
}
