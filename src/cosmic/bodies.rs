/*
    Geoforce, perturbing force models for Earth orbiters
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::dynamics::DynamicsError;
use std::convert::TryFrom;
use std::fmt;

/// Defines the celestial bodies relevant to an Earth orbiter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Bodies {
    Sun,
    Earth,
    Moon,
}

impl Bodies {
    /// Gravitational parameter in km^3/s^2
    pub fn gm(&self) -> f64 {
        match *self {
            Self::Sun => 132_712_440_018.0,
            Self::Earth => 398_600.441_5,
            Self::Moon => 4_902.800_066,
        }
    }

    /// Mean radius in km, used for the apparent disk of the body as seen from the spacecraft.
    pub fn mean_radius_km(&self) -> f64 {
        match *self {
            Self::Sun => 695_700.0,
            Self::Earth => 6_371.0,
            Self::Moon => 1_737.0,
        }
    }

    /// Returns the human name
    pub fn name(&self) -> String {
        match *self {
            Self::Sun => "Sun".to_string(),
            Self::Earth => "Earth".to_string(),
            Self::Moon => "Moon".to_string(),
        }
    }
}

impl fmt::Display for Bodies {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<&str> for Bodies {
    type Error = DynamicsError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        match name.to_lowercase().as_str() {
            "sun" => Ok(Self::Sun),
            "earth" => Ok(Self::Earth),
            "moon" | "luna" => Ok(Self::Moon),
            _ => Err(DynamicsError::InvalidParameter {
                param: "body",
                reason: format!("unknown celestial body `{name}`"),
            }),
        }
    }
}

/// Equatorial radius of the EGM-96 gravity field, in km.
pub const EGM96_RADIUS_KM: f64 = 6_378.136_3;

/// Gravitational parameter of the EGM-96 gravity field, in km^3/s^2.
pub const EGM96_GM: f64 = 398_600.441_5;
