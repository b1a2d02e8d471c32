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

use approx::relative_eq;
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;

use crate::dynamics::{DynamicsError, InvalidParameterSnafu};
use crate::linalg::Vector3;

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
/// The optical and physical properties of a spacecraft subject to solar radiation pressure
pub struct SpacecraftOpticalParams {
    /// coefficient of reflectivity, between 0.0 (all radiation absorbed) and 1.0 (all radiation specularly reflected)
    pub reflectivity: f64,
    /// unit vector normal to the illuminated surface, expressed in the same frame as the positions
    pub orientation: [f64; 3],
    /// illuminated cross-sectional area
    pub area_m2: f64,
    pub mass_kg: f64,
}

impl SpacecraftOpticalParams {
    /// Builds the optical parameters, returning an error if any of them is not physical.
    pub fn new(
        reflectivity: f64,
        orientation: Vector3<f64>,
        area_m2: f64,
        mass_kg: f64,
    ) -> Result<Self, DynamicsError> {
        let me = Self {
            reflectivity,
            orientation: [orientation.x, orientation.y, orientation.z],
            area_m2,
            mass_kg,
        };
        me.validate()?;
        Ok(me)
    }

    /// Checks that the reflectivity is in [0, 1], that area and mass are positive, and that the orientation is a unit vector.
    pub fn validate(&self) -> Result<(), DynamicsError> {
        ensure!(
            (0.0..=1.0).contains(&self.reflectivity),
            InvalidParameterSnafu {
                param: "reflectivity",
                reason: format!("{} is outside of [0, 1]", self.reflectivity)
            }
        );
        ensure!(
            self.area_m2 > 0.0,
            InvalidParameterSnafu {
                param: "area_m2",
                reason: format!("{} is not strictly positive", self.area_m2)
            }
        );
        ensure!(
            self.mass_kg > 0.0,
            InvalidParameterSnafu {
                param: "mass_kg",
                reason: format!("{} is not strictly positive", self.mass_kg)
            }
        );
        let norm = self.orientation().norm();
        ensure!(
            relative_eq!(norm, 1.0, epsilon = 1e-9, max_relative = 1e-6),
            InvalidParameterSnafu {
                param: "orientation",
                reason: format!("norm is {norm} instead of 1")
            }
        );
        Ok(())
    }

    pub fn orientation(&self) -> Vector3<f64> {
        Vector3::from(self.orientation)
    }

    /// Area to mass ratio in m^2/kg
    pub fn area_to_mass(&self) -> f64 {
        self.area_m2 / self.mass_kg
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
/// The drag configuration for a spacecraft
pub struct DragConfig {
    /// drag area
    pub area_m2: f64,
    /// coefficient of drag; (spheres are between 2.0 and 2.1, use 2.2 in Earth's atmosphere (default)).
    pub cd: f64,
    pub mass_kg: f64,
}

impl DragConfig {
    /// Initialize the drag from the c_d default and the provided drag area and mass
    pub fn from_area(area_m2: f64, mass_kg: f64) -> Self {
        Self {
            area_m2,
            mass_kg,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), DynamicsError> {
        for (param, value) in [
            ("cd", self.cd),
            ("area_m2", self.area_m2),
            ("mass_kg", self.mass_kg),
        ] {
            ensure!(
                value > 0.0,
                InvalidParameterSnafu {
                    param,
                    reason: format!("{value} is not strictly positive")
                }
            );
        }
        Ok(())
    }

    /// Ballistic factor C_D * A / m, in m^2/kg
    pub fn ballistic_factor(&self) -> f64 {
        self.cd * self.area_m2 / self.mass_kg
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            area_m2: 0.0,
            cd: 2.2,
            mass_kg: 0.0,
        }
    }
}
