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

use super::{AccelModel, DegenerateGeometrySnafu, DynamicsError, EvalPoint};
use crate::cosmic::eclipse::EclipseLocator;
use crate::cosmic::{SpacecraftOpticalParams, AU, SOLAR_PRESSURE_AT_1AU};
use crate::linalg::Vector3;
use snafu::ensure;
use std::fmt;

/// Computation of solar radiation pressure on a flat plate, shadowed by the Earth and the Moon.
#[derive(Clone)]
pub struct SolarPressure {
    params: SpacecraftOpticalParams,
    pub e_loc: EclipseLocator,
}

impl SolarPressure {
    /// Will set the solar flux at 1 AU to 4.56e-6 N/m^2, and use the Earth and the Moon as shadow bodies
    pub fn new(params: SpacecraftOpticalParams) -> Result<Self, DynamicsError> {
        params.validate()?;
        Ok(Self {
            params,
            e_loc: EclipseLocator::cislunar(),
        })
    }

    pub fn params(&self) -> SpacecraftOpticalParams {
        self.params
    }

    /// Acceleration in km/s^2 ignoring any shadow, from the Earth centered positions of the spacecraft and the Sun in km.
    ///
    /// The plate is two sided: when the Sun is behind it, the opposite face is illuminated.
    pub fn unoccluded_acceleration(
        &self,
        r_sat: &Vector3<f64>,
        r_sun: &Vector3<f64>,
    ) -> Result<Vector3<f64>, DynamicsError> {
        let to_sun = r_sun - r_sat;
        let dist = to_sun.norm();
        ensure!(
            dist > 0.0,
            DegenerateGeometrySnafu {
                reason: "spacecraft is at the center of the Sun".to_string()
            }
        );
        let e_sun = to_sun / dist;
        let mut normal = self.params.orientation();
        let mut cos_theta = normal.dot(&e_sun);
        if cos_theta < 0.0 {
            normal = -normal;
            cos_theta = -cos_theta;
        }
        let eps = self.params.reflectivity;
        let pressure = SOLAR_PRESSURE_AT_1AU * (AU / dist).powi(2);
        // N/kg = m/s^2, hence the conversion to km/s^2
        Ok(-pressure * self.params.area_to_mass() * cos_theta
            * ((1.0 - eps) * e_sun + 2.0 * eps * cos_theta * normal)
            * 1e-3)
    }

    /// Acceleration in km/s^2, scaled by the illuminated fraction of the solar disk.
    pub fn acceleration(
        &self,
        r_sat: &Vector3<f64>,
        r_sun: &Vector3<f64>,
        r_moon: &Vector3<f64>,
    ) -> Result<Vector3<f64>, DynamicsError> {
        let illumination = self.e_loc.compute(r_sat, r_sun, r_moon)?;
        if illumination.fraction == 0.0 {
            return Ok(Vector3::zeros());
        }
        Ok(illumination.fraction * self.unoccluded_acceleration(r_sat, r_sun)?)
    }
}

impl fmt::Display for SolarPressure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "SRP (eps = {}, A = {} m^2, m = {} kg) with {}",
            self.params.reflectivity, self.params.area_m2, self.params.mass_kg, self.e_loc
        )
    }
}

impl AccelModel for SolarPressure {
    fn eom(&self, point: &EvalPoint) -> Result<Vector3<f64>, DynamicsError> {
        self.acceleration(&point.position, &point.required_sun()?, &point.required_moon()?)
    }
}
