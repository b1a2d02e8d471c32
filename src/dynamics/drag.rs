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

use super::density::{AtmosphereContext, Jacchia71Gill};
use super::{AccelModel, DynamicsError, EvalPoint};
use crate::cosmic::{DragConfig, EARTH_ANGULAR_VELOCITY};
use crate::io::SpaceWeather;
use crate::linalg::Vector3;
use std::fmt;

/// `Drag` computes the cannonball drag of an atmosphere co-rotating with the Earth, using the Jacchia-Gill density.
#[derive(Clone)]
pub struct Drag {
    density: Jacchia71Gill,
    config: DragConfig,
}

impl Drag {
    pub fn new(density: Jacchia71Gill, config: DragConfig) -> Result<Self, DynamicsError> {
        config.validate()?;
        Ok(Self { density, config })
    }

    pub fn density_model(&self) -> &Jacchia71Gill {
        &self.density
    }

    pub fn config(&self) -> DragConfig {
        self.config
    }

    /// Velocity relative to the atmosphere in km/s, from an Earth centered inertial position (km) and velocity (km/s).
    pub fn relative_velocity(position: &Vector3<f64>, velocity: &Vector3<f64>) -> Vector3<f64> {
        let omega = Vector3::new(0.0, 0.0, EARTH_ANGULAR_VELOCITY);
        velocity - omega.cross(position)
    }

    /// Drag acceleration in km/s^2 for the provided density in kg/m^3.
    pub fn acceleration(
        &self,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        rho_kg_m3: f64,
    ) -> Vector3<f64> {
        let v_rel = Self::relative_velocity(position, velocity);
        // (km/s)^2 to m/s^2 is 1e6, and m/s^2 to km/s^2 is 1e-3
        -0.5 * self.config.ballistic_factor() * rho_kg_m3 * v_rel.norm() * v_rel * 1e3
    }

    /// Drag acceleration in km/s^2, computing the density from the atmosphere context and space weather.
    pub fn acceleration_at(
        &self,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        ctx: &AtmosphereContext,
        sw: &SpaceWeather,
    ) -> Result<Vector3<f64>, DynamicsError> {
        let rho = self.density.density(ctx, sw)?;
        Ok(self.acceleration(position, velocity, rho))
    }
}

impl fmt::Display for Drag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "drag (Cd = {}, A = {} m^2, m = {} kg) with {}",
            self.config.cd, self.config.area_m2, self.config.mass_kg, self.density
        )
    }
}

impl AccelModel for Drag {
    fn eom(&self, point: &EvalPoint) -> Result<Vector3<f64>, DynamicsError> {
        let velocity = point.required_velocity()?;
        let ctx = point.required_atmosphere()?;
        let sw = point.required_space_weather()?;
        self.acceleration_at(&point.position, &velocity, &ctx, &sw)
    }
}
