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

use super::density::AtmosphereContext;
use super::{
    AccelModel, Drag, DynamicsError, Harmonics, InvalidParameterSnafu, SolarPressure, ThirdBody,
};
use crate::io::SpaceWeather;
use crate::linalg::{Matrix3, Vector3};
use approx::relative_eq;
use rayon::prelude::*;
use snafu::ensure;
use std::fmt;
use typed_builder::TypedBuilder;

/// Tolerance on `R R^T = I` for the Earth fixed frame rotation.
const DCM_TOLERANCE: f64 = 1e-9;

/// A single evaluation point: the spacecraft state and everything the force models need at that instant.
///
/// Positions are in km and relative to the Earth center, velocities in km/s.
#[derive(Copy, Clone, Debug, PartialEq, TypedBuilder)]
#[builder(doc)]
pub struct EvalPoint {
    /// Position of the spacecraft, in the frame shared with the Sun and the Moon positions
    pub position: Vector3<f64>,
    /// Velocity of the spacecraft, required by drag
    #[builder(default, setter(strip_option))]
    pub velocity: Option<Vector3<f64>>,
    /// Rotation from the Earth fixed frame into the frame of `position`, used by the gravity field.
    /// Defaults to the identity, i.e. `position` is already Earth fixed.
    #[builder(default, setter(strip_option))]
    pub body_fixed_dcm: Option<Matrix3<f64>>,
    /// Position of the Sun, required by third body and solar radiation pressure
    #[builder(default, setter(strip_option))]
    pub sun: Option<Vector3<f64>>,
    /// Position of the Moon, required by third body and solar radiation pressure
    #[builder(default, setter(strip_option))]
    pub moon: Option<Vector3<f64>>,
    /// Geometry and time for the density model, required by drag
    #[builder(default, setter(strip_option))]
    pub atmosphere: Option<AtmosphereContext>,
    /// Solar and geomagnetic indices, required by drag
    #[builder(default, setter(strip_option))]
    pub space_weather: Option<SpaceWeather>,
}

fn required<T: Copy>(value: Option<T>, param: &'static str) -> Result<T, DynamicsError> {
    value.ok_or_else(|| DynamicsError::InvalidParameter {
        param,
        reason: "missing from the evaluation point".to_string(),
    })
}

impl EvalPoint {
    /// Returns the Earth fixed to `position` frame rotation, which must be orthonormal.
    pub fn required_body_fixed_dcm(&self) -> Result<Matrix3<f64>, DynamicsError> {
        let dcm = self.body_fixed_dcm.unwrap_or_else(Matrix3::identity);
        ensure!(
            relative_eq!(
                dcm * dcm.transpose(),
                Matrix3::identity(),
                epsilon = DCM_TOLERANCE
            ) && dcm.determinant() > 0.0,
            InvalidParameterSnafu {
                param: "body_fixed_dcm",
                reason: format!("not a rotation matrix: {dcm}")
            }
        );
        Ok(dcm)
    }

    /// Position of the spacecraft in the Earth fixed frame
    pub fn body_fixed_position(&self) -> Result<Vector3<f64>, DynamicsError> {
        Ok(self.required_body_fixed_dcm()?.transpose() * self.position)
    }

    pub fn required_velocity(&self) -> Result<Vector3<f64>, DynamicsError> {
        required(self.velocity, "velocity")
    }

    pub fn required_sun(&self) -> Result<Vector3<f64>, DynamicsError> {
        required(self.sun, "sun")
    }

    pub fn required_moon(&self) -> Result<Vector3<f64>, DynamicsError> {
        required(self.moon, "moon")
    }

    pub fn required_atmosphere(&self) -> Result<AtmosphereContext, DynamicsError> {
        required(self.atmosphere, "atmosphere")
    }

    pub fn required_space_weather(&self) -> Result<SpaceWeather, DynamicsError> {
        required(self.space_weather, "space_weather")
    }
}

/// Acceleration of each perturbation, and their sum, in km/s^2 and in the frame of the evaluation point position.
/// Disabled models contribute zero.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Perturbations {
    pub gravity: Vector3<f64>,
    pub drag: Vector3<f64>,
    pub third_body: Vector3<f64>,
    pub srp: Vector3<f64>,
    pub total: Vector3<f64>,
}

impl fmt::Display for Perturbations {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "total {:.6e} km/s^2 (gravity {:.3e}, drag {:.3e}, third body {:.3e}, SRP {:.3e})",
            self.total.norm(),
            self.gravity.norm(),
            self.drag.norm(),
            self.third_body.norm(),
            self.srp.norm()
        )
    }
}

/// The set of force models applied to an Earth orbiter.
///
/// Each model is optional. Models are immutable once built, so the same suite may evaluate many points concurrently.
#[derive(Clone, Default)]
pub struct ForceModels {
    pub gravity: Option<Harmonics>,
    pub drag: Option<Drag>,
    pub third_body: Option<ThirdBody>,
    pub srp: Option<SolarPressure>,
}

impl ForceModels {
    /// Computes every enabled perturbation at this point.
    pub fn evaluate(&self, point: &EvalPoint) -> Result<Perturbations, DynamicsError> {
        fn eom_of<M: AccelModel>(
            model: &Option<M>,
            point: &EvalPoint,
        ) -> Result<Vector3<f64>, DynamicsError> {
            match model {
                Some(model) => model.eom(point),
                None => Ok(Vector3::zeros()),
            }
        }

        let gravity = eom_of(&self.gravity, point)?;
        let drag = eom_of(&self.drag, point)?;
        let third_body = eom_of(&self.third_body, point)?;
        let srp = eom_of(&self.srp, point)?;

        Ok(Perturbations {
            gravity,
            drag,
            third_body,
            srp,
            total: gravity + drag + third_body + srp,
        })
    }

    /// Evaluates independent points in parallel, the results are in the same order as the points.
    pub fn evaluate_many(&self, points: &[EvalPoint]) -> Vec<Result<Perturbations, DynamicsError>> {
        info!("Evaluating {} on {} points", self, points.len());
        points.par_iter().map(|point| self.evaluate(point)).collect()
    }

    /// Returns the display of every enabled model.
    pub fn models(&self) -> Vec<String> {
        let mut models = Vec::new();
        if let Some(model) = &self.gravity {
            models.push(format!("{model}"));
        }
        if let Some(model) = &self.drag {
            models.push(format!("{model}"));
        }
        if let Some(model) = &self.third_body {
            models.push(format!("{model}"));
        }
        if let Some(model) = &self.srp {
            models.push(format!("{model}"));
        }
        models
    }
}

impl fmt::Display for ForceModels {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let models = self.models();
        if models.is_empty() {
            write!(f, "no force models")
        } else {
            write!(f, "force models: {}", models.join("; "))
        }
    }
}
