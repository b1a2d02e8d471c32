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

use crate::linalg::Vector3;
use snafu::Snafu;
use std::fmt;

/// The associated Legendre functions used by the geopotential.
pub mod legendre;
pub use self::legendre::Legendre;

/// The spherical harmonic gravity model.
pub mod sph_harmonics;
pub use self::sph_harmonics::Harmonics;

/// The Jacchia 1971 atmospheric density model, in its tabulated form by Gill.
pub mod density;
pub use self::density::{AtmosphereContext, DensityOutput, Jacchia71Gill};

/// Atmospheric drag, using the Jacchia-Gill density.
pub mod drag;
pub use self::drag::Drag;

/// Sun and Moon third body perturbations.
pub mod third_body;
pub use self::third_body::ThirdBody;

/// Solar radiation pressure, including Earth and Moon eclipses.
pub mod solarpressure;
pub use self::solarpressure::SolarPressure;

/// The aggregation of all of the force models for a single or for many evaluation points.
pub mod perturbations;
pub use self::perturbations::{EvalPoint, ForceModels, Perturbations};

/// The `AccelModel` trait handles immutable dynamics which return an acceleration in km/s^2.
///
/// Implementors are pure functions of their configuration and of the evaluation point,
/// hence the `Send + Sync` bound: the same model may be shared across threads.
pub trait AccelModel: Send + Sync + fmt::Display {
    /// Computes the acceleration at the provided evaluation point, in km/s^2.
    fn eom(&self, point: &EvalPoint) -> Result<Vector3<f64>, DynamicsError>;
}

/// Dynamical model errors.
#[derive(Clone, Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DynamicsError {
    /// No coefficient table covers the requested altitude and temperature.
    #[snafu(display(
        "no {table} coefficients cover altitude {altitude_km} km and temperature {temperature_k} K"
    ))]
    TableLookup {
        table: &'static str,
        altitude_km: f64,
        temperature_k: f64,
    },
    /// The geometry is singular for this computation.
    #[snafu(display("degenerate geometry: {reason}"))]
    DegenerateGeometry { reason: String },
    /// A model parameter or an input is outside of its physical bounds.
    #[snafu(display("invalid {param}: {reason}"))]
    InvalidParameter { param: &'static str, reason: String },
}
