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

/*! # geoforce

Perturbing accelerations acting on an Earth orbiter: non-spherical Earth gravity,
atmospheric density (tabulated Jacchia 1971 after Gill) and the resulting drag,
Sun and Moon third body attraction, and solar radiation pressure with Earth and Moon eclipses.

Every model is a pure function of its inputs. Coefficient tables are loaded once and shared read-only,
so evaluations may run concurrently from as many threads as needed.
*/

/// Physical constants of the Sun, Earth and Moon, spacecraft parameters, and eclipse geometry.
pub mod cosmic;

/// The perturbing force models, and their aggregation into a single evaluation.
pub mod dynamics;

/// Loading of coefficient tables and force model configurations, and validation of space weather inputs.
pub mod io;

#[macro_use]
extern crate log;
extern crate hifitime;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

pub use self::dynamics::{AccelModel, DynamicsError, EvalPoint, ForceModels, Perturbations};
