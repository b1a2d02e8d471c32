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

/// The Sun, the Earth and the Moon, and their physical constants.
mod bodies;
pub use self::bodies::*;

/// Spacecraft physical and optical parameters.
mod spacecraft;
pub use self::spacecraft::*;

/// Apparent-disk eclipse computations of the Sun by the Earth and the Moon.
pub mod eclipse;

/// Astronomical unit, in kilometers, according to the [IAU](https://www.iau.org/public/themes/measuring/).
pub const AU: f64 = 149_597_870.700;

/// Solar radiation pressure at one astronomical unit, in N/m^2 (i.e. Pa).
pub const SOLAR_PRESSURE_AT_1AU: f64 = 4.56e-6;

/// Earth rotation rate in rad/s, used for the co-rotating atmosphere.
pub const EARTH_ANGULAR_VELOCITY: f64 = 7.292_115e-5;

/// Mean obliquity of the ecliptic at J2000, in degrees.
pub const OBLIQUITY_J2000_DEG: f64 = 23.439_291;
