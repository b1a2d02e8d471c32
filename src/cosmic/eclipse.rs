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

use super::Bodies;
use crate::dynamics::{DegenerateGeometrySnafu, DynamicsError};
use crate::linalg::Vector3;
use snafu::ensure;
use std::f64::consts::PI;
use std::fmt;

/// Tolerance on the arguments of the inverse trigonometric functions before the geometry is considered degenerate.
const ASIN_TOLERANCE: f64 = 1e-12;

/// Shadow state of the light source by a single body, as seen from the spacecraft.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EclipseState {
    /// Light source fully visible
    Visibilis,
    /// Light source partially occluded, with the occluded fraction of its disk
    Penumbra(f64),
    /// Light source fully occluded
    Umbra,
}

impl EclipseState {
    /// Fraction of the light source disk which is occluded.
    pub fn occluded_fraction(&self) -> f64 {
        match *self {
            Self::Visibilis => 0.0,
            Self::Penumbra(frac) => frac,
            Self::Umbra => 1.0,
        }
    }
}

impl fmt::Display for EclipseState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Umbra => write!(f, "umbra"),
            Self::Visibilis => write!(f, "visibilis"),
            Self::Penumbra(v) => write!(f, "penumbra {:.2}%", v * 100.0),
        }
    }
}

/// Apparent angular radii of the light source and of the occulting body, and their angular separation, all in radians.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ApparentDisks {
    pub light_source: f64,
    pub occulting: f64,
    pub separation: f64,
}

impl ApparentDisks {
    /// Computes the apparent disks from the spacecraft, the light source and the occulting body positions, in km.
    pub fn new(
        r_sat: &Vector3<f64>,
        r_light: &Vector3<f64>,
        light_radius_km: f64,
        r_body: &Vector3<f64>,
        body_radius_km: f64,
    ) -> Result<Self, DynamicsError> {
        let to_light = r_light - r_sat;
        let to_body = r_body - r_sat;
        ensure!(
            to_light.norm() > 0.0 && to_body.norm() > 0.0,
            DegenerateGeometrySnafu {
                reason: "spacecraft is at the center of the light source or of the occulting body"
                    .to_string()
            }
        );
        let cos_sep = to_light.normalize().dot(&to_body.normalize()).clamp(-1.0, 1.0);
        Ok(Self {
            light_source: checked_asin(light_radius_km / to_light.norm())?,
            occulting: checked_asin(body_radius_km / to_body.norm())?,
            separation: cos_sep.acos(),
        })
    }

    /// Classifies the overlap of both disks.
    ///
    /// One disk entirely inside the other is Umbra. This includes annular transits, where the occulting disk is
    /// smaller than the light source and inside it: they are treated as total eclipses.
    pub fn state(&self) -> EclipseState {
        let (a, b, c) = (self.light_source, self.occulting, self.separation);
        if c < (a - b).abs() {
            EclipseState::Umbra
        } else if a + b <= c {
            EclipseState::Visibilis
        } else {
            EclipseState::Penumbra((lens_area(a, b, c) / (PI * a * a)).clamp(0.0, 1.0))
        }
    }
}

/// Area of the intersection of two disks of radii `a` and `b` whose centers are `c` apart.
fn lens_area(a: f64, b: f64, c: f64) -> f64 {
    if c <= f64::EPSILON {
        return PI * a.min(b).powi(2);
    }
    // x is the distance from the center of `a` to the chord, y is the half chord (Heron's formula)
    let x = (c * c + a * a - b * b) / (2.0 * c);
    let heron = (-c + a + b) * (c + a - b) * (c - a + b) * (c + a + b);
    let y = heron.max(0.0).sqrt() / (2.0 * c);
    a * a * y.atan2(x) + b * b * y.atan2(c - x) - c * y
}

fn checked_asin(ratio: f64) -> Result<f64, DynamicsError> {
    ensure!(
        ratio <= 1.0 + ASIN_TOLERANCE,
        DegenerateGeometrySnafu {
            reason: format!("spacecraft is inside a body (radius to distance ratio of {ratio})")
        }
    );
    Ok(ratio.min(1.0).asin())
}

/// Illumination of the spacecraft, with the shadow state cast by each body.
#[derive(Clone, Debug, PartialEq)]
pub struct Illumination {
    /// Visible fraction of the light source, 0 in umbra and 1 in full light
    pub fraction: f64,
    pub states: Vec<(Bodies, EclipseState)>,
}

impl fmt::Display for Illumination {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let states: Vec<String> = self
            .states
            .iter()
            .map(|(body, state)| format!("{state} by {body}"))
            .collect();
        write!(f, "{:.4} illuminated ({})", self.fraction, states.join(", "))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EclipseLocator {
    pub light_source: Bodies,
    pub shadow_bodies: Vec<Bodies>,
}

impl fmt::Display for EclipseLocator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let shadow_bodies: Vec<String> = self.shadow_bodies.iter().map(|b| b.name()).collect();
        write!(
            f,
            "light-source: {}, shadows casted by: {}",
            self.light_source,
            shadow_bodies.join(", ")
        )
    }
}

impl EclipseLocator {
    /// Creates a new typical eclipse locator.
    /// The light source is the Sun, and the shadow bodies are the Earth and the Moon, tested in that order.
    pub fn cislunar() -> Self {
        Self {
            light_source: Bodies::Sun,
            shadow_bodies: vec![Bodies::Earth, Bodies::Moon],
        }
    }

    /// Compute the illumination of a spacecraft from the Earth centered positions of the spacecraft, the Sun and the Moon, in km.
    ///
    /// Bodies are tested in order, and the first one fully occluding the light source stops the search.
    /// Partial occlusions are subtracted from the illuminated fraction, which never drops below zero.
    pub fn compute(
        &self,
        r_sat: &Vector3<f64>,
        r_sun: &Vector3<f64>,
        r_moon: &Vector3<f64>,
    ) -> Result<Illumination, DynamicsError> {
        let position_of = |body: Bodies| match body {
            Bodies::Sun => *r_sun,
            Bodies::Earth => Vector3::zeros(),
            Bodies::Moon => *r_moon,
        };

        let mut fraction = 1.0;
        let mut states = Vec::with_capacity(self.shadow_bodies.len());
        for body in &self.shadow_bodies {
            let disks = ApparentDisks::new(
                r_sat,
                &position_of(self.light_source),
                self.light_source.mean_radius_km(),
                &position_of(*body),
                body.mean_radius_km(),
            )?;
            let state = disks.state();
            debug!("{state} by {body} ({disks:?})");
            states.push((*body, state));
            if state == EclipseState::Umbra {
                fraction = 0.0;
                break;
            }
            fraction -= state.occluded_fraction();
        }

        Ok(Illumination {
            fraction: fraction.max(0.0),
            states,
        })
    }
}
