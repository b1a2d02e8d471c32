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

use super::{
    AccelModel, DegenerateGeometrySnafu, DynamicsError, EvalPoint, InvalidParameterSnafu,
};
use crate::cosmic::Bodies;
use crate::linalg::Vector3;
use snafu::ensure;
use std::fmt;

/// Highest degree of the Legendre expansion of the distance to the perturbing body.
const SERIES_DEGREE: usize = 5;

/// Largest relative truncation error of the expansion, of the order of h^5 with h = r / s.
/// Above it (h > 0.063, e.g. the Moon seen from GEO), the attractions are differenced directly,
/// which then loses less than eps / h of relative precision.
const SERIES_TOLERANCE: f64 = 1e-6;

/// `ThirdBody` computes the perturbation of the Sun and/or the Moon on an Earth orbiter.
///
/// Differencing the attraction on the spacecraft and on the Earth directly loses most significant digits
/// when the perturbing body is far away. Instead, the ratio of the distances is expanded in Legendre polynomials.
#[derive(Clone, Debug, PartialEq)]
pub struct ThirdBody {
    bodies: Vec<Bodies>,
}

impl ThirdBody {
    /// Initializes the perturbation from the provided bodies. The Earth is the central body and is rejected.
    pub fn new(bodies: &[Bodies]) -> Result<Self, DynamicsError> {
        ensure!(
            !bodies.contains(&Bodies::Earth),
            InvalidParameterSnafu {
                param: "bodies",
                reason: "the Earth is the central body".to_string()
            }
        );
        let mut uniq = Vec::with_capacity(bodies.len());
        for body in bodies {
            if !uniq.contains(body) {
                uniq.push(*body);
            }
        }
        Ok(Self { bodies: uniq })
    }

    /// Sun and Moon perturbations
    pub fn sun_and_moon() -> Self {
        Self {
            bodies: vec![Bodies::Sun, Bodies::Moon],
        }
    }

    pub fn bodies(&self) -> &[Bodies] {
        &self.bodies
    }

    /// Sum of the perturbations of the Sun and Moon, from their Earth centered positions in km.
    pub fn acceleration(
        &self,
        r_sat: &Vector3<f64>,
        r_sun: &Vector3<f64>,
        r_moon: &Vector3<f64>,
    ) -> Result<Vector3<f64>, DynamicsError> {
        let mut accel = Vector3::zeros();
        for body in &self.bodies {
            let r_body = match body {
                Bodies::Moon => r_moon,
                _ => r_sun,
            };
            accel += third_body_acceleration(r_sat, r_body, body.gm())?;
        }
        Ok(accel)
    }
}

/// Perturbing acceleration (km/s^2) of a body of gravitational parameter `gm` located at `r_body`,
/// on a spacecraft at `r_sat`, both relative to the central body, in km.
pub fn third_body_acceleration(
    r_sat: &Vector3<f64>,
    r_body: &Vector3<f64>,
    gm: f64,
) -> Result<Vector3<f64>, DynamicsError> {
    let r = r_sat.norm();
    let s = r_body.norm();
    ensure!(
        r > 0.0 && s > 0.0,
        DegenerateGeometrySnafu {
            reason: format!(
                "third body and spacecraft must be away from the central body (|r| = {r}, |s| = {s})"
            )
        }
    );
    let d = r_body - r_sat;
    let h = r / s;

    if h.powi(SERIES_DEGREE as i32) > SERIES_TOLERANCE {
        let dist = d.norm();
        ensure!(
            dist > 0.0,
            DegenerateGeometrySnafu {
                reason: format!("spacecraft at {r_sat} coincides with the perturbing body")
            }
        );
        return Ok(gm * (d / dist.powi(3) - r_body / s.powi(3)));
    }

    let cos_psi = (-(d.norm_squared() - r * r - s * s) / (2.0 * r * s)).clamp(-1.0, 1.0);

    // Legendre polynomials of cos(psi), degree 0 to 5
    let mut p = [0.0; SERIES_DEGREE + 1];
    p[0] = 1.0;
    p[1] = cos_psi;
    for n in 2..=SERIES_DEGREE {
        let nf64 = n as f64;
        p[n] = ((2.0 * nf64 - 1.0) * cos_psi * p[n - 1] - (nf64 - 1.0) * p[n - 2]) / nf64;
    }

    // s / |d| = 1 + B
    let mut h_j = 1.0;
    let mut b = 0.0;
    for p_j in p.iter().skip(1) {
        h_j *= h;
        b += p_j * h_j;
    }
    let beta = 3.0 * b + 3.0 * b * b + b * b * b;

    Ok(-gm / s.powi(3) * (r_sat - beta * d))
}

impl fmt::Display for ThirdBody {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<String> = self.bodies.iter().map(|b| b.name()).collect();
        write!(f, "third body perturbations of {}", names.join(", "))
    }
}

impl AccelModel for ThirdBody {
    fn eom(&self, point: &EvalPoint) -> Result<Vector3<f64>, DynamicsError> {
        let mut accel = Vector3::zeros();
        for body in &self.bodies {
            let r_body = match body {
                Bodies::Moon => point.required_moon()?,
                _ => point.required_sun()?,
            };
            accel += third_body_acceleration(&point.position, &r_body, body.gm())?;
        }
        Ok(accel)
    }
}
