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

use super::legendre::Legendre;
use super::{
    AccelModel, DegenerateGeometrySnafu, DynamicsError, EvalPoint, InvalidParameterSnafu,
};
use crate::cosmic::{EGM96_GM, EGM96_RADIUS_KM};
use crate::io::HarmonicCoefficientTable;
use crate::linalg::Vector3;
use snafu::ensure;
use std::fmt;
use std::sync::Arc;

/// Below this ratio of the distance to the polar axis over the radius, the longitude partial is singular.
const POLAR_AXIS_TOLERANCE: f64 = 1e-10;

/// `Harmonics` computes the perturbing acceleration of a non-spherical geopotential, in the body fixed frame.
///
/// The partials of the potential with respect to the radius, the geocentric latitude and the longitude
/// are computed from the unnormalized Legendre functions, and then rotated into Cartesian components.
#[derive(Clone)]
pub struct Harmonics {
    table: Arc<HarmonicCoefficientTable>,
    degree: usize,
    order: usize,
    gm: f64,
    radius_km: f64,
}

impl Harmonics {
    /// Create a new Harmonics model using `degree` zonal terms and `order` sectorial/tesseral terms of the provided table.
    pub fn new(
        table: Arc<HarmonicCoefficientTable>,
        degree: usize,
        order: usize,
        gm: f64,
        radius_km: f64,
    ) -> Result<Self, DynamicsError> {
        ensure!(
            order <= degree,
            InvalidParameterSnafu {
                param: "order",
                reason: format!("order {order} exceeds degree {degree}")
            }
        );
        ensure!(
            degree <= table.max_degree() && order <= table.max_order(),
            InvalidParameterSnafu {
                param: "degree",
                reason: format!(
                    "requested ({degree}, {order}) but table only covers ({}, {})",
                    table.max_degree(),
                    table.max_order()
                )
            }
        );
        ensure!(
            gm > 0.0 && radius_km > 0.0,
            InvalidParameterSnafu {
                param: "gm",
                reason: format!("GM ({gm}) and radius ({radius_km}) must be positive")
            }
        );
        Ok(Self {
            table,
            degree,
            order,
            gm,
            radius_km,
        })
    }

    /// Initializes an Earth model with the EGM-96 gravitational parameter and reference radius.
    pub fn earth(
        table: Arc<HarmonicCoefficientTable>,
        degree: usize,
        order: usize,
    ) -> Result<Self, DynamicsError> {
        Self::new(table, degree, order, EGM96_GM, EGM96_RADIUS_KM)
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn table(&self) -> &Arc<HarmonicCoefficientTable> {
        &self.table
    }

    /// Perturbing acceleration (excluding the two-body term) in km/s^2 at the body fixed position `r_bf` in km.
    pub fn acceleration(&self, r_bf: &Vector3<f64>) -> Result<Vector3<f64>, DynamicsError> {
        let (x, y, z) = (r_bf.x, r_bf.y, r_bf.z);
        let r = r_bf.norm();
        let rho2 = x * x + y * y;
        let rho = rho2.sqrt();
        ensure!(
            r > 0.0 && rho / r >= POLAR_AXIS_TOLERANCE,
            DegenerateGeometrySnafu {
                reason: format!(
                    "position {r_bf} is on the polar axis, longitude partial is undefined"
                )
            }
        );

        let sin_phi = z / r;
        let cos_phi = rho / r;
        let tan_phi = sin_phi / cos_phi;
        let lambda = y.atan2(x);

        let p = Legendre::compute(sin_phi, cos_phi, self.degree, self.order)?;

        // sin(m*lambda), cos(m*lambda)
        let trig_m: Vec<(f64, f64)> = (0..=self.order)
            .map(|m| (m as f64 * lambda).sin_cos())
            .collect();

        let ratio = self.radius_km / r;
        let mut du_dr = 0.0;
        let mut du_dphi = 0.0;
        let mut du_dlambda = 0.0;

        for l in 2..=self.degree {
            let lf64 = l as f64;
            let ratio_l = ratio.powi(l as i32);

            // Zonal term, its latitude derivative only uses zonal entries
            let c_l0 = self.table.zonal(l);
            let dp_l0 = lf64 * (p.get(l - 1, 0) - sin_phi * p.get(l, 0)) / cos_phi;
            du_dr += ratio_l * (lf64 + 1.0) * p.get(l, 0) * c_l0;
            du_dphi += ratio_l * dp_l0 * c_l0;

            if l > self.order {
                continue;
            }

            for (m, (sin_ml, cos_ml)) in trig_m.iter().enumerate().take(l + 1).skip(1) {
                let mf64 = m as f64;
                let (c_lm, s_lm) = self.table.cs_lm(l, m);
                let p_lm = p.get(l, m);
                let cs = c_lm * cos_ml + s_lm * sin_ml;

                du_dr += ratio_l * (lf64 + 1.0) * p_lm * cs;
                du_dphi += ratio_l * (p.get(l, m + 1) - mf64 * tan_phi * p_lm) * cs;
                du_dlambda += ratio_l * mf64 * p_lm * (s_lm * cos_ml - c_lm * sin_ml);
            }
        }

        du_dr *= -self.gm / (r * r);
        du_dphi *= self.gm / r;
        du_dlambda *= self.gm / r;

        let radial = du_dr / r - z / (r * r * rho) * du_dphi;
        Ok(Vector3::new(
            radial * x - du_dlambda / rho2 * y,
            radial * y + du_dlambda / rho2 * x,
            du_dr / r * z + rho / (r * r) * du_dphi,
        ))
    }

    /// Two-body acceleration plus the harmonics perturbation.
    pub fn total_acceleration(&self, r_bf: &Vector3<f64>) -> Result<Vector3<f64>, DynamicsError> {
        let r = r_bf.norm();
        Ok(-self.gm / r.powi(3) * r_bf + self.acceleration(r_bf)?)
    }
}

impl fmt::Display for Harmonics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}x{} spherical harmonics (GM = {} km^3/s^2, R = {} km)",
            self.degree, self.order, self.gm, self.radius_km
        )
    }
}

impl AccelModel for Harmonics {
    fn eom(&self, point: &EvalPoint) -> Result<Vector3<f64>, DynamicsError> {
        // Computed in the Earth fixed frame, and rotated back into the frame of the position
        let dcm = point.required_body_fixed_dcm()?;
        Ok(dcm * self.acceleration(&(dcm.transpose() * point.position))?)
    }
}
