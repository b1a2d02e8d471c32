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

use super::{DynamicsError, InvalidParameterSnafu};
use crate::linalg::DMatrix;
use snafu::ensure;

/// Unnormalized associated Legendre functions of sin(latitude), without the Condon-Shortley phase.
///
/// The table is triangular: `P[l][m]` for `0 <= m <= l <= max_degree`. Rows beyond `max_order`
/// only hold the zonal term (`m = 0`); their other entries are left at zero and must not be read.
/// One extra column is stored so that `P[l][l + 1]` reads as zero, as needed by the latitude partial.
#[derive(Clone, Debug, PartialEq)]
pub struct Legendre {
    p: DMatrix<f64>,
    max_degree: usize,
    max_order: usize,
}

impl Legendre {
    /// Computes the table for the provided sine and cosine of the geocentric latitude.
    pub fn compute(
        sin_phi: f64,
        cos_phi: f64,
        max_degree: usize,
        max_order: usize,
    ) -> Result<Self, DynamicsError> {
        ensure!(
            max_order <= max_degree,
            InvalidParameterSnafu {
                param: "max_order",
                reason: format!("order {max_order} exceeds degree {max_degree}")
            }
        );

        let mut p = DMatrix::from_element(max_degree + 1, max_degree + 2, 0.0);
        p[(0, 0)] = 1.0;
        if max_degree >= 1 {
            p[(1, 0)] = sin_phi;
            if max_order >= 1 {
                p[(1, 1)] = cos_phi;
            }
        }

        for l in 2..=max_degree {
            let lf64 = l as f64;
            let two_l_m1 = 2.0 * lf64 - 1.0;
            p[(l, 0)] =
                (two_l_m1 * sin_phi * p[(l - 1, 0)] - (lf64 - 1.0) * p[(l - 2, 0)]) / lf64;

            if l > max_order {
                continue;
            }

            for m in 1..l {
                // P[l-2][m] is zero when m > l - 2, which the extra column covers for m = l - 1
                p[(l, m)] = p[(l - 2, m)] + two_l_m1 * cos_phi * p[(l - 1, m - 1)];
            }
            p[(l, l)] = two_l_m1 * cos_phi * p[(l - 1, l - 1)];
        }

        Ok(Self {
            p,
            max_degree,
            max_order,
        })
    }

    /// Returns `P[l][m]`. Reading `m = l + 1` returns zero.
    pub fn get(&self, l: usize, m: usize) -> f64 {
        debug_assert!(
            m == 0 || m > l || l <= self.max_order,
            "P[{l}][{m}] was skipped (max order {})",
            self.max_order
        );
        self.p[(l, m)]
    }

    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    pub fn max_order(&self) -> usize {
        self.max_order
    }
}
