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

use super::{ConfigError, ConfigRepr, Configurable, InvalidConfigSnafu};
use crate::dynamics::{DynamicsError, TableLookupSnafu};
use crate::linalg::Matrix6x5;
use serde_derive::{Deserialize, Serialize};
use snafu::{ensure, OptionExt};
use std::fmt;

/// Serializable coefficient band: an altitude interval, an optional temperature interval, and a 6x5 matrix.
///
/// Intervals are half open, `[lo, hi)`. Row `i` of the coefficients multiplies the `i`-th power of the altitude,
/// and column `j` the `j`-th power of the exospheric temperature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoefficientBand {
    pub altitude_km: [f64; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_k: Option<[f64; 2]>,
    pub coefficients: Vec<Vec<f64>>,
}

/// Serializable representation of a banded coefficient table, bands are listed in priority order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DensityTableRepr {
    pub bands: Vec<CoefficientBand>,
}

impl ConfigRepr for DensityTableRepr {}

#[derive(Clone, Debug, PartialEq)]
struct Band {
    altitude_km: (f64, f64),
    temperature_k: Option<(f64, f64)>,
    coeffs: Matrix6x5<f64>,
}

impl Band {
    fn covers(&self, altitude_km: f64, temperature_k: f64) -> bool {
        let (z_lo, z_hi) = self.altitude_km;
        let t_ok = match self.temperature_k {
            Some((t_lo, t_hi)) => t_lo <= temperature_k && temperature_k < t_hi,
            None => true,
        };
        z_lo <= altitude_km && altitude_km < z_hi && t_ok
    }

    fn overlaps(&self, other: &Self) -> bool {
        let disjoint = |a: (f64, f64), b: (f64, f64)| a.1 <= b.0 || b.1 <= a.0;
        let t_overlap = match (self.temperature_k, other.temperature_k) {
            (Some(a), Some(b)) => !disjoint(a, b),
            _ => true,
        };
        !disjoint(self.altitude_km, other.altitude_km) && t_overlap
    }

    fn from_repr(band: &CoefficientBand, idx: usize) -> Result<Self, ConfigError> {
        let [z_lo, z_hi] = band.altitude_km;
        ensure!(
            z_lo < z_hi,
            InvalidConfigSnafu {
                msg: format!("band #{idx}: altitude interval [{z_lo}, {z_hi}) is empty")
            }
        );
        if let Some([t_lo, t_hi]) = band.temperature_k {
            ensure!(
                t_lo < t_hi,
                InvalidConfigSnafu {
                    msg: format!("band #{idx}: temperature interval [{t_lo}, {t_hi}) is empty")
                }
            );
        }
        ensure!(
            band.coefficients.len() == 6 && band.coefficients.iter().all(|row| row.len() == 5),
            InvalidConfigSnafu {
                msg: format!("band #{idx}: coefficients must be a 6x5 matrix")
            }
        );
        Ok(Self {
            altitude_km: (z_lo, z_hi),
            temperature_k: band.temperature_k.map(|[lo, hi]| (lo, hi)),
            coeffs: Matrix6x5::from_fn(|i, j| band.coefficients[i][j]),
        })
    }

    fn to_repr(&self) -> CoefficientBand {
        CoefficientBand {
            altitude_km: [self.altitude_km.0, self.altitude_km.1],
            temperature_k: self.temperature_k.map(|(lo, hi)| [lo, hi]),
            coefficients: (0..6)
                .map(|i| (0..5).map(|j| self.coeffs[(i, j)]).collect())
                .collect(),
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Z in [{}, {}) km", self.altitude_km.0, self.altitude_km.1)?;
        if let Some((lo, hi)) = self.temperature_k {
            write!(f, ", T in [{lo}, {hi}) K")?;
        }
        Ok(())
    }
}

/// A band of the table, as returned by a lookup.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SelectedBand<'a> {
    /// Index of the band in the table
    pub index: usize,
    pub coeffs: &'a Matrix6x5<f64>,
}

/// Ordered list of non-overlapping coefficient bands, selected by altitude and exospheric temperature.
///
/// This is the Gill tabulation of the Jacchia 1971 standard density: eight bands, split at 850 K and at 180, 500 and 1000 km.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityCoefficientTable {
    name: &'static str,
    bands: Vec<Band>,
}

impl DensityCoefficientTable {
    fn from_bands(name: &'static str, repr: &DensityTableRepr) -> Result<Self, ConfigError> {
        ensure!(
            !repr.bands.is_empty(),
            InvalidConfigSnafu {
                msg: format!("{name} table has no bands")
            }
        );
        let bands = repr
            .bands
            .iter()
            .enumerate()
            .map(|(idx, band)| Band::from_repr(band, idx))
            .collect::<Result<Vec<Band>, ConfigError>>()?;

        for (i, band) in bands.iter().enumerate() {
            for (j, other) in bands.iter().enumerate().skip(i + 1) {
                ensure!(
                    !band.overlaps(other),
                    InvalidConfigSnafu {
                        msg: format!("{name} bands #{i} ({band}) and #{j} ({other}) overlap")
                    }
                );
            }
        }

        info!("{name} coefficient table loaded with {} bands", bands.len());
        Ok(Self { name, bands })
    }

    /// Returns the first band covering this altitude (km) and temperature (K).
    pub fn select(
        &self,
        altitude_km: f64,
        temperature_k: f64,
    ) -> Result<SelectedBand<'_>, DynamicsError> {
        let (index, band) = self
            .bands
            .iter()
            .enumerate()
            .find(|(_, band)| band.covers(altitude_km, temperature_k))
            .context(TableLookupSnafu {
                table: self.name,
                altitude_km,
                temperature_k,
            })?;
        debug!(
            "{} band #{index} ({band}) selected for Z = {altitude_km} km and T = {temperature_k} K",
            self.name
        );
        Ok(SelectedBand {
            index,
            coeffs: &band.coeffs,
        })
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}

impl Configurable for DensityCoefficientTable {
    type IntermediateRepr = DensityTableRepr;

    fn from_config(cfg: Self::IntermediateRepr) -> Result<Self, ConfigError> {
        Self::from_bands("standard density", &cfg)
    }

    fn to_config(&self) -> Result<Self::IntermediateRepr, ConfigError> {
        Ok(DensityTableRepr {
            bands: self.bands.iter().map(Band::to_repr).collect(),
        })
    }
}

/// Coefficients of the log10 helium number density (per m^3) as a polynomial of altitude (km) and exospheric temperature (K).
#[derive(Clone, Debug, PartialEq)]
pub struct HeliumTable(DensityCoefficientTable);

impl HeliumTable {
    /// Returns the band covering this altitude (km) and temperature (K).
    pub fn select(
        &self,
        altitude_km: f64,
        temperature_k: f64,
    ) -> Result<SelectedBand<'_>, DynamicsError> {
        self.0.select(altitude_km, temperature_k)
    }

    /// Gill (1996) helium tabulation, from 90 km to 2500 km.
    pub fn gill1996() -> Self {
        #[rustfmt::skip]
        let low = Matrix6x5::new(
            18.31549, 5.887556e-03, -4.813257e-06, 1.701738e-09, -2.128374e-13,
            -7.374008e-02, -1.251077e-04, 1.039269e-07, -3.679280e-11, 4.555258e-15,
            4.384164e-04, 8.657027e-07, -7.216946e-10, 2.481534e-13, -2.859074e-17,
            -1.411195e-06, -2.483834e-09, 2.004107e-12, -6.244985e-16, 5.561004e-20,
            2.153639e-09, 3.421944e-12, -2.628961e-15, 7.085655e-19, -3.279804e-23,
            -1.255139e-12, -1.827253e-15, 1.321581e-18, -2.887398e-22, -7.827178e-27,
        );
        #[rustfmt::skip]
        let mid = Matrix6x5::new(
            16.27089, -1.786816e-02, 3.079079e-05, -2.043431e-08, 4.643419e-12,
            -1.958297e-02, 1.386126e-04, -2.532463e-07, 1.714183e-10, -3.934230e-14,
            2.514251e-05, -3.806339e-07, 7.692376e-10, -5.394766e-13, 1.260304e-16,
            -2.983314e-08, 5.855851e-10, -1.210663e-12, 8.561632e-16, -2.009030e-19,
            1.802028e-11, -4.382878e-13, 9.201530e-16, -6.543935e-19, 1.540220e-22,
            -4.243067e-15, 1.268830e-16, -2.695807e-19, 1.925469e-22, -4.542329e-26,
        );
        #[rustfmt::skip]
        let high = Matrix6x5::new(
            18.73346, 2.285683e-02, -6.860776e-05, 5.379623e-08, -1.327559e-11,
            -2.362530e-02, -6.907613e-05, 2.251680e-07, -1.795937e-10, 4.463659e-14,
            1.893899e-05, 1.145960e-07, -3.183259e-10, 2.461076e-13, -6.040423e-17,
            -1.132198e-08, -7.438326e-11, 2.040288e-13, -1.573191e-16, 3.857032e-20,
            3.465014e-12, 2.308943e-14, -6.320466e-17, 4.871419e-20, -1.194139e-23,
            -4.156710e-16, -2.791930e-18, 7.632792e-21, -5.881112e-24, 1.441455e-27,
        );

        let band = |lo, hi, coeffs| Band {
            altitude_km: (lo, hi),
            temperature_k: None,
            coeffs,
        };

        Self(DensityCoefficientTable {
            name: "helium",
            bands: vec![
                band(90.0, 500.0, low),
                band(500.0, 1000.0, mid),
                band(1000.0, 2500.0, high),
            ],
        })
    }
}

impl Configurable for HeliumTable {
    type IntermediateRepr = DensityTableRepr;

    fn from_config(cfg: Self::IntermediateRepr) -> Result<Self, ConfigError> {
        ensure!(
            cfg.bands.iter().all(|band| band.temperature_k.is_none()),
            InvalidConfigSnafu {
                msg: "helium bands are only selected by altitude".to_string()
            }
        );
        Ok(Self(DensityCoefficientTable::from_bands("helium", &cfg)?))
    }

    fn to_config(&self) -> Result<Self::IntermediateRepr, ConfigError> {
        self.0.to_config()
    }
}
