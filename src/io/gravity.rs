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

use super::{ConfigError, DynamicsSnafu, GzipSnafu, InvalidConfigSnafu, ReadSnafu};
use crate::dynamics::{DynamicsError, InvalidParameterSnafu};
use crate::linalg::DMatrix;
use flate2::read::GzDecoder;
use snafu::{ensure, ResultExt};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Unnormalized spherical harmonic coefficients of a geopotential.
///
/// The zonal coefficients `C_l0` are indexed by degree. The sectorial/tesseral coefficients `C_lm` and `S_lm`
/// are square tables indexed by `[degree, order]`, and only hold degrees up to the maximum order.
/// Degree 0 and 1 terms are always zero: the central term is the two-body attraction and the origin is the center of mass.
#[derive(Clone, Debug, PartialEq)]
pub struct HarmonicCoefficientTable {
    zonal: Vec<f64>,
    cosine: DMatrix<f64>,
    sine: DMatrix<f64>,
}

impl HarmonicCoefficientTable {
    /// Builds a table from its zonal sequence (index 0 to max degree) and its square cosine and sine tables.
    pub fn new(
        zonal: Vec<f64>,
        cosine: DMatrix<f64>,
        sine: DMatrix<f64>,
    ) -> Result<Self, DynamicsError> {
        ensure!(
            !zonal.is_empty(),
            InvalidParameterSnafu {
                param: "zonal",
                reason: "empty zonal coefficient sequence".to_string()
            }
        );
        ensure!(
            cosine.is_square() && cosine.shape() == sine.shape(),
            InvalidParameterSnafu {
                param: "tesseral",
                reason: format!(
                    "cosine {:?} and sine {:?} tables must be square and of the same size",
                    cosine.shape(),
                    sine.shape()
                )
            }
        );
        let max_degree = zonal.len() - 1;
        let max_order = cosine.nrows().saturating_sub(1);
        ensure!(
            max_order <= max_degree,
            InvalidParameterSnafu {
                param: "order",
                reason: format!("order {max_order} exceeds degree {max_degree}")
            }
        );
        ensure!(
            zonal.iter().take(2).all(|c| *c == 0.0),
            InvalidParameterSnafu {
                param: "zonal",
                reason: "degree 0 and 1 coefficients must be zero".to_string()
            }
        );
        for l in 0..cosine.nrows() {
            for m in 0..cosine.ncols() {
                let must_be_zero = m > l || l < 2 || m == 0;
                ensure!(
                    !must_be_zero || (cosine[(l, m)] == 0.0 && sine[(l, m)] == 0.0),
                    InvalidParameterSnafu {
                        param: "tesseral",
                        reason: format!(
                            "coefficient ({l}, {m}) must be zero (zonal terms are stored separately and order cannot exceed degree)"
                        )
                    }
                );
            }
        }
        Ok(Self {
            zonal,
            cosine,
            sine,
        })
    }

    /// Initialize a zonal-only table of degree 2, e.g. `j2_only(-1.08262668355e-3)` for the EGM-96 Earth.
    pub fn j2_only(c20: f64) -> Self {
        Self {
            zonal: vec![0.0, 0.0, c20],
            cosine: DMatrix::zeros(1, 1),
            sine: DMatrix::zeros(1, 1),
        }
    }

    /// Initialize the EGM-96 Earth model: unnormalized zonal terms up to degree 24, and the full 5x5 field.
    ///
    /// The Vallado tabulation also lists J66 to J70 but none of degrees 25 to 65. Those isolated terms are left out,
    /// so that the zonal field is a complete truncation at degree 24. Use `from_file` for higher degrees.
    ///
    /// *WARNING:* This is an EARTH gravity model, and _should not_ be used around any other body.
    pub fn egm96_subset() -> Self {
        let zonal = vec![
            0.0,
            0.0,
            -1.082_626_683_55e-03,
            2.532_656_485_33e-06,
            1.619_621_591_37e-06,
            2.272_960_828_69e-07,
            -5.406_812_391_07e-07,
            3.523_599_084_18e-07,
            2.047_994_669_85e-07,
            1.206_169_673_65e-07,
            2.411_454_386_26e-07,
            -2.444_021_483_25e-07,
            1.886_263_182_79e-07,
            2.197_880_016_61e-07,
            -1.307_445_331_18e-07,
            8.235_284_094_56e-09,
            -1.811_392_651_12e-08,
            1.169_047_338_34e-07,
            3.094_246_787_46e-08,
            -2.034_501_476_80e-08,
            1.423_956_290_49e-07,
            3.854_595_169_60e-08,
            -7.629_584_078_18e-08,
            -1.550_756_441_00e-07,
            5.345_601_704_88e-09,
        ];

        #[rustfmt::skip]
        let cosine = DMatrix::from_row_slice(6, 6, &[
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, -2.414e-10, 1.574_460_374_56e-06, 0.0, 0.0, 0.0,
            0.0, 2.192_638_529_17e-06, 3.089_892_068_81e-07, 1.005_487_780_64e-07, 0.0, 0.0,
            0.0, -5.087_993_604_04e-07, 7.841_758_598_44e-08, 5.920_994_026_29e-08, -3.984_074_117_66e-09, 0.0,
            0.0, -5.318_030_150_08e-08, 1.055_871_683_91e-07, -1.493_006_374_92e-08, -2.299_300_290_13e-09, 4.308_224_620_52e-10,
        ]);

        #[rustfmt::skip]
        let sine = DMatrix::from_row_slice(6, 6, &[
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 1.5431e-09, -9.038_038_066_39e-07, 0.0, 0.0, 0.0,
            0.0, 2.684_248_902_97e-07, -2.114_376_124_37e-07, 1.972_225_590_06e-07, 0.0, 0.0,
            0.0, -4.491_448_728_39e-07, 1.481_778_682_96e-07, -1.200_776_676_34e-08, 6.525_714_253_70e-09, 0.0,
            0.0, -8.085_869_476_61e-08, -5.232_919_362_16e-08, -7.097_342_368_90e-09, 3.867_123_358_51e-10, -1.648_182_626_28e-09,
        ]);

        Self {
            zonal,
            cosine,
            sine,
        }
    }

    /// Loads a text file of `degree order C S` rows, as in EGM and GMAT COF coefficient files.
    ///
    /// Rows beyond the requested degree and order are dropped, rows of degree 0 and 1 are ignored,
    /// and any further columns (e.g. the standard deviations) are ignored. Fortran exponents (`1.0D-06`) are accepted.
    /// Set `normalized` if the file stores fully normalized coefficients (as EGM-96 and EGM-2008 do).
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        degree: usize,
        order: usize,
        gunzipped: bool,
        normalized: bool,
    ) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().display().to_string();
        let mut f = File::open(path.as_ref()).context(ReadSnafu {
            path: path_str.clone(),
        })?;
        let mut contents = String::new();
        if gunzipped {
            GzDecoder::new(f)
                .read_to_string(&mut contents)
                .context(GzipSnafu {
                    path: path_str.clone(),
                })?;
        } else {
            f.read_to_string(&mut contents).context(ReadSnafu {
                path: path_str.clone(),
            })?;
        }
        Self::parse(&contents, degree, order, normalized, &path_str)
    }

    /// Parses the text content of a coefficient file, see `from_file`. The source is only used for error messages.
    pub fn parse(
        data: &str,
        degree: usize,
        order: usize,
        normalized: bool,
        source: &str,
    ) -> Result<Self, ConfigError> {
        ensure!(
            order <= degree,
            InvalidConfigSnafu {
                msg: format!("{source}: requested order {order} exceeds requested degree {degree}")
            }
        );

        let mut zonal = vec![0.0; degree + 1];
        let mut cosine = DMatrix::zeros(order + 1, order + 1);
        let mut sine = DMatrix::zeros(order + 1, order + 1);
        let mut max_degree = 0;
        let mut max_order = 0;

        for (lno, line) in data.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let items: Vec<&str> = line.split_whitespace().collect();
            ensure!(
                items.len() >= 4,
                InvalidConfigSnafu {
                    msg: format!(
                        "{source}:{}: expected `degree order C S`, found `{line}`",
                        lno + 1
                    )
                }
            );
            let l = parse_index(items[0], "degree", source, lno)?;
            let m = parse_index(items[1], "order", source, lno)?;
            let c_lm = parse_coeff(items[2], "C", source, lno)?;
            let s_lm = parse_coeff(items[3], "S", source, lno)?;

            ensure!(
                m <= l,
                InvalidConfigSnafu {
                    msg: format!("{source}:{}: order {m} exceeds degree {l}", lno + 1)
                }
            );

            if l < 2 || l > degree || m > order {
                continue;
            }

            let (c_lm, s_lm) = if normalized {
                let factor = denormalization(l, m);
                (c_lm * factor, s_lm * factor)
            } else {
                (c_lm, s_lm)
            };

            if m == 0 {
                zonal[l] = c_lm;
            } else if l <= order {
                cosine[(l, m)] = c_lm;
                sine[(l, m)] = s_lm;
            }
            max_degree = max_degree.max(l);
            max_order = max_order.max(m);
        }

        ensure!(
            max_degree >= degree && max_order >= order,
            InvalidConfigSnafu {
                msg: format!(
                    "{source} only contained (degree, order) of ({max_degree}, {max_order}) instead of requested ({degree}, {order})"
                )
            }
        );

        info!("{source} loaded with (degree, order) = ({degree}, {order})");

        Self::new(zonal, cosine, sine).context(DynamicsSnafu)
    }

    /// Maximum degree of the zonal terms
    pub fn max_degree(&self) -> usize {
        self.zonal.len() - 1
    }

    /// Maximum order (and degree) of the sectorial and tesseral terms
    pub fn max_order(&self) -> usize {
        self.cosine.nrows().saturating_sub(1)
    }

    /// Zonal coefficient C_l0
    pub fn zonal(&self, degree: usize) -> f64 {
        self.zonal[degree]
    }

    /// Returns the (C_lm, S_lm) pair for order m >= 1
    pub fn cs_lm(&self, degree: usize, order: usize) -> (f64, f64) {
        (self.cosine[(degree, order)], self.sine[(degree, order)])
    }
}

/// Converts a fully normalized coefficient of degree l and order m into its unnormalized value.
pub fn denormalization(l: usize, m: usize) -> f64 {
    let k = if m == 0 { 1.0 } else { 2.0 };
    // (l - m)! / (l + m)!
    let mut ratio = 1.0;
    for i in (l - m + 1)..=(l + m) {
        ratio /= i as f64;
    }
    (k * (2 * l + 1) as f64 * ratio).sqrt()
}

fn parse_index(item: &str, what: &str, source: &str, lno: usize) -> Result<usize, ConfigError> {
    usize::from_str(item).map_err(|_| ConfigError::InvalidConfig {
        msg: format!("{source}:{}: could not parse {what} `{item}`", lno + 1),
    })
}

fn parse_coeff(item: &str, what: &str, source: &str, lno: usize) -> Result<f64, ConfigError> {
    f64::from_str(&item.replace(['D', 'd'], "E")).map_err(|_| ConfigError::InvalidConfig {
        msg: format!("{source}:{}: could not parse {what}_lm `{item}`", lno + 1),
    })
}
