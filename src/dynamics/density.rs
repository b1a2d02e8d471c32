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
use crate::cosmic::OBLIQUITY_J2000_DEG;
use crate::io::{DensityCoefficientTable, HeliumTable, SpaceWeather};
use crate::linalg::Matrix6x5;
use crate::time::Epoch;
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::sync::Arc;

const MJD_OFFSET: f64 = 2_400_000.5;
/// MJD of the reference epoch of the semi-annual variation (1958 January 1)
const SEMI_ANNUAL_EPOCH_MJD: f64 = 36_204.0;
const DAYS_PER_TROPICAL_YEAR: f64 = 365.2422;
/// Molar mass of helium, kg/mol
const HELIUM_MOLAR_MASS: f64 = 4.0026e-3;
const AVOGADRO: f64 = 6.022_140_857e23;
/// Altitude below which the geomagnetic density correction applies, and center of the temperature blending, km
const GEOMAGNETIC_SPLIT_KM: f64 = 350.0;

/// Position of the spacecraft and of the Sun, as needed by the density model. All angles are in degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereContext {
    /// Right ascension of the spacecraft
    pub sat_ra_deg: f64,
    /// Right ascension of the Sun
    pub sun_ra_deg: f64,
    /// Declination of the Sun
    pub sun_dec_deg: f64,
    /// Geographic latitude of the spacecraft
    pub latitude_deg: f64,
    /// Altitude above the reference ellipsoid, in km
    pub altitude_km: f64,
    /// Julian day of the evaluation, UTC
    pub jd: f64,
}

impl AtmosphereContext {
    /// Builds the context using the Julian day of the provided epoch.
    pub fn with_epoch(
        sat_ra_deg: f64,
        sun_ra_deg: f64,
        sun_dec_deg: f64,
        latitude_deg: f64,
        altitude_km: f64,
        epoch: Epoch,
    ) -> Self {
        Self {
            sat_ra_deg,
            sun_ra_deg,
            sun_dec_deg,
            latitude_deg,
            altitude_km,
            jd: epoch.to_jde_utc_days(),
        }
    }

    pub fn mjd(&self) -> f64 {
        self.jd - MJD_OFFSET
    }
}

/// Result of a density evaluation, with the contribution of each term.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DensityOutput {
    /// log10 of the density in kg/m^3
    pub log10_density: f64,
    /// Exospheric temperature, in K
    pub exospheric_temperature_k: f64,
    pub log10_standard: f64,
    pub geomagnetic: f64,
    pub semi_annual: f64,
    pub seasonal_latitudinal: f64,
    pub helium: f64,
    /// Index of the standard density band used
    pub standard_band: usize,
    /// Index of the helium band used
    pub helium_band: usize,
}

impl DensityOutput {
    /// Density in kg/m^3
    pub fn density_kg_m3(&self) -> f64 {
        10.0_f64.powf(self.log10_density)
    }
}

impl fmt::Display for DensityOutput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "log10(rho) = {:.6} (T_inf = {:.1} K, standard {:.6} from band #{}, GM {:.3e}, SA {:.3e}, SL {:.3e}, He {:.3e} from band #{})",
            self.log10_density,
            self.exospheric_temperature_k,
            self.log10_standard,
            self.standard_band,
            self.geomagnetic,
            self.semi_annual,
            self.seasonal_latitudinal,
            self.helium,
            self.helium_band
        )
    }
}

/// Jacchia 1971 atmosphere, using the polynomial tabulation of the standard density and of the helium number density from Gill (1996).
#[derive(Clone, Debug)]
pub struct Jacchia71Gill {
    standard: Arc<DensityCoefficientTable>,
    helium: Arc<HeliumTable>,
}

impl Jacchia71Gill {
    pub fn new(standard: Arc<DensityCoefficientTable>, helium: Arc<HeliumTable>) -> Self {
        Self { standard, helium }
    }

    /// Uses the Gill (1996) helium tabulation.
    pub fn with_gill_helium(standard: Arc<DensityCoefficientTable>) -> Self {
        Self::new(standard, Arc::new(HeliumTable::gill1996()))
    }

    pub fn standard_table(&self) -> &Arc<DensityCoefficientTable> {
        &self.standard
    }

    pub fn helium_table(&self) -> &Arc<HeliumTable> {
        &self.helium
    }

    /// Exospheric temperature in K, including the diurnal bulge and the geomagnetic heating.
    pub fn exospheric_temperature(ctx: &AtmosphereContext, sw: &SpaceWeather) -> f64 {
        let hour_angle = ctx.sat_ra_deg - ctx.sun_ra_deg;
        let t_c = 379.0 + 3.24 * sw.f10p7_bar + 1.3 * (sw.f10p7 - sw.f10p7_bar);

        // Lag of the diurnal bulge behind the sub-solar point
        let tau = normalize_deg(hour_angle - 37.0 + 6.0 * (hour_angle + 43.0).to_radians().sin());
        let theta = 0.5 * (ctx.latitude_deg + ctx.sun_dec_deg);
        let eta = 0.5 * (ctx.latitude_deg - ctx.sun_dec_deg);
        let s = theta.to_radians().sin().abs().powf(2.2);
        let c = eta.to_radians().cos().abs().powf(2.2);
        let t_1 = t_c * (1.0 + 0.3 * (s + (c - s) * (0.5 * tau).to_radians().cos().powi(3)));

        let exp_kp = sw.kp.exp();
        let delta_t_high = 28.0 * sw.kp + 0.03 * exp_kp;
        let delta_t_low = 14.0 * sw.kp + 0.02 * exp_kp;
        let f = blending(ctx.altitude_km);

        t_1 + f * delta_t_high + (1.0 - f) * delta_t_low
    }

    /// Computes the log10 of the density (kg/m^3) and the breakdown of its terms.
    pub fn log10_density(
        &self,
        ctx: &AtmosphereContext,
        sw: &SpaceWeather,
    ) -> Result<DensityOutput, DynamicsError> {
        sw.validate()?;
        let z = ctx.altitude_km;
        let t_inf = Self::exospheric_temperature(ctx, sw);

        let standard_band = self.standard.select(z, t_inf)?;
        let log10_standard = bivariate(standard_band.coeffs, z / 1000.0, t_inf / 1000.0);

        let exp_kp = sw.kp.exp();
        let geomagnetic = if z < GEOMAGNETIC_SPLIT_KM {
            (0.012 * sw.kp + 1.2e-5 * exp_kp) * (1.0 - blending(z))
        } else {
            0.0
        };

        let phi = (ctx.mjd() - SEMI_ANNUAL_EPOCH_MJD) / DAYS_PER_TROPICAL_YEAR;
        let semi_annual = semi_annual(z, phi);

        let dz = z - 90.0;
        let lat = ctx.latitude_deg.to_radians();
        let seasonal_latitudinal = 0.014
            * dz
            * (-0.0013 * dz * dz).exp()
            * (TAU * phi + 1.72).sin()
            * lat.signum()
            * lat.sin().powi(2);

        // Helium migrates towards the winter pole
        let helium_band = self.helium.select(z, t_inf)?;
        let log10_n_he = bivariate(helium_band.coeffs, z, t_inf);
        let delta_log10_n_he = if ctx.sun_dec_deg == 0.0 {
            0.0
        } else {
            let dec = ctx.sun_dec_deg;
            0.65 * (dec / OBLIQUITY_J2000_DEG).abs()
                * ((45.0 - 0.5 * ctx.latitude_deg * dec.signum())
                    .to_radians()
                    .sin()
                    .powi(3)
                    - 0.35355)
        };
        let delta_rho_he = 10.0_f64.powf(log10_n_he) * (HELIUM_MOLAR_MASS / AVOGADRO)
            * (10.0_f64.powf(delta_log10_n_he) - 1.0);

        let log10_partial = log10_standard + geomagnetic + semi_annual + seasonal_latitudinal;
        let ratio = 1.0 + delta_rho_he / 10.0_f64.powf(log10_partial);
        ensure!(
            ratio > 0.0,
            InvalidParameterSnafu {
                param: "helium",
                reason: format!(
                    "helium correction of {delta_rho_he:e} kg/m^3 exceeds the density at {z} km"
                )
            }
        );
        let helium = ratio.log10();

        let out = DensityOutput {
            log10_density: log10_partial + helium,
            exospheric_temperature_k: t_inf,
            log10_standard,
            geomagnetic,
            semi_annual,
            seasonal_latitudinal,
            helium,
            standard_band: standard_band.index,
            helium_band: helium_band.index,
        };
        debug!("Jacchia-Gill at {z} km: {out}");
        Ok(out)
    }

    /// Density in kg/m^3
    pub fn density(&self, ctx: &AtmosphereContext, sw: &SpaceWeather) -> Result<f64, DynamicsError> {
        Ok(self.log10_density(ctx, sw)?.density_kg_m3())
    }
}

impl fmt::Display for Jacchia71Gill {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Jacchia 1971 (Gill) with {} standard density bands",
            self.standard.len()
        )
    }
}

/// Sigmoid blending between the low and the high altitude coefficients, centered at 350 km.
fn blending(altitude_km: f64) -> f64 {
    0.5 * ((0.04 * (altitude_km - GEOMAGNETIC_SPLIT_KM)).tanh() + 1.0)
}

/// Semi-annual variation of the log density, with `phi` the number of tropical years since 1958.
fn semi_annual(altitude_km: f64, phi: f64) -> f64 {
    let tau_sa =
        phi + 0.09544 * ((0.5 + 0.5 * (TAU * phi + 6.035).sin()).powf(1.65) - 0.5);
    let f_z = (5.876e-7 * altitude_km.powf(2.331) + 0.06328) * (-0.002868 * altitude_km).exp();
    let g_t = 0.02835
        + (0.3817 + 0.17829 * (TAU * tau_sa + 4.137).sin()) * (4.0 * PI * tau_sa + 4.259).sin();
    f_z * g_t
}

/// Wraps an angle in degrees into (-180, 180].
fn normalize_deg(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Evaluates sum c_ij x^i y^j using the power arrays of x and y.
fn bivariate(coeffs: &Matrix6x5<f64>, x: f64, y: f64) -> f64 {
    let mut x_pow = [1.0; 6];
    let mut y_pow = [1.0; 5];
    for i in 1..6 {
        x_pow[i] = x_pow[i - 1] * x;
    }
    for j in 1..5 {
        y_pow[j] = y_pow[j - 1] * y;
    }
    let mut sum = 0.0;
    for (i, xp) in x_pow.iter().enumerate() {
        for (j, yp) in y_pow.iter().enumerate() {
            sum += coeffs[(i, j)] * xp * yp;
        }
    }
    sum
}
