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

use super::ConfigRepr;
use crate::dynamics::{DynamicsError, InvalidParameterSnafu};
use crate::time::{Epoch, Unit};
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;

/// Solar flux above which the Jacchia model is extrapolated, in solar flux units.
const UNUSUAL_FLUX_SFU: f64 = 400.0;

/// Space weather indices driving the thermosphere.
///
/// Values from external feeds are untrusted: use `new` (or `validate` after deserialization) before feeding them to a density model.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpaceWeather {
    /// F10.7 solar flux of the day, in solar flux units
    pub f10p7: f64,
    /// F10.7 solar flux averaged over three solar rotations (81 days), in solar flux units
    pub f10p7_bar: f64,
    /// Kp planetary geomagnetic index, sampled at `kp_epoch`
    pub kp: f64,
}

impl ConfigRepr for SpaceWeather {}

impl SpaceWeather {
    pub fn new(f10p7: f64, f10p7_bar: f64, kp: f64) -> Result<Self, DynamicsError> {
        let me = Self {
            f10p7,
            f10p7_bar,
            kp,
        };
        me.validate()?;
        Ok(me)
    }

    /// Fluxes must be finite and non-negative, and Kp must be within [0, 9].
    pub fn validate(&self) -> Result<(), DynamicsError> {
        for (param, flux) in [("f10p7", self.f10p7), ("f10p7_bar", self.f10p7_bar)] {
            ensure!(
                flux.is_finite() && flux >= 0.0,
                InvalidParameterSnafu {
                    param,
                    reason: format!("solar flux {flux} must be finite and non-negative")
                }
            );
            if flux > UNUSUAL_FLUX_SFU {
                warn!("{param} = {flux} sfu is unusually high, the density model is extrapolated");
            }
        }
        ensure!(
            (0.0..=9.0).contains(&self.kp),
            InvalidParameterSnafu {
                param: "kp",
                reason: format!("{} is outside of [0, 9]", self.kp)
            }
        );
        Ok(())
    }

    /// The geomagnetic index drives the thermosphere with a lag: Kp must be sampled 6.7 hours before the epoch of interest.
    pub fn kp_epoch(epoch: Epoch) -> Epoch {
        epoch - 6.7 * Unit::Hour
    }
}
