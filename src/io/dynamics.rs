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
    ConfigError, ConfigRepr, Configurable, DensityCoefficientTable, DensityTableRepr,
    DynamicsSnafu, HarmonicCoefficientTable, HeliumTable, InvalidConfigSnafu,
};
use crate::cosmic::{Bodies, DragConfig, SpacecraftOpticalParams};
use crate::dynamics::{Drag, ForceModels, Harmonics, Jacchia71Gill, SolarPressure, ThirdBody};
use serde_derive::{Deserialize, Serialize};
use snafu::{ensure, ResultExt};
use std::sync::Arc;

fn normalized_default() -> bool {
    true
}

/// Gravity field configuration, using the built-in EGM-96 subset if no coefficient file is provided.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HarmonicsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub degree: usize,
    pub order: usize,
    #[serde(default)]
    pub gunzipped: bool,
    /// Whether the file stores fully normalized coefficients
    #[serde(default = "normalized_default")]
    pub normalized: bool,
}

/// A density coefficient table, either as the path to its YAML file or inlined.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableSource {
    File(String),
    Inline(DensityTableRepr),
}

impl TableSource {
    pub fn load(&self) -> Result<DensityTableRepr, ConfigError> {
        match self {
            Self::File(path) => DensityTableRepr::load(path),
            Self::Inline(repr) => Ok(repr.clone()),
        }
    }
}

/// Drag configuration: the density tables and the ballistic properties of the spacecraft.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DragModelConfig {
    pub density: TableSource,
    /// Helium table, defaults to the Gill (1996) tabulation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helium: Option<TableSource>,
    #[serde(flatten)]
    pub spacecraft: DragConfig,
}

/// Serializable force model suite. Absent sections disable the corresponding model.
///
/// ```yaml
/// harmonics:
///   file: data/EGM96.cof
///   degree: 20
///   order: 20
/// third_body: [Sun, Moon]
/// srp:
///   reflectivity: 0.3
///   orientation: [0.0, 0.0, 1.0]
///   area_m2: 10.0
///   mass_kg: 500.0
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ForceModelsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub harmonics: Option<HarmonicsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drag: Option<DragModelConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub third_body: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srp: Option<SpacecraftOpticalParams>,
}

impl ConfigRepr for ForceModelsConfig {}

impl Configurable for ForceModels {
    type IntermediateRepr = ForceModelsConfig;

    fn from_config(cfg: Self::IntermediateRepr) -> Result<Self, ConfigError> {
        let mut models = ForceModels::default();

        if let Some(hcfg) = cfg.harmonics {
            let table = match &hcfg.file {
                Some(path) => HarmonicCoefficientTable::from_file(
                    path,
                    hcfg.degree,
                    hcfg.order,
                    hcfg.gunzipped,
                    hcfg.normalized,
                )?,
                None => HarmonicCoefficientTable::egm96_subset(),
            };
            models.gravity = Some(
                Harmonics::earth(Arc::new(table), hcfg.degree, hcfg.order)
                    .context(DynamicsSnafu)?,
            );
        }

        if let Some(dcfg) = cfg.drag {
            let standard = DensityCoefficientTable::from_config(dcfg.density.load()?)?;
            let helium = match &dcfg.helium {
                Some(source) => HeliumTable::from_config(source.load()?)?,
                None => HeliumTable::gill1996(),
            };
            models.drag = Some(
                Drag::new(
                    Jacchia71Gill::new(Arc::new(standard), Arc::new(helium)),
                    dcfg.spacecraft,
                )
                .context(DynamicsSnafu)?,
            );
        }

        if let Some(names) = cfg.third_body {
            let bodies = names
                .iter()
                .map(|name| Bodies::try_from(name.as_str()))
                .collect::<Result<Vec<Bodies>, _>>()
                .context(DynamicsSnafu)?;
            models.third_body = Some(ThirdBody::new(&bodies).context(DynamicsSnafu)?);
        }

        if let Some(params) = cfg.srp {
            models.srp = Some(SolarPressure::new(params).context(DynamicsSnafu)?);
        }

        info!("Configured {models}");
        Ok(models)
    }

    /// Density tables are inlined. Only the built-in gravity field can be serialized since the path of a loaded
    /// coefficient file is not kept.
    fn to_config(&self) -> Result<Self::IntermediateRepr, ConfigError> {
        let harmonics = match &self.gravity {
            Some(gravity) => {
                ensure!(
                    **gravity.table() == HarmonicCoefficientTable::egm96_subset(),
                    InvalidConfigSnafu {
                        msg: "gravity field was not built from the EGM-96 subset and its source file is unknown"
                            .to_string()
                    }
                );
                Some(HarmonicsConfig {
                    file: None,
                    degree: gravity.degree(),
                    order: gravity.order(),
                    gunzipped: false,
                    normalized: true,
                })
            }
            None => None,
        };

        let drag = match &self.drag {
            Some(drag) => {
                let density = drag.density_model();
                let helium = if **density.helium_table() == HeliumTable::gill1996() {
                    None
                } else {
                    Some(TableSource::Inline(density.helium_table().to_config()?))
                };
                Some(DragModelConfig {
                    density: TableSource::Inline(density.standard_table().to_config()?),
                    helium,
                    spacecraft: drag.config(),
                })
            }
            None => None,
        };

        Ok(ForceModelsConfig {
            harmonics,
            drag,
            third_body: self
                .third_body
                .as_ref()
                .map(|tb| tb.bodies().iter().map(|b| b.name()).collect()),
            srp: self.srp.as_ref().map(|srp| srp.params()),
        })
    }
}
