use super::CliError;
use anyhow::Context;
use grace_core::common::units::LoveNumbers;
use grace_core::domain::{NumericDomainWarning, SphericalHarmonicSet};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PointLoadRequest {
    pub(super) data: Vec<f64>,
    pub(super) lon: Vec<f64>,
    pub(super) lat: Vec<f64>,
    #[serde(default = "default_lmax")]
    pub(super) lmax: i32,
    #[serde(default)]
    pub(super) mmax: Option<i32>,
    /// 1: grams, 2: gigatonnes.
    #[serde(default = "default_mass_units")]
    pub(super) units: i32,
    pub(super) love: LoveNumbers,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SynthesizeRequest {
    pub(super) clm: Vec<Vec<f64>>,
    pub(super) slm: Vec<Vec<f64>>,
    pub(super) lon: Vec<f64>,
    pub(super) lat: Vec<f64>,
    pub(super) lmax: i32,
    /// Gaussian smoothing radius in km.
    #[serde(default)]
    pub(super) radius: f64,
    /// 0: norm, 1: cmwe, 2: mmGH, 3: mmCU, 4: microGal, 5: Pa, 6: cmVCU.
    #[serde(default)]
    pub(super) units: i32,
    /// Needed for every unit but `norm`.
    #[serde(default)]
    pub(super) love: Option<LoveNumbers>,
}

fn default_lmax() -> i32 {
    60
}

fn default_mass_units() -> i32 {
    1
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CoefficientReport {
    pub(super) lmax: usize,
    pub(super) mmax: usize,
    pub(super) l: Vec<usize>,
    pub(super) m: Vec<usize>,
    pub(super) clm: Vec<Vec<f64>>,
    pub(super) slm: Vec<Vec<f64>>,
}

impl From<&SphericalHarmonicSet> for CoefficientReport {
    fn from(set: &SphericalHarmonicSet) -> Self {
        Self {
            lmax: set.lmax(),
            mmax: set.mmax(),
            l: set.degrees(),
            m: set.orders(),
            clm: set.clm_rows(),
            slm: set.slm_rows(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SpatialReport {
    pub(super) units: String,
    pub(super) values: Vec<f64>,
    pub(super) warnings: Vec<String>,
}

pub(super) fn read_request<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read request '{}'", path.display()))?;
    serde_json::from_str::<T>(&content)
        .with_context(|| format!("failed to parse request '{}'", path.display()))
        .map_err(CliError::from)
}

pub(super) fn write_report<T: Serialize>(path: &Path, report: &T) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    let rendered =
        serde_json::to_string_pretty(report).context("failed to serialize output report")?;
    fs::write(path, rendered)
        .with_context(|| format!("failed to write output '{}'", path.display()))?;
    Ok(())
}

pub(super) fn report_warnings(warnings: &[NumericDomainWarning]) -> Vec<String> {
    warnings
        .iter()
        .map(|warning| {
            let line = warning.diagnostic_line();
            eprintln!("{line}");
            line
        })
        .collect()
}
