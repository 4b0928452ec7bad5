//! Degree-dependent unit conversion factors derived from load Love numbers
//! (Wahr et al., 1998).

use super::constants::{EARTH_DENSITY, EARTH_RADIUS_CM, G_WMO, GM_EARTH, PI};
use crate::domain::{GravityError, GravityResult, OutputUnit};
use serde::{Deserialize, Serialize};

/// Load Love numbers `h_l`, `k_l`, `l_l` indexed by degree.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct LoveNumbers {
    pub hl: Vec<f64>,
    pub kl: Vec<f64>,
    pub ll: Vec<f64>,
}

impl LoveNumbers {
    pub fn new(hl: Vec<f64>, kl: Vec<f64>, ll: Vec<f64>) -> Self {
        Self { hl, kl, ll }
    }

    /// Rigid Earth: all Love numbers zero up to `lmax`.
    pub fn rigid(lmax: usize) -> Self {
        Self::new(vec![0.0; lmax + 1], vec![0.0; lmax + 1], vec![0.0; lmax + 1])
    }

    fn validate(&self, lmax: usize) -> GravityResult<()> {
        for (field, values) in [("hl", &self.hl), ("kl", &self.kl), ("ll", &self.ll)] {
            if values.len() < lmax + 1 {
                return Err(GravityError::dimension_mismatch(field, lmax + 1, values.len()));
            }
            if let Some(index) = values[..=lmax].iter().position(|value| !value.is_finite()) {
                return Err(GravityError::invalid_argument(
                    field,
                    format!("love number at degree {index} is not finite"),
                ));
            }
        }

        if let Some(degree) = self.kl[..=lmax].iter().position(|k| 1.0 + k == 0.0) {
            return Err(GravityError::invalid_argument(
                "kl",
                format!("k_l = -1 at degree {degree} makes 1 + k_l singular"),
            ));
        }

        Ok(())
    }
}

/// Per-degree scale arrays for every [`OutputUnit`], plus the Earth radius (cm).
#[derive(Debug, Clone, PartialEq)]
pub struct UnitTable {
    pub earth_radius: f64,
    pub norm: Vec<f64>,
    pub cmwe: Vec<f64>,
    pub mm_gh: Vec<f64>,
    pub mm_cu: Vec<f64>,
    pub micro_gal: Vec<f64>,
    pub pa: Vec<f64>,
    pub cm_vcu: Vec<f64>,
}

impl UnitTable {
    /// Coefficient-to-spatial factors.
    pub fn harmonic(lmax: usize, love: &LoveNumbers) -> GravityResult<Self> {
        love.validate(lmax)?;
        let a = EARTH_RADIUS_CM;
        let degree_map = |f: &dyn Fn(f64, usize) -> f64| -> Vec<f64> {
            (0..=lmax).map(|l| f(l as f64, l)).collect()
        };

        let cmwe = degree_map(&|l, i| EARTH_DENSITY * a * (2.0 * l + 1.0) / (1.0 + love.kl[i]) / 3.0);
        let pa = cmwe.iter().map(|value| G_WMO * 10.0 * value).collect();

        Ok(Self {
            earth_radius: a,
            norm: vec![1.0; lmax + 1],
            mm_gh: vec![10.0 * a; lmax + 1],
            mm_cu: degree_map(&|_, i| 10.0 * a * love.hl[i] / (1.0 + love.kl[i])),
            micro_gal: degree_map(&|l, _| 1.0e6 * GM_EARTH * (l + 1.0) / (a * a)),
            cm_vcu: degree_map(&|l, _| a * (2.0 * l + 1.0) / 2.0),
            cmwe,
            pa,
        })
    }

    /// Spatial-to-coefficient factors: `1 / (4 pi f)` of each harmonic factor
    /// (zero where the harmonic factor vanishes); `norm` stays one.
    pub fn spatial(lmax: usize, love: &LoveNumbers) -> GravityResult<Self> {
        let harmonic = Self::harmonic(lmax, love)?;
        let invert = |values: &[f64]| -> Vec<f64> {
            values
                .iter()
                .map(|value| {
                    if *value == 0.0 {
                        0.0
                    } else {
                        1.0 / (4.0 * PI * value)
                    }
                })
                .collect()
        };

        Ok(Self {
            earth_radius: harmonic.earth_radius,
            norm: harmonic.norm.clone(),
            cmwe: invert(&harmonic.cmwe),
            mm_gh: invert(&harmonic.mm_gh),
            mm_cu: invert(&harmonic.mm_cu),
            micro_gal: invert(&harmonic.micro_gal),
            pa: invert(&harmonic.pa),
            cm_vcu: invert(&harmonic.cm_vcu),
        })
    }

    /// Table of ones for every unit; useful when the caller works in
    /// normalized coefficients.
    pub fn uniform(lmax: usize) -> Self {
        let ones = vec![1.0; lmax + 1];
        Self {
            earth_radius: EARTH_RADIUS_CM,
            norm: ones.clone(),
            cmwe: ones.clone(),
            mm_gh: ones.clone(),
            mm_cu: ones.clone(),
            micro_gal: ones.clone(),
            pa: ones.clone(),
            cm_vcu: ones,
        }
    }

    pub fn factors(&self, unit: OutputUnit) -> &[f64] {
        match unit {
            OutputUnit::Norm => &self.norm,
            OutputUnit::Cmwe => &self.cmwe,
            OutputUnit::MmGeoidHeight => &self.mm_gh,
            OutputUnit::MmElasticUplift => &self.mm_cu,
            OutputUnit::MicroGal => &self.micro_gal,
            OutputUnit::Pascal => &self.pa,
            OutputUnit::CmViscoelasticUplift => &self.cm_vcu,
        }
    }

    /// Highest degree every array covers.
    pub fn lmax(&self) -> Option<usize> {
        OutputUnit::ALL
            .into_iter()
            .map(|unit| self.factors(unit).len())
            .min()
            .and_then(|len| len.checked_sub(1))
    }
}

pub trait UnitTableProvider {
    fn harmonic_table(&self, lmax: usize) -> GravityResult<UnitTable>;
    fn spatial_table(&self, lmax: usize) -> GravityResult<UnitTable>;
}

impl UnitTableProvider for LoveNumbers {
    fn harmonic_table(&self, lmax: usize) -> GravityResult<UnitTable> {
        UnitTable::harmonic(lmax, self)
    }

    fn spatial_table(&self, lmax: usize) -> GravityResult<UnitTable> {
        UnitTable::spatial(lmax, self)
    }
}
