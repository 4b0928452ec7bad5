pub mod errors;

pub use errors::{GravityError, GravityErrorCategory, GravityResult, NumericDomainWarning};

use crate::common::constants::DEG2RAD;
use faer::Mat;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Output unit selector for spatial synthesis.
///
/// Selector `0` keeps the fully normalized coefficients, `1..=6` pick a
/// physical unit from the unit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputUnit {
    #[default]
    Norm,
    Cmwe,
    MmGeoidHeight,
    MmElasticUplift,
    MicroGal,
    Pascal,
    CmViscoelasticUplift,
}

impl OutputUnit {
    pub const ALL: [OutputUnit; 7] = [
        Self::Norm,
        Self::Cmwe,
        Self::MmGeoidHeight,
        Self::MmElasticUplift,
        Self::MicroGal,
        Self::Pascal,
        Self::CmViscoelasticUplift,
    ];

    pub fn from_selector(selector: i32) -> GravityResult<Self> {
        match selector {
            0 => Ok(Self::Norm),
            1 => Ok(Self::Cmwe),
            2 => Ok(Self::MmGeoidHeight),
            3 => Ok(Self::MmElasticUplift),
            4 => Ok(Self::MicroGal),
            5 => Ok(Self::Pascal),
            6 => Ok(Self::CmViscoelasticUplift),
            other => Err(GravityError::invalid_argument(
                "units",
                format!(
                    "selector {other} is not one of 0: norm, 1: cmwe, 2: mmGH, 3: mmCU, \
                     4: microGal, 5: Pa, 6: cmVCU"
                ),
            )),
        }
    }

    pub const fn selector(self) -> i32 {
        match self {
            Self::Norm => 0,
            Self::Cmwe => 1,
            Self::MmGeoidHeight => 2,
            Self::MmElasticUplift => 3,
            Self::MicroGal => 4,
            Self::Pascal => 5,
            Self::CmViscoelasticUplift => 6,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Norm => "norm",
            Self::Cmwe => "cmwe",
            Self::MmGeoidHeight => "mmGH",
            Self::MmElasticUplift => "mmCU",
            Self::MicroGal => "microGal",
            Self::Pascal => "Pa",
            Self::CmViscoelasticUplift => "cmVCU",
        }
    }
}

impl TryFrom<i32> for OutputUnit {
    type Error = GravityError;

    fn try_from(selector: i32) -> Result<Self, Self::Error> {
        Self::from_selector(selector)
    }
}

impl FromStr for OutputUnit {
    type Err = GravityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Ok(selector) = trimmed.parse::<i32>() {
            return Self::from_selector(selector);
        }

        Self::ALL
            .into_iter()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                GravityError::invalid_argument("units", format!("unknown output unit '{trimmed}'"))
            })
    }
}

impl Display for OutputUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Unit of point-mass magnitudes fed to point-load synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MassUnit {
    #[default]
    Grams,
    Gigatonnes,
}

impl MassUnit {
    pub fn from_selector(selector: i32) -> GravityResult<Self> {
        match selector {
            1 => Ok(Self::Grams),
            2 => Ok(Self::Gigatonnes),
            other => Err(GravityError::invalid_argument(
                "units",
                format!("selector {other} is not one of 1: grams, 2: gigatonnes"),
            )),
        }
    }

    /// Multiplier converting a magnitude in this unit to grams.
    pub const fn grams_factor(self) -> f64 {
        match self {
            Self::Grams => 1.0,
            Self::Gigatonnes => crate::common::constants::GRAMS_PER_GIGATONNE,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grams => "g",
            Self::Gigatonnes => "Gt",
        }
    }
}

impl TryFrom<i32> for MassUnit {
    type Error = GravityError;

    fn try_from(selector: i32) -> Result<Self, Self::Error> {
        Self::from_selector(selector)
    }
}

impl FromStr for MassUnit {
    type Err = GravityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "g" | "grams" => Ok(Self::Grams),
            "2" | "gt" | "gigatonnes" => Ok(Self::Gigatonnes),
            other => Err(GravityError::invalid_argument(
                "units",
                format!("unknown mass unit '{other}'"),
            )),
        }
    }
}

impl Display for MassUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Geographic location in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeodeticPoint {
    pub fn new(lon: f64, lat: f64) -> GravityResult<Self> {
        if !lon.is_finite() {
            return Err(GravityError::invalid_argument(
                "lon",
                format!("longitude must be finite, got {lon}"),
            ));
        }
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GravityError::invalid_argument(
                "lat",
                format!("latitude must lie in [-90, 90], got {lat}"),
            ));
        }

        Ok(Self { lon, lat })
    }

    /// Colatitude in radians.
    pub fn colatitude(&self) -> f64 {
        (90.0 - self.lat) * DEG2RAD
    }

    /// Longitude in radians.
    pub fn azimuth(&self) -> f64 {
        self.lon * DEG2RAD
    }
}

/// Zips longitude/latitude vectors into validated points.
pub fn geodetic_points(lon: &[f64], lat: &[f64]) -> GravityResult<Vec<GeodeticPoint>> {
    if lon.len() != lat.len() {
        return Err(GravityError::dimension_mismatch("lat", lon.len(), lat.len()));
    }

    lon.iter()
        .zip(lat)
        .map(|(&lon, &lat)| GeodeticPoint::new(lon, lat))
        .collect()
}

/// Converts a signed degree/order argument into an index.
pub fn validate_degree(field: &'static str, value: i32) -> GravityResult<usize> {
    usize::try_from(value).map_err(|_| {
        GravityError::invalid_argument(field, format!("must be >= 0, got {value}"))
    })
}

/// Cosine and sine coefficients `clm[l][m]`, `slm[l][m]` for `0 <= m <= min(l, mmax)`.
///
/// Entries with `m > l` are held at zero and `slm[l][0]` is zero by convention.
#[derive(Debug, Clone)]
pub struct SphericalHarmonicSet {
    lmax: usize,
    mmax: usize,
    clm: Mat<f64>,
    slm: Mat<f64>,
}

impl SphericalHarmonicSet {
    pub fn zeros(lmax: usize, mmax: usize) -> GravityResult<Self> {
        if mmax > lmax {
            return Err(GravityError::invalid_argument(
                "mmax",
                format!("mmax={mmax} exceeds lmax={lmax}"),
            ));
        }

        Ok(Self {
            lmax,
            mmax,
            clm: Mat::zeros(lmax + 1, mmax + 1),
            slm: Mat::zeros(lmax + 1, mmax + 1),
        })
    }

    /// Builds a set from row-major `[l][m]` tables of shape `(lmax+1, mmax+1)`.
    pub fn from_rows(clm: &[Vec<f64>], slm: &[Vec<f64>]) -> GravityResult<Self> {
        if clm.is_empty() {
            return Err(GravityError::invalid_argument(
                "clm",
                "coefficient table must hold at least degree 0",
            ));
        }
        if slm.len() != clm.len() {
            return Err(GravityError::dimension_mismatch("slm", clm.len(), slm.len()));
        }

        let lmax = clm.len() - 1;
        let order_count = clm[0].len();
        if order_count == 0 {
            return Err(GravityError::invalid_argument(
                "clm",
                "coefficient rows must hold at least order 0",
            ));
        }

        let mut set = Self::zeros(lmax, (order_count - 1).min(lmax))?;
        for (l, (c_row, s_row)) in clm.iter().zip(slm).enumerate() {
            if c_row.len() != order_count {
                return Err(GravityError::dimension_mismatch("clm", order_count, c_row.len()));
            }
            if s_row.len() != order_count {
                return Err(GravityError::dimension_mismatch("slm", order_count, s_row.len()));
            }

            for m in 0..=l.min(set.mmax) {
                set.set(l, m, c_row[m], s_row[m]);
            }
        }

        Ok(set)
    }

    pub fn lmax(&self) -> usize {
        self.lmax
    }

    pub fn mmax(&self) -> usize {
        self.mmax
    }

    pub fn clm(&self, l: usize, m: usize) -> f64 {
        if l > self.lmax || m > self.mmax || m > l {
            return 0.0;
        }
        self.clm[(l, m)]
    }

    pub fn slm(&self, l: usize, m: usize) -> f64 {
        if l > self.lmax || m > self.mmax || m > l || m == 0 {
            return 0.0;
        }
        self.slm[(l, m)]
    }

    /// Stores one coefficient pair; writes outside `m <= min(l, mmax)` are ignored.
    pub fn set(&mut self, l: usize, m: usize, clm: f64, slm: f64) {
        if l > self.lmax || m > self.mmax || m > l {
            return;
        }
        self.clm[(l, m)] = clm;
        self.slm[(l, m)] = if m == 0 { 0.0 } else { slm };
    }

    pub fn clm_matrix(&self) -> &Mat<f64> {
        &self.clm
    }

    pub fn slm_matrix(&self) -> &Mat<f64> {
        &self.slm
    }

    pub fn degrees(&self) -> Vec<usize> {
        (0..=self.lmax).collect()
    }

    pub fn orders(&self) -> Vec<usize> {
        (0..=self.mmax).collect()
    }

    pub fn clm_rows(&self) -> Vec<Vec<f64>> {
        matrix_rows(&self.clm)
    }

    pub fn slm_rows(&self) -> Vec<Vec<f64>> {
        matrix_rows(&self.slm)
    }
}

impl PartialEq for SphericalHarmonicSet {
    fn eq(&self, other: &Self) -> bool {
        self.lmax == other.lmax
            && self.mmax == other.mmax
            && self.clm_rows() == other.clm_rows()
            && self.slm_rows() == other.slm_rows()
    }
}

fn matrix_rows(matrix: &Mat<f64>) -> Vec<Vec<f64>> {
    (0..matrix.nrows())
        .map(|row| (0..matrix.ncols()).map(|col| matrix[(row, col)]).collect())
        .collect()
}
