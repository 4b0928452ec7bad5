use crate::common::constants::X_DOMAIN_TOLERANCE;
use crate::domain::{GravityError, GravityResult, NumericDomainWarning, validate_degree};
use faer::Mat;
use tracing::{debug, warn};

/// Fully normalized associated Legendre functions `P[l][m](x_i)` and their
/// first derivatives, for `0 <= m <= l <= lmax`.
///
/// `x_i = cos(theta_i)`; derivatives are taken with respect to the colatitude
/// `theta`, so they carry a `1/sin(theta)` factor that diverges at the poles.
///
/// Storage is one row per packed `(l, m)` pair and one column per point.
#[derive(Debug, Clone)]
pub struct LegendreTable {
    lmax: usize,
    x: Vec<f64>,
    plm: Mat<f64>,
    dplm: Mat<f64>,
}

impl LegendreTable {
    pub fn lmax(&self) -> usize {
        self.lmax
    }

    pub fn point_count(&self) -> usize {
        self.x.len()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn plm(&self, l: usize, m: usize, point: usize) -> f64 {
        if m > l || l > self.lmax {
            return 0.0;
        }
        self.plm[(self.row(l, m), point)]
    }

    pub fn dplm(&self, l: usize, m: usize, point: usize) -> f64 {
        if m > l || l > self.lmax {
            return 0.0;
        }
        self.dplm[(self.row(l, m), point)]
    }

    /// Values of `P[l][m]` across all points.
    pub fn plm_column(&self, l: usize, m: usize) -> Vec<f64> {
        (0..self.point_count())
            .map(|point| self.plm(l, m, point))
            .collect()
    }

    /// Points where `sin(colatitude) == 0`; derivatives there are non-finite.
    pub fn domain_warnings(&self) -> Vec<NumericDomainWarning> {
        if self.lmax == 0 {
            return Vec::new();
        }

        self.x
            .iter()
            .enumerate()
            .filter(|(_, x)| sine_of(**x) == 0.0)
            .map(|(point_index, &x)| NumericDomainWarning::PoleEvaluation { point_index, x })
            .collect()
    }

    fn row(&self, l: usize, m: usize) -> usize {
        l * (self.lmax + 1) + m
    }
}

pub trait LegendreRecursionApi {
    fn plm_colombo(&self, lmax: i32, x: &[f64]) -> GravityResult<LegendreTable>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColomboRecursion;

impl LegendreRecursionApi for ColomboRecursion {
    fn plm_colombo(&self, lmax: i32, x: &[f64]) -> GravityResult<LegendreTable> {
        plm_colombo(lmax, x)
    }
}

/// Colombo (1981) standard forward-column recursion, geodesy normalization.
///
/// Sectorial terms seed each column; `P[l][m]` for `m < l` follows from the
/// two previous degrees of the same order.
pub fn plm_colombo(lmax: i32, x: &[f64]) -> GravityResult<LegendreTable> {
    let lmax = validate_degree("lmax", lmax)?;
    let x = validate_cos_colatitude(x)?;
    debug!(lmax, points = x.len(), "computing colombo legendre table");

    let rows = (lmax + 1) * (lmax + 1);
    let mut table = LegendreTable {
        lmax,
        plm: Mat::zeros(rows, x.len()),
        dplm: Mat::zeros(rows, x.len()),
        x,
    };

    for point in 0..table.point_count() {
        fill_point_column(&mut table, point);
    }

    for warning in table.domain_warnings() {
        warn!("{warning}");
    }

    Ok(table)
}

fn fill_point_column(table: &mut LegendreTable, point: usize) {
    let lmax = table.lmax;
    let x = table.x[point];
    let u = sine_of(x);
    let stride = lmax + 1;
    let idx = |l: usize, m: usize| l * stride + m;

    table.plm[(idx(0, 0), point)] = 1.0;
    if lmax == 0 {
        return;
    }

    let sqrt3 = 3.0_f64.sqrt();
    table.plm[(idx(1, 0), point)] = sqrt3 * x;
    table.plm[(idx(1, 1), point)] = sqrt3 * u;
    table.dplm[(idx(1, 0), point)] = (1.0 / u) * (x * sqrt3 * x - sqrt3);
    table.dplm[(idx(1, 1), point)] = (x / u) * sqrt3 * u;

    for l in 2..=lmax {
        let degree = l as f64;
        for m in 0..l {
            let previous = table.plm[(idx(l - 1, m), point)];
            // P[l-2][m] vanishes when l-2 < m.
            let previous2 = if l - 2 >= m {
                table.plm[(idx(l - 2, m), point)]
            } else {
                0.0
            };
            let value = colombo_alpha(l, m) * x * previous - colombo_beta(l, m) * previous2;
            table.plm[(idx(l, m), point)] = value;

            let order = m as f64;
            let f_lm = ((degree * degree - order * order) * (2.0 * degree + 1.0)
                / (2.0 * degree - 1.0))
                .sqrt();
            table.dplm[(idx(l, m), point)] = (1.0 / u) * (degree * x * value - f_lm * previous);
        }

        let sectorial = u
            * ((2.0 * degree + 1.0) / (2.0 * degree)).sqrt()
            * table.plm[(idx(l - 1, l - 1), point)];
        table.plm[(idx(l, l), point)] = sectorial;
        table.dplm[(idx(l, l), point)] = degree * (x / u) * sectorial;
    }
}

/// `a_lm` of the column recursion, defined for `l > m`.
pub(crate) fn colombo_alpha(l: usize, m: usize) -> f64 {
    let (l, m) = (l as f64, m as f64);
    (((2.0 * l - 1.0) * (2.0 * l + 1.0)) / ((l - m) * (l + m))).sqrt()
}

/// `b_lm` of the column recursion, defined for `l > m` (zero at `l == m + 1`).
pub(crate) fn colombo_beta(l: usize, m: usize) -> f64 {
    let (l, m) = (l as f64, m as f64);
    (((2.0 * l + 1.0) * (l + m - 1.0) * (l - m - 1.0)) / ((l - m) * (l + m) * (2.0 * l - 3.0)))
        .sqrt()
}

fn sine_of(x: f64) -> f64 {
    (1.0 - x * x).max(0.0).sqrt()
}

/// Rejects non-finite or out-of-domain `x`; values within the tolerance of
/// `+-1` are clamped onto the pole.
pub(crate) fn validate_cos_colatitude(x: &[f64]) -> GravityResult<Vec<f64>> {
    x.iter()
        .enumerate()
        .map(|(index, &value)| {
            if !value.is_finite() || value.abs() > 1.0 + X_DOMAIN_TOLERANCE {
                return Err(GravityError::invalid_argument(
                    "x",
                    format!("x[{index}]={value} lies outside [-1, 1]"),
                ));
            }
            Ok(value.clamp(-1.0, 1.0))
        })
        .collect()
}
