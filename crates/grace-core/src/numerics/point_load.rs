//! Spherical-harmonic coefficients of a set of point masses.

use super::CompensatedSum;
use super::legendre::plm_colombo;
use crate::common::units::UnitTable;
use crate::domain::{
    GravityError, GravityResult, MassUnit, SphericalHarmonicSet, geodetic_points, validate_degree,
};
use num_complex::Complex64;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct PointLoadInput<'a> {
    /// Mass magnitude at each point, in `unit`.
    pub data: &'a [f64],
    /// Longitudes in degrees.
    pub lon: &'a [f64],
    /// Latitudes in degrees.
    pub lat: &'a [f64],
    pub lmax: i32,
    /// Highest order; `None` means `lmax`.
    pub mmax: Option<i32>,
    pub unit: MassUnit,
    /// Spatial-to-coefficient unit factors.
    pub unit_table: &'a UnitTable,
}

impl<'a> PointLoadInput<'a> {
    pub fn new(
        data: &'a [f64],
        lon: &'a [f64],
        lat: &'a [f64],
        lmax: i32,
        unit_table: &'a UnitTable,
    ) -> Self {
        Self {
            data,
            lon,
            lat,
            lmax,
            mmax: None,
            unit: MassUnit::Grams,
            unit_table,
        }
    }

    pub fn with_mmax(mut self, mmax: i32) -> Self {
        self.mmax = Some(mmax);
        self
    }

    pub fn with_unit(mut self, unit: MassUnit) -> Self {
        self.unit = unit;
        self
    }
}

pub trait PointLoadSynthesisApi {
    fn gen_point_load(&self, input: PointLoadInput<'_>) -> GravityResult<SphericalHarmonicSet>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointLoadSynthesis;

impl PointLoadSynthesisApi for PointLoadSynthesis {
    fn gen_point_load(&self, input: PointLoadInput<'_>) -> GravityResult<SphericalHarmonicSet> {
        gen_point_load(input)
    }
}

/// `clm + i slm = sum_i D_i f_l P[l][m](cos theta_i) exp(i m phi_i)`, where
/// `D_i` is the mass in grams and `f_l = cmwe[l] / a^2` of the spatial table.
pub fn gen_point_load(input: PointLoadInput<'_>) -> GravityResult<SphericalHarmonicSet> {
    let lmax = validate_degree("lmax", input.lmax)?;
    let mmax = match input.mmax {
        None => lmax,
        Some(value) => {
            let mmax = validate_degree("mmax", value)?;
            if mmax > lmax {
                return Err(GravityError::invalid_argument(
                    "mmax",
                    format!("mmax={mmax} exceeds lmax={lmax}"),
                ));
            }
            mmax
        }
    };

    let points = geodetic_points(input.lon, input.lat)?;
    if input.data.len() != points.len() {
        return Err(GravityError::dimension_mismatch(
            "data",
            points.len(),
            input.data.len(),
        ));
    }
    if let Some(index) = input.data.iter().position(|value| !value.is_finite()) {
        return Err(GravityError::invalid_argument(
            "data",
            format!("data[{index}]={} is not finite", input.data[index]),
        ));
    }
    if input.unit_table.cmwe.len() < lmax + 1 {
        return Err(GravityError::dimension_mismatch(
            "unit_table",
            lmax + 1,
            input.unit_table.cmwe.len(),
        ));
    }

    debug!(
        lmax,
        mmax,
        points = points.len(),
        unit = %input.unit,
        "point load synthesis"
    );

    let radius_sq = input.unit_table.earth_radius * input.unit_table.earth_radius;
    let masses: Vec<f64> = input
        .data
        .iter()
        .map(|value| value * input.unit.grams_factor())
        .collect();
    let x: Vec<f64> = points.iter().map(|point| point.colatitude().cos()).collect();
    let phases: Vec<Vec<Complex64>> = points
        .iter()
        .map(|point| {
            let phi = point.azimuth();
            (0..=mmax)
                .map(|m| Complex64::from_polar(1.0, m as f64 * phi))
                .collect()
        })
        .collect();
    let table = plm_colombo(input.lmax, &x)?;

    let mut coefficients = SphericalHarmonicSet::zeros(lmax, mmax)?;
    for l in 0..=lmax {
        let degree_factor = input.unit_table.cmwe[l] / radius_sq;
        for m in 0..=l.min(mmax) {
            let mut real = CompensatedSum::default();
            let mut imag = CompensatedSum::default();
            for (point, mass) in masses.iter().enumerate() {
                let term = phases[point][m] * (mass * table.plm(l, m, point));
                real.add(term.re);
                imag.add(term.im);
            }
            coefficients.set(
                l,
                m,
                degree_factor * real.value(),
                degree_factor * imag.value(),
            );
        }
    }

    Ok(coefficients)
}

#[cfg(test)]
mod tests {
    use super::{PointLoadInput, PointLoadSynthesis, PointLoadSynthesisApi, gen_point_load};
    use crate::common::units::{LoveNumbers, UnitTable};
    use crate::domain::{GravityError, MassUnit};

    fn spatial_table(lmax: usize) -> UnitTable {
        UnitTable::spatial(lmax, &LoveNumbers::rigid(lmax)).expect("table should build")
    }

    fn degree_factor(table: &UnitTable, l: usize) -> f64 {
        table.cmwe[l] / (table.earth_radius * table.earth_radius)
    }

    #[test]
    fn equatorial_mass_produces_closed_form_low_degrees() {
        let table = spatial_table(2);
        let coefficients = gen_point_load(PointLoadInput::new(&[2.0], &[90.0], &[0.0], 2, &table))
            .expect("synthesis should succeed");

        let sqrt3 = 3.0_f64.sqrt();
        assert_scalar_close("C00", 2.0 * degree_factor(&table, 0), coefficients.clm(0, 0));
        assert_scalar_close("C10", 0.0, coefficients.clm(1, 0));
        assert_scalar_close("C11", 0.0, coefficients.clm(1, 1));
        assert_scalar_close("S11", 2.0 * sqrt3 * degree_factor(&table, 1), coefficients.slm(1, 1));
        // cos(2 * 90 deg) = -1 on P22 = sqrt(15)/2 at the equator.
        assert_scalar_close(
            "C22",
            -2.0 * 15.0_f64.sqrt() / 2.0 * degree_factor(&table, 2),
            coefficients.clm(2, 2),
        );
        assert_eq!(coefficients.slm(2, 0), 0.0);
    }

    #[test]
    fn order_truncation_keeps_only_zonal_terms() {
        let table = spatial_table(6);
        let data = [1.0, 3.0, -0.5];
        let lon = [20.0, -75.0, 140.0];
        let lat = [10.0, 45.0, -60.0];
        let zonal = gen_point_load(PointLoadInput::new(&data, &lon, &lat, 6, &table).with_mmax(0))
            .expect("synthesis should succeed");
        let full = gen_point_load(PointLoadInput::new(&data, &lon, &lat, 6, &table))
            .expect("synthesis should succeed");

        assert_eq!(zonal.mmax(), 0);
        assert_eq!(full.mmax(), 6);
        for l in 0..=6 {
            assert_eq!(zonal.clm(l, 0), full.clm(l, 0));
            assert_eq!(zonal.slm(l, 0), 0.0);
            assert_eq!(zonal.clm(l, 1), 0.0);
        }
        assert!(full.clm(3, 2).abs() > 0.0);
    }

    #[test]
    fn gigatonnes_scale_grams_by_1e15() {
        let table = spatial_table(4);
        let input = PointLoadInput::new(&[1.25], &[33.0], &[-12.0], 4, &table);
        let grams = PointLoadSynthesis.gen_point_load(input).expect("grams");
        let gigatonnes = PointLoadSynthesis
            .gen_point_load(input.with_unit(MassUnit::Gigatonnes))
            .expect("gigatonnes");

        for l in 0..=4 {
            for m in 0..=l {
                let expected = grams.clm(l, m) * 1.0e15;
                let actual = gigatonnes.clm(l, m);
                assert!(
                    (actual - expected).abs() <= 1.0e-12 * expected.abs().max(f64::MIN_POSITIVE),
                    "C{l}{m}: {expected} vs {actual}"
                );
            }
        }
    }

    #[test]
    fn empty_point_set_yields_zero_coefficients() {
        let table = spatial_table(3);
        let coefficients = gen_point_load(PointLoadInput::new(&[], &[], &[], 3, &table))
            .expect("empty input is valid");
        assert_eq!(coefficients.lmax(), 3);
        assert!(coefficients.clm_rows().iter().flatten().all(|value| *value == 0.0));
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let table = spatial_table(4);
        let mismatch = gen_point_load(PointLoadInput::new(&[1.0], &[0.0, 1.0], &[0.0], 4, &table))
            .expect_err("lon/lat mismatch");
        assert!(matches!(mismatch, GravityError::DimensionMismatch { field: "lat", .. }));

        let data_mismatch = gen_point_load(PointLoadInput::new(&[1.0], &[0.0, 1.0], &[0.0, 1.0], 4, &table))
            .expect_err("data length mismatch");
        assert!(matches!(data_mismatch, GravityError::DimensionMismatch { field: "data", .. }));

        let wide = gen_point_load(PointLoadInput::new(&[1.0], &[0.0], &[0.0], 4, &table).with_mmax(5))
            .expect_err("mmax above lmax");
        assert!(matches!(wide, GravityError::InvalidArgument { field: "mmax", .. }));

        let negative = gen_point_load(PointLoadInput::new(&[1.0], &[0.0], &[0.0], -1, &table))
            .expect_err("negative lmax");
        assert!(matches!(negative, GravityError::InvalidArgument { field: "lmax", .. }));

        let short = gen_point_load(PointLoadInput::new(&[1.0], &[0.0], &[0.0], 5, &table))
            .expect_err("table too short");
        assert!(matches!(short, GravityError::DimensionMismatch { field: "unit_table", .. }));
    }

    fn assert_scalar_close(label: &str, expected: f64, actual: f64) {
        let abs_diff = (actual - expected).abs();
        let scale = expected.abs().max(1.0e-300);
        assert!(
            abs_diff <= 1.0e-12 * scale || abs_diff <= 1.0e-35,
            "{label} expected={expected:.15e} actual={actual:.15e} abs_diff={abs_diff:.15e}"
        );
    }
}
