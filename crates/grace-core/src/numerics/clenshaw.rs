//! Clenshaw summation of truncated spherical-harmonic series at scattered
//! points (Holmes and Featherstone, 2002; Tscherning and Poder, 1982).
//!
//! For each order `m` the degree sum is carried out relative to the sectorial
//! function `P[m][m]`, which is then restored order by order in the outer
//! recursion. Coefficients enter the degree recursion multiplied by
//! [`CLENSHAW_SCALE`]; the scale rides through the whole summation and is
//! divided out once, after the order recursion has brought every term back
//! to its physical magnitude.

use super::legendre::{colombo_alpha, colombo_beta, validate_cos_colatitude};
use crate::common::constants::{CLENSHAW_SCALE, MARGINAL_PRECISION_DEGREE, PI2};
use crate::common::gauss::{GaussianWeightsProvider, JekeliGaussian};
use crate::common::units::UnitTable;
use crate::domain::{
    GravityError, GravityResult, NumericDomainWarning, OutputUnit, SphericalHarmonicSet,
    geodetic_points, validate_degree,
};
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy)]
pub struct ClenshawOrderInput<'a> {
    /// `cos(colatitude)` of each point.
    pub cos_colatitude: &'a [f64],
    /// Per-degree factor `c[l]`, at least `lmax + 1` long.
    pub degree_scale: &'a [f64],
    pub order: i32,
    pub lmax: i32,
    pub coefficients: &'a SphericalHarmonicSet,
}

impl<'a> ClenshawOrderInput<'a> {
    pub fn new(
        cos_colatitude: &'a [f64],
        degree_scale: &'a [f64],
        order: i32,
        lmax: i32,
        coefficients: &'a SphericalHarmonicSet,
    ) -> Self {
        Self {
            cos_colatitude,
            degree_scale,
            order,
            lmax,
            coefficients,
        }
    }
}

/// Degree-summed cosine/sine series of one order, one entry per point,
/// still multiplied by `scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionedPartialSum {
    order: usize,
    scale: f64,
    cosine: Vec<f64>,
    sine: Vec<f64>,
}

impl ConditionedPartialSum {
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn point_count(&self) -> usize {
        self.cosine.len()
    }

    pub fn conditioned_cosine(&self) -> &[f64] {
        &self.cosine
    }

    pub fn conditioned_sine(&self) -> &[f64] {
        &self.sine
    }

    /// `sum_l c[l] clm[l][m] P[l][m](x) / P[m][m](x)` with the scale divided out.
    pub fn cosine(&self) -> Vec<f64> {
        self.cosine.iter().map(|value| value / self.scale).collect()
    }

    /// Sine analogue of [`Self::cosine`]; identically zero for `m == 0`.
    pub fn sine(&self) -> Vec<f64> {
        self.sine.iter().map(|value| value / self.scale).collect()
    }
}

/// Backward three-term recursion over degrees `lmax..=m` for a fixed order.
pub fn clenshaw_order_sum(input: ClenshawOrderInput<'_>) -> GravityResult<ConditionedPartialSum> {
    let lmax = validate_degree("lmax", input.lmax)?;
    let order = validate_degree("m", input.order)?;
    if order > lmax {
        return Err(GravityError::invalid_argument(
            "m",
            format!("order {order} exceeds lmax={lmax}"),
        ));
    }
    validate_series_shape(input.coefficients, input.degree_scale, lmax)?;
    let t = validate_cos_colatitude(input.cos_colatitude)?;

    Ok(conditioned_order_sum(
        &t,
        input.degree_scale,
        order,
        lmax,
        input.coefficients,
    ))
}

fn conditioned_order_sum(
    t: &[f64],
    c: &[f64],
    m: usize,
    lmax: usize,
    coefficients: &SphericalHarmonicSet,
) -> ConditionedPartialSum {
    let scaled = |l: usize| {
        let cosine = CLENSHAW_SCALE * coefficients.clm(l, m) * c[l];
        let sine = if m == 0 {
            0.0
        } else {
            CLENSHAW_SCALE * coefficients.slm(l, m) * c[l]
        };
        (cosine, sine)
    };

    let mut cosine = Vec::with_capacity(t.len());
    let mut sine = Vec::with_capacity(t.len());

    if m == lmax {
        let (c_top, s_top) = scaled(lmax);
        cosine.resize(t.len(), c_top);
        sine.resize(t.len(), s_top);
    } else if m + 1 == lmax {
        let (c_top, s_top) = scaled(lmax);
        let (c_next, s_next) = scaled(lmax - 1);
        let alpha = colombo_alpha(lmax, m);
        for &x in t {
            let a_lm = alpha * x;
            cosine.push(a_lm * c_top + c_next);
            sine.push(a_lm * s_top + s_next);
        }
    } else {
        // Rolling state: `pre_1` is the sum at degree l+1, `pre_2` at l+2.
        let alpha: Vec<f64> = (0..=lmax)
            .map(|l| if l > m { colombo_alpha(l, m) } else { 0.0 })
            .collect();
        let beta: Vec<f64> = (0..=lmax)
            .map(|l| if l > m + 1 { colombo_beta(l, m) } else { 0.0 })
            .collect();
        let terms: Vec<(f64, f64)> = (0..=lmax).map(scaled).collect();

        for &x in t {
            let (mut c_pre_2, mut s_pre_2) = terms[lmax];
            let a_top = alpha[lmax] * x;
            let mut c_pre_1 = a_top * c_pre_2 + terms[lmax - 1].0;
            let mut s_pre_1 = a_top * s_pre_2 + terms[lmax - 1].1;

            for l in (m..=lmax - 2).rev() {
                let a_lm = alpha[l + 1] * x;
                let b_lm = beta[l + 2];
                let c_cur = a_lm * c_pre_1 - b_lm * c_pre_2 + terms[l].0;
                let s_cur = a_lm * s_pre_1 - b_lm * s_pre_2 + terms[l].1;
                c_pre_2 = c_pre_1;
                s_pre_2 = s_pre_1;
                c_pre_1 = c_cur;
                s_pre_1 = s_cur;
            }

            cosine.push(c_pre_1);
            sine.push(s_pre_1);
        }
    }

    ConditionedPartialSum {
        order: m,
        scale: CLENSHAW_SCALE,
        cosine,
        sine,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClenshawSummationInput<'a> {
    pub coefficients: &'a SphericalHarmonicSet,
    /// Longitudes in degrees.
    pub lon: &'a [f64],
    /// Latitudes in degrees.
    pub lat: &'a [f64],
    /// Gaussian smoothing radius in km; `0` disables smoothing.
    pub radius: f64,
    pub unit: OutputUnit,
    pub lmax: i32,
    /// Coefficient-to-spatial unit factors.
    pub unit_table: &'a UnitTable,
}

impl<'a> ClenshawSummationInput<'a> {
    pub fn new(
        coefficients: &'a SphericalHarmonicSet,
        lon: &'a [f64],
        lat: &'a [f64],
        lmax: i32,
        unit_table: &'a UnitTable,
    ) -> Self {
        Self {
            coefficients,
            lon,
            lat,
            radius: 0.0,
            unit: OutputUnit::Norm,
            lmax,
            unit_table,
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_unit(mut self, unit: OutputUnit) -> Self {
        self.unit = unit;
        self
    }
}

/// Spatial values, one per input point, with the non-fatal conditions met.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialField {
    pub values: Vec<f64>,
    pub warnings: Vec<NumericDomainWarning>,
}

pub trait ClenshawSummationApi {
    fn clenshaw_summation(&self, input: ClenshawSummationInput<'_>) -> GravityResult<SpatialField>;
}

/// Summation engine carrying its smoothing kernel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClenshawSummation<G = JekeliGaussian> {
    smoothing: G,
}

impl ClenshawSummation {
    pub fn new() -> Self {
        Self {
            smoothing: JekeliGaussian,
        }
    }
}

impl<G: GaussianWeightsProvider> ClenshawSummation<G> {
    pub fn with_smoothing(smoothing: G) -> Self {
        Self { smoothing }
    }
}

impl<G: GaussianWeightsProvider> ClenshawSummationApi for ClenshawSummation<G> {
    fn clenshaw_summation(&self, input: ClenshawSummationInput<'_>) -> GravityResult<SpatialField> {
        clenshaw_summation_with_weights(input, &self.smoothing)
    }
}

pub fn clenshaw_summation(input: ClenshawSummationInput<'_>) -> GravityResult<SpatialField> {
    clenshaw_summation_with_weights(input, &JekeliGaussian)
}

/// Clenshaw summation with a caller-chosen smoothing kernel.
///
/// The kernel is consulted only for a non-zero radius; a zero radius always
/// means unit weights.
pub fn clenshaw_summation_with_weights<G>(
    input: ClenshawSummationInput<'_>,
    smoothing: &G,
) -> GravityResult<SpatialField>
where
    G: GaussianWeightsProvider + ?Sized,
{
    let lmax = validate_degree("lmax", input.lmax)?;
    let points = geodetic_points(input.lon, input.lat)?;
    if !input.radius.is_finite() || input.radius < 0.0 {
        return Err(GravityError::invalid_argument(
            "radius",
            format!("smoothing radius must be finite and >= 0, got {}", input.radius),
        ));
    }
    let factors = input.unit_table.factors(input.unit);
    validate_series_shape(input.coefficients, factors, lmax)?;

    let weights = if input.radius == 0.0 {
        vec![1.0; lmax + 1]
    } else {
        let weights = smoothing.weights(input.radius, lmax)?;
        if weights.len() < lmax + 1 {
            return Err(GravityError::dimension_mismatch(
                "gauss_weights",
                lmax + 1,
                weights.len(),
            ));
        }
        weights.iter().map(|weight| PI2 * weight).collect()
    };
    let degree_scale: Vec<f64> = (0..=lmax).map(|l| factors[l] * weights[l]).collect();

    debug!(
        lmax,
        points = points.len(),
        unit = %input.unit,
        radius = input.radius,
        "clenshaw summation"
    );

    let mut warnings = Vec::new();
    if lmax > MARGINAL_PRECISION_DEGREE {
        let warning = NumericDomainWarning::MarginalPrecision {
            lmax,
            threshold: MARGINAL_PRECISION_DEGREE,
        };
        warn!("{warning}");
        warnings.push(warning);
    }

    let colatitude: Vec<f64> = points.iter().map(|point| point.colatitude()).collect();
    let t: Vec<f64> = colatitude.iter().map(|theta| theta.cos()).collect();
    let u: Vec<f64> = colatitude.iter().map(|theta| theta.sin()).collect();
    let phi: Vec<f64> = points.iter().map(|point| point.azimuth()).collect();

    // Orders are independent given `degree_scale`; stored ascending by m.
    let mut order_sums = Vec::with_capacity(lmax + 1);
    for m in (0..=lmax).rev() {
        trace!(order = m, "conditioned order sum");
        order_sums.push(conditioned_order_sum(
            &t,
            &degree_scale,
            m,
            lmax,
            input.coefficients,
        ));
    }
    order_sums.reverse();

    let values = (0..points.len())
        .map(|point| combine_orders(&order_sums, lmax, u[point], phi[point], point))
        .collect();

    Ok(SpatialField { values, warnings })
}

/// Outer recursion over orders for one point: folds each order's degree sum
/// back onto its sectorial factor `P[m][m] = sqrt(3) u prod sqrt((2k+1)/2k) u`.
fn combine_orders(
    order_sums: &[ConditionedPartialSum],
    lmax: usize,
    u: f64,
    phi: f64,
    point: usize,
) -> f64 {
    let zonal = order_sums[0].cosine[point];
    if lmax == 0 {
        return zonal / CLENSHAW_SCALE;
    }

    let two_cos_phi = 2.0 * phi.cos();
    let top = lmax as f64;
    let mut cos_next = ((top + 1.0) * phi).cos();
    let mut sin_next = ((top + 1.0) * phi).sin();
    let mut cos_cur = (top * phi).cos();
    let mut sin_cur = (top * phi).sin();

    let top_sum = &order_sums[lmax];
    let mut s_m = top_sum.cosine[point] * cos_cur + top_sum.sine[point] * sin_cur;

    for m in (1..lmax).rev() {
        let cos_m = two_cos_phi * cos_cur - cos_next;
        let sin_m = two_cos_phi * sin_cur - sin_next;
        cos_next = cos_cur;
        sin_next = sin_cur;
        cos_cur = cos_m;
        sin_cur = sin_m;

        let order = m as f64;
        let a_m = ((2.0 * order + 3.0) / (2.0 * order + 2.0)).sqrt();
        let sums = &order_sums[m];
        s_m = a_m * u * s_m + sums.cosine[point] * cos_m + sums.sine[point] * sin_m;
    }

    (3.0_f64.sqrt() * u * s_m + zonal) / CLENSHAW_SCALE
}

fn validate_series_shape(
    coefficients: &SphericalHarmonicSet,
    degree_factors: &[f64],
    lmax: usize,
) -> GravityResult<()> {
    if coefficients.lmax() < lmax {
        return Err(GravityError::dimension_mismatch(
            "coefficients",
            lmax + 1,
            coefficients.lmax() + 1,
        ));
    }
    if degree_factors.len() < lmax + 1 {
        return Err(GravityError::dimension_mismatch(
            "degree_factors",
            lmax + 1,
            degree_factors.len(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        ClenshawOrderInput, ClenshawSummation, ClenshawSummationApi, ClenshawSummationInput,
        clenshaw_order_sum, clenshaw_summation,
    };
    use crate::common::constants::PI2;
    use crate::common::gauss::{GaussianWeightsProvider, JekeliGaussian};
    use crate::common::units::UnitTable;
    use crate::domain::{GravityError, GravityResult, OutputUnit, SphericalHarmonicSet};
    use crate::numerics::legendre::plm_colombo;

    #[test]
    fn order_sum_reproduces_single_coefficient_ratio() {
        let lmax = 6;
        let x = [0.83, -0.2, 0.0, 0.51];
        let c: Vec<f64> = (0..=lmax).map(|l| 1.0 + 0.25 * l as f64).collect();
        let table = plm_colombo(lmax as i32, &x).expect("table should build");

        for m in 0..=lmax {
            for l in m..=lmax {
                let mut coefficients =
                    SphericalHarmonicSet::zeros(lmax, lmax).expect("shape should be valid");
                coefficients.set(l, m, 1.0, if m == 0 { 0.0 } else { -2.0 });

                let sum = clenshaw_order_sum(ClenshawOrderInput::new(
                    &x,
                    &c,
                    m as i32,
                    lmax as i32,
                    &coefficients,
                ))
                .expect("order sum should succeed");

                let cosine = sum.cosine();
                let sine = sum.sine();
                for point in 0..x.len() {
                    let sectorial = table.plm(m, m, point);
                    let expected = c[l] * table.plm(l, m, point);
                    assert_scalar_close(
                        &format!("cos l={l} m={m} point={point}"),
                        expected,
                        cosine[point] * sectorial,
                        1.0e-12,
                        1.0e-11,
                    );
                    let expected_sine = if m == 0 { 0.0 } else { -2.0 * expected };
                    assert_scalar_close(
                        &format!("sin l={l} m={m} point={point}"),
                        expected_sine,
                        sine[point] * sectorial,
                        1.0e-12,
                        1.0e-11,
                    );
                }
            }
        }
    }

    #[test]
    fn order_sum_rejects_orders_outside_the_triangle() {
        let coefficients = SphericalHarmonicSet::zeros(3, 3).expect("shape should be valid");
        let c = [1.0; 4];
        for (order, lmax) in [(4, 3), (-1, 3)] {
            let error = clenshaw_order_sum(ClenshawOrderInput::new(
                &[0.1],
                &c,
                order,
                lmax,
                &coefficients,
            ))
            .expect_err("order should be rejected");
            assert!(matches!(error, GravityError::InvalidArgument { field: "m", .. }));
        }
    }

    #[test]
    fn order_sum_keeps_the_scale_until_asked() {
        let mut coefficients = SphericalHarmonicSet::zeros(2, 2).expect("shape should be valid");
        coefficients.set(2, 2, 0.75, 0.5);
        let sum = clenshaw_order_sum(ClenshawOrderInput::new(
            &[0.3, 0.9],
            &[1.0, 1.0, 2.0],
            2,
            2,
            &coefficients,
        ))
        .expect("order sum should succeed");

        assert_eq!(sum.order(), 2);
        assert_eq!(sum.point_count(), 2);
        assert_eq!(sum.scale(), 1.0e-280);
        assert!((sum.conditioned_cosine()[0] - 1.5e-280).abs() <= 1.0e-294);
        for (cosine, sine) in sum.cosine().into_iter().zip(sum.sine()) {
            assert_scalar_close("cosine", 1.5, cosine, 1.0e-14, 1.0e-14);
            assert_scalar_close("sine", 1.0, sine, 1.0e-14, 1.0e-14);
        }
    }

    #[test]
    fn summation_matches_direct_series_evaluation() {
        let lmax = 8;
        let mut coefficients = SphericalHarmonicSet::zeros(lmax, lmax).expect("valid shape");
        for l in 0..=lmax {
            for m in 0..=l {
                let seed = (l * 7 + m * 3) as f64;
                coefficients.set(l, m, (0.37 * seed).sin() / (l + 1) as f64, (0.11 * seed).cos());
            }
        }
        let table = UnitTable::uniform(lmax);
        let lon = [0.0, 35.0, -120.0, 210.0, 12.5];
        let lat = [0.0, 45.0, -60.0, 10.0, 89.0];

        let field = clenshaw_summation(ClenshawSummationInput::new(
            &coefficients,
            &lon,
            &lat,
            lmax as i32,
            &table,
        ))
        .expect("summation should succeed");

        for (point, value) in field.values.iter().enumerate() {
            let expected = direct_series(&coefficients, lmax, lon[point], lat[point]);
            assert_scalar_close(&format!("point {point}"), expected, *value, 1.0e-11, 1.0e-11);
        }
        assert!(field.warnings.is_empty());
    }

    #[test]
    fn small_coefficients_stay_linear_down_to_the_physical_floor() {
        let lmax = 8;
        let floor = 1.0e-20;
        let mut coefficients = SphericalHarmonicSet::zeros(lmax, lmax).expect("valid shape");
        let mut scaled = SphericalHarmonicSet::zeros(lmax, lmax).expect("valid shape");
        for l in 0..=lmax {
            for m in 0..=l {
                let seed = (l * 5 + m * 11) as f64;
                let (clm, slm) = (1.0 + 0.5 * (0.3 * seed).sin(), 1.0 + 0.5 * (0.7 * seed).cos());
                coefficients.set(l, m, clm, slm);
                scaled.set(l, m, floor * clm, floor * slm);
            }
        }
        let table = UnitTable::uniform(lmax);
        let lon = [0.0, 35.0, -120.0];
        let lat = [0.0, 45.0, -60.0];

        let reference = clenshaw_summation(ClenshawSummationInput::new(
            &coefficients,
            &lon,
            &lat,
            lmax as i32,
            &table,
        ))
        .expect("summation should succeed");
        let small = clenshaw_summation(ClenshawSummationInput::new(
            &scaled,
            &lon,
            &lat,
            lmax as i32,
            &table,
        ))
        .expect("summation should succeed");

        // Terms stay above the subnormal range only while coefficient times
        // CLENSHAW_SCALE is a normal f64; 1e-20 leaves about eight decades.
        for (expected, actual) in reference.values.iter().zip(&small.values) {
            assert_scalar_close("rescaled", *expected, actual / floor, 1.0e-12, 1.0e-12);
        }
    }

    #[test]
    fn degree_zero_truncation_gives_a_constant_field() {
        let mut coefficients = SphericalHarmonicSet::zeros(4, 4).expect("valid shape");
        coefficients.set(0, 0, 2.5, 0.0);
        coefficients.set(3, 1, 10.0, 10.0);
        let table = UnitTable::uniform(4);

        let field = clenshaw_summation(ClenshawSummationInput::new(
            &coefficients,
            &[0.0, 100.0, -45.0],
            &[0.0, 30.0, -89.0],
            0,
            &table,
        ))
        .expect("summation should succeed");

        for value in field.values {
            assert_scalar_close("constant", 2.5, value, 1.0e-14, 1.0e-14);
        }
    }

    #[test]
    fn summation_validates_before_computing() {
        let coefficients = SphericalHarmonicSet::zeros(2, 2).expect("valid shape");
        let table = UnitTable::uniform(2);

        let mismatch = clenshaw_summation(ClenshawSummationInput::new(
            &coefficients,
            &[0.0, 1.0],
            &[0.0],
            2,
            &table,
        ))
        .expect_err("lengths differ");
        assert!(matches!(mismatch, GravityError::DimensionMismatch { .. }));

        let negative = clenshaw_summation(ClenshawSummationInput::new(
            &coefficients,
            &[0.0],
            &[0.0],
            -1,
            &table,
        ))
        .expect_err("negative lmax");
        assert!(matches!(negative, GravityError::InvalidArgument { field: "lmax", .. }));

        let short_table = clenshaw_summation(ClenshawSummationInput::new(
            &coefficients,
            &[0.0],
            &[0.0],
            2,
            &UnitTable::uniform(1),
        ))
        .expect_err("unit table too short");
        assert!(matches!(
            short_table,
            GravityError::DimensionMismatch {
                field: "degree_factors",
                ..
            }
        ));

        let truncated = clenshaw_summation(ClenshawSummationInput::new(
            &coefficients,
            &[0.0],
            &[0.0],
            3,
            &UnitTable::uniform(3),
        ))
        .expect_err("coefficients too short");
        assert!(matches!(
            truncated,
            GravityError::DimensionMismatch {
                field: "coefficients",
                ..
            }
        ));

        let bad_radius = clenshaw_summation(
            ClenshawSummationInput::new(&coefficients, &[0.0], &[0.0], 2, &table)
                .with_radius(-5.0)
                .with_unit(OutputUnit::Cmwe),
        )
        .expect_err("negative radius");
        assert!(matches!(bad_radius, GravityError::InvalidArgument { field: "radius", .. }));
    }

    struct FlatKernel {
        degrees: usize,
    }

    impl GaussianWeightsProvider for FlatKernel {
        fn weights(&self, _radius: f64, _lmax: usize) -> GravityResult<Vec<f64>> {
            Ok(vec![1.0 / PI2; self.degrees])
        }
    }

    #[test]
    fn smoothing_kernel_scales_each_degree() {
        let lmax = 5;
        let mut coefficients = SphericalHarmonicSet::zeros(lmax, lmax).expect("valid shape");
        coefficients.set(0, 0, 1.0, 0.0);
        coefficients.set(3, 2, 0.4, -0.7);
        let table = UnitTable::uniform(lmax);
        let lon = [10.0, 200.0];
        let lat = [-33.0, 51.0];
        let input = ClenshawSummationInput::new(&coefficients, &lon, &lat, lmax as i32, &table);

        let plain = clenshaw_summation(input).expect("unsmoothed");
        let flat = ClenshawSummation::with_smoothing(FlatKernel { degrees: lmax + 1 })
            .clenshaw_summation(input.with_radius(250.0))
            .expect("flat kernel");
        for (expected, actual) in plain.values.iter().zip(&flat.values) {
            assert_scalar_close("flat kernel", *expected, *actual, 1.0e-13, 1.0e-13);
        }

        // Smoothing damps the degree-3 term but leaves the mean untouched.
        let smoothed = ClenshawSummation::<JekeliGaussian>::default()
            .clenshaw_summation(input.with_radius(1_000.0))
            .expect("gaussian kernel");
        for (raw, damped) in plain.values.iter().zip(&smoothed.values) {
            assert!((damped - 1.0).abs() < (raw - 1.0).abs());
        }

        let short = ClenshawSummation::with_smoothing(FlatKernel { degrees: 2 })
            .clenshaw_summation(input.with_radius(250.0))
            .expect_err("kernel too short");
        assert!(matches!(
            short,
            GravityError::DimensionMismatch {
                field: "gauss_weights",
                ..
            }
        ));
    }

    fn direct_series(coefficients: &SphericalHarmonicSet, lmax: usize, lon: f64, lat: f64) -> f64 {
        let theta = (90.0 - lat).to_radians();
        let phi = lon.to_radians();
        let table = plm_colombo(lmax as i32, &[theta.cos()]).expect("table should build");
        let mut total = 0.0;
        for l in 0..=lmax {
            for m in 0..=l {
                let mphi = m as f64 * phi;
                total += table.plm(l, m, 0)
                    * (coefficients.clm(l, m) * mphi.cos() + coefficients.slm(l, m) * mphi.sin());
            }
        }
        total
    }

    fn assert_scalar_close(label: &str, expected: f64, actual: f64, abs_tol: f64, rel_tol: f64) {
        let abs_diff = (actual - expected).abs();
        let rel_diff = abs_diff / expected.abs().max(1.0);
        assert!(
            abs_diff <= abs_tol || rel_diff <= rel_tol,
            "{label} expected={expected:.15e} actual={actual:.15e} abs_diff={abs_diff:.15e} rel_diff={rel_diff:.15e}"
        );
    }
}
