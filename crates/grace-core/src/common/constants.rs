//! Physical and numerical constants shared by the harmonic kernels.
//!
//! Earth parameters follow the conventions used for GRACE/GRACE-FO level-2
//! products: a spherical Earth of mean radius and mean density.

pub const PI: f64 = 3.141_592_653_589_793_238_462_643_383_279_5_f64;
pub const PI2: f64 = 6.283_185_307_179_586_476_925_286_766_559_f64;
pub const DEG2RAD: f64 = PI / 180.0;

/// Mean Earth radius [cm].
pub const EARTH_RADIUS_CM: f64 = 6.371e8;
/// Mean Earth radius [km], used by the Gaussian smoothing kernel.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;
/// Mean Earth density [g/cm^3].
pub const EARTH_DENSITY: f64 = 5.517;
/// Geocentric gravitational constant [cm^3/s^2].
pub const GM_EARTH: f64 = 3.986_004_418e20;
/// WMO standard gravity [m/s^2].
pub const G_WMO: f64 = 9.806_65;
pub const GRAMS_PER_GIGATONNE: f64 = 1.0e15;

/// Pre-scale applied to coefficients before the Clenshaw order recursion.
pub const CLENSHAW_SCALE: f64 = 1.0e-280;
/// Slack allowed on `|cos(colatitude)| <= 1` before an input is rejected.
pub const X_DOMAIN_TOLERANCE: f64 = 1.0e-12;
/// Truncation degree above which the fixed Clenshaw pre-scale loses precision.
pub const MARGINAL_PRECISION_DEGREE: usize = 1_500;
/// Floor applied to Gaussian weights once the recursion decays below it.
pub const GAUSS_WEIGHT_FLOOR: f64 = 1.0e-10;
