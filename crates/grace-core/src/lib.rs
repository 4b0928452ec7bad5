//! Spherical-harmonic kernels for GRACE-style gravity field processing:
//! normalized Legendre functions, Clenshaw synthesis at scattered points and
//! point-load coefficient generation.

pub mod common;
pub mod domain;
pub mod numerics;
