pub mod constants;
pub mod gauss;
pub mod units;
