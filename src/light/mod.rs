pub mod aop;
pub mod dop;
pub mod stokes;

/// Regularization added to denominators so empty bins never divide by zero.
pub const EPSILON: f64 = 1e-99;
