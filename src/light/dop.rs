use super::EPSILON;

/// Regularized degree of polarization `sqrt(q² + u² + v²) / (i + ε)`.
///
/// A bin without flux evaluates to a finite value near zero instead of NaN.
pub fn degree(i: f64, q: f64, u: f64, v: f64) -> f64 {
    (q.powf(2.) + u.powf(2.) + v.powf(2.)).sqrt() / (i + EPSILON)
}

/// Regularized ratio `x / (i + ε)` used for the normalized Stokes parameters.
pub fn ratio(x: f64, i: f64) -> f64 {
    x / (i + EPSILON)
}
