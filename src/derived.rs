use crate::light::{
    aop::unwrap_angles,
    stokes::{ObserverFrame, StokesSpectrum},
};
use uom::si::angle::degree;

/// Polarization degree and angles of every bin in the observer's frame.
///
/// Both angle sequences are in degrees, continuous across the grid and
/// re-centered around zero.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedQuantities {
    degree: Vec<f64>,
    psi: Vec<f64>,
    beta: Vec<f64>,
}

impl DerivedQuantities {
    pub fn from_stokes(stokes: &StokesSpectrum<ObserverFrame>) -> Self {
        let mut dop = Vec::with_capacity(stokes.len());
        let mut psi = Vec::with_capacity(stokes.len());
        let mut beta = Vec::with_capacity(stokes.len());

        for bin in stokes.bins() {
            dop.push(bin.degree());
            psi.push(bin.psi().get::<degree>());
            beta.push(bin.beta().get::<degree>());
        }

        unwrap_angles(&mut psi);
        unwrap_angles(&mut beta);

        Self {
            degree: dop,
            psi,
            beta,
        }
    }

    pub fn degree(&self) -> &[f64] {
        &self.degree
    }

    pub fn psi(&self) -> &[f64] {
        &self.psi
    }

    pub fn beta(&self) -> &[f64] {
        &self.beta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::stokes::StokesVec;
    use approx::assert_relative_eq;
    use quickcheck_macros::quickcheck;

    fn spectrum(bins: &[(f64, f64, f64)]) -> StokesSpectrum<ObserverFrame> {
        bins.iter()
            .map(|(i, q, u)| StokesVec::new(*i, *q, *u, 0.0))
            .collect()
    }

    #[quickcheck]
    fn unwrapped_psi_is_continuous(bins: Vec<(i8, i8)>) -> bool {
        let bins: Vec<_> = bins
            .into_iter()
            .map(|(q, u)| (1.0, q as f64, u as f64))
            .collect();
        let derived = DerivedQuantities::from_stokes(&spectrum(&bins));

        derived
            .psi()
            .windows(2)
            .chain(derived.beta().windows(2))
            .all(|pair| (pair[0] - pair[1]).abs() <= 90.0)
    }

    #[test]
    fn angle_crossing_branch_is_unwrapped() {
        // psi goes 80, 89, -89 from low to high energy.
        let bins: Vec<_> = [80.0f64, 89.0, -89.0]
            .iter()
            .map(|psi| {
                let twice = (2.0 * psi).to_radians();
                (1.0, 0.5 * twice.cos(), 0.5 * twice.sin())
            })
            .collect();
        let derived = DerivedQuantities::from_stokes(&spectrum(&bins));

        assert_relative_eq!(derived.psi()[0], 80.0, epsilon = 1e-9);
        assert_relative_eq!(derived.psi()[1], 89.0, epsilon = 1e-9);
        assert_relative_eq!(derived.psi()[2], 91.0, epsilon = 1e-9);
        for dop in derived.degree() {
            assert_relative_eq!(*dop, 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn zero_flux_bin_is_finite() {
        let derived = DerivedQuantities::from_stokes(&spectrum(&[(0.0, 0.0, 0.0), (1.0, 0.1, 0.0)]));
        assert!(derived.degree().iter().all(|p| p.is_finite()));
        assert_eq!(derived.degree()[0], 0.0);
        assert!(derived.psi().iter().all(|psi| psi.is_finite()));
        assert!(derived.beta().iter().all(|beta| beta.is_finite()));
    }

    #[test]
    fn beta_is_zero_without_circular_polarization() {
        let derived = DerivedQuantities::from_stokes(&spectrum(&[(1.0, 0.3, -0.2), (2.0, 0.0, 0.5)]));
        assert!(derived.beta().iter().all(|beta| *beta == 0.0));
    }
}
