use crate::{
    basis::BasisSpectrumSet,
    light::stokes::{LocalFrame, StokesSpectrum, StokesVec},
    params::IntrinsicPolarization,
    table::{BasisState, StokesChannel},
};
use uom::si::angle::radian;

/// Combines the basis spectra into the Stokes spectrum of a primary source
/// with the given intrinsic polarization.
///
/// The horizontal and diagonal bases span the plane of linear polarization,
/// so the response to an angle `chi` is the unpolarized response plus the
/// differences to both polarized responses weighted by `-cos(2 chi)` and
/// `sin(2 chi)`. The surface produces no circular polarization.
pub fn synthesize(
    set: &BasisSpectrumSet,
    intrinsic: &IntrinsicPolarization,
) -> StokesSpectrum<LocalFrame> {
    let (sin, cos) = (2. * intrinsic.angle().get::<radian>()).sin_cos();
    let pol_deg = intrinsic.degree();

    let channel = |channel: StokesChannel| -> Vec<f64> {
        set.get(BasisState::Unpolarized, channel)
            .iter()
            .zip(set.get(BasisState::Horizontal, channel))
            .zip(set.get(BasisState::Diagonal, channel))
            .map(|((unpolarized, horizontal), diagonal)| {
                let horizontal = horizontal - unpolarized;
                let diagonal = diagonal - unpolarized;
                unpolarized + pol_deg * (-horizontal * cos + diagonal * sin)
            })
            .collect()
    };

    channel(StokesChannel::I)
        .into_iter()
        .zip(channel(StokesChannel::Q))
        .zip(channel(StokesChannel::U))
        .map(|((i, q), u)| StokesVec::new(i, q, u, 0.0))
        .collect()
}
