use crate::{
    derived::DerivedQuantities,
    error::Error,
    grid::EnergyGrid,
    light::{
        dop,
        stokes::{ObserverFrame, StokesSpectrum},
    },
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Metadata key whose filter value selects the output in [`RequestedOutput::Auto`].
pub const AUTO_TAG_KEY: &str = "Stokes";

/// Quantity written into the result buffer.
///
/// The host codes are listed on each variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OutputMode {
    /// `0`: photon flux per bin with polarization switched off.
    FluxUnpolarized,
    /// `1`: photon flux per bin.
    Flux,
    /// `2`: Stokes Q per bin.
    Q,
    /// `3`: Stokes U per bin.
    U,
    /// `4`: Stokes V per bin.
    V,
    /// `5`: degree of polarization.
    Degree,
    /// `6`: polarization angle psi in degrees.
    AnglePsi,
    /// `7`: "Stokes" angle beta in degrees.
    AngleBeta,
    /// `8`: Q normalized by I.
    QOverI,
    /// `9`: U normalized by I.
    UOverI,
    /// `10`: V normalized by I.
    VOverI,
}

impl OutputMode {
    /// Returns `false` only for [`OutputMode::FluxUnpolarized`].
    pub fn is_polarized(&self) -> bool {
        !matches!(self, OutputMode::FluxUnpolarized)
    }

    /// Host code of the mode.
    pub fn code(&self) -> i32 {
        match self {
            OutputMode::FluxUnpolarized => 0,
            OutputMode::Flux => 1,
            OutputMode::Q => 2,
            OutputMode::U => 3,
            OutputMode::V => 4,
            OutputMode::Degree => 5,
            OutputMode::AnglePsi => 6,
            OutputMode::AngleBeta => 7,
            OutputMode::QOverI => 8,
            OutputMode::UOverI => 9,
            OutputMode::VOverI => 10,
        }
    }

    /// Fills one value per bin of `grid`.
    ///
    /// Flux and the Stokes parameters are written as they are. Polarization
    /// degree, angles and normalized Stokes parameters are multiplied by the
    /// bin width to follow the same per-bin convention. Without `derived`
    /// quantities only flux can be produced, and every mode falls back to it.
    ///
    /// Fails if `stokes` or `derived` do not cover every bin of `grid`.
    pub fn select(
        &self,
        grid: &EnergyGrid,
        stokes: &StokesSpectrum<ObserverFrame>,
        derived: Option<&DerivedQuantities>,
    ) -> Result<Vec<f64>, Error> {
        let found = derived.map_or(stokes.len(), |derived| derived.degree().len());
        for found in [stokes.len(), found] {
            if found != grid.len() {
                return Err(Error::SpectrumLength {
                    expected: grid.len(),
                    found,
                });
            }
        }

        let Some(derived) = derived else {
            return Ok(stokes.i().to_vec());
        };

        let scaled = |values: &[f64]| -> Vec<f64> {
            values
                .iter()
                .zip(grid.widths())
                .map(|(value, width)| value * width)
                .collect()
        };

        let normalized = |values: &[f64]| -> Vec<f64> {
            values
                .iter()
                .zip(stokes.i())
                .zip(grid.widths())
                .map(|((value, i), width)| dop::ratio(*value, *i) * width)
                .collect()
        };

        Ok(match self {
            OutputMode::FluxUnpolarized | OutputMode::Flux => stokes.i().to_vec(),
            OutputMode::Q => stokes.q().to_vec(),
            OutputMode::U => stokes.u().to_vec(),
            OutputMode::V => stokes.v().to_vec(),
            OutputMode::Degree => scaled(derived.degree()),
            OutputMode::AnglePsi => scaled(derived.psi()),
            OutputMode::AngleBeta => scaled(derived.beta()),
            OutputMode::QOverI => normalized(stokes.q()),
            OutputMode::UOverI => normalized(stokes.u()),
            OutputMode::VOverI => normalized(stokes.v()),
        })
    }
}

impl TryFrom<i32> for OutputMode {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => OutputMode::FluxUnpolarized,
            1 => OutputMode::Flux,
            2 => OutputMode::Q,
            3 => OutputMode::U,
            4 => OutputMode::V,
            5 => OutputMode::Degree,
            6 => OutputMode::AnglePsi,
            7 => OutputMode::AngleBeta,
            8 => OutputMode::QOverI,
            9 => OutputMode::UOverI,
            10 => OutputMode::VOverI,
            _ => return Err(Error::InvalidInput(format!("unknown output mode {code}"))),
        })
    }
}

/// Output requested by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestedOutput {
    /// `-1`: decided per data set by the [`AUTO_TAG_KEY`] filter value.
    Auto,
    Mode(OutputMode),
}

impl RequestedOutput {
    /// Resolves the request into a concrete mode.
    ///
    /// For [`RequestedOutput::Auto`] the `tag` resolver is called once. A tag of
    /// 0, 1 or 2 selects flux, Q or U. Any other value, or no tag at all, falls
    /// back to unpolarized flux and is reported as a [`Warning`].
    pub fn resolve<F>(self, tag: F) -> (OutputMode, Option<Warning>)
    where
        F: FnOnce() -> Option<f64>,
    {
        if let RequestedOutput::Mode(mode) = self {
            return (mode, None);
        }

        let value = tag();
        let mode = match value {
            Some(tag) if tag == 0.0 => OutputMode::Flux,
            Some(tag) if tag == 1.0 => OutputMode::Q,
            Some(tag) if tag == 2.0 => OutputMode::U,
            _ => {
                let warning = Warning::InvalidMetadataTag { value };
                warn!(%warning, "falling back to unpolarized flux");
                return (OutputMode::FluxUnpolarized, Some(warning));
            }
        };

        debug!(?mode, "resolved output from data tag");
        (mode, None)
    }
}

impl TryFrom<i32> for RequestedOutput {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(RequestedOutput::Auto),
            code => OutputMode::try_from(code).map(RequestedOutput::Mode),
        }
    }
}

/// A condition the model recovered from.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Warning {
    #[error("no or wrong data type tag (counts, q, u): {value:?}")]
    InvalidMetadataTag { value: Option<f64> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::stokes::StokesVec;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Some(0.0), OutputMode::Flux)]
    #[case(Some(1.0), OutputMode::Q)]
    #[case(Some(2.0), OutputMode::U)]
    fn auto_resolves_tag(#[case] tag: Option<f64>, #[case] mode: OutputMode) {
        assert_eq!(RequestedOutput::Auto.resolve(|| tag), (mode, None));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(3.0))]
    #[case(Some(0.5))]
    #[case(Some(-1.0))]
    fn auto_falls_back(#[case] tag: Option<f64>) {
        let (mode, warning) = RequestedOutput::Auto.resolve(|| tag);
        assert_eq!(mode, OutputMode::FluxUnpolarized);
        assert_eq!(warning, Some(Warning::InvalidMetadataTag { value: tag }));
    }

    #[test]
    fn explicit_mode_ignores_tag() {
        let (mode, warning) =
            RequestedOutput::Mode(OutputMode::Degree).resolve(|| panic!("tag must not be read"));
        assert_eq!(mode, OutputMode::Degree);
        assert!(warning.is_none());
    }

    #[test]
    fn codes_round_trip() {
        for code in 0..=10 {
            assert_eq!(OutputMode::try_from(code).unwrap().code(), code);
        }
        assert_eq!(RequestedOutput::try_from(-1).unwrap(), RequestedOutput::Auto);
        assert!(RequestedOutput::try_from(-2).is_err());
        assert!(RequestedOutput::try_from(11).is_err());
    }

    fn spectrum() -> (EnergyGrid, StokesSpectrum<ObserverFrame>) {
        let grid = EnergyGrid::from_edges(vec![1.0, 2.0, 4.0]).unwrap();
        let stokes = vec![
            StokesVec::new(2.0, 0.2, 0.0, 0.0),
            StokesVec::new(4.0, 0.0, 0.4, 0.0),
        ]
        .into_iter()
        .collect();
        (grid, stokes)
    }

    #[rstest]
    #[case(OutputMode::Flux, [2.0, 4.0])]
    #[case(OutputMode::Q, [0.2, 0.0])]
    #[case(OutputMode::U, [0.0, 0.4])]
    #[case(OutputMode::V, [0.0, 0.0])]
    #[case(OutputMode::Degree, [0.1, 0.2])]
    #[case(OutputMode::AnglePsi, [0.0, 90.0])]
    #[case(OutputMode::AngleBeta, [0.0, 0.0])]
    #[case(OutputMode::QOverI, [0.1, 0.0])]
    #[case(OutputMode::UOverI, [0.0, 0.2])]
    #[case(OutputMode::VOverI, [0.0, 0.0])]
    fn select_scales_by_bin_width(#[case] mode: OutputMode, #[case] expected: [f64; 2]) {
        let (grid, stokes) = spectrum();
        let derived = DerivedQuantities::from_stokes(&stokes);
        let output = mode.select(&grid, &stokes, Some(&derived)).unwrap();
        for (value, expected) in output.into_iter().zip(expected) {
            assert_relative_eq!(value, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn select_without_polarization_is_flux() {
        let (grid, stokes) = spectrum();
        assert_eq!(
            OutputMode::U.select(&grid, &stokes, None).unwrap(),
            vec![2.0, 4.0]
        );
    }

    #[rstest]
    #[case(OutputMode::Flux)]
    #[case(OutputMode::Degree)]
    #[case(OutputMode::QOverI)]
    fn select_rejects_mismatched_grid(#[case] mode: OutputMode) {
        let (_, stokes) = spectrum();
        let derived = DerivedQuantities::from_stokes(&stokes);
        let grid = EnergyGrid::from_edges(vec![1.0, 2.0, 4.0, 8.0]).unwrap();

        for derived in [None, Some(&derived)] {
            assert!(matches!(
                mode.select(&grid, &stokes, derived),
                Err(Error::SpectrumLength {
                    expected: 3,
                    found: 2
                })
            ));
        }
    }
}
