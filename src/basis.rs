use crate::{
    error::Error,
    grid::EnergyGrid,
    params::ContinuumParams,
    table::{BasisState, Filter, StokesChannel, TableConfig, TableService},
};
use tracing::debug;

/// Reflection spectra of the three basis states for all three Stokes channels.
#[derive(Clone, Debug, PartialEq)]
pub struct BasisSpectrumSet {
    /// Indexed by basis state, then by channel.
    spectra: [[Vec<f64>; 3]; 3],
}

impl BasisSpectrumSet {
    /// Fails unless all nine spectra cover the same number of bins.
    pub fn new(spectra: [[Vec<f64>; 3]; 3]) -> Result<Self, Error> {
        let expected = spectra[0][0].len();
        if let Some(ragged) = spectra
            .iter()
            .flatten()
            .find(|spectrum| spectrum.len() != expected)
        {
            return Err(Error::SpectrumLength {
                expected,
                found: ragged.len(),
            });
        }

        Ok(Self { spectra })
    }

    pub fn get(&self, state: BasisState, channel: StokesChannel) -> &[f64] {
        &self.spectra[state.index()][channel.index()]
    }

    /// Number of bins covered by the spectra.
    pub fn len(&self) -> usize {
        self.spectra[0][0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Spectra loaded for one evaluation.
#[derive(Clone, Debug, PartialEq)]
pub enum BasisSpectra {
    /// Only the intensity of the unpolarized basis.
    Unpolarized(Vec<f64>),
    Polarized(BasisSpectrumSet),
}

impl BasisSpectra {
    /// Requests the basis spectra from `tables`.
    ///
    /// With polarization switched off a single request for the intensity of
    /// the unpolarized basis is made. Otherwise all nine combinations of basis
    /// state and channel are requested, whatever output is wanted later. Any
    /// failing request fails the whole load.
    pub fn load<T: TableService + ?Sized>(
        tables: &T,
        grid: &EnergyGrid,
        params: &ContinuumParams,
        config: &TableConfig,
        polarized: bool,
    ) -> Result<Self, Error> {
        if !polarized {
            let flux = request(
                tables,
                grid,
                params,
                config,
                BasisState::Unpolarized,
                StokesChannel::I,
            )?;
            return Ok(BasisSpectra::Unpolarized(flux));
        }

        let mut spectra: [[Vec<f64>; 3]; 3] = Default::default();
        for state in BasisState::ALL {
            for channel in StokesChannel::ALL {
                spectra[state.index()][channel.index()] =
                    request(tables, grid, params, config, state, channel)?;
            }
        }

        Ok(BasisSpectra::Polarized(BasisSpectrumSet::new(spectra)?))
    }
}

fn request<T: TableService + ?Sized>(
    tables: &T,
    grid: &EnergyGrid,
    params: &ContinuumParams,
    config: &TableConfig,
    state: BasisState,
    channel: StokesChannel,
) -> Result<Vec<f64>, Error> {
    let path = config.path(state);
    debug!(?state, ?channel, ?path, "requesting basis spectrum");

    let flux = tables
        .interpolate(grid, params, path, Filter::stokes(channel))?
        .flux;

    if flux.len() != grid.len() {
        return Err(Error::LengthMismatch {
            path: path.to_path_buf(),
            expected: grid.len(),
            found: flux.len(),
        });
    }

    Ok(flux)
}
