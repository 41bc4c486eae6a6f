//! Contract with the table interpolation service.
//!
//! Reflection spectra are tabulated by an external engine for three basis
//! illumination states. The engine is asked for one Stokes channel at a time
//! through a named filter and returns the spectrum already binned onto the
//! caller's energy grid.

use crate::{error::Error, grid::EnergyGrid, metadata::Metadata, params::ContinuumParams};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    ops::RangeInclusive,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Name of the filter selecting the Stokes channel of a table.
pub const STOKES_FILTER: &str = "Stokes";

/// Metadata key holding the directory the basis tables live in.
pub const TABLE_DIR_KEY: &str = "XSDIR";

/// Polarization state of the primary radiation a table was computed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BasisState {
    Unpolarized,
    /// Linearly polarized parallel to the system axis.
    Horizontal,
    /// Linearly polarized at 45 degrees to the system axis.
    Diagonal,
}

impl BasisState {
    pub const ALL: [BasisState; 3] = [
        BasisState::Unpolarized,
        BasisState::Horizontal,
        BasisState::Diagonal,
    ];

    /// File name of the reflection table for this state.
    pub fn file_name(&self) -> &'static str {
        match self {
            BasisState::Unpolarized => "stokes-neutral-iso-UNPOL-disc.fits",
            BasisState::Horizontal => "stokes-neutral-iso-HRPOL-disc.fits",
            BasisState::Diagonal => "stokes-neutral-iso-45DEG-disc.fits",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            BasisState::Unpolarized => 0,
            BasisState::Horizontal => 1,
            BasisState::Diagonal => 2,
        }
    }
}

/// Stokes channel stored in a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StokesChannel {
    I,
    Q,
    U,
}

impl StokesChannel {
    pub const ALL: [StokesChannel; 3] = [StokesChannel::I, StokesChannel::Q, StokesChannel::U];

    /// Value of the [`STOKES_FILTER`] that selects this channel.
    pub fn filter_value(&self) -> f64 {
        self.index() as f64
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            StokesChannel::I => 0,
            StokesChannel::Q => 1,
            StokesChannel::U => 2,
        }
    }
}

/// A named filter passed along with an interpolation request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Filter<'a> {
    pub name: &'a str,
    pub value: f64,
}

impl Filter<'static> {
    pub fn stokes(channel: StokesChannel) -> Self {
        Self {
            name: STOKES_FILTER,
            value: channel.filter_value(),
        }
    }
}

/// Spectrum returned by the interpolation service.
#[derive(Clone, Debug, PartialEq)]
pub struct Interpolated {
    pub flux: Vec<f64>,
    /// Uncertainty per bin, not used by the model.
    pub error: Vec<f64>,
}

/// Interpolates tabulated spectra onto an energy grid.
pub trait TableService {
    fn interpolate(
        &self,
        grid: &EnergyGrid,
        params: &ContinuumParams,
        table: &Path,
        filter: Filter<'_>,
    ) -> Result<Interpolated, Error>;
}

/// Locations of the three basis tables, resolved once per invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct TableConfig {
    paths: [PathBuf; 3],
}

impl TableConfig {
    /// Resolves the table paths against `dir`.
    ///
    /// An unset or empty directory means the current working directory.
    pub fn resolve(dir: Option<&str>) -> Self {
        let paths = BasisState::ALL.map(|state| match dir {
            Some(dir) if !dir.is_empty() => Path::new(dir).join(state.file_name()),
            _ => PathBuf::from(state.file_name()),
        });

        Self { paths }
    }

    /// Resolves the table paths against the [`TABLE_DIR_KEY`] host string.
    pub fn from_metadata(metadata: &impl Metadata) -> Self {
        Self::resolve(metadata.string(TABLE_DIR_KEY).as_deref())
    }

    pub fn path(&self, state: BasisState) -> &Path {
        &self.paths[state.index()]
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::resolve(None)
    }
}

/// One pre-binned table held in memory.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemoryTable {
    pub channels: HashMap<StokesChannel, Vec<f64>>,
}

/// A [`TableService`] over spectra that are already binned onto the grid.
///
/// Tables are addressed by file name, so any resolved directory is accepted.
/// Optional domains restrict each continuum parameter in the order
/// size, photon index, cosine of inclination, redshift.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MemoryTables {
    pub tables: HashMap<String, MemoryTable>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub domains: [Option<RangeInclusive<f64>>; 4],
}

impl MemoryTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `state` with one spectrum per channel.
    pub fn with_basis(mut self, state: BasisState, i: Vec<f64>, q: Vec<f64>, u: Vec<f64>) -> Self {
        let channels = HashMap::from([
            (StokesChannel::I, i),
            (StokesChannel::Q, q),
            (StokesChannel::U, u),
        ]);
        self.tables
            .insert(state.file_name().to_string(), MemoryTable { channels });
        self
    }

    /// Restricts continuum parameter `index` to `domain`.
    pub fn with_domain(mut self, index: usize, domain: RangeInclusive<f64>) -> Self {
        if let Some(slot) = self.domains.get_mut(index) {
            *slot = Some(domain);
        }
        self
    }

    fn check_domain(&self, params: &ContinuumParams) -> Result<(), Error> {
        for ((name, value), domain) in ContinuumParams::NAMES
            .into_iter()
            .zip(params.as_array())
            .zip(&self.domains)
        {
            if let Some(domain) = domain
                && !domain.contains(&value)
            {
                return Err(Error::ParameterOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

impl TableService for MemoryTables {
    fn interpolate(
        &self,
        grid: &EnergyGrid,
        params: &ContinuumParams,
        table: &Path,
        filter: Filter<'_>,
    ) -> Result<Interpolated, Error> {
        debug!(?table, filter = filter.name, value = filter.value, "interpolating");

        let entry = table
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| self.tables.get(name))
            .ok_or_else(|| Error::MissingTable {
                path: table.to_path_buf(),
            })?;

        self.check_domain(params)?;

        let channel = StokesChannel::ALL
            .into_iter()
            .find(|channel| filter.name == STOKES_FILTER && channel.filter_value() == filter.value)
            .ok_or_else(|| {
                Error::InvalidInput(format!("unknown filter {}={}", filter.name, filter.value))
            })?;

        let flux = entry
            .channels
            .get(&channel)
            .ok_or_else(|| Error::MissingChannel {
                path: table.to_path_buf(),
                channel,
            })?
            .clone();

        if flux.len() != grid.len() {
            return Err(Error::LengthMismatch {
                path: table.to_path_buf(),
                expected: grid.len(),
                found: flux.len(),
            });
        }

        Ok(Interpolated {
            error: vec![0.0; flux.len()],
            flux,
        })
    }
}
