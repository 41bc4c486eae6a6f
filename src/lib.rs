//! Polarized reflection from an axially symmetric surface.
//!
//! The surface is illuminated by a possibly polarized power law. Tabulated
//! reflection spectra for three basis polarization states are combined into
//! the Stokes spectrum of the reflected light, rotated into the observer's
//! frame and reduced to the quantity the host asks for.
//!
//! ```no_run
//! use stokes_disc::prelude::*;
//!
//! # fn main() -> Result<(), stokes_disc::error::Error> {
//! let grid = EnergyGrid::log_spaced(1.0, 100.0, 200)?;
//! let model = Model::try_from(ModelParams::default())?;
//! let mut metadata = MetadataStore::new();
//! let config = TableConfig::from_metadata(&metadata);
//! let tables = MemoryTables::new();
//! let evaluation = model.evaluate(&grid, &tables, &config, &mut metadata)?;
//! println!("{:?}", evaluation.output());
//! # Ok(())
//! # }
//! ```

pub mod basis;
pub mod derived;
pub mod dump;
pub mod error;
pub mod grid;
pub mod light;
pub mod metadata;
pub mod model;
pub mod output;
pub mod params;
pub mod synth;
pub mod table;

pub mod prelude {
    pub use crate::{
        derived::DerivedQuantities,
        grid::EnergyGrid,
        light::stokes::{LocalFrame, ObserverFrame, StokesSpectrum, StokesVec},
        metadata::{Metadata, MetadataStore},
        model::Evaluation,
        output::{OutputMode, RequestedOutput, Warning},
        params::{Model, ModelParams},
        table::{BasisState, MemoryTables, StokesChannel, TableConfig, TableService},
    };
}
