use std::path::PathBuf;
use thiserror::Error;

use crate::table::StokesChannel;

#[derive(Debug, Error)]
pub enum Error {
    #[error("energy grid needs at least two strictly increasing finite edges")]
    InvalidGrid,
    #[error("InvalidInput: {0}")]
    InvalidInput(String),
    #[error("expected polarization degree in range [0, 1] but got: {degree}")]
    DegreeOutOfBounds { degree: f64 },
    #[error("expected cosine of inclination in range [0, 1] but got: {cos_incl}")]
    InclinationOutOfBounds { cos_incl: f64 },
    #[error("basis table {path:?} is missing or unreadable")]
    MissingTable { path: PathBuf },
    #[error("basis table {path:?} has no {channel:?} channel")]
    MissingChannel {
        path: PathBuf,
        channel: StokesChannel,
    },
    #[error("table parameter {name} = {value} is outside the tabulated domain")]
    ParameterOutOfRange { name: &'static str, value: f64 },
    #[error("basis table {path:?} returned {found} bins but the grid has {expected}")]
    LengthMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
    #[error("spectrum has {found} bins but {expected} were expected")]
    SpectrumLength { expected: usize, found: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
