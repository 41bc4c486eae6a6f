use crate::{
    basis::BasisSpectra,
    derived::DerivedQuantities,
    dump::DiagnosticRecord,
    error::Error,
    grid::EnergyGrid,
    light::stokes::{ObserverFrame, StokesSpectrum},
    metadata::{Metadata, publish_inclination},
    output::{AUTO_TAG_KEY, OutputMode, Warning},
    params::Model,
    synth::synthesize,
    table::{TableConfig, TableService},
};
use tracing::debug;

/// Result of one model evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    mode: OutputMode,
    stokes: StokesSpectrum<ObserverFrame>,
    derived: Option<DerivedQuantities>,
    output: Vec<f64>,
    warnings: Vec<Warning>,
}

impl Evaluation {
    /// The output mode after resolving automatic selection.
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Stokes spectrum in the observer's frame.
    ///
    /// Only intensity is populated if polarization was switched off.
    pub fn stokes(&self) -> &StokesSpectrum<ObserverFrame> {
        &self.stokes
    }

    /// Polarization degree and angles, `None` if polarization was switched off.
    pub fn derived(&self) -> Option<&DerivedQuantities> {
        self.derived.as_ref()
    }

    /// One value per bin as selected by [`Evaluation::mode`].
    pub fn output(&self) -> &[f64] {
        &self.output
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Per-bin diagnostic records, empty if polarization was switched off.
    pub fn diagnostic_records(&self, grid: &EnergyGrid) -> Vec<DiagnosticRecord> {
        let Some(derived) = &self.derived else {
            return Vec::new();
        };

        grid.midpoints()
            .zip(grid.widths())
            .zip(self.stokes.bins())
            .enumerate()
            .map(|(index, ((energy, width), bin))| DiagnosticRecord {
                energy,
                flux: bin.i / width,
                q: bin.q / width,
                u: bin.u / width,
                v: bin.v / width,
                degree: derived.degree()[index],
                psi: derived.psi()[index],
                beta: derived.beta()[index],
            })
            .collect()
    }
}

impl Model {
    /// Computes the model on `grid`.
    ///
    /// Every call reloads the basis spectra from `tables`; nothing is cached
    /// between calls. The inclination is published to `metadata` only if
    /// loading succeeded.
    pub fn evaluate<T, M>(
        &self,
        grid: &EnergyGrid,
        tables: &T,
        config: &TableConfig,
        metadata: &mut M,
    ) -> Result<Evaluation, Error>
    where
        T: TableService + ?Sized,
        M: Metadata + ?Sized,
    {
        let (mode, warning) = self
            .requested()
            .resolve(|| metadata.filter_value(AUTO_TAG_KEY));
        debug!(?mode, bins = grid.len(), "evaluating");

        let spectra =
            BasisSpectra::load(tables, grid, self.continuum(), config, mode.is_polarized())?;

        publish_inclination(metadata, self.inclination());

        let (stokes, derived) = match spectra {
            BasisSpectra::Unpolarized(flux) => (StokesSpectrum::unpolarized(flux), None),
            BasisSpectra::Polarized(set) => {
                let stokes = synthesize(&set, self.intrinsic())
                    .to_observer_frame(self.orientation().pos_ang());
                let derived = DerivedQuantities::from_stokes(&stokes);
                (stokes, Some(derived))
            }
        };

        let output = mode.select(grid, &stokes, derived.as_ref())?;

        Ok(Evaluation {
            mode,
            stokes,
            derived,
            output,
            warnings: warning.into_iter().collect(),
        })
    }
}
