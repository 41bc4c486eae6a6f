use crate::{error::Error, light::aop::wrap_half_turn, output::RequestedOutput};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;
use uom::si::{
    angle::{degree, radian},
    f64::Angle,
};

/// The model parameters as the host stores them.
///
/// Angles are in degrees and the output mode is the host's integer code.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModelParams {
    /// Upper limit of the incident cosine integration, a proxy for the corona size.
    pub size: f64,
    /// Photon index of the primary power law.
    pub photon_index: f64,
    /// Cosine of the observer inclination, 1 at the pole and 0 edge-on.
    pub cos_incl: f64,
    /// Intrinsic polarization degree of the primary radiation.
    pub pol_deg: f64,
    /// Intrinsic polarization angle of the primary radiation.
    pub chi_deg: f64,
    /// Position angle of the system rotation axis.
    pub pos_ang_deg: f64,
    /// Overall Doppler shift.
    pub zshift: f64,
    /// Output mode code, see [`RequestedOutput`].
    pub stokes: i32,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            size: 0.3,
            photon_index: 2.0,
            cos_incl: 0.775,
            pol_deg: 0.0,
            chi_deg: 0.0,
            pos_ang_deg: 0.0,
            zshift: 0.0,
            stokes: 1,
        }
    }
}

impl fmt::Display for ModelParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Size        {:12.6}", self.size)?;
        writeln!(f, "PhoIndex        {:12.6}", self.photon_index)?;
        writeln!(f, "cos_incl     {:12.6}", self.cos_incl)?;
        writeln!(f, "poldeg        {:12.6}", self.pol_deg)?;
        writeln!(f, "chi         {:12.6}", self.chi_deg)?;
        writeln!(f, "pos_ang        {:12.6}", self.pos_ang_deg)?;
        writeln!(f, "zshift      {:12.6}", self.zshift)?;
        writeln!(f, "Stokes      {:12}", self.stokes)?;
        writeln!(
            f,
            "inc_degrees      {:12.6}",
            inclination(self.cos_incl).get::<degree>()
        )
    }
}

/// Observer inclination from its cosine.
///
/// The cosine is rounded to single precision first, as the host does, so the
/// published value agrees with it to all printed digits.
pub fn inclination(cos_incl: f64) -> Angle {
    Angle::new::<radian>(f64::from(cos_incl as f32).acos())
}

/// Parameters handed to the table service with every request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContinuumParams {
    pub size: f64,
    pub photon_index: f64,
    pub cos_incl: f64,
    pub zshift: f64,
}

impl ContinuumParams {
    pub const NAMES: [&'static str; 4] = ["size", "photon_index", "cos_incl", "zshift"];

    /// Returns the parameters in table order.
    pub fn as_array(&self) -> [f64; 4] {
        [self.size, self.photon_index, self.cos_incl, self.zshift]
    }
}

impl Default for ContinuumParams {
    fn default() -> Self {
        ModelParams::default().into()
    }
}

impl From<ModelParams> for ContinuumParams {
    fn from(params: ModelParams) -> Self {
        Self {
            size: params.size,
            photon_index: params.photon_index,
            cos_incl: params.cos_incl,
            zshift: params.zshift,
        }
    }
}

/// Polarization of the primary radiation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntrinsicPolarization {
    degree: f64,
    angle: Angle,
}

impl IntrinsicPolarization {
    /// Creates the intrinsic polarization from a degree `pol_deg` and an `angle`.
    ///
    /// The angle is wrapped into -90 to 90 degrees. Returns an error if
    /// `pol_deg` is not between 0 and 1.
    pub fn new(pol_deg: f64, angle: Angle) -> Result<Self, Error> {
        if !(0.0..=1.0).contains(&pol_deg) {
            return Err(Error::DegreeOutOfBounds { degree: pol_deg });
        }

        Ok(Self {
            degree: pol_deg,
            angle: wrap_param("chi", angle)?,
        })
    }

    pub fn degree(&self) -> f64 {
        self.degree
    }

    pub fn angle(&self) -> Angle {
        self.angle
    }
}

/// Orientation of the system on the sky.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation {
    pos_ang: Angle,
}

impl Orientation {
    /// Creates an orientation from the position angle of the system axis.
    ///
    /// The angle is wrapped into -90 to 90 degrees.
    pub fn new(pos_ang: Angle) -> Result<Self, Error> {
        Ok(Self {
            pos_ang: wrap_param("pos_ang", pos_ang)?,
        })
    }

    pub fn pos_ang(&self) -> Angle {
        self.pos_ang
    }
}

fn wrap_param(name: &str, angle: Angle) -> Result<Angle, Error> {
    if !angle.get::<radian>().is_finite() {
        return Err(Error::InvalidInput(format!("{name} is not finite")));
    }

    let wrapped = wrap_half_turn(angle);
    if wrapped != angle {
        warn!(
            param = name,
            given = angle.get::<degree>(),
            used = wrapped.get::<degree>(),
            "angle wrapped into -90 to 90 degrees"
        );
    }

    Ok(wrapped)
}

/// Validated inputs of one model evaluation.
///
/// Only obtainable through `Model::try_from`, so the checks made there
/// hold for every instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Model {
    continuum: ContinuumParams,
    intrinsic: IntrinsicPolarization,
    orientation: Orientation,
    requested: RequestedOutput,
}

impl Model {
    pub fn continuum(&self) -> &ContinuumParams {
        &self.continuum
    }

    pub fn intrinsic(&self) -> &IntrinsicPolarization {
        &self.intrinsic
    }

    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    pub fn requested(&self) -> RequestedOutput {
        self.requested
    }

    /// Returns the same model with a different output request.
    pub fn with_requested(self, requested: RequestedOutput) -> Self {
        Self { requested, ..self }
    }

    pub fn inclination(&self) -> Angle {
        inclination(self.continuum.cos_incl)
    }
}

impl TryFrom<ModelParams> for Model {
    type Error = Error;

    fn try_from(params: ModelParams) -> Result<Self, Self::Error> {
        if !(0.0..=1.0).contains(&params.cos_incl) {
            return Err(Error::InclinationOutOfBounds {
                cos_incl: params.cos_incl,
            });
        }

        Ok(Self {
            continuum: params.into(),
            intrinsic: IntrinsicPolarization::new(
                params.pol_deg,
                Angle::new::<degree>(params.chi_deg),
            )?,
            orientation: Orientation::new(Angle::new::<degree>(params.pos_ang_deg))?,
            requested: RequestedOutput::try_from(params.stokes)?,
        })
    }
}
