use super::{EPSILON, dop};
use std::marker::PhantomData;
use uom::si::{angle::radian, f64::Angle};

pub trait StokesFrame: Copy + Clone {}

/// Reference frame aligned with the rotation axis of the reflecting system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalFrame;
impl StokesFrame for LocalFrame {}

/// Reference frame of the observer on the sky.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverFrame;
impl StokesFrame for ObserverFrame {}

/// Stokes parameters of a single energy bin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StokesVec<Frame: StokesFrame> {
    pub i: f64,
    pub q: f64,
    pub u: f64,
    pub v: f64,
    _phan: PhantomData<Frame>,
}

impl<Frame: StokesFrame> StokesVec<Frame> {
    pub fn new(i: f64, q: f64, u: f64, v: f64) -> Self {
        Self {
            i,
            q,
            u,
            v,
            _phan: PhantomData,
        }
    }

    /// Compute the regularized degree of polarization.
    pub fn degree(&self) -> f64 {
        dop::degree(self.i, self.q, self.u, self.v)
    }

    /// Compute the linear polarization angle `psi = atan2(u, q) / 2`.
    pub fn psi(&self) -> Angle {
        Angle::new::<radian>(self.u.atan2(self.q) / 2.)
    }

    /// Compute the "Stokes" angle `beta = asin(v / |(q, u, v)|) / 2`.
    pub fn beta(&self) -> Angle {
        let norm = (self.q.powf(2.) + self.u.powf(2.) + self.v.powf(2.) + EPSILON).sqrt();
        Angle::new::<radian>((self.v / norm).asin() / 2.)
    }
}

impl StokesVec<LocalFrame> {
    /// Rotates Q and U by the position angle of the system axis.
    pub fn into_observer_frame(self, pos_ang: Angle) -> StokesVec<ObserverFrame> {
        let (sin, cos) = (2. * pos_ang.get::<radian>()).sin_cos();
        StokesVec::new(
            self.i,
            self.q * cos - self.u * sin,
            self.u * cos + self.q * sin,
            self.v,
        )
    }
}

/// Stokes parameters for every bin of an energy grid.
#[derive(Clone, Debug, PartialEq)]
pub struct StokesSpectrum<Frame: StokesFrame> {
    i: Vec<f64>,
    q: Vec<f64>,
    u: Vec<f64>,
    v: Vec<f64>,
    _phan: PhantomData<Frame>,
}

impl<Frame: StokesFrame> StokesSpectrum<Frame> {
    /// Creates a spectrum that only carries intensity.
    pub fn unpolarized(i: Vec<f64>) -> Self {
        let zeros = vec![0.0; i.len()];
        Self {
            q: zeros.clone(),
            u: zeros.clone(),
            v: zeros,
            i,
            _phan: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.i.len()
    }

    pub fn is_empty(&self) -> bool {
        self.i.is_empty()
    }

    pub fn i(&self) -> &[f64] {
        &self.i
    }

    pub fn q(&self) -> &[f64] {
        &self.q
    }

    pub fn u(&self) -> &[f64] {
        &self.u
    }

    pub fn v(&self) -> &[f64] {
        &self.v
    }

    /// Returns the Stokes vector of bin `index` if it exists.
    pub fn bin(&self, index: usize) -> Option<StokesVec<Frame>> {
        Some(StokesVec::new(
            *self.i.get(index)?,
            *self.q.get(index)?,
            *self.u.get(index)?,
            *self.v.get(index)?,
        ))
    }

    pub fn bins(&self) -> impl Iterator<Item = StokesVec<Frame>> + '_ {
        (0..self.len()).filter_map(|index| self.bin(index))
    }
}

impl StokesSpectrum<LocalFrame> {
    /// Rotates the spectrum into the observer's frame.
    ///
    /// Always returns freshly allocated arrays, also for a zero position angle.
    pub fn to_observer_frame(&self, pos_ang: Angle) -> StokesSpectrum<ObserverFrame> {
        if pos_ang.get::<radian>() == 0.0 {
            return StokesSpectrum {
                i: self.i.clone(),
                q: self.q.clone(),
                u: self.u.clone(),
                v: self.v.clone(),
                _phan: PhantomData,
            };
        }

        self.bins()
            .map(|bin| bin.into_observer_frame(pos_ang))
            .collect()
    }
}

impl<Frame: StokesFrame> FromIterator<StokesVec<Frame>> for StokesSpectrum<Frame> {
    fn from_iter<T: IntoIterator<Item = StokesVec<Frame>>>(iter: T) -> Self {
        let mut spectrum = Self {
            i: Vec::new(),
            q: Vec::new(),
            u: Vec::new(),
            v: Vec::new(),
            _phan: PhantomData,
        };

        for bin in iter {
            spectrum.i.push(bin.i);
            spectrum.q.push(bin.q);
            spectrum.u.push(bin.u);
            spectrum.v.push(bin.v);
        }

        spectrum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_relative_eq, relative_eq};
    use quickcheck::quickcheck;
    use rstest::rstest;
    use uom::si::angle::degree;

    fn a(angle: f64) -> Angle {
        Angle::new::<degree>(angle)
    }

    quickcheck! {
        fn rotation_preserves_linear_norm(q: i16, u: i16, angle: i16) -> bool {
            let (q, u) = (q as f64 / 100., u as f64 / 100.);
            let rotated = StokesVec::<LocalFrame>::new(1.0, q, u, 0.0)
                .into_observer_frame(a(angle as f64 / 10.));

            relative_eq!(
                rotated.q.powf(2.) + rotated.u.powf(2.),
                q.powf(2.) + u.powf(2.),
                epsilon = 1e-9,
                max_relative = 1e-9
            )
        }
    }

    #[test]
    fn rotate_quarter_turn_of_q_into_u() {
        let rotated = StokesVec::<LocalFrame>::new(1.0, 1.0, 0.0, 0.0).into_observer_frame(a(45.0));
        assert_relative_eq!(rotated.q, 0.0, epsilon = 1e-12);
        assert_relative_eq!(rotated.u, 1.0, epsilon = 1e-12);
        assert_eq!(rotated.i, 1.0);
        assert_eq!(rotated.v, 0.0);
    }

    #[rstest]
    #[case(1.0, 0.0, 0.0)]
    #[case(0.0, 1.0, 45.0)]
    #[case(-1.0, 0.0, 90.0)]
    #[case(0.0, -1.0, -45.0)]
    fn psi_from_stokes(#[case] q: f64, #[case] u: f64, #[case] psi: f64) {
        let sv = StokesVec::<ObserverFrame>::new(1.0, q, u, 0.0);
        assert_relative_eq!(sv.psi().get::<degree>(), psi, epsilon = 1e-9);
    }

    #[test]
    fn beta_of_linear_light_is_zero() {
        let sv = StokesVec::<ObserverFrame>::new(1.0, 0.3, 0.4, 0.0);
        assert_eq!(sv.beta().get::<degree>(), 0.0);
    }

    #[test]
    fn beta_of_circular_light() {
        let sv = StokesVec::<ObserverFrame>::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(sv.beta().get::<degree>(), 45.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_position_angle_copies() {
        let local: StokesSpectrum<LocalFrame> = vec![
            StokesVec::new(1.0, 0.1, 0.2, 0.0),
            StokesVec::new(2.0, -0.3, 0.4, 0.0),
        ]
        .into_iter()
        .collect();

        let observed = local.to_observer_frame(a(0.0));
        assert_eq!(observed.q(), local.q());
        assert_eq!(observed.u(), local.u());
        assert_ne!(observed.q().as_ptr(), local.q().as_ptr());
    }

    #[test]
    fn unpolarized_spectrum_has_zero_qu() {
        let spectrum = StokesSpectrum::<ObserverFrame>::unpolarized(vec![1.0, 2.0]);
        assert_eq!(spectrum.len(), 2);
        assert_eq!(spectrum.q(), &[0.0, 0.0]);
        assert_eq!(spectrum.u(), &[0.0, 0.0]);
        assert_eq!(spectrum.v(), &[0.0, 0.0]);
        assert!(spectrum.bin(2).is_none());
    }
}
