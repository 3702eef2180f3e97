//! Random variates by inversion: `X = F⁻¹(U)` with `U` uniform on (0,1).
//!
//! Every distribution here exposes its quantile function through [`Quantile`];
//! [`InversionGen`] pairs one with a [`UniformStream`]. Inversion uses exactly
//! one uniform per variate, which keeps replications synchronised when random
//! numbers are shared between models.

pub mod binomial;
pub mod gamma;
pub mod normal;
pub mod pearson5;
pub mod power;

pub use binomial::BinomialDist;
pub use gamma::GammaDist;
pub use normal::{NormalDist, StdNormalDist};
pub use pearson5::Pearson5Dist;
pub use power::PowerDist;

use crate::rng::{NormalSource, UniformStream};

/// Inverse cumulative distribution function.
pub trait Quantile {
    type Output;

    /// `F⁻¹(u)` for `u` in (0,1).
    fn quantile(&self, u: f64) -> Self::Output;
}

/// Variate generator by inversion of a uniform stream.
#[derive(Debug, Clone)]
pub struct InversionGen<S, D> {
    stream: S,
    dist: D,
}

impl<S: UniformStream, D: Quantile> InversionGen<S, D> {
    pub fn new(stream: S, dist: D) -> Self {
        Self { stream, dist }
    }

    pub fn next_value(&mut self) -> D::Output {
        self.dist.quantile(self.stream.next_uniform())
    }

    pub fn fill(&mut self, out: &mut [D::Output]) {
        for v in out.iter_mut() {
            *v = self.next_value();
        }
    }

    pub fn distribution(&self) -> &D {
        &self.dist
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }
}

impl<S: UniformStream> NormalSource for InversionGen<S, StdNormalDist> {
    fn next_normal(&mut self) -> f64 {
        self.next_value()
    }
}

pub type GammaGen<S> = InversionGen<S, GammaDist>;
pub type Pearson5Gen<S> = InversionGen<S, Pearson5Dist>;
pub type PowerGen<S> = InversionGen<S, PowerDist>;
pub type BinomialGen<S> = InversionGen<S, BinomialDist>;
pub type NormalGen<S> = InversionGen<S, NormalDist>;
