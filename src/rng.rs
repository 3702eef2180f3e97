// src/rng.rs
//! Variate Sources for Path Generation
//!
//! # Design Philosophy
//!
//! Path generators never own a notion of "randomness" beyond two narrow
//! capabilities:
//! 1. **Uniform streams**: independent values in the open interval (0,1)
//! 2. **Normal sources**: independent standard normal draws
//!
//! Any `rand::Rng` is a uniform stream. [`CounterRng`] adds substreams so that
//! replication `i` of an experiment always sees the same numbers, whatever ran
//! before it.
//!
//! # Counter-Based RNG
//!
//! Deterministic mapping `(seed, substream, counter) → u64`:
//! ```text
//! key = mix(seed ⊕ mix(substream))
//! z   = key + counter · φ
//! out = mix(z)
//! ```
//! where `mix` is the splitmix64 finalizer and φ the 64-bit golden ratio.

use crate::math_utils::norm_inv_cdf;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::{Distribution, Open01, StandardNormal};

const GOLDEN_GAMMA: u64 = 0x9e3779b97f4a7c15;

fn splitmix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9u64);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111ebu64);
    z ^ (z >> 31)
}

/// Source of independent uniforms on the open interval (0,1)
pub trait UniformStream {
    fn next_uniform(&mut self) -> f64;

    /// Fill `out` with successive uniforms
    fn fill_uniforms(&mut self, out: &mut [f64]) {
        for u in out.iter_mut() {
            *u = self.next_uniform();
        }
    }
}

impl<R: Rng + ?Sized> UniformStream for R {
    fn next_uniform(&mut self) -> f64 {
        Open01.sample(self)
    }
}

/// Uniform stream partitioned into reproducible substreams
pub trait RandomStream: UniformStream {
    /// Back to the first value of the first substream
    fn reset_start_stream(&mut self);
    /// Back to the first value of the current substream
    fn reset_start_substream(&mut self);
    /// Jump to the first value of the next substream
    fn reset_next_substream(&mut self);
}

/// Source of independent standard normal draws
pub trait NormalSource {
    fn next_normal(&mut self) -> f64;
}

/// Counter-based RNG with substreams
///
/// # Thread Safety
///
/// One instance per worker. Independent workers should use distinct
/// substreams (see [`RngFactory::create_counter_rng`]).
#[derive(Debug, Clone)]
pub struct CounterRng {
    base_seed: u64,
    start_substream: u64,
    substream: u64,
    key: u64,
    counter: u64,
}

impl CounterRng {
    pub fn new(base_seed: u64, substream: u64) -> Self {
        Self {
            base_seed,
            start_substream: substream,
            substream,
            key: Self::substream_key(base_seed, substream),
            counter: 0,
        }
    }

    fn substream_key(base_seed: u64, substream: u64) -> u64 {
        splitmix64(base_seed ^ splitmix64(substream.wrapping_add(GOLDEN_GAMMA)))
    }

    pub fn substream(&self) -> u64 {
        self.substream
    }

    fn enter_substream(&mut self, substream: u64) {
        self.substream = substream;
        self.key = Self::substream_key(self.base_seed, substream);
        self.counter = 0;
    }
}

impl RngCore for CounterRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.counter = self.counter.wrapping_add(1);
        splitmix64(self.key.wrapping_add(self.counter.wrapping_mul(GOLDEN_GAMMA)))
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl RandomStream for CounterRng {
    fn reset_start_stream(&mut self) {
        self.enter_substream(self.start_substream);
    }

    fn reset_start_substream(&mut self) {
        self.counter = 0;
    }

    fn reset_next_substream(&mut self) {
        self.enter_substream(self.substream.wrapping_add(1));
    }
}

/// RNG factory for reproducible replications
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Create a counter RNG positioned at the start of `substream`
    pub fn create_counter_rng(&self, substream: u64) -> CounterRng {
        CounterRng::new(self.base_seed, substream)
    }

    /// Create a standard RNG for a specific replication/worker
    pub fn create_std_rng(&self, substream: u64) -> StdRng {
        StdRng::seed_from_u64(self.base_seed.wrapping_add(substream))
    }
}

pub fn seed_rng_from_u64(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

/// Normal source backed by `rand_distr::StandardNormal` (ziggurat)
#[derive(Debug, Clone)]
pub struct StdNormalGen<R> {
    rng: R,
}

impl<R: Rng> StdNormalGen<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}

impl<R: Rng> NormalSource for StdNormalGen<R> {
    fn next_normal(&mut self) -> f64 {
        get_normal_draw(&mut self.rng)
    }
}

/// Normal source obtained by inverting one uniform per draw
///
/// Keeps a one-to-one map between stream uniforms and normals, which is what
/// substream-synchronised experiments (common random numbers) rely on.
#[derive(Debug, Clone)]
pub struct NormalInvGen<S> {
    stream: S,
}

impl<S: UniformStream> NormalInvGen<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }
}

impl<S: UniformStream> NormalSource for NormalInvGen<S> {
    fn next_normal(&mut self) -> f64 {
        norm_inv_cdf(self.stream.next_uniform())
    }
}

impl<N: NormalSource + ?Sized> NormalSource for &mut N {
    fn next_normal(&mut self) -> f64 {
        (**self).next_normal()
    }
}

impl<N: NormalSource + ?Sized> NormalSource for Box<N> {
    fn next_normal(&mut self) -> f64 {
        (**self).next_normal()
    }
}
