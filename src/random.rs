//! Uniform random sources.
//!
//! Every parent-shape generator consumes draws through [`UniformSource`],
//! so a session can run on a seeded [`SmallRng`](rand::rngs::SmallRng)
//! while tests replay a fixed script of uniforms with [`ScriptedSource`].
//!
//! # Reproducibility
//!
//! For reproducible sessions, use [`create_rng`] with a fixed seed.
//! The underlying algorithm (SmallRng) is deterministic for a given seed
//! on the same platform.

use rand::Rng;

/// A source of uniform draws on `[0, 1)`.
pub trait UniformSource {
    /// Returns the next uniform draw.
    fn next_uniform(&mut self) -> f64;
}

impl<R: Rng> UniformSource for R {
    fn next_uniform(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Creates a fast, seeded random number generator.
///
/// Uses `SmallRng` (Xoshiro256++) for high performance.
/// The sequence is deterministic for a given seed on the same platform.
///
/// # Examples
/// ```
/// use clt_explorer::random::{create_rng, UniformSource};
/// let mut rng = create_rng(42);
/// let x = rng.next_uniform();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// Creates a generator seeded from the operating system.
pub fn entropy_rng() -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::from_os_rng()
}

/// Replays a fixed sequence of uniforms, cycling when exhausted.
///
/// Every value handed out is also recorded, so a test can compare a
/// derived result against an independent computation over the exact
/// draws that produced it.
///
/// # Examples
/// ```
/// use clt_explorer::random::{ScriptedSource, UniformSource};
/// let mut src = ScriptedSource::new(vec![0.25, 0.75]);
/// assert_eq!(src.next_uniform(), 0.25);
/// assert_eq!(src.next_uniform(), 0.75);
/// assert_eq!(src.next_uniform(), 0.25);
/// assert_eq!(src.drawn(), &[0.25, 0.75, 0.25]);
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    script: Vec<f64>,
    cursor: usize,
    drawn: Vec<f64>,
}

impl ScriptedSource {
    /// Creates a source replaying `script`.
    ///
    /// # Panics
    /// Panics if `script` is empty.
    pub fn new(script: Vec<f64>) -> Self {
        assert!(!script.is_empty(), "scripted source needs at least one value");
        Self {
            script,
            cursor: 0,
            drawn: Vec::new(),
        }
    }

    /// Every value handed out so far, in order.
    pub fn drawn(&self) -> &[f64] {
        &self.drawn
    }

    /// Number of values handed out so far.
    pub fn draw_count(&self) -> usize {
        self.drawn.len()
    }
}

impl UniformSource for ScriptedSource {
    fn next_uniform(&mut self) -> f64 {
        let value = self.script[self.cursor];
        self.cursor = (self.cursor + 1) % self.script.len();
        self.drawn.push(value);
        value
    }
}

// ============================================================================
// Tests
// ============================================================================
