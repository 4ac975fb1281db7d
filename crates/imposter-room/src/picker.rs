//! Randomness seam for round draws.
//!
//! A round makes two independent draws: the secret word (first) and the
//! imposter (second). Production code draws from a fresh thread-local
//! RNG each time; tests script the indices.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

/// Picks an index uniformly from `0..len`.
///
/// `len == 0` yields 0; callers check for an empty range first.
pub trait Picker: Send + Sync + 'static {
    fn pick(&self, len: usize) -> usize;
}

impl<P: Picker + ?Sized> Picker for Arc<P> {
    fn pick(&self, len: usize) -> usize {
        (**self).pick(len)
    }
}

/// Uniform draws from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPicker;

impl Picker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::rng().random_range(0..len)
    }
}

/// Replays a fixed sequence of indices, cycling when exhausted.
///
/// Each scripted index is reduced modulo `len`, so a script can never
/// produce an out-of-range pick.
#[derive(Debug, Default)]
pub struct FixedPicker {
    script: Vec<usize>,
    cursor: AtomicUsize,
}

impl FixedPicker {
    /// Creates a picker replaying `script`. An empty script always
    /// picks 0.
    pub fn new(script: impl Into<Vec<usize>>) -> Self {
        Self {
            script: script.into(),
            cursor: AtomicUsize::new(0),
        }
    }
}

impl Picker for FixedPicker {
    fn pick(&self, len: usize) -> usize {
        if self.script.is_empty() || len == 0 {
            return 0;
        }
        let at = self.cursor.fetch_add(1, Ordering::Relaxed) % self.script.len();
        self.script[at] % len
    }
}
