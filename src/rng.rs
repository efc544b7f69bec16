use std::collections::VecDeque;

use rand::{distributions::Uniform, rngs::StdRng, Rng, SeedableRng};

/// Source of every random decision the game makes: which slot to try, what
/// kind of mole to spawn and how long it stays up.
pub trait RandomSource {
    /// A value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// An index in `0..len`. `len` is never zero.
    fn next_index(&mut self, len: usize) -> usize;

    /// A value in `[low, high]`. Returns `low` when the range is empty.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        low + (high - low) * self.next_unit()
    }
}

/// The default source, backed by `StdRng`.
pub struct GameRng {
    rng: StdRng,
}

impl GameRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for GameRng {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.rng.sample(Uniform::new_inclusive(low, high))
    }
}

/// Replays a fixed list of draws. Once a queue runs dry it keeps returning
/// its fallback (unit draws default to 0.99, i.e. a standard mole with the
/// longest exposure; index draws default to 0).
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    units: VecDeque<f64>,
    indices: VecDeque<usize>,
    unit_fallback: Option<f64>,
    index_fallback: usize,
}

impl ScriptedRng {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_units(mut self, units: impl IntoIterator<Item = f64>) -> Self {
        self.units.extend(units);
        self
    }

    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }

    pub fn unit_fallback(mut self, value: f64) -> Self {
        self.unit_fallback = Some(value);
        self
    }

    pub fn index_fallback(mut self, index: usize) -> Self {
        self.index_fallback = index;
        self
    }

    pub fn push_unit(&mut self, value: f64) {
        self.units.push_back(value);
    }

    pub fn push_index(&mut self, index: usize) {
        self.indices.push_back(index);
    }
}

impl RandomSource for ScriptedRng {
    fn next_unit(&mut self) -> f64 {
        self.units
            .pop_front()
            .unwrap_or(self.unit_fallback.unwrap_or(0.99))
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.indices.pop_front().unwrap_or(self.index_fallback) % len
    }
}
