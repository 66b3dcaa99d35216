//! Spark scheduling along a connection curve.
//!
//! Two strategies exist and one is chosen per connection when it is built:
//!
//! - **Fixed phase**: `N` sparks loop forever at evenly spaced phases. The
//!   positions depend only on elapsed time, so any frame can be replayed.
//! - **Emission**: sparks are spawned over time at a rate proportional to the
//!   spark count and speed, travel the curve once and disappear on arrival.
//!   Fractional spawns are resolved with one Bernoulli trial per tick on a
//!   seeded RNG, so runs are reproducible for a given seed.
//!
//! Progress values are curve parameters in `[0, 1)`.

use crate::constants::MAX_SPAWN_PER_TICK;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Settings for the emission strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionOptions {
    /// Multiplier applied to the expected spawn rate. Negative or non-finite values are treated as 0.
    pub emit_mult: f64,
    /// Maximum concurrently live sparks; 0 means unbounded.
    pub max_live: usize,
}

impl Default for EmissionOptions {
    fn default() -> Self {
        Self {
            emit_mult: 1.0,
            max_live: 0,
        }
    }
}

/// Which spawn discipline a connection uses.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SparkMode {
    /// Evenly spaced sparks looping forever.
    #[default]
    FixedPhase,
    /// Randomized one-shot sparks.
    Emission(EmissionOptions),
}

#[derive(Debug)]
enum Strategy {
    FixedPhase {
        phases: Vec<f64>,
    },
    Emission {
        live: Vec<f64>,
        accumulator: f64,
        emit_mult: f64,
        max_live: usize,
        rng: StdRng,
    },
}

/// Per-connection spark state.
#[derive(Debug)]
pub struct SparkScheduler {
    count: usize,
    speed: f64,
    strategy: Strategy,
}

impl SparkScheduler {
    /// Build a scheduler for `count` sparks moving at `speed` curve units per second.
    ///
    /// A negative or non-finite speed or emission multiplier counts as 0.
    /// `seed` only matters for the emission strategy.
    pub fn new(count: usize, speed: f64, mode: SparkMode, seed: u64) -> Self {
        let speed = finite_non_negative(speed);
        let strategy = match mode {
            SparkMode::FixedPhase => Strategy::FixedPhase {
                phases: (0..count)
                    .map(|i| i as f64 / count.max(1) as f64)
                    .collect(),
            },
            SparkMode::Emission(opts) => Strategy::Emission {
                live: Vec::new(),
                accumulator: 0.0,
                emit_mult: finite_non_negative(opts.emit_mult),
                max_live: opts.max_live,
                rng: StdRng::seed_from_u64(seed),
            },
        };
        Self {
            count,
            speed,
            strategy,
        }
    }

    /// Configured spark count.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Configured speed in curve units per second.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// True when nothing will ever be drawn.
    pub fn is_idle(&self) -> bool {
        self.count == 0 || self.speed <= 0.0
    }

    /// True for the emission strategy.
    pub fn is_emitter(&self) -> bool {
        matches!(self.strategy, Strategy::Emission { .. })
    }

    /// Sparks currently alive in emission mode; the configured count otherwise.
    pub fn live_count(&self) -> usize {
        match &self.strategy {
            Strategy::FixedPhase { phases } => phases.len(),
            Strategy::Emission { live, .. } => live.len(),
        }
    }

    /// Advance by one frame and return the progress of every spark to draw.
    ///
    /// `elapsed` is the total running time in seconds (used by the fixed-phase
    /// loop), `dt` the time since the previous frame (used by emission).
    pub fn advance(&mut self, elapsed: f64, dt: f64) -> Vec<f64> {
        if self.is_idle() {
            return Vec::new();
        }
        let speed = self.speed;
        let count = self.count as f64;
        match &mut self.strategy {
            Strategy::FixedPhase { phases } => phases
                .iter()
                .map(|phase| (phase + elapsed * speed).rem_euclid(1.0))
                .collect(),
            Strategy::Emission {
                live,
                accumulator,
                emit_mult,
                max_live,
                rng,
            } => {
                let dt = finite_non_negative(dt);
                *accumulator += count * speed * *emit_mult * dt;

                let whole = accumulator.floor();
                let remainder = *accumulator - whole;
                let extra = usize::from(remainder > 0.0 && rng.random::<f64>() < remainder);
                *accumulator = 0.0;

                let room = if *max_live > 0 {
                    max_live.saturating_sub(live.len())
                } else {
                    MAX_SPAWN_PER_TICK
                };
                let to_spawn = (whole.min(room as f64) as usize + extra).min(room);
                live.extend(std::iter::repeat_n(0.0, to_spawn));

                let step = speed * dt;
                live.retain_mut(|t| {
                    *t += step;
                    *t < 1.0
                });
                live.clone()
            }
        }
    }
}

fn finite_non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
