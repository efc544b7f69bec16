use anyhow::{ensure, Context};

/// Optional fixed RNG seed for the simulated round.
pub const SEED_ENV: &str = "WHACK_SEED";

pub const DEFAULT_SLOT_COUNT: usize = 9;
pub const STARTING_TIME_SECONDS: f64 = 30.0;
pub const HIT_BONUS_SECONDS: f64 = 1.0;
pub const MISS_PENALTY_SECONDS: f64 = 2.0;
pub const REVEAL_DURATION_SECONDS: f64 = 0.5;
pub const RESOLVE_DELAY_SECONDS: f64 = 0.25;
pub const SCORE_PER_LEVEL: u32 = 10;

/// Tunables for a round. The defaults are the classic game.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundConfig {
    pub slot_count: usize,
    pub starting_time: f64,
    /// Seconds added to the clock per hit.
    pub hit_bonus: f64,
    /// Seconds taken off the clock when a mole gets away.
    pub miss_penalty: f64,
    pub reveal_duration: f64,
    pub resolve_delay: f64,
    pub score_per_level: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            slot_count: DEFAULT_SLOT_COUNT,
            starting_time: STARTING_TIME_SECONDS,
            hit_bonus: HIT_BONUS_SECONDS,
            miss_penalty: MISS_PENALTY_SECONDS,
            reveal_duration: REVEAL_DURATION_SECONDS,
            resolve_delay: RESOLVE_DELAY_SECONDS,
            score_per_level: SCORE_PER_LEVEL,
        }
    }
}

impl RoundConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.slot_count > 0, "a round needs at least one slot");
        ensure!(
            self.starting_time.is_finite() && self.starting_time > 0.0,
            "starting time must be a positive number of seconds, got {}",
            self.starting_time
        );
        for (name, value) in [
            ("hit bonus", self.hit_bonus),
            ("miss penalty", self.miss_penalty),
            ("reveal duration", self.reveal_duration),
            ("resolve delay", self.resolve_delay),
        ] {
            ensure!(
                value.is_finite() && value >= 0.0,
                "{name} must be zero or more seconds, got {value}"
            );
        }
        ensure!(self.score_per_level > 0, "score per level must be non-zero");
        Ok(())
    }
}

/// Reads [`SEED_ENV`]. Unset means "seed from entropy".
pub fn seed_from_env() -> anyhow::Result<Option<u64>> {
    match std::env::var(SEED_ENV) {
        Ok(raw) => parse_seed(&raw).map(Some),
        Err(_) => Ok(None),
    }
}

pub fn parse_seed(raw: &str) -> anyhow::Result<u64> {
    raw.trim()
        .parse()
        .with_context(|| format!("{SEED_ENV} must be an unsigned integer, got {raw:?}"))
}
