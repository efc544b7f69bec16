//! A simulated player and a fixed-step loop to run a round without a screen.

use anyhow::{ensure, Context};

use crate::presenter::Presenter;
use crate::rng::RandomSource;
use crate::round::{Round, RoundSummary};
use crate::slot::{SlotId, TargetKind};

/// Simulated rounds give up after this much game time.
pub const MAX_SIMULATED_SECONDS: f64 = 3600.0;

/// Smallest frame step a simulation accepts, one tenth of a millisecond.
pub const MIN_FRAME_SECONDS: f64 = 1e-4;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlayerProfile {
    /// Seconds between a mole becoming tappable and the player tapping it.
    pub reaction_time: f64,
    /// Chance that a tap actually lands.
    pub accuracy: f64,
    /// Chance of recognising a bomb and leaving it alone.
    pub bomb_avoidance: f64,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            reaction_time: 0.45,
            accuracy: 0.9,
            bomb_avoidance: 0.95,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Watch {
    Away,
    Aiming(f64),
    Ignoring,
}

pub struct AutoPlayer<R: RandomSource> {
    profile: PlayerProfile,
    rng: R,
    watches: Vec<Watch>,
}

impl<R: RandomSource> AutoPlayer<R> {
    pub fn new(profile: PlayerProfile, rng: R) -> Self {
        Self {
            profile,
            rng,
            watches: Vec::new(),
        }
    }

    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    /// Looks at the board after `dt` seconds and taps whatever the player has
    /// had time to react to. Returns the number of taps attempted.
    pub fn act<P: Presenter, G: RandomSource>(
        &mut self,
        round: &mut Round<P, G>,
        dt: f64,
    ) -> usize {
        self.watches.resize(round.slots().len(), Watch::Away);

        let mut taps: Vec<SlotId> = Vec::new();
        for slot in round.slots() {
            let watch = &mut self.watches[slot.id().index()];
            if !slot.is_hittable() {
                *watch = Watch::Away;
                continue;
            }
            match *watch {
                Watch::Away => {
                    let spotted_bomb = slot.kind() == TargetKind::Bomb
                        && self.rng.next_unit() < self.profile.bomb_avoidance;
                    *watch = if spotted_bomb {
                        Watch::Ignoring
                    } else {
                        Watch::Aiming(0.0)
                    };
                }
                Watch::Aiming(waited) => {
                    let waited = waited + dt;
                    if waited >= self.profile.reaction_time {
                        taps.push(slot.id());
                        *watch = Watch::Aiming(0.0);
                    } else {
                        *watch = Watch::Aiming(waited);
                    }
                }
                Watch::Ignoring => {}
            }
        }

        for id in &taps {
            if self.rng.next_unit() < self.profile.accuracy {
                round.interact(*id);
            } else {
                log::trace!("{id}: tap went wide");
            }
        }
        taps.len()
    }
}

/// Starts `round` and plays it to the end at a fixed `frame_dt`, with
/// `player` tapping between frames.
pub fn simulate_round<P, R, B>(
    round: &mut Round<P, R>,
    player: &mut AutoPlayer<B>,
    frame_dt: f64,
) -> anyhow::Result<RoundSummary>
where
    P: Presenter,
    R: RandomSource,
    B: RandomSource,
{
    ensure!(
        frame_dt.is_finite() && frame_dt >= MIN_FRAME_SECONDS,
        "frame step must be at least {MIN_FRAME_SECONDS}s, got {frame_dt}"
    );
    let max_frames = (MAX_SIMULATED_SECONDS / frame_dt).ceil() as u64;

    round.start_round();
    let mut frames = 0u64;
    while round.is_playing() && frames < max_frames {
        round.tick(frame_dt);
        if round.is_playing() {
            player.act(round, frame_dt);
        }
        frames += 1;
    }
    log::debug!("Simulation stopped after {frames} frames");

    round
        .summary()
        .with_context(|| format!("round still running after {max_frames} frames"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoundConfig;
    use crate::presenter::NullPresenter;
    use crate::rng::{GameRng, ScriptedRng};
    use crate::round::EndReason;

    const FRAME: f64 = 1.0 / 60.0;

    #[test]
    fn player_waits_for_reaction_time() {
        let rng = ScriptedRng::new().with_indices([0]);
        let mut round = Round::new(RoundConfig::default(), NullPresenter, rng).unwrap();
        let profile = PlayerProfile {
            reaction_time: 0.1,
            accuracy: 1.0,
            bomb_avoidance: 1.0,
        };
        let mut player = AutoPlayer::new(profile, ScriptedRng::new().unit_fallback(0.0));

        round.start_round();
        round.tick(0.05);
        assert_eq!(player.act(&mut round, 0.05), 0); // spotted
        assert_eq!(player.act(&mut round, 0.05), 0);
        assert_eq!(player.act(&mut round, 0.05), 1);
        assert_eq!(round.score(), 1);
    }

    #[test]
    fn hopeless_player_runs_out_of_time() {
        let mut round =
            Round::new(RoundConfig::default(), NullPresenter, GameRng::from_seed(7)).unwrap();
        let profile = PlayerProfile {
            accuracy: 0.0,
            ..Default::default()
        };
        let mut player = AutoPlayer::new(profile, GameRng::from_seed(8));

        let summary = simulate_round(&mut round, &mut player, FRAME).unwrap();
        assert_eq!(summary.reason, EndReason::TimeUp);
        assert_eq!(summary.score, 0);
        assert_eq!(summary.stats.hits, 0);
        assert!(summary.stats.penalized_misses > 0);
        assert_eq!(summary.time_remaining, 0.0);
    }

    #[test]
    fn seeded_simulation_is_reproducible() {
        let play = || {
            let mut round =
                Round::new(RoundConfig::default(), NullPresenter, GameRng::from_seed(42)).unwrap();
            let mut player = AutoPlayer::new(PlayerProfile::default(), GameRng::from_seed(43));
            simulate_round(&mut round, &mut player, FRAME).unwrap()
        };
        let first = play();
        assert_eq!(first, play());
        assert_eq!(first.score, first.stats.hits);
    }

    #[test]
    fn rejects_bad_frame_step() {
        let mut round =
            Round::new(RoundConfig::default(), NullPresenter, GameRng::from_seed(1)).unwrap();
        let mut player = AutoPlayer::new(PlayerProfile::default(), GameRng::from_seed(2));
        assert!(simulate_round(&mut round, &mut player, 0.0).is_err());
        assert!(simulate_round(&mut round, &mut player, f64::NAN).is_err());
        assert!(simulate_round(&mut round, &mut player, f64::MIN_POSITIVE).is_err());
        assert!(simulate_round(&mut round, &mut player, 1e-9).is_err());
        assert!(!round.is_playing());
    }
}
