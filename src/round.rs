use std::collections::HashSet;
use std::fmt;

use crate::config::RoundConfig;
use crate::level::Level;
use crate::presenter::{ClockDisplay, Presenter};
use crate::rng::RandomSource;
use crate::slot::{Slot, SlotId, SlotReport, SlotTiming};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EndReason {
    TimeUp,
    Bomb,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::TimeUp => f.write_str("out of time"),
            EndReason::Bomb => f.write_str("hit a bomb"),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RoundStats {
    pub hits: u32,
    pub misses: u32,
    /// Misses that cost time (everything but bombs).
    pub penalized_misses: u32,
    /// First taps on hard hat moles.
    pub cracks: u32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RoundSummary {
    pub score: u32,
    pub reason: EndReason,
    pub level: Level,
    pub time_remaining: f64,
    pub stats: RoundStats,
}

impl fmt::Display for RoundSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Game over ({}): score {} at {}, {} hits, {} misses ({} penalized)",
            self.reason,
            self.score,
            self.level,
            self.stats.hits,
            self.stats.misses,
            self.stats.penalized_misses
        )
    }
}

/// One board of moles plus the clock and score that go with it.
///
/// A host calls [`Round::start_round`] from its play button, [`Round::tick`]
/// once per frame and [`Round::interact`] whenever a slot is tapped.
pub struct Round<P: Presenter, R: RandomSource> {
    config: RoundConfig,
    slots: Vec<Slot>,
    active: HashSet<SlotId>,
    score: u32,
    time_remaining: f64,
    playing: bool,
    end_reason: Option<EndReason>,
    stats: RoundStats,
    presenter: P,
    rng: R,
}

impl<P: Presenter, R: RandomSource> Round<P, R> {
    pub fn new(config: RoundConfig, presenter: P, rng: R) -> anyhow::Result<Self> {
        config.validate()?;
        let timing = SlotTiming {
            reveal: config.reveal_duration,
            resolve_delay: config.resolve_delay,
        };
        let slots = (0..config.slot_count)
            .map(|i| Slot::new(SlotId::new(i), timing))
            .collect();

        Ok(Self {
            time_remaining: config.starting_time,
            config,
            slots,
            active: HashSet::new(),
            score: 0,
            playing: false,
            end_reason: None,
            stats: RoundStats::default(),
            presenter,
            rng,
        })
    }

    pub fn start_round(&mut self) {
        self.presenter.hide_banner(EndReason::TimeUp);
        self.presenter.hide_banner(EndReason::Bomb);
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.reset(SlotId::new(i), &mut self.presenter);
        }

        self.active.clear();
        self.time_remaining = self.config.starting_time;
        self.score = 0;
        self.stats = RoundStats::default();
        self.end_reason = None;
        self.playing = true;

        self.presenter.set_score_display(self.score);
        self.presenter
            .set_time_display(ClockDisplay::from_seconds(self.time_remaining));
        log::info!(
            "Round started: {} slots, {:.0}s on the clock",
            self.slots.len(),
            self.time_remaining
        );
    }

    /// Advances the round by one frame of `dt` seconds.
    /// Negative or non-finite steps are ignored.
    pub fn tick(&mut self, dt: f64) {
        if !self.playing {
            return;
        }
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("ignoring frame step of {dt}s");
            return;
        }

        self.time_remaining -= dt;
        if self.time_remaining <= 0.0 {
            self.time_remaining = 0.0;
            self.presenter.set_time_display(ClockDisplay::from_seconds(0.0));
            self.end_round(EndReason::TimeUp);
            return;
        }
        self.presenter
            .set_time_display(ClockDisplay::from_seconds(self.time_remaining));

        self.try_spawn();

        for i in 0..self.slots.len() {
            if let Some(report) = self.slots[i].advance(dt, &mut self.presenter) {
                self.apply(report);
            }
        }
    }

    // One random pick per tick. A busy pick is simply retried next frame.
    fn try_spawn(&mut self) {
        let level = self.level();
        if self.active.len() > level.capacity() {
            return;
        }

        let id = SlotId::new(self.rng.next_index(self.slots.len()));
        let Some(slot) = self.slots.get_mut(id.index()) else {
            log::warn!("random source picked {id} outside the board");
            return;
        };
        if self.active.contains(&id) || !slot.is_available() {
            log::trace!("{id} is busy, retrying next tick");
            return;
        }
        if slot.activate(level, &mut self.rng, &mut self.presenter) {
            self.active.insert(id);
        }
    }

    /// Tap on a slot. Ignored unless the round is running and the slot holds
    /// something hittable.
    pub fn interact(&mut self, id: SlotId) {
        if !self.playing {
            return;
        }
        let Some(slot) = self.slots.get_mut(id.index()) else {
            log::warn!("tap on unknown {id}");
            return;
        };

        let lives_before = slot.lives();
        match slot.interact(&mut self.presenter) {
            Some(report) => self.apply(report),
            None => {
                if slot.lives() < lives_before {
                    self.stats.cracks += 1;
                }
            }
        }
    }

    fn apply(&mut self, report: SlotReport) {
        match report {
            SlotReport::Hit(id) => self.report_hit(id),
            SlotReport::Miss { slot, penalize } => self.report_miss(slot, penalize),
            SlotReport::Bomb(id) => {
                log::debug!("{id}: bomb tapped");
                self.report_bomb();
            }
        }
    }

    pub fn report_hit(&mut self, id: SlotId) {
        if !self.playing {
            return;
        }
        self.score += 1;
        self.time_remaining += self.config.hit_bonus;
        self.active.remove(&id);
        self.stats.hits += 1;

        self.presenter.set_score_display(self.score);
        self.presenter
            .set_time_display(ClockDisplay::from_seconds(self.time_remaining));
        log::debug!("{id}: hit, score {}", self.score);
    }

    /// The clock may dip below zero here; the next tick ends the round.
    pub fn report_miss(&mut self, id: SlotId, penalize: bool) {
        if !self.playing {
            return;
        }
        if penalize {
            self.time_remaining -= self.config.miss_penalty;
            self.stats.penalized_misses += 1;
            self.presenter
                .set_time_display(ClockDisplay::from_seconds(self.time_remaining));
        }
        self.active.remove(&id);
        self.stats.misses += 1;
        log::debug!("{id}: missed, {:.2}s left", self.time_remaining);
    }

    pub fn report_bomb(&mut self) {
        self.end_round(EndReason::Bomb);
    }

    pub fn end_round(&mut self, reason: EndReason) {
        if !self.playing {
            return;
        }
        self.playing = false;
        self.end_reason = Some(reason);
        for slot in &mut self.slots {
            slot.force_stop(&mut self.presenter);
        }
        self.active.clear();
        self.presenter.show_banner(reason);
        log::info!("Round over, {reason}. Final score {}", self.score);
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Raw clock value. A miss can leave this briefly negative until the next
    /// tick; anything shown to the player goes through [`ClockDisplay`].
    pub fn time_remaining(&self) -> f64 {
        self.time_remaining
    }

    pub fn level(&self) -> Level {
        Level::from_score(self.score, self.config.score_per_level)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, id: SlotId) -> bool {
        self.active.contains(&id)
    }

    pub fn active_slots(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.active.iter().copied()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id.index())
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn stats(&self) -> RoundStats {
        self.stats
    }

    /// `None` until a round has been played to the end.
    pub fn summary(&self) -> Option<RoundSummary> {
        if self.playing {
            return None;
        }
        self.end_reason.map(|reason| RoundSummary {
            score: self.score,
            reason,
            level: self.level(),
            time_remaining: self.time_remaining,
            stats: self.stats,
        })
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}
