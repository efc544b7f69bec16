use std::fmt;

use crate::level::Level;
use crate::presenter::Presenter;
use crate::rng::RandomSource;

/// Fixed position of a slot on the board, `0..slot_count`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(usize);

impl SlotId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Standard,
    /// Wears a hard hat, takes two taps.
    Reinforced,
    /// Ends the round when tapped. Letting it go is free.
    Bomb,
}

impl TargetKind {
    pub fn lives(self) -> u8 {
        match self {
            TargetKind::Reinforced => 2,
            TargetKind::Standard | TargetKind::Bomb => 1,
        }
    }

    /// Whether letting this target escape costs time.
    pub fn is_penalizable(self) -> bool {
        self != TargetKind::Bomb
    }

    fn roll(level: Level, rng: &mut dyn RandomSource) -> Self {
        if rng.next_unit() < level.bomb_chance() {
            TargetKind::Bomb
        } else if rng.next_unit() < level.reinforced_chance() {
            TargetKind::Reinforced
        } else {
            TargetKind::Standard
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetKind::Standard => "mole",
            TargetKind::Reinforced => "hard hat mole",
            TargetKind::Bomb => "bomb",
        };
        f.write_str(name)
    }
}

/// What a slot tells the round after a tap or a timeout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlotReport {
    Hit(SlotId),
    Miss { slot: SlotId, penalize: bool },
    Bomb(SlotId),
}

/// Coarse view of the slot state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlotStatus {
    Idle,
    Exposed,
    Resolving,
}

/// Fixed animation timings shared by every slot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SlotTiming {
    /// Seconds to slide up, and again to slide down.
    pub reveal: f64,
    /// Seconds a hit mole stays on screen before it is snapped away.
    pub resolve_delay: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ExposurePhase {
    Revealing,
    Holding,
    Hiding,
}

// Each state carries its own countdown, so replacing the state drops whatever
// was pending before.
#[derive(Copy, Clone, Debug, PartialEq)]
enum SlotState {
    Idle,
    Exposed { phase: ExposurePhase, remaining: f64 },
    Resolving { remaining: f64 },
}

pub struct Slot {
    id: SlotId,
    timing: SlotTiming,
    kind: TargetKind,
    lives: u8,
    exposure: f64,
    state: SlotState,
}

impl Slot {
    pub fn new(id: SlotId, timing: SlotTiming) -> Self {
        Self {
            id,
            timing,
            kind: TargetKind::Standard,
            lives: 0,
            exposure: 0.0,
            state: SlotState::Idle,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    /// Kind of the current (or most recent) target.
    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    /// Hold time sampled at the last activation.
    pub fn exposure_duration(&self) -> f64 {
        self.exposure
    }

    pub fn status(&self) -> SlotStatus {
        match self.state {
            SlotState::Idle => SlotStatus::Idle,
            SlotState::Exposed { .. } => SlotStatus::Exposed,
            SlotState::Resolving { .. } => SlotStatus::Resolving,
        }
    }

    pub fn is_hittable(&self) -> bool {
        matches!(self.state, SlotState::Exposed { .. })
    }

    /// A resolving slot only has a pending hide left, so it can take a new
    /// target straight away.
    pub fn is_available(&self) -> bool {
        !self.is_hittable()
    }

    /// Puts the slot back to its start-of-round state under `id`.
    pub fn reset(&mut self, id: SlotId, presenter: &mut dyn Presenter) {
        self.id = id;
        self.kind = TargetKind::Standard;
        self.lives = 0;
        self.exposure = 0.0;
        self.state = SlotState::Idle;
        presenter.hide_slot(self.id);
    }

    /// Brings up a new target. Returns false if the slot is still exposed.
    pub fn activate(
        &mut self,
        level: Level,
        rng: &mut dyn RandomSource,
        presenter: &mut dyn Presenter,
    ) -> bool {
        if !self.is_available() {
            return false;
        }

        self.kind = TargetKind::roll(level, rng);
        self.lives = self.kind.lives();
        let (min, max) = level.exposure_bounds();
        self.exposure = rng.uniform(min, max);

        // Any pending hide from a previous hit is dropped here
        self.state = SlotState::Exposed {
            phase: ExposurePhase::Revealing,
            remaining: self.timing.reveal,
        };
        presenter.set_sprite(self.id, self.kind, self.lives);
        presenter.animate_reveal(self.id, self.timing.reveal);
        log::debug!(
            "{}: {} up for {:.2}s at {}",
            self.id,
            self.kind,
            self.exposure,
            level
        );
        true
    }

    /// Handles a tap. Taps on a slot that isn't hittable are ignored.
    pub fn interact(&mut self, presenter: &mut dyn Presenter) -> Option<SlotReport> {
        if !self.is_hittable() {
            return None;
        }

        match self.kind {
            TargetKind::Reinforced if self.lives > 1 => {
                self.lives -= 1;
                presenter.set_sprite(self.id, self.kind, self.lives);
                log::debug!("{}: hard hat cracked", self.id);
                None
            }
            TargetKind::Standard | TargetKind::Reinforced => {
                self.lives = 0;
                presenter.set_sprite(self.id, self.kind, self.lives);
                self.state = SlotState::Resolving {
                    remaining: self.timing.resolve_delay,
                };
                Some(SlotReport::Hit(self.id))
            }
            // The round ends and stops every slot, nothing to do locally
            TargetKind::Bomb => Some(SlotReport::Bomb(self.id)),
        }
    }

    /// Runs the slot's countdowns forward by `dt` seconds. Time left over at
    /// the end of one phase carries into the next.
    pub fn advance(&mut self, dt: f64, presenter: &mut dyn Presenter) -> Option<SlotReport> {
        let mut dt = dt.max(0.0);
        loop {
            match &mut self.state {
                SlotState::Idle => return None,
                SlotState::Resolving { remaining } => {
                    if *remaining > dt {
                        *remaining -= dt;
                        return None;
                    }
                    self.state = SlotState::Idle;
                    presenter.hide_slot(self.id);
                    return None;
                }
                SlotState::Exposed { phase, remaining } => {
                    if *remaining > dt {
                        *remaining -= dt;
                        return None;
                    }
                    dt -= *remaining;
                    match *phase {
                        ExposurePhase::Revealing => {
                            *phase = ExposurePhase::Holding;
                            *remaining = self.exposure;
                        }
                        ExposurePhase::Holding => {
                            *phase = ExposurePhase::Hiding;
                            *remaining = self.timing.reveal;
                            presenter.animate_hide(self.id, self.timing.reveal);
                        }
                        ExposurePhase::Hiding => {
                            self.state = SlotState::Idle;
                            let penalize = self.kind.is_penalizable();
                            log::debug!("{}: {} got away", self.id, self.kind);
                            return Some(SlotReport::Miss {
                                slot: self.id,
                                penalize,
                            });
                        }
                    }
                }
            }
        }
    }

    /// Cancels whatever the slot is doing and hides it. Does nothing on an
    /// idle slot.
    pub fn force_stop(&mut self, presenter: &mut dyn Presenter) {
        if self.state == SlotState::Idle {
            return;
        }
        self.state = SlotState::Idle;
        presenter.hide_slot(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::NullPresenter;
    use crate::rng::ScriptedRng;

    const TIMING: SlotTiming = SlotTiming {
        reveal: 0.5,
        resolve_delay: 0.25,
    };

    fn slot() -> Slot {
        Slot::new(SlotId::new(3), TIMING)
    }

    // bomb roll, reinforced roll, exposure roll
    fn rng_for(kind: TargetKind) -> ScriptedRng {
        let units = match kind {
            TargetKind::Bomb => vec![0.0, 0.0],
            TargetKind::Reinforced => vec![0.99, 0.0, 0.0],
            TargetKind::Standard => vec![0.99, 0.99, 0.0],
        };
        ScriptedRng::new().with_units(units)
    }

    fn activated(kind: TargetKind) -> Slot {
        let mut slot = slot();
        let mut rng = rng_for(kind);
        assert!(slot.activate(Level::new(10), &mut rng, &mut NullPresenter));
        assert_eq!(slot.kind(), kind);
        slot
    }

    #[test]
    fn level_zero_only_spawns_standard_moles() {
        let mut slot = slot();
        let mut rng = ScriptedRng::new().with_units([0.0, 0.0, 0.5]);
        assert!(slot.activate(Level::new(0), &mut rng, &mut NullPresenter));
        assert_eq!(slot.kind(), TargetKind::Standard);
        assert_eq!(slot.lives(), 1);
        assert_eq!(slot.exposure_duration(), 1.5);
        assert!(slot.is_hittable());
    }

    #[test]
    fn exposed_slot_rejects_activation() {
        let mut slot = activated(TargetKind::Standard);
        let mut rng = ScriptedRng::new();
        assert!(!slot.activate(Level::new(0), &mut rng, &mut NullPresenter));
    }

    #[test]
    fn miss_reported_after_reveal_hold_and_hide() {
        let mut slot = activated(TargetKind::Standard);
        let exposure = slot.exposure_duration();
        let total = TIMING.reveal * 2.0 + exposure;

        assert_eq!(slot.advance(total - 0.05, &mut NullPresenter), None);
        assert!(slot.is_hittable());
        assert_eq!(
            slot.advance(0.1, &mut NullPresenter),
            Some(SlotReport::Miss {
                slot: SlotId::new(3),
                penalize: true
            })
        );
        assert_eq!(slot.status(), SlotStatus::Idle);
    }

    #[test]
    fn escaped_bomb_is_not_penalized() {
        let mut slot = activated(TargetKind::Bomb);
        let report = slot.advance(10.0, &mut NullPresenter);
        assert_eq!(
            report,
            Some(SlotReport::Miss {
                slot: SlotId::new(3),
                penalize: false
            })
        );
    }

    #[test]
    fn standard_hit_resolves_then_hides() {
        let mut slot = activated(TargetKind::Standard);
        assert_eq!(
            slot.interact(&mut NullPresenter),
            Some(SlotReport::Hit(SlotId::new(3)))
        );
        assert_eq!(slot.status(), SlotStatus::Resolving);
        assert!(!slot.is_hittable());
        assert_eq!(slot.interact(&mut NullPresenter), None);

        assert_eq!(slot.advance(0.2, &mut NullPresenter), None);
        assert_eq!(slot.status(), SlotStatus::Resolving);
        assert_eq!(slot.advance(0.1, &mut NullPresenter), None);
        assert_eq!(slot.status(), SlotStatus::Idle);
    }

    #[test]
    fn reinforced_needs_two_taps() {
        let mut slot = activated(TargetKind::Reinforced);
        assert_eq!(slot.lives(), 2);
        assert_eq!(slot.interact(&mut NullPresenter), None);
        assert_eq!(slot.lives(), 1);
        assert!(slot.is_hittable());
        assert_eq!(
            slot.interact(&mut NullPresenter),
            Some(SlotReport::Hit(SlotId::new(3)))
        );
        assert_eq!(slot.lives(), 0);
    }

    #[test]
    fn cracked_reinforced_that_escapes_is_a_miss() {
        let mut slot = activated(TargetKind::Reinforced);
        assert_eq!(slot.interact(&mut NullPresenter), None);
        assert!(matches!(
            slot.advance(10.0, &mut NullPresenter),
            Some(SlotReport::Miss { penalize: true, .. })
        ));
    }

    #[test]
    fn bomb_tap_reports_bomb() {
        let mut slot = activated(TargetKind::Bomb);
        assert_eq!(
            slot.interact(&mut NullPresenter),
            Some(SlotReport::Bomb(SlotId::new(3)))
        );
    }

    #[test]
    fn reactivation_during_resolve_skips_the_hide() {
        let mut slot = activated(TargetKind::Standard);
        slot.interact(&mut NullPresenter);
        assert!(slot.is_available());

        let mut rng = rng_for(TargetKind::Standard);
        assert!(slot.activate(Level::new(0), &mut rng, &mut NullPresenter));
        // Well past the old resolve delay but still revealing
        assert_eq!(slot.advance(0.3, &mut NullPresenter), None);
        assert_eq!(slot.status(), SlotStatus::Exposed);
        assert!(slot.is_hittable());
    }

    #[test]
    fn force_stop_is_idempotent() {
        let mut idle = slot();
        idle.force_stop(&mut NullPresenter);
        assert_eq!(idle.status(), SlotStatus::Idle);

        let mut slot = activated(TargetKind::Reinforced);
        slot.force_stop(&mut NullPresenter);
        assert_eq!(slot.status(), SlotStatus::Idle);
        assert!(!slot.is_hittable());
        slot.force_stop(&mut NullPresenter);
        assert_eq!(slot.status(), SlotStatus::Idle);
        assert_eq!(slot.advance(5.0, &mut NullPresenter), None);
        assert_eq!(slot.interact(&mut NullPresenter), None);
    }
}
