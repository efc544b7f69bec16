use std::fmt;

use crate::round::EndReason;
use crate::slot::{SlotId, TargetKind};

/// Remaining round time as shown to the player, `m:ss`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClockDisplay {
    seconds: u32,
}

impl ClockDisplay {
    /// Truncates to whole seconds. Negative time shows as `0:00`.
    pub fn from_seconds(seconds: f64) -> Self {
        Self {
            seconds: seconds.max(0.0) as u32,
        }
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }
}

impl fmt::Display for ClockDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.seconds / 60, self.seconds % 60)
    }
}

/// Everything the round needs from whoever draws the game. None of these
/// calls feed back into gameplay, so every method defaults to doing nothing.
pub trait Presenter {
    fn show_banner(&mut self, _banner: EndReason) {}

    fn hide_banner(&mut self, _banner: EndReason) {}

    fn set_score_display(&mut self, _score: u32) {}

    /// Called every tick while the round is running.
    fn set_time_display(&mut self, _clock: ClockDisplay) {}

    /// Slide the mole up over `duration` seconds.
    fn animate_reveal(&mut self, _slot: SlotId, _duration: f64) {}

    /// Slide the mole back down over `duration` seconds.
    fn animate_hide(&mut self, _slot: SlotId, _duration: f64) {}

    /// Snap the slot to hidden.
    fn hide_slot(&mut self, _slot: SlotId) {}

    /// `lives == 0` means the mole has just been hit.
    fn set_sprite(&mut self, _slot: SlotId, _kind: TargetKind, _lives: u8) {}
}

/// Draws nothing. Handy for simulations.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}

/// Writes every presentation call to the log instead of the screen.
#[derive(Debug, Default)]
pub struct LogPresenter {
    last_clock: Option<ClockDisplay>,
}

impl LogPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter for LogPresenter {
    fn show_banner(&mut self, banner: EndReason) {
        log::info!("banner: {banner}");
    }

    fn hide_banner(&mut self, banner: EndReason) {
        log::trace!("hide banner: {banner}");
    }

    fn set_score_display(&mut self, score: u32) {
        log::info!("score: {score}");
    }

    fn set_time_display(&mut self, clock: ClockDisplay) {
        // The clock is pushed every frame, only log when the text changes
        if self.last_clock != Some(clock) {
            self.last_clock = Some(clock);
            log::info!("time: {clock}");
        }
    }

    fn animate_reveal(&mut self, slot: SlotId, duration: f64) {
        log::debug!("{slot}: reveal over {duration:.2}s");
    }

    fn animate_hide(&mut self, slot: SlotId, duration: f64) {
        log::debug!("{slot}: hide over {duration:.2}s");
    }

    fn hide_slot(&mut self, slot: SlotId) {
        log::trace!("{slot}: hidden");
    }

    fn set_sprite(&mut self, slot: SlotId, kind: TargetKind, lives: u8) {
        if lives == 0 {
            log::debug!("{slot}: {kind} hit");
        } else {
            log::debug!("{slot}: {kind} ({lives} lives)");
        }
    }
}
