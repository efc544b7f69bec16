use anyhow::Context;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod autoplay;
pub mod config;
pub mod level;
pub mod presenter;
pub mod rng;
pub mod round;
pub mod slot;

pub use autoplay::{simulate_round, AutoPlayer, PlayerProfile};
pub use config::RoundConfig;
pub use level::Level;
pub use presenter::{ClockDisplay, LogPresenter, NullPresenter, Presenter};
pub use rng::{GameRng, RandomSource, ScriptedRng};
pub use round::{EndReason, Round, RoundStats, RoundSummary};
pub use slot::{Slot, SlotId, SlotReport, SlotStatus, TargetKind};

// The game: moles pop up in random holes and have to be tapped before they duck back down.
// Every hit scores a point and adds a second to the clock, every mole that gets away takes two.
// Tapping a bomb ends the round on the spot. Every 10 points one more mole may be up at once,
// and the moles get faster, tougher and more likely to be bombs.

/// Frame step used by the headless round.
const FRAME_SECONDS: f64 = 1.0 / 60.0;

fn init_logger() -> anyhow::Result<()> {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            console_log::init_with_level(log::Level::Info).context("Couldn't initialize logger")?;
        } else {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .try_init()
                .context("Couldn't initialize logger")?;
        }
    }
    Ok(())
}

/// Plays one round with a simulated player, logging everything the screen
/// would show, and returns how it went.
pub fn run() -> anyhow::Result<RoundSummary> {
    init_logger()?;

    let seed = config::seed_from_env()?;
    let (board_rng, player_rng) = match seed {
        Some(seed) => {
            log::info!("Using seed {seed}");
            (GameRng::from_seed(seed), GameRng::from_seed(seed.wrapping_add(1)))
        }
        None => (GameRng::from_entropy(), GameRng::from_entropy()),
    };

    let mut round = Round::new(RoundConfig::default(), LogPresenter::new(), board_rng)?;
    let mut player = AutoPlayer::new(PlayerProfile::default(), player_rng);

    let start_time = web_time::Instant::now();
    let summary = simulate_round(&mut round, &mut player, FRAME_SECONDS)?;
    log::info!("Simulated round in {:?}", start_time.elapsed());
    Ok(summary)
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub fn start() {
    match run() {
        Ok(summary) => log::info!("{summary}"),
        Err(err) => log::error!("{err:#}"),
    }
}
