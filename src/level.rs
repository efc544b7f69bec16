// Chances grow by 2.5% per level, i.e. one fortieth.
const CHANCE_LEVELS: f64 = 40.0;
const MAX_BOMB_CHANCE: f64 = 0.25;
const MAX_REINFORCED_CHANCE: f64 = 1.0;

// Exposure bounds shrink by 0.1s per level and never drop below the floor.
const EXPOSURE_LEVELS: f64 = 10.0;
const EXPOSURE_MIN_START: f64 = 1.0;
const EXPOSURE_MAX_START: f64 = 2.0;
const EXPOSURE_FLOOR: f64 = 0.01;

/// Difficulty level, derived from the score. Drives how many moles may be up
/// at once and what kind of mole comes up next.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Level {
    index: u32,
}

impl Level {
    pub fn new(index: u32) -> Self {
        Self { index }
    }

    pub fn from_score(score: u32, score_per_level: u32) -> Self {
        Self::new(score.checked_div(score_per_level).unwrap_or(0))
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Spawning is allowed while the active count is `<=` this, so level 0
    /// still gets one mole.
    pub fn capacity(&self) -> usize {
        self.index as usize
    }

    pub fn bomb_chance(&self) -> f64 {
        (self.index as f64 / CHANCE_LEVELS).min(MAX_BOMB_CHANCE)
    }

    /// Only rolled when the bomb roll failed.
    pub fn reinforced_chance(&self) -> f64 {
        (self.index as f64 / CHANCE_LEVELS).min(MAX_REINFORCED_CHANCE)
    }

    /// Inclusive range the exposure duration is sampled from. No cap on how
    /// fast it gets apart from the floor.
    pub fn exposure_bounds(&self) -> (f64, f64) {
        let step = self.index as f64 / EXPOSURE_LEVELS;
        let max = (EXPOSURE_MAX_START - step).clamp(EXPOSURE_FLOOR, EXPOSURE_MAX_START);
        let min = (EXPOSURE_MIN_START - step).clamp(EXPOSURE_FLOOR, EXPOSURE_MIN_START);
        (min.min(max), max)
    }

    pub fn make_level_list(number_of_levels: u32) -> Vec<Self> {
        (0..number_of_levels).map(Self::new).collect()
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "level {}", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_zero_is_gentle() {
        let level = Level::new(0);
        assert_eq!(level.capacity(), 0);
        assert_eq!(level.bomb_chance(), 0.0);
        assert_eq!(level.reinforced_chance(), 0.0);
        assert_eq!(level.exposure_bounds(), (1.0, 2.0));
    }

    #[test]
    fn level_ten_hits_the_bomb_cap() {
        let level = Level::new(10);
        assert_eq!(level.bomb_chance(), 0.25);
        assert_eq!(level.reinforced_chance(), 0.25);
        assert_eq!(level.exposure_bounds(), (0.01, 1.0));
    }

    #[test]
    fn chances_are_capped() {
        let level = Level::new(100);
        assert_eq!(level.bomb_chance(), 0.25);
        assert_eq!(level.reinforced_chance(), 1.0);
        let (min, max) = level.exposure_bounds();
        assert_eq!(min, 0.01);
        assert_eq!(max, 0.01);
    }

    #[test]
    fn from_score_uses_integer_division() {
        assert_eq!(Level::from_score(9, 10).index(), 0);
        assert_eq!(Level::from_score(10, 10).index(), 1);
        assert_eq!(Level::from_score(39, 10).index(), 3);
        assert_eq!(Level::from_score(5, 0).index(), 0);
    }

    #[test]
    fn level_list_bounds_never_cross() {
        for level in Level::make_level_list(40) {
            let (min, max) = level.exposure_bounds();
            assert!(min <= max, "{level}: {min} > {max}");
            assert!(min >= 0.01);
        }
    }
}
