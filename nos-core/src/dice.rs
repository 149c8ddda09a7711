//! Dice rolling for the combat engine.
//!
//! Single dice, pools of dice with keep-highest/keep-lowest, and the
//! situational d20 modes (advantage, disadvantage, elven accuracy).

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for dice rolling.
#[derive(Debug, Error)]
pub enum DiceError {
    #[error("cannot keep both the highest and lowest dice of a pool")]
    ConflictingKeep,
}

/// Situational modifier for a d20 roll: how many dice are drawn and
/// which one is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Situation {
    #[default]
    Normal,
    /// Roll twice, keep the higher.
    Advantage,
    /// Roll twice, keep the lower.
    Disadvantage,
    /// Roll three times, keep the highest.
    ElvenAccuracy,
}

impl Situation {
    /// Combine two situations. Any form of advantage cancels against
    /// disadvantage; elven accuracy wins over plain advantage.
    pub fn combine(self, other: Situation) -> Situation {
        use Situation::*;
        match (self, other) {
            (Normal, x) | (x, Normal) => x,
            (Disadvantage, Disadvantage) => Disadvantage,
            (Advantage | ElvenAccuracy, Disadvantage)
            | (Disadvantage, Advantage | ElvenAccuracy) => Normal,
            (ElvenAccuracy, _) | (_, ElvenAccuracy) => ElvenAccuracy,
            (Advantage, Advantage) => Advantage,
        }
    }
}

/// A single die with a fixed number of sides.
///
/// Sides must be at least 1; rolling a zero-sided die is a programmer error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Die {
    pub sides: u32,
}

pub const COIN: Die = Die { sides: 2 };
pub const D2: Die = COIN;
pub const D3: Die = Die { sides: 3 };
pub const D4: Die = Die { sides: 4 };
pub const D6: Die = Die { sides: 6 };
pub const D8: Die = Die { sides: 8 };
pub const D10: Die = Die { sides: 10 };
pub const D12: Die = Die { sides: 12 };
pub const D20: Die = Die { sides: 20 };
pub const D100: Die = Die { sides: 100 };

impl Die {
    pub const fn new(sides: u32) -> Die {
        Die { sides }
    }

    /// Roll once, uniform in `[1, sides]`.
    pub fn roll(&self) -> u32 {
        self.roll_with_rng(&mut rand::thread_rng())
    }

    /// Roll with a specific RNG (useful for testing).
    pub fn roll_with_rng<R: Rng>(&self, rng: &mut R) -> u32 {
        rng.gen_range(1..=self.sides)
    }

    /// Roll under a situation. Every extra die is an independent draw.
    pub fn roll_situation(&self, situation: Situation) -> u32 {
        self.roll_situation_with_rng(&mut rand::thread_rng(), situation)
    }

    pub fn roll_situation_with_rng<R: Rng>(&self, rng: &mut R, situation: Situation) -> u32 {
        let first = self.roll_with_rng(rng);
        match situation {
            Situation::Normal => first,
            Situation::Advantage => first.max(self.roll_with_rng(rng)),
            Situation::Disadvantage => first.min(self.roll_with_rng(rng)),
            Situation::ElvenAccuracy => first
                .max(self.roll_with_rng(rng))
                .max(self.roll_with_rng(rng)),
        }
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides)
    }
}

/// A pool of dice rolled together, e.g. the 2d6 of a greatsword.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DicePool {
    pub dice: Vec<Die>,
}

impl DicePool {
    pub fn new(dice: Vec<Die>) -> DicePool {
        DicePool { dice }
    }

    /// A pool of `count` identical dice.
    pub fn of(count: usize, die: Die) -> DicePool {
        DicePool {
            dice: vec![die; count],
        }
    }

    /// Roll every die once and sum the results.
    pub fn roll(&self) -> u32 {
        self.roll_with_rng(&mut rand::thread_rng())
    }

    pub fn roll_with_rng<R: Rng>(&self, rng: &mut R) -> u32 {
        self.dice.iter().map(|die| die.roll_with_rng(rng)).sum()
    }

    /// Roll every die once, keep only the `keep_highest` highest or the
    /// `keep_lowest` lowest results, and sum the kept subset.
    ///
    /// Asking for both at once is an error. A keep count of zero keeps
    /// nothing (the sum is 0); a count larger than the pool keeps the
    /// whole pool. When both are supplied and one is zero, the highest
    /// count takes precedence.
    pub fn roll_keeping(
        &self,
        keep_highest: Option<usize>,
        keep_lowest: Option<usize>,
    ) -> Result<u32, DiceError> {
        self.roll_keeping_with_rng(&mut rand::thread_rng(), keep_highest, keep_lowest)
    }

    pub fn roll_keeping_with_rng<R: Rng>(
        &self,
        rng: &mut R,
        keep_highest: Option<usize>,
        keep_lowest: Option<usize>,
    ) -> Result<u32, DiceError> {
        if keep_highest.is_some_and(|keep| keep > 0) && keep_lowest.is_some_and(|keep| keep > 0) {
            return Err(DiceError::ConflictingKeep);
        }

        let mut rolls: Vec<u32> = self.dice.iter().map(|die| die.roll_with_rng(rng)).collect();
        if let Some(keep) = keep_highest {
            rolls.sort_unstable_by(|a, b| b.cmp(a));
            rolls.truncate(keep);
        } else if let Some(keep) = keep_lowest {
            rolls.sort_unstable();
            rolls.truncate(keep);
        }

        Ok(rolls.into_iter().sum())
    }

    /// The highest total the pool can roll: the sum of every die's max face.
    pub fn max_total(&self) -> u32 {
        self.dice.iter().map(|die| die.sides).sum()
    }
}

impl fmt::Display for DicePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.dice.iter().map(Die::to_string).collect();
        write!(f, "{}", parts.join(" + "))
    }
}

/// Convenience function to roll a single die by side count.
pub fn roll_die(sides: u32) -> u32 {
    Die::new(sides).roll()
}

/// Roll a single die under a situation.
pub fn roll_die_with_situation(sides: u32, situation: Situation) -> u32 {
    Die::new(sides).roll_situation(situation)
}

/// Roll a pool of dice with optional keep-highest/keep-lowest filtering.
pub fn roll_pool(
    dice: &[Die],
    keep_highest: Option<usize>,
    keep_lowest: Option<usize>,
) -> Result<u32, DiceError> {
    DicePool::new(dice.to_vec()).roll_keeping(keep_highest, keep_lowest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_roll_range() {
        for _ in 0..100 {
            let result = D20.roll();
            assert!((1..=20).contains(&result));
        }
    }

    #[test]
    fn test_roll_die_range() {
        for _ in 0..100 {
            let result = roll_die(6);
            assert!((1..=6).contains(&result));
        }
    }

    #[test]
    fn test_advantage_keeps_higher_of_two() {
        // Replaying the same seed shows which component rolls were drawn.
        for seed in 0..20 {
            let advantage =
                D20.roll_situation_with_rng(&mut StdRng::seed_from_u64(seed), Situation::Advantage);
            let mut replay = StdRng::seed_from_u64(seed);
            let first = D20.roll_with_rng(&mut replay);
            let second = D20.roll_with_rng(&mut replay);
            assert_eq!(advantage, first.max(second));
            assert!(advantage >= first && advantage >= second);
        }
    }

    #[test]
    fn test_disadvantage_keeps_lower_of_two() {
        for seed in 0..20 {
            let disadvantage = D20
                .roll_situation_with_rng(&mut StdRng::seed_from_u64(seed), Situation::Disadvantage);
            let mut replay = StdRng::seed_from_u64(seed);
            let first = D20.roll_with_rng(&mut replay);
            let second = D20.roll_with_rng(&mut replay);
            assert_eq!(disadvantage, first.min(second));
            assert!(disadvantage <= first && disadvantage <= second);
        }
    }

    #[test]
    fn test_elven_accuracy_keeps_highest_of_three() {
        for seed in 0..20 {
            let result = D20
                .roll_situation_with_rng(&mut StdRng::seed_from_u64(seed), Situation::ElvenAccuracy);
            let mut replay = StdRng::seed_from_u64(seed);
            let draws = [
                D20.roll_with_rng(&mut replay),
                D20.roll_with_rng(&mut replay),
                D20.roll_with_rng(&mut replay),
            ];
            assert_eq!(result, draws.into_iter().max().unwrap());
        }
    }

    #[test]
    fn test_pool_roll_range() {
        let pool = DicePool::of(2, D6);
        for _ in 0..100 {
            let result = pool.roll();
            assert!((2..=12).contains(&result));
        }
    }

    #[test]
    fn test_conflicting_keep() {
        let pool = DicePool::of(4, D6);
        assert!(matches!(
            pool.roll_keeping(Some(3), Some(1)),
            Err(DiceError::ConflictingKeep)
        ));

        // A zero keep count on one side is not a conflict.
        assert!(pool.roll_keeping(Some(0), Some(2)).is_ok());
        assert!(pool.roll_keeping(None, Some(2)).is_ok());
    }

    #[test]
    fn test_keep_zero_is_empty_sum() {
        let pool = DicePool::of(3, D6);
        assert_eq!(pool.roll_keeping(Some(0), None).unwrap(), 0);
        assert_eq!(pool.roll_keeping(None, Some(0)).unwrap(), 0);
    }

    #[test]
    fn test_keep_more_than_pool_keeps_whole_pool() {
        let pool = DicePool::of(2, D6);
        let mut rng = StdRng::seed_from_u64(11);
        let kept = pool
            .roll_keeping_with_rng(&mut rng, Some(5), None)
            .unwrap();
        let full = pool.roll_with_rng(&mut StdRng::seed_from_u64(11));
        assert_eq!(kept, full);
    }

    #[test]
    fn test_keep_highest_bounds() {
        let pool = DicePool::of(4, D6);
        for _ in 0..100 {
            let result = pool.roll_keeping(Some(3), None).unwrap();
            assert!((3..=18).contains(&result));
        }
    }

    #[test]
    fn test_roll_pool_free_function() {
        let result = roll_pool(&[D8, D6], None, None).unwrap();
        assert!((2..=14).contains(&result));
        assert!(roll_pool(&[D8, D6], Some(1), Some(1)).is_err());
    }

    #[test]
    fn test_situation_combine() {
        assert_eq!(
            Situation::Normal.combine(Situation::Advantage),
            Situation::Advantage
        );
        assert_eq!(
            Situation::Advantage.combine(Situation::Disadvantage),
            Situation::Normal
        );
        assert_eq!(
            Situation::ElvenAccuracy.combine(Situation::Disadvantage),
            Situation::Normal
        );
        assert_eq!(
            Situation::Advantage.combine(Situation::ElvenAccuracy),
            Situation::ElvenAccuracy
        );
        assert_eq!(
            Situation::Disadvantage.combine(Situation::Disadvantage),
            Situation::Disadvantage
        );
    }

    #[test]
    fn test_max_total() {
        assert_eq!(DicePool::of(2, D6).max_total(), 12);
        assert_eq!(DicePool::new(vec![D8, D4]).max_total(), 12);
        assert_eq!(DicePool::default().max_total(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(D20.to_string(), "d20");
        assert_eq!(DicePool::new(vec![D8, D6]).to_string(), "d8 + d6");
    }
}
