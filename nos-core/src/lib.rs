//! Turn-based combat engine for Necronomy of Scale.
//!
//! This crate provides:
//! - Dice rolling with advantage, disadvantage, and elven accuracy
//! - Ability scores, skills, sizes, and movement modes
//! - Status conditions with symmetric apply/remove effects and
//!   per-round duration tracking
//! - Attack resolution with criticals and secondary effects
//! - Creatures that move, carry, and chain multi-step attacks
//!
//! The engine is synchronous and self-contained: the UI layer drives it
//! by calling `start_turn`, `move_by`, and `attack` once per discrete
//! player action and reads entity state back for display.
//!
//! # Quick Start
//!
//! ```
//! use nos_core::minions;
//!
//! let archer = minions::skeleton_archer();
//! let mut victim = minions::skeleton_swordsman();
//!
//! victim.base.start_turn();
//! let results = archer.attack(&mut victim.base, &archer.attacks[0]);
//! assert!(!results.is_empty());
//! ```

pub mod attacks;
pub mod conditions;
pub mod creatures;
pub mod dice;
pub mod minions;
pub mod modding;
pub mod world;

// Primary public API
pub use attacks::{Attack, AttackEffect, AttackOutcome, AttackResult, Weapon};
pub use conditions::{Condition, ConditionKind, DeathSaves, StatusEffect};
pub use creatures::Creature;
pub use dice::{DiceError, DicePool, Die, Situation};
pub use modding::DefinitionError;
pub use world::{
    Ability, AbilityScores, Action, AssetId, Container, Entity, Item, Movement, MovementId,
    MovementKind, Position, Size, Skill, Stored, Turn,
};
