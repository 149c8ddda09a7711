//! Weapons and attack resolution.
//!
//! An `Attack` is a reusable capability, not entity state: it names the
//! governing ability, carries an optional weapon, and resolves a single
//! swing against a target into an outcome, damage, and secondary effects.

use crate::conditions::Condition;
use crate::dice::{DicePool, Situation, D20};
use crate::world::{Ability, Entity, Item};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An item that can be swung or fired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub base: Item,
    pub attack_bonus: i32,
    pub damage_bonus: i32,
    pub damage_roll: DicePool,
    /// Range in feet for ranged use.
    pub range: u32,
    /// Reach in feet for melee use.
    pub reach: u32,
    pub properties: Vec<String>,
}

impl Weapon {
    pub fn new(base: Item, damage_roll: DicePool) -> Self {
        Self {
            base,
            attack_bonus: 0,
            damage_bonus: 0,
            damage_roll,
            range: 5,
            reach: 5,
            properties: Vec::new(),
        }
    }

    pub fn with_attack_bonus(mut self, bonus: i32) -> Self {
        self.attack_bonus = bonus;
        self
    }

    pub fn with_damage_bonus(mut self, bonus: i32) -> Self {
        self.damage_bonus = bonus;
        self
    }

    pub fn with_range(mut self, range: u32) -> Self {
        self.range = range;
        self
    }

    pub fn with_reach(mut self, reach: u32) -> Self {
        self.reach = reach;
        self
    }

    pub fn with_properties(mut self, properties: Vec<String>) -> Self {
        self.properties = properties;
        self
    }

    pub fn name(&self) -> &str {
        &self.base.base.name
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a swing landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackOutcome {
    Miss,
    Hit,
    Critical,
}

impl AttackOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, AttackOutcome::Hit | AttackOutcome::Critical)
    }
}

/// A secondary effect produced by a resolved attack. Attacks trigger a
/// follow-up resolution; conditions are attached to the target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AttackEffect {
    Attack(Attack),
    Condition(Condition),
}

/// The result of resolving one swing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackResult {
    pub outcome: AttackOutcome,
    /// The kept d20 face, before modifiers.
    pub natural_roll: u32,
    /// The modified total compared against armor class. Automatic
    /// outcomes (a natural 1, or a crit) skip the comparison.
    pub attack_total: Option<i32>,
    pub damage: i32,
    pub effects: Vec<AttackEffect>,
}

/// A named attack a creature can make.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attack {
    pub name: String,
    /// The ability whose bonus feeds both the attack roll and the damage.
    pub ability: Ability,
    pub proficiency_bonus: i32,
    /// Range in feet.
    pub range: u32,
    pub description: String,
    pub weapon: Option<Weapon>,
    pub effects_on_hit: Vec<AttackEffect>,
    pub effects_on_miss: Vec<AttackEffect>,
}

impl Attack {
    pub fn new(
        name: impl Into<String>,
        ability: Ability,
        proficiency_bonus: i32,
        range: u32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ability,
            proficiency_bonus,
            range,
            description: description.into(),
            weapon: None,
            effects_on_hit: Vec::new(),
            effects_on_miss: Vec::new(),
        }
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn with_effect_on_hit(mut self, effect: AttackEffect) -> Self {
        self.effects_on_hit.push(effect);
        self
    }

    pub fn with_effect_on_miss(mut self, effect: AttackEffect) -> Self {
        self.effects_on_miss.push(effect);
        self
    }

    /// Resolve one swing against a target.
    ///
    /// A natural 1 always misses, with no effects. A natural roll at or
    /// above `crit_range_min` is an automatic critical hit whose damage
    /// adds every weapon die at its maximum face. Otherwise the modified
    /// total is compared against the target's armor class.
    pub fn resolve(
        &self,
        attacker: &Entity,
        target: &Entity,
        situation: Situation,
        crit_range_min: u32,
    ) -> AttackResult {
        self.resolve_with_rng(
            &mut rand::thread_rng(),
            attacker,
            target,
            situation,
            crit_range_min,
        )
    }

    pub fn resolve_with_rng<R: Rng>(
        &self,
        rng: &mut R,
        attacker: &Entity,
        target: &Entity,
        situation: Situation,
        crit_range_min: u32,
    ) -> AttackResult {
        let natural_roll = D20.roll_situation_with_rng(rng, situation);
        self.adjudicate(rng, natural_roll, attacker, target, crit_range_min)
    }

    /// Score a swing given the natural d20 face already drawn.
    fn adjudicate<R: Rng>(
        &self,
        rng: &mut R,
        natural_roll: u32,
        attacker: &Entity,
        target: &Entity,
        crit_range_min: u32,
    ) -> AttackResult {
        if natural_roll == 1 {
            return AttackResult {
                outcome: AttackOutcome::Miss,
                natural_roll,
                attack_total: None,
                damage: 0,
                effects: Vec::new(),
            };
        }

        // Without a weapon this is an unarmed strike: flat 1 damage plus
        // the ability bonus, no attack or damage dice bonuses.
        let (dice_total, attack_bonus, damage_bonus, max_faces) = match &self.weapon {
            Some(weapon) => (
                weapon.damage_roll.roll_with_rng(rng) as i32,
                weapon.attack_bonus,
                weapon.damage_bonus,
                weapon.damage_roll.max_total() as i32,
            ),
            None => (0, 0, 1, 0),
        };
        let ability_bonus = i32::from(attacker.abilities.modifier(self.ability));
        let damage = dice_total + damage_bonus + ability_bonus;

        if natural_roll >= crit_range_min {
            return AttackResult {
                outcome: AttackOutcome::Critical,
                natural_roll,
                attack_total: None,
                damage: damage + max_faces,
                effects: self.effects_on_hit.clone(),
            };
        }

        let total =
            ability_bonus + self.proficiency_bonus + natural_roll as i32 + attack_bonus;
        if total < target.armor_class {
            AttackResult {
                outcome: AttackOutcome::Miss,
                natural_roll,
                attack_total: Some(total),
                damage: 0,
                effects: self.effects_on_miss.clone(),
            }
        } else {
            AttackResult {
                outcome: AttackOutcome::Hit,
                natural_roll,
                attack_total: Some(total),
                damage,
                effects: self.effects_on_hit.clone(),
            }
        }
    }
}

impl fmt::Display for Attack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
