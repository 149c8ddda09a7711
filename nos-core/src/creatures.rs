//! Creatures: entities that fight, carry, and move.

use crate::attacks::{Attack, AttackEffect, AttackResult};
use crate::dice::Situation;
use crate::world::{Action, Entity, Item};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An entity with combat capabilities and an inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    pub base: Entity,
    pub attacks: Vec<Attack>,
    pub actions: Vec<Action>,
    pub reactions: Vec<Action>,
    /// Fixed at construction from size and Strength score. A later change
    /// to Strength does not update it.
    carrying_capacity: f32,
    pub inventory: Vec<Item>,
}

impl Creature {
    pub fn new(base: Entity) -> Self {
        let carrying_capacity =
            base.size.carrying_capacity_multiplier() * f32::from(base.abilities.strength);
        Self {
            base,
            attacks: Vec::new(),
            actions: Vec::new(),
            reactions: Vec::new(),
            carrying_capacity,
            inventory: Vec::new(),
        }
    }

    pub fn with_attacks(mut self, attacks: Vec<Attack>) -> Self {
        self.attacks = attacks;
        self
    }

    pub fn with_actions(mut self, actions: Vec<Action>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_reactions(mut self, reactions: Vec<Action>) -> Self {
        self.reactions = reactions;
        self
    }

    pub fn with_inventory(mut self, inventory: Vec<Item>) -> Self {
        self.inventory = inventory;
        self
    }

    /// Maximum weight this creature can carry, in pounds.
    pub fn carrying_capacity(&self) -> f32 {
        self.carrying_capacity
    }

    /// Move by a delta, accumulating the segment length into this round's
    /// movement total.
    ///
    /// Nothing stops a move past the entity's speed; the budget is the
    /// caller's to enforce. Going over is logged as a warning.
    pub fn move_by(&mut self, dx: f32, dy: f32, dz: f32) {
        self.base.world_position.x += dx;
        self.base.world_position.y += dy;
        self.base.world_position.z += dz;
        self.base.turn.movement += (dx * dx + dy * dy + dz * dz).sqrt();

        let budget = self.base.max_speed() as f32;
        if self.base.turn.movement > budget {
            tracing::warn!(
                name = %self.base.name,
                moved = f64::from(self.base.turn.movement),
                speed = f64::from(budget),
                "movement exceeds speed"
            );
        }
    }

    /// Make an attack against a target, following up on its effects.
    ///
    /// Rolled damage is applied to the target. An attack effect triggers
    /// another resolution against the same target; a condition effect is
    /// attached to the target's condition list and takes hold at the
    /// target's next turn start, not immediately.
    ///
    /// Returns every resolution performed, the triggering swing first.
    pub fn attack(&self, target: &mut Entity, attack: &Attack) -> Vec<AttackResult> {
        self.attack_with_rng(&mut rand::thread_rng(), target, attack)
    }

    pub fn attack_with_rng<R: Rng>(
        &self,
        rng: &mut R,
        target: &mut Entity,
        attack: &Attack,
    ) -> Vec<AttackResult> {
        let mut results = Vec::new();
        self.attack_inner(rng, target, attack, &mut results);
        results
    }

    fn attack_inner<R: Rng>(
        &self,
        rng: &mut R,
        target: &mut Entity,
        attack: &Attack,
        results: &mut Vec<AttackResult>,
    ) {
        let result = attack.resolve_with_rng(
            rng,
            &self.base,
            target,
            Situation::Normal,
            self.base.critical_hit_minimum,
        );
        if result.damage > 0 {
            target.take_damage(result.damage);
        }

        let effects = result.effects.clone();
        results.push(result);
        for effect in effects {
            match effect {
                AttackEffect::Attack(follow_up) => {
                    self.attack_inner(rng, target, &follow_up, results);
                }
                AttackEffect::Condition(condition) => {
                    tracing::debug!(
                        target = %target.name,
                        condition = %condition.name,
                        "condition inflicted, takes hold next turn"
                    );
                    target.conditions.push(condition);
                }
            }
        }
    }
}

impl fmt::Display for Creature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base.name)
    }
}
