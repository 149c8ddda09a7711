//! Status conditions and their effect on an entity.
//!
//! A condition is attached to an entity's condition list and ticked by
//! `Entity::start_turn`. Applying a condition mutates the entity (blocked
//! turn slots, zeroed speeds, forced crawling); removing it reverses the
//! mutation exactly. Compound conditions like Paralyzed or Unconscious are
//! expressed as a fixed, ordered list of component effects rather than an
//! inheritance lattice, so composition stays deterministic.

use crate::world::{Action, Entity, Movement, MovementId, MovementKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The primitive mutations a condition can perform on an entity.
///
/// Compound conditions list several of these. They are applied in list
/// order and removed in reverse order, so removal unwinds application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusEffect {
    /// Block the action, bonus action, and reaction slots.
    Incapacitate,
    /// Zero every movement speed, remembering the originals.
    Immobilize,
    /// Replace the movement list with a half-speed crawl.
    KnockProne,
}

/// The condition catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionKind {
    Blinded,
    Charmed,
    Deafened,
    Frightened,
    Grappled,
    Invisible,
    Poisoned,
    Immobilized,
    Incapacitated,
    Prone,
    Restrained,
    Paralyzed,
    Petrified,
    Stunned,
    Unconscious,
    Dead,
    Exhaustion { levels: u8 },
}

impl ConditionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConditionKind::Blinded => "Blinded",
            ConditionKind::Charmed => "Charmed",
            ConditionKind::Deafened => "Deafened",
            ConditionKind::Frightened => "Frightened",
            ConditionKind::Grappled => "Grappled",
            ConditionKind::Invisible => "Invisible",
            ConditionKind::Poisoned => "Poisoned",
            ConditionKind::Immobilized => "Immobilized",
            ConditionKind::Incapacitated => "Incapacitated",
            ConditionKind::Prone => "Prone",
            ConditionKind::Restrained => "Restrained",
            ConditionKind::Paralyzed => "Paralyzed",
            ConditionKind::Petrified => "Petrified",
            ConditionKind::Stunned => "Stunned",
            ConditionKind::Unconscious => "Unconscious",
            ConditionKind::Dead => "Dead",
            ConditionKind::Exhaustion { .. } => "Exhaustion",
        }
    }

    /// The rules text shown to the player.
    pub fn description(&self) -> &'static str {
        match self {
            ConditionKind::Blinded => {
                "A blinded creature can't see and automatically fails any ability check \
                 that requires sight."
            }
            ConditionKind::Charmed => {
                "A charmed creature can't attack the charmer or target the charmer with \
                 harmful abilities or magical effects."
            }
            ConditionKind::Deafened => {
                "A deafened creature can't hear and automatically fails any ability check \
                 that requires hearing."
            }
            ConditionKind::Frightened => {
                "A frightened creature has disadvantage on ability checks and attack rolls \
                 while the source of its fear is within line of sight."
            }
            ConditionKind::Grappled => {
                "A grappled creature's speed becomes 0, and it can't benefit from any bonus \
                 to its speed."
            }
            ConditionKind::Invisible => {
                "An invisible creature is impossible to see without the aid of magic or a \
                 special sense. For the purpose of hiding, the creature is heavily obscured. \
                 The creature's location can be detected by any noise it makes or any tracks \
                 it leaves."
            }
            ConditionKind::Poisoned => {
                "A poisoned creature has disadvantage on attack rolls and ability checks."
            }
            ConditionKind::Immobilized => "An immobilized creature has zero movement speed.",
            ConditionKind::Incapacitated => {
                "An incapacitated creature can't take actions or reactions."
            }
            ConditionKind::Prone => {
                "A prone creature's only movement option is to crawl, unless it stands up \
                 and thereby ends the condition."
            }
            ConditionKind::Restrained => {
                "A restrained creature's speed becomes 0, and it can't benefit from any \
                 bonus to its speed. Attack rolls against the creature have advantage, and \
                 the creature's attack rolls have disadvantage."
            }
            ConditionKind::Paralyzed => {
                "A paralyzed creature is incapacitated and can't move or speak. The creature \
                 automatically fails Strength and Dexterity saving throws. Attack rolls \
                 against the creature have advantage. Any attack that hits the creature is a \
                 critical hit if the attacker is within 5 feet of the creature."
            }
            ConditionKind::Petrified => {
                "A petrified creature is transformed, along with any nonmagical object it is \
                 wearing or carrying, into a solid inanimate substance (usually stone). Its \
                 weight increases by a factor of ten, and it ceases aging."
            }
            ConditionKind::Stunned => {
                "A stunned creature is incapacitated, can't move, and can speak only \
                 falteringly."
            }
            ConditionKind::Unconscious => {
                "An unconscious creature is incapacitated, can't move or speak, and is \
                 unaware of its surroundings. The creature drops whatever it's holding and \
                 falls prone. The creature automatically fails Strength and Dexterity saving \
                 throws. Attack rolls against the creature have advantage. Any attack that \
                 hits the creature is a critical hit if the attacker is within 5 feet of the \
                 creature."
            }
            ConditionKind::Dead => "A dead creature is an ex-creature.",
            ConditionKind::Exhaustion { .. } => {
                "Some special abilities and environmental hazards, such as starvation and \
                 the long-term effects of freezing or scorching temperatures, can lead to a \
                 special condition called exhaustion. Exhaustion is measured in six levels."
            }
        }
    }

    /// The component effects this kind performs, in application order.
    /// Incapacitate comes before Immobilize comes before KnockProne.
    pub fn effects(&self) -> &'static [StatusEffect] {
        match self {
            ConditionKind::Incapacitated => &[StatusEffect::Incapacitate],
            ConditionKind::Immobilized | ConditionKind::Restrained => {
                &[StatusEffect::Immobilize]
            }
            ConditionKind::Prone => &[StatusEffect::KnockProne],
            ConditionKind::Paralyzed | ConditionKind::Petrified | ConditionKind::Stunned => {
                &[StatusEffect::Incapacitate, StatusEffect::Immobilize]
            }
            ConditionKind::Unconscious | ConditionKind::Dead => &[
                StatusEffect::Incapacitate,
                StatusEffect::Immobilize,
                StatusEffect::KnockProne,
            ],
            _ => &[],
        }
    }

    pub fn is_incapacitating(&self) -> bool {
        matches!(
            self,
            ConditionKind::Incapacitated
                | ConditionKind::Paralyzed
                | ConditionKind::Petrified
                | ConditionKind::Stunned
                | ConditionKind::Unconscious
                | ConditionKind::Dead
        )
    }

    /// Dead is not something a turn tick recovers from.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConditionKind::Dead)
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionKind::Exhaustion { levels } => write!(f, "Exhaustion ({levels})"),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Death saving throw bookkeeping for an unconscious creature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathSaves {
    pub dying: bool,
    pub successes: u8,
    pub failures: u8,
}

impl DeathSaves {
    /// Record a success. Returns true once three have accumulated.
    pub fn add_success(&mut self) -> bool {
        self.successes += 1;
        self.successes >= 3
    }

    /// Record a failure. Returns true once three have accumulated.
    pub fn add_failure(&mut self) -> bool {
        self.failures += 1;
        self.failures >= 3
    }

    pub fn reset(&mut self) {
        self.dying = false;
        self.successes = 0;
        self.failures = 0;
    }
}

/// A condition attached to an entity, with optional duration tracking.
///
/// A condition with no duration persists until something removes it.
/// Timed conditions count down once per turn tick and are dropped (with
/// their effects undone) when the countdown reaches zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub kind: ConditionKind,
    pub name: String,
    /// Duration in rounds when first attached.
    pub duration: Option<u32>,
    /// Rounds left before the condition ends.
    pub remaining_duration: Option<u32>,
    /// Present only for Unconscious and Dead.
    pub death_saves: Option<DeathSaves>,
    /// Who or what inflicted the condition.
    pub source: Option<String>,
    // Snapshots are taken on first application only and consumed on
    // removal; a re-application must never re-capture a zeroed speed.
    #[serde(default)]
    saved_speeds: Option<Vec<(MovementId, u32)>>,
    #[serde(default)]
    saved_movements: Option<Vec<Movement>>,
}

impl Condition {
    pub fn new(kind: ConditionKind) -> Self {
        let death_saves = matches!(
            kind,
            ConditionKind::Unconscious | ConditionKind::Dead
        )
        .then(DeathSaves::default);
        Self {
            kind,
            name: kind.name().to_string(),
            duration: None,
            remaining_duration: None,
            death_saves,
            source: None,
            saved_speeds: None,
            saved_movements: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_duration(mut self, rounds: u32) -> Self {
        self.duration = Some(rounds);
        self.remaining_duration = Some(rounds);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// True once a timed condition has counted down to nothing.
    pub fn expired(&self) -> bool {
        self.remaining_duration == Some(0)
    }

    /// Mutate the entity according to this condition's component effects.
    ///
    /// Safe to call every round: state that would be overwritten is
    /// snapshotted only on the first application.
    pub fn apply_to(&mut self, entity: &mut Entity) {
        for effect in self.kind.effects() {
            self.apply_effect(*effect, entity);
        }
    }

    /// Undo what `apply_to` did, in reverse component order. Removing a
    /// condition twice is harmless; the snapshots are consumed on the
    /// first removal.
    pub fn remove_from(&mut self, entity: &mut Entity) {
        for effect in self.kind.effects().iter().rev() {
            self.remove_effect(*effect, entity);
        }
    }

    fn apply_effect(&mut self, effect: StatusEffect, entity: &mut Entity) {
        match effect {
            StatusEffect::Incapacitate => {
                let block = Action::incapacitated();
                entity.turn.action = Some(block.clone());
                entity.turn.bonus_action = Some(block.clone());
                entity.turn.reaction = Some(block);
            }
            StatusEffect::Immobilize => {
                if self.saved_speeds.is_none() {
                    self.saved_speeds = Some(
                        entity
                            .movements
                            .iter()
                            .map(|movement| (movement.id(), movement.speed))
                            .collect(),
                    );
                }
                for movement in &mut entity.movements {
                    movement.speed = 0;
                }
            }
            StatusEffect::KnockProne => {
                let saved = self
                    .saved_movements
                    .get_or_insert_with(|| entity.movements.clone());
                let crawl_speed = saved
                    .iter()
                    .filter(|movement| movement.kind == MovementKind::Walk)
                    .map(|movement| movement.speed)
                    .max();
                entity.movements = match crawl_speed {
                    Some(speed) => vec![Movement::crawl(speed / 2)],
                    None => Vec::new(),
                };
            }
        }
    }

    fn remove_effect(&mut self, effect: StatusEffect, entity: &mut Entity) {
        match effect {
            StatusEffect::Incapacitate => {
                entity.turn.action = None;
                entity.turn.bonus_action = None;
                entity.turn.reaction = None;
            }
            StatusEffect::Immobilize => {
                if let Some(saved) = self.saved_speeds.take() {
                    for (id, speed) in saved {
                        if let Some(movement) = entity
                            .movements
                            .iter_mut()
                            .find(|movement| movement.id() == id)
                        {
                            movement.speed = speed;
                        }
                    }
                }
            }
            StatusEffect::KnockProne => {
                if let Some(saved) = self.saved_movements.take() {
                    entity.movements = saved;
                }
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(remaining) = self.remaining_duration {
            if remaining > 0 {
                write!(f, " for {remaining} turns")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Entity, Movement, Size};

    fn walker() -> Entity {
        Entity::new("Walker", "A test entity.", Size::Medium, 10, 10)
            .with_movements(vec![Movement::walk(30)])
    }

    #[test]
    fn test_immobilized_round_trip() {
        let mut entity = walker();
        let walk_id = entity.movements[0].id();

        let mut condition = Condition::new(ConditionKind::Immobilized);
        condition.apply_to(&mut entity);
        assert_eq!(entity.movements[0].speed, 0);

        condition.remove_from(&mut entity);
        assert_eq!(entity.movements[0].speed, 30);
        assert_eq!(entity.movements[0].id(), walk_id);
    }

    #[test]
    fn test_immobilized_reapplication_keeps_first_snapshot() {
        let mut entity = walker();
        let mut condition = Condition::new(ConditionKind::Immobilized);

        // Re-applying each round must not capture the zeroed speed.
        condition.apply_to(&mut entity);
        condition.apply_to(&mut entity);
        assert_eq!(entity.movements[0].speed, 0);

        condition.remove_from(&mut entity);
        assert_eq!(entity.movements[0].speed, 30);
    }

    #[test]
    fn test_double_removal_is_harmless() {
        let mut entity = walker();
        let mut condition = Condition::new(ConditionKind::Immobilized);

        condition.apply_to(&mut entity);
        condition.remove_from(&mut entity);
        condition.remove_from(&mut entity);
        assert_eq!(entity.movements[0].speed, 30);
    }

    #[test]
    fn test_prone_swaps_in_a_crawl() {
        let mut entity = walker();
        let walk_id = entity.movements[0].id();

        let mut condition = Condition::new(ConditionKind::Prone);
        condition.apply_to(&mut entity);
        assert_eq!(entity.movements.len(), 1);
        assert_eq!(entity.movements[0].kind, MovementKind::Crawl);
        assert_eq!(entity.movements[0].speed, 15);

        condition.remove_from(&mut entity);
        assert_eq!(entity.movements[0].kind, MovementKind::Walk);
        assert_eq!(entity.movements[0].speed, 30);
        assert_eq!(entity.movements[0].id(), walk_id);
    }

    #[test]
    fn test_prone_without_walking_movement() {
        let mut entity = Entity::new("Flier", "Wings only.", Size::Medium, 10, 10)
            .with_movements(vec![Movement::fly(60)]);

        let mut condition = Condition::new(ConditionKind::Prone);
        condition.apply_to(&mut entity);
        assert!(entity.movements.is_empty());

        condition.remove_from(&mut entity);
        assert_eq!(entity.movements.len(), 1);
        assert_eq!(entity.movements[0].speed, 60);
    }

    #[test]
    fn test_prone_reapplication_keeps_original_crawl_speed() {
        let mut entity = walker();
        let mut condition = Condition::new(ConditionKind::Prone);

        condition.apply_to(&mut entity);
        condition.apply_to(&mut entity);
        // Half of the original walk, not half of the synthesized crawl.
        assert_eq!(entity.movements[0].speed, 15);
    }

    #[test]
    fn test_incapacitated_blocks_and_releases_slots() {
        let mut entity = walker();
        let mut condition = Condition::new(ConditionKind::Incapacitated);

        condition.apply_to(&mut entity);
        assert!(!entity.turn.action_available());
        assert!(!entity.turn.bonus_action_available());
        assert!(!entity.turn.reaction_available());
        assert!(entity.turn.item_interaction_available());
        assert!(entity.turn.action.as_ref().unwrap().is_incapacitated());

        condition.remove_from(&mut entity);
        assert!(entity.turn.action_available());
        assert!(entity.turn.bonus_action_available());
        assert!(entity.turn.reaction_available());
    }

    #[test]
    fn test_unconscious_composes_all_three_effects() {
        let mut entity = walker();
        let mut condition = Condition::new(ConditionKind::Unconscious);
        assert!(condition.death_saves.is_some());

        condition.apply_to(&mut entity);
        assert!(!entity.turn.action_available());
        // The walk was zeroed before the prone component snapshotted it,
        // so the crawl bottoms out at zero.
        assert_eq!(entity.movements[0].kind, MovementKind::Crawl);
        assert_eq!(entity.movements[0].speed, 0);

        condition.remove_from(&mut entity);
        assert!(entity.turn.action_available());
        assert_eq!(entity.movements[0].kind, MovementKind::Walk);
        assert_eq!(entity.movements[0].speed, 30);
    }

    #[test]
    fn test_component_effect_order() {
        assert_eq!(
            ConditionKind::Paralyzed.effects(),
            &[StatusEffect::Incapacitate, StatusEffect::Immobilize]
        );
        assert_eq!(
            ConditionKind::Unconscious.effects(),
            &[
                StatusEffect::Incapacitate,
                StatusEffect::Immobilize,
                StatusEffect::KnockProne
            ]
        );
        assert!(ConditionKind::Poisoned.effects().is_empty());
        assert!(ConditionKind::Grappled.effects().is_empty());
    }

    #[test]
    fn test_start_turn_counts_down_and_expires() {
        let mut entity = walker();
        entity
            .conditions
            .push(Condition::new(ConditionKind::Immobilized).with_duration(2));

        entity.start_turn();
        assert_eq!(entity.conditions.len(), 1);
        assert_eq!(entity.conditions[0].remaining_duration, Some(1));
        assert_eq!(entity.movements[0].speed, 0);

        // Expiry removes the condition and undoes its effect.
        entity.start_turn();
        assert!(entity.conditions.is_empty());
        assert_eq!(entity.movements[0].speed, 30);
    }

    #[test]
    fn test_start_turn_removes_single_round_condition() {
        let mut entity = walker();
        entity
            .conditions
            .push(Condition::new(ConditionKind::Poisoned).with_duration(1));

        entity.start_turn();
        assert!(entity.conditions.is_empty());
    }

    #[test]
    fn test_untimed_conditions_persist() {
        let mut entity = walker();
        entity.conditions.push(Condition::new(ConditionKind::Blinded));

        for _ in 0..5 {
            entity.start_turn();
        }
        assert_eq!(entity.conditions.len(), 1);
    }

    #[test]
    fn test_expiry_preserves_survivor_order() {
        let mut entity = walker();
        entity
            .conditions
            .push(Condition::new(ConditionKind::Blinded));
        entity
            .conditions
            .push(Condition::new(ConditionKind::Poisoned).with_duration(1));
        entity
            .conditions
            .push(Condition::new(ConditionKind::Deafened));

        entity.start_turn();
        let names: Vec<&str> = entity
            .conditions
            .iter()
            .map(|condition| condition.name.as_str())
            .collect();
        assert_eq!(names, vec!["Blinded", "Deafened"]);
    }

    #[test]
    fn test_start_turn_applies_lazily_attached_conditions() {
        let mut entity = walker();
        // Attaching does nothing until the next tick.
        entity
            .conditions
            .push(Condition::new(ConditionKind::Immobilized));
        assert_eq!(entity.movements[0].speed, 30);

        entity.start_turn();
        assert_eq!(entity.movements[0].speed, 0);
    }

    #[test]
    fn test_death_saves() {
        let mut saves = DeathSaves::default();
        assert!(!saves.add_success());
        assert!(!saves.add_success());
        assert!(saves.add_success());

        saves.reset();
        assert_eq!(saves.successes, 0);
        assert!(!saves.add_failure());
        assert!(!saves.add_failure());
        assert!(saves.add_failure());
    }

    #[test]
    fn test_exhaustion_carries_levels() {
        let condition = Condition::new(ConditionKind::Exhaustion { levels: 3 });
        assert_eq!(condition.name, "Exhaustion");
        assert_eq!(condition.kind.to_string(), "Exhaustion (3)");
        assert!(condition.kind.effects().is_empty());
    }

    #[test]
    fn test_display_with_duration() {
        let condition = Condition::new(ConditionKind::Poisoned).with_duration(2);
        assert_eq!(condition.to_string(), "Poisoned for 2 turns");
        assert_eq!(Condition::new(ConditionKind::Blinded).to_string(), "Blinded");
    }

    #[test]
    fn test_condition_serde_round_trip() {
        let condition = Condition::new(ConditionKind::Exhaustion { levels: 2 })
            .with_duration(4)
            .with_source("forced march");
        let json = serde_json::to_string(&condition).unwrap();
        let back: Condition = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, condition.kind);
        assert_eq!(back.remaining_duration, Some(4));
        assert_eq!(back.source.as_deref(), Some("forced march"));
    }
}
