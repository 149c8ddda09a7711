//! Stock minions and their armaments.
//!
//! The necromancer's starting deck: a skeleton archer and a skeleton
//! swordsman. Each call builds a fresh creature, so movements and
//! conditions never share identity between instances.

use crate::attacks::{Attack, Weapon};
use crate::creatures::Creature;
use crate::dice::{DicePool, D6};
use crate::world::{Ability, AbilityScores, AssetId, Entity, Item, Movement, Size, Skill};

/// A simple ranged weapon for skeletal marksmen.
pub fn shortbow() -> Weapon {
    let base = Item::new(Entity::new(
        "Shortbow",
        "A short recurved bow of yellowed bone and sinew.",
        Size::Small,
        10,
        5,
    ))
    .with_value(25);
    Weapon::new(base, DicePool::of(1, D6)).with_range(80)
}

/// A pitted blade scavenged from the boneyard.
pub fn rusty_sword() -> Weapon {
    let base = Item::new(Entity::new(
        "Rusty Sword",
        "A notched shortsword, more rust than steel.",
        Size::Small,
        10,
        5,
    ))
    .with_value(10);
    Weapon::new(base, DicePool::of(1, D6))
}

fn skeleton_base(name: &str, description: &str, asset: &str) -> Entity {
    Entity::new(name, description, Size::Medium, 13, 13)
        .with_asset(AssetId(asset.to_string()))
        .with_movements(vec![Movement::walk(30)])
        .with_abilities(AbilityScores::new(10, 14, 15, 6, 8, 5))
        .with_proficiencies(vec![Skill::Perception])
}

/// Skeleton Archer, a basic enemy.
pub fn skeleton_archer() -> Creature {
    let base = skeleton_base(
        "Skeleton Archer",
        "A brittle marksman that looses arrows with unblinking patience.",
        "Skeleton_Archer",
    );
    Creature::new(base).with_attacks(vec![Attack::new(
        "Shortbow",
        Ability::Dexterity,
        2,
        80,
        "A bone-fletched arrow loosed at range.",
    )
    .with_weapon(shortbow())])
}

/// Skeleton Swordsman, an even basic-er enemy.
pub fn skeleton_swordsman() -> Creature {
    let base = skeleton_base(
        "Skeleton Swordsman",
        "A clattering footsoldier that swings whatever blade it was buried with.",
        "Skeleton_Swordsman",
    );
    Creature::new(base).with_attacks(vec![Attack::new(
        "Rusty Sword",
        Ability::Strength,
        2,
        5,
        "A graceless but committed swing.",
    )
    .with_weapon(rusty_sword())])
}
