//! World model for the combat engine.
//!
//! Contains the types an encounter is built from: ability scores, skills,
//! creature sizes, movement modes, the per-round turn structure, entities,
//! and items/containers.

use crate::conditions::{Condition, ConditionKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Abilities
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// The bonus a score derives: floor((score - 10) / 2).
///
/// Floor division keeps low scores correct: a score of 8 is -1, not 0.
pub fn ability_bonus(score: u8) -> i8 {
    (score as i8 - 10).div_euclid(2)
}

/// Ability scores container. Bonuses are derived on demand, never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub fn new(str: u8, dex: u8, con: u8, int: u8, wis: u8, cha: u8) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: u8) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i8 {
        ability_bonus(self.get(ability))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

impl fmt::Display for AbilityScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for ability in Ability::all() {
            if !first {
                writeln!(f)?;
            }
            write!(
                f,
                "{:+} {} ({})",
                self.modifier(ability),
                ability.name(),
                self.get(ability)
            )?;
            first = false;
        }
        Ok(())
    }
}

// ============================================================================
// Skills
// ============================================================================

/// The standard skill catalog, each bound to its governing ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Acrobatics,
    AnimalHandling,
    Arcana,
    Athletics,
    Deception,
    History,
    Insight,
    Intimidation,
    Investigation,
    Medicine,
    Nature,
    Perception,
    Performance,
    Persuasion,
    Religion,
    SleightOfHand,
    Stealth,
    Survival,
}

impl Skill {
    pub fn ability(&self) -> Ability {
        match self {
            Skill::Athletics => Ability::Strength,
            Skill::Acrobatics | Skill::SleightOfHand | Skill::Stealth => Ability::Dexterity,
            Skill::Arcana
            | Skill::History
            | Skill::Investigation
            | Skill::Nature
            | Skill::Religion => Ability::Intelligence,
            Skill::AnimalHandling
            | Skill::Insight
            | Skill::Medicine
            | Skill::Perception
            | Skill::Survival => Ability::Wisdom,
            Skill::Deception | Skill::Intimidation | Skill::Performance | Skill::Persuasion => {
                Ability::Charisma
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Acrobatics => "Acrobatics",
            Skill::AnimalHandling => "Animal Handling",
            Skill::Arcana => "Arcana",
            Skill::Athletics => "Athletics",
            Skill::Deception => "Deception",
            Skill::History => "History",
            Skill::Insight => "Insight",
            Skill::Intimidation => "Intimidation",
            Skill::Investigation => "Investigation",
            Skill::Medicine => "Medicine",
            Skill::Nature => "Nature",
            Skill::Perception => "Perception",
            Skill::Performance => "Performance",
            Skill::Persuasion => "Persuasion",
            Skill::Religion => "Religion",
            Skill::SleightOfHand => "Sleight of Hand",
            Skill::Stealth => "Stealth",
            Skill::Survival => "Survival",
        }
    }

    pub fn all() -> [Skill; 18] {
        [
            Skill::Acrobatics,
            Skill::AnimalHandling,
            Skill::Arcana,
            Skill::Athletics,
            Skill::Deception,
            Skill::History,
            Skill::Insight,
            Skill::Intimidation,
            Skill::Investigation,
            Skill::Medicine,
            Skill::Nature,
            Skill::Perception,
            Skill::Performance,
            Skill::Persuasion,
            Skill::Religion,
            Skill::SleightOfHand,
            Skill::Stealth,
            Skill::Survival,
        ]
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Sizes
// ============================================================================

/// Creature size categories. Each is a fixed catalog entry carrying its
/// grid footprint, carrying-capacity multiplier, and default dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
    Gargantuan,
}

impl Size {
    pub fn name(&self) -> &'static str {
        match self {
            Size::Tiny => "Tiny",
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
            Size::Huge => "Huge",
            Size::Gargantuan => "Gargantuan",
        }
    }

    /// Side length on the grid, in 5 ft. squares.
    pub fn square_size(&self) -> f32 {
        match self {
            Size::Tiny => 0.5,
            Size::Small | Size::Medium => 1.0,
            Size::Large => 2.0,
            Size::Huge => 3.0,
            Size::Gargantuan => 4.0,
        }
    }

    /// Factor of Strength score that determines carrying capacity.
    pub fn carrying_capacity_multiplier(&self) -> f32 {
        match self {
            Size::Tiny => 7.5,
            Size::Small | Size::Medium => 15.0,
            Size::Large => 30.0,
            Size::Huge => 60.0,
            Size::Gargantuan => 120.0,
        }
    }

    /// Default height in feet. The stock sizes are cubes, so width and
    /// length share this value.
    pub fn height(&self) -> f32 {
        match self {
            Size::Tiny => 1.25,
            Size::Small => 2.5,
            Size::Medium => 5.0,
            Size::Large => 10.0,
            Size::Huge => 15.0,
            Size::Gargantuan => 20.0,
        }
    }

    pub fn width(&self) -> f32 {
        self.height()
    }

    pub fn length(&self) -> f32 {
        self.height()
    }

    /// Default weight in pounds.
    pub fn weight(&self) -> f32 {
        match self {
            Size::Tiny => 10.0,
            Size::Small => 50.0,
            Size::Medium => 150.0,
            Size::Large => 600.0,
            Size::Huge => 2500.0,
            Size::Gargantuan => 8000.0,
        }
    }

    pub fn all() -> [Size; 6] {
        [
            Size::Tiny,
            Size::Small,
            Size::Medium,
            Size::Large,
            Size::Huge,
            Size::Gargantuan,
        ]
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Position and Movement
// ============================================================================

/// A point in the world, in feet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Unique identifier for a movement mode instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovementId(pub Uuid);

impl MovementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MovementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MovementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The movement modes a creature can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    Walk,
    Fly,
    Swim,
    Burrow,
    Climb,
    Hover,
    Crawl,
}

impl MovementKind {
    pub fn name(&self) -> &'static str {
        match self {
            MovementKind::Walk => "Walk",
            MovementKind::Fly => "Fly",
            MovementKind::Swim => "Swim",
            MovementKind::Burrow => "Burrow",
            MovementKind::Climb => "Climb",
            MovementKind::Hover => "Hover",
            MovementKind::Crawl => "Crawl",
        }
    }

    pub fn all() -> [MovementKind; 7] {
        [
            MovementKind::Walk,
            MovementKind::Fly,
            MovementKind::Swim,
            MovementKind::Burrow,
            MovementKind::Climb,
            MovementKind::Hover,
            MovementKind::Crawl,
        ]
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A movement mode with its speed in feet per round.
///
/// Equality is identity, not structure: two walks at 30 ft. are distinct
/// movements. Conditions that zero a movement's speed key their snapshot
/// off the id so they restore the movement they touched, and a clone keeps
/// the id of its source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
    id: MovementId,
    pub kind: MovementKind,
    pub speed: u32,
}

impl Movement {
    pub fn new(kind: MovementKind, speed: u32) -> Self {
        Self {
            id: MovementId::new(),
            kind,
            speed,
        }
    }

    pub fn id(&self) -> MovementId {
        self.id
    }

    pub fn walk(speed: u32) -> Self {
        Self::new(MovementKind::Walk, speed)
    }

    pub fn fly(speed: u32) -> Self {
        Self::new(MovementKind::Fly, speed)
    }

    pub fn swim(speed: u32) -> Self {
        Self::new(MovementKind::Swim, speed)
    }

    pub fn burrow(speed: u32) -> Self {
        Self::new(MovementKind::Burrow, speed)
    }

    pub fn climb(speed: u32) -> Self {
        Self::new(MovementKind::Climb, speed)
    }

    pub fn hover(speed: u32) -> Self {
        Self::new(MovementKind::Hover, speed)
    }

    pub fn crawl(speed: u32) -> Self {
        Self::new(MovementKind::Crawl, speed)
    }
}

impl PartialEq for Movement {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Movement {}

impl std::hash::Hash for Movement {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ft.", self.kind, self.speed)
    }
}

// ============================================================================
// Actions and Turns
// ============================================================================

/// Something an entity can spend a turn slot on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub description: String,
}

lazy_static::lazy_static! {
    /// Sentinel action occupying the slots of an incapacitated entity.
    static ref INCAPACITATED: Action = Action::new(
        "Incapacitated",
        ConditionKind::Incapacitated.description(),
    );
}

impl Action {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// The sentinel that blocks the slots of an incapacitated entity.
    pub fn incapacitated() -> Action {
        INCAPACITATED.clone()
    }

    pub fn is_incapacitated(&self) -> bool {
        *self == *INCAPACITATED
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The consumable resources of one round. A slot holding `None` is
/// available; a slot holding an action has been spent on it (or blocked
/// by the incapacitated sentinel).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Turn {
    pub action: Option<Action>,
    pub bonus_action: Option<Action>,
    /// Total distance moved this round, in feet.
    pub movement: f32,
    pub item_interaction: Option<Action>,
    pub reaction: Option<Action>,
}

impl Turn {
    /// Begin a new round: every slot becomes available and movement resets.
    pub fn start(&mut self) {
        self.action = None;
        self.bonus_action = None;
        self.movement = 0.0;
        self.item_interaction = None;
        self.reaction = None;
    }

    pub fn action_available(&self) -> bool {
        self.action.is_none()
    }

    pub fn bonus_action_available(&self) -> bool {
        self.bonus_action.is_none()
    }

    pub fn reaction_available(&self) -> bool {
        self.reaction.is_none()
    }

    pub fn item_interaction_available(&self) -> bool {
        self.item_interaction.is_none()
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Opaque handle to a visual asset. The core never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub String);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Anything that exists in the world: creatures, items, scenery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub description: String,
    pub size: Size,
    pub armor_class: i32,
    pub max_hit_points: i32,
    pub current_hit_points: i32,
    pub asset: Option<AssetId>,
    pub movements: Vec<Movement>,
    pub conditions: Vec<Condition>,
    pub abilities: AbilityScores,
    pub proficiencies: Vec<Skill>,
    pub world_position: Position,
    pub turn: Turn,
    /// Natural roll at or above which an attack by this entity crits.
    pub critical_hit_minimum: u32,
    pub proficiency_bonus: i32,
}

impl Entity {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        size: Size,
        armor_class: i32,
        max_hit_points: i32,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            size,
            armor_class,
            max_hit_points,
            current_hit_points: max_hit_points,
            asset: None,
            movements: Vec::new(),
            conditions: Vec::new(),
            abilities: AbilityScores::default(),
            proficiencies: Vec::new(),
            world_position: Position::default(),
            turn: Turn::default(),
            critical_hit_minimum: 20,
            proficiency_bonus: 2,
        }
    }

    pub fn with_asset(mut self, asset: AssetId) -> Self {
        self.asset = Some(asset);
        self
    }

    pub fn with_movements(mut self, movements: Vec<Movement>) -> Self {
        self.movements = movements;
        self
    }

    pub fn with_abilities(mut self, abilities: AbilityScores) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn with_proficiencies(mut self, proficiencies: Vec<Skill>) -> Self {
        self.proficiencies = proficiencies;
        self
    }

    pub fn with_conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.world_position = position;
        self
    }

    /// Begin this entity's round.
    ///
    /// Resets the turn, counts down timed conditions, drops the ones that
    /// ran out (undoing their effects), and re-applies every surviving
    /// condition. Re-application keeps condition effects authoritative for
    /// the round; each condition snapshots any state it overwrites only
    /// once, on first application.
    pub fn start_turn(&mut self) {
        self.turn.start();

        let mut conditions = std::mem::take(&mut self.conditions);
        for condition in &mut conditions {
            if let Some(remaining) = condition.remaining_duration.as_mut() {
                if *remaining > 0 {
                    *remaining -= 1;
                }
            }
        }

        let mut survivors = Vec::with_capacity(conditions.len());
        for mut condition in conditions {
            if condition.expired() {
                tracing::debug!(
                    entity = %self.name,
                    condition = %condition.name,
                    "condition expired"
                );
                condition.remove_from(self);
            } else {
                survivors.push(condition);
            }
        }

        for condition in &mut survivors {
            condition.apply_to(self);
        }
        self.conditions = survivors;
    }

    pub fn has_condition(&self, kind: ConditionKind) -> bool {
        self.conditions.iter().any(|condition| condition.kind == kind)
    }

    /// The fastest speed among this entity's movement modes.
    pub fn max_speed(&self) -> u32 {
        self.movements
            .iter()
            .map(|movement| movement.speed)
            .max()
            .unwrap_or(0)
    }

    /// Subtract hit points. Returns true if the entity dropped to zero.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.current_hit_points -= amount;
        self.current_hit_points <= 0
    }

    /// Restore hit points up to the maximum. Returns the amount healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let old = self.current_hit_points;
        self.current_hit_points = (self.current_hit_points + amount).min(self.max_hit_points);
        self.current_hit_points - old
    }
}

// ============================================================================
// Items and Containers
// ============================================================================

/// An entity with a trade value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub base: Entity,
    pub value: i32,
}

impl Item {
    pub fn new(base: Entity) -> Self {
        Self { base, value: 0 }
    }

    pub fn with_value(mut self, value: i32) -> Self {
        self.value = value;
        self
    }

    /// Weight in pounds, from the item's size.
    pub fn weight(&self) -> f32 {
        self.base.size.weight()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base.name)
    }
}

/// Contents of a container: loose items or nested containers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stored {
    Item(Item),
    Container(Container),
}

impl Stored {
    pub fn weight(&self) -> f32 {
        match self {
            Stored::Item(item) => item.weight(),
            Stored::Container(container) => container.get_weight(),
        }
    }
}

/// An item that holds other items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub base: Item,
    /// Weight limit in pounds, if any.
    pub capacity: Option<f32>,
    /// Interior volume in cubic feet, if any.
    pub volume: Option<f32>,
    pub items: Vec<Stored>,
}

impl Container {
    pub fn new(base: Item) -> Self {
        Self {
            base,
            capacity: None,
            volume: None,
            items: Vec::new(),
        }
    }

    pub fn with_capacity(mut self, capacity: f32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn store(&mut self, stored: Stored) {
        self.items.push(stored);
    }

    /// Total weight: everything inside, recursively, plus the container
    /// itself.
    pub fn get_weight(&self) -> f32 {
        self.items.iter().map(Stored::weight).sum::<f32>() + self.base.base.size.weight()
    }
}
