//! Data models for type matchups.
//!
//! This module contains the PokeAPI type record shape, the relation
//! categories read from it, and the grouped multiplier results produced
//! by the aggregator.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A reference to another PokeAPI resource. Only `name` is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    /// Resource name (e.g. `"fire"`).
    pub name: String,
    /// Resource URL, ignored by the aggregator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl NamedResource {
    /// Creates a resource reference without a URL.
    #[allow(dead_code)] // Used by tests and stub sources
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
        }
    }
}

/// The six damage relation lists of a type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRelations {
    #[serde(default)]
    pub double_damage_from: Vec<NamedResource>,
    #[serde(default)]
    pub no_damage_from: Vec<NamedResource>,
    #[serde(default)]
    pub half_damage_from: Vec<NamedResource>,
    #[serde(default)]
    pub double_damage_to: Vec<NamedResource>,
    #[serde(default)]
    pub no_damage_to: Vec<NamedResource>,
    #[serde(default)]
    pub half_damage_to: Vec<NamedResource>,
}

impl TypeRelations {
    /// Returns the list for a relation category.
    pub fn get(&self, category: RelationCategory) -> &[NamedResource] {
        match category {
            RelationCategory::DoubleDamageFrom => &self.double_damage_from,
            RelationCategory::NoDamageFrom => &self.no_damage_from,
            RelationCategory::HalfDamageFrom => &self.half_damage_from,
            RelationCategory::DoubleDamageTo => &self.double_damage_to,
            RelationCategory::NoDamageTo => &self.no_damage_to,
            RelationCategory::HalfDamageTo => &self.half_damage_to,
        }
    }

    /// Returns a mutable list for a relation category.
    #[allow(dead_code)] // Builder utility for tests
    pub fn get_mut(&mut self, category: RelationCategory) -> &mut Vec<NamedResource> {
        match category {
            RelationCategory::DoubleDamageFrom => &mut self.double_damage_from,
            RelationCategory::NoDamageFrom => &mut self.no_damage_from,
            RelationCategory::HalfDamageFrom => &mut self.half_damage_from,
            RelationCategory::DoubleDamageTo => &mut self.double_damage_to,
            RelationCategory::NoDamageTo => &mut self.no_damage_to,
            RelationCategory::HalfDamageTo => &mut self.half_damage_to,
        }
    }
}

/// A type relation record as served by `GET /api/v2/type/{name}`.
///
/// PokeAPI returns many more fields; everything but the damage
/// relations is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub damage_relations: TypeRelations,
}

impl TypeRecord {
    /// Creates an empty record for a type.
    #[allow(dead_code)] // Builder utility for tests
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            damage_relations: TypeRelations::default(),
        }
    }

    /// Adds related type names to a category, returning the record.
    #[allow(dead_code)] // Builder utility for tests
    pub fn with(mut self, category: RelationCategory, names: &[&str]) -> Self {
        self.damage_relations
            .get_mut(category)
            .extend(names.iter().copied().map(NamedResource::named));
        self
    }
}

/// Direction of a damage relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Damage received by the queried types.
    From,
    /// Damage dealt by the queried types.
    To,
}

impl Direction {
    /// Both directions in report order.
    pub const ALL: [Direction; 2] = [Direction::From, Direction::To];

    /// Relation categories folded for this direction, in fold order.
    pub fn categories(&self) -> [RelationCategory; 3] {
        match self {
            Direction::From => [
                RelationCategory::DoubleDamageFrom,
                RelationCategory::NoDamageFrom,
                RelationCategory::HalfDamageFrom,
            ],
            Direction::To => [
                RelationCategory::DoubleDamageTo,
                RelationCategory::NoDamageTo,
                RelationCategory::HalfDamageTo,
            ],
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::From => write!(f, "from"),
            Direction::To => write!(f, "to"),
        }
    }
}

/// One of the six damage relation lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationCategory {
    DoubleDamageFrom,
    NoDamageFrom,
    HalfDamageFrom,
    DoubleDamageTo,
    NoDamageTo,
    HalfDamageTo,
}

impl RelationCategory {
    /// Multiplier contributed by each name in this category.
    pub fn weight(&self) -> f64 {
        match self {
            RelationCategory::DoubleDamageFrom | RelationCategory::DoubleDamageTo => 2.0,
            RelationCategory::NoDamageFrom | RelationCategory::NoDamageTo => 0.0,
            RelationCategory::HalfDamageFrom | RelationCategory::HalfDamageTo => 0.5,
        }
    }

    /// Direction this category belongs to.
    #[allow(dead_code)] // Used by tests
    pub fn direction(&self) -> Direction {
        match self {
            RelationCategory::DoubleDamageFrom
            | RelationCategory::NoDamageFrom
            | RelationCategory::HalfDamageFrom => Direction::From,
            RelationCategory::DoubleDamageTo
            | RelationCategory::NoDamageTo
            | RelationCategory::HalfDamageTo => Direction::To,
        }
    }
}

/// An accumulated damage multiplier usable as a map key.
///
/// Values are products of 0, 0.5 and 2, all exact in binary floating
/// point, so equality on the bit pattern matches numeric equality.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Multiplier(f64);

impl Multiplier {
    pub fn new(value: f64) -> Self {
        // Fold -0.0 into 0.0 so both hash alike.
        if value == 0.0 {
            Self(0.0)
        } else {
            Self(value)
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.0 == 1.0
    }
}

impl PartialEq for Multiplier {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Multiplier {}

impl Hash for Multiplier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl From<f64> for Multiplier {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type names grouped by shared multiplier, in first-insertion order.
pub type MultiplierGroups = IndexMap<Multiplier, Vec<String>>;

/// The aggregated matchup for a set of types, one grouping per direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamageRelations {
    /// Damage received, keyed by multiplier.
    pub from: MultiplierGroups,
    /// Damage dealt, keyed by multiplier.
    pub to: MultiplierGroups,
}

impl DamageRelations {
    /// Returns the grouping for a direction.
    pub fn get(&self, direction: Direction) -> &MultiplierGroups {
        match direction {
            Direction::From => &self.from,
            Direction::To => &self.to,
        }
    }

    /// Returns the multiplier bucket holding `name` in a direction, if any.
    #[allow(dead_code)] // Lookup utility for tests
    pub fn multiplier_of(&self, direction: Direction, name: &str) -> Option<Multiplier> {
        self.get(direction)
            .iter()
            .find(|(_, names)| names.iter().any(|n| n == name))
            .map(|(m, _)| *m)
    }

    /// True when neither direction has any non-neutral multiplier.
    pub fn is_empty(&self) -> bool {
        self.from.is_empty() && self.to.is_empty()
    }
}
