//! Component data shapes for the dungeon world.
//!
//! These are plain values; the store owns every instance. References to
//! other things are held as [`ThingId`]s and resolved through the store.

use cairn_foundation::ThingId;
use serde::{Deserialize, Serialize};

use crate::component::ExportRefs;

/// Location of a thing: map level and coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    /// Map level.
    pub map: u32,
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Height above the floor; things with `z > 0` fall.
    pub z: i32,
}

impl Pos {
    /// Creates a position.
    #[must_use]
    pub const fn new(map: u32, x: i32, y: i32, z: i32) -> Self {
        Self { map, x, y, z }
    }
}

/// Display name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    /// Creates a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Character drawn for the thing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Glyph(pub char);

/// Movement and sight properties of a terrain prototype.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Tile {
    /// Creatures can stand on it.
    pub walkable: bool,
    /// Light passes through it.
    pub transparent: bool,
    /// Items dropped on it sink or burn.
    pub liquid: bool,
    /// Standing on it hurts.
    pub hazardous: bool,
}

impl Tile {
    /// Blocks movement and sight.
    pub const SOLID: Tile = Tile {
        walkable: false,
        transparent: false,
        liquid: false,
        hazardous: false,
    };

    /// Open ground.
    pub const OPEN: Tile = Tile {
        walkable: true,
        transparent: true,
        liquid: false,
        hazardous: false,
    };
}

/// Hit points.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Health {
    /// Current hit points.
    pub current: i32,
    /// Maximum hit points.
    pub max: i32,
}

impl Health {
    /// Full health with the given maximum.
    #[must_use]
    pub const fn full(max: i32) -> Self {
        Self { current: max, max }
    }
}

/// Pending damage, consumed by the damage system.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Damage(pub i32);

/// Takes turns; new actors are scheduled by the turn system.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    /// Energy gained per tick.
    pub speed: u32,
}

/// Can be picked up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Weight in tenths of a pound.
    pub weight: u32,
}

/// Things carried by the holder.
///
/// Both `items` and `wielded` are duplicated when the holder is exported.
/// `wielded` normally also appears in `items`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Inventory {
    /// Carried items, in pickup order.
    pub items: Vec<ThingId>,
    /// Item in hand, if any.
    pub wielded: Option<ThingId>,
}

impl Inventory {
    /// Creates an inventory holding `items`.
    #[must_use]
    pub fn with_items(items: Vec<ThingId>) -> Self {
        Self {
            items,
            wielded: None,
        }
    }

    /// Sets the wielded item.
    #[must_use]
    pub fn wielding(mut self, item: ThingId) -> Self {
        self.wielded = Some(item);
        self
    }
}

impl ExportRefs for Inventory {
    fn remap_refs(&mut self, remap: &mut dyn FnMut(ThingId) -> Option<ThingId>) {
        self.items = self.items.iter().filter_map(|item| remap(*item)).collect();
        self.wielded = self.wielded.and_then(|item| remap(item));
    }
}

/// Marks the player character.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player;

/// Marks the agent that applies terrain effects (lava burns, water soaks).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileAgent;
