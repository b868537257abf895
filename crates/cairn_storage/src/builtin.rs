//! Standard terrain prototypes and special things.
//!
//! Built-ins are recreated at startup rather than saved, so every store that
//! loads saved data should be built with [`Store::with_defaults`] (or have
//! [`register_defaults`] applied) first.

use cairn_foundation::{Result, TERRAIN_MAX_ID, ThingId};
use tracing::debug;

use crate::components::{Glyph, Name, Tile, TileAgent};
use crate::store::Store;

/// Impassable, opaque rock.
pub const WALL: ThingId = ThingId(1);
/// Open ground.
pub const FLOOR: ThingId = ThingId(2);
/// Walkable liquid.
pub const WATER: ThingId = ThingId(3);
/// Walkable, hazardous liquid.
pub const LAVA: ThingId = ThingId(4);
/// A closed door: solid until opened.
pub const DOOR: ThingId = ThingId(5);
/// Stairs between levels.
pub const STAIRS: ThingId = ThingId(6);
/// The agent that applies terrain effects to things standing on tiles.
pub const TILE_AGENT: ThingId = ThingId(TERRAIN_MAX_ID);

/// Registers the standard terrain prototypes and the tile agent.
///
/// # Errors
///
/// Returns an error if any of the ids is already registered.
pub fn register_defaults(store: &mut Store) -> Result<()> {
    store.register_terrain(WALL, (Name::new("wall"), Glyph('#'), Tile::SOLID))?;
    store.register_terrain(FLOOR, (Name::new("floor"), Glyph('.'), Tile::OPEN))?;
    store.register_terrain(
        WATER,
        (
            Name::new("water"),
            Glyph('~'),
            Tile {
                liquid: true,
                ..Tile::OPEN
            },
        ),
    )?;
    store.register_terrain(
        LAVA,
        (
            Name::new("lava"),
            Glyph('~'),
            Tile {
                liquid: true,
                hazardous: true,
                ..Tile::OPEN
            },
        ),
    )?;
    store.register_terrain(DOOR, (Name::new("door"), Glyph('+'), Tile::SOLID))?;
    store.register_terrain(STAIRS, (Name::new("stairs"), Glyph('>'), Tile::OPEN))?;
    store.register_special(TILE_AGENT, (Name::new("tile agent"), TileAgent))?;
    debug!(count = store.len(), "registered default built-ins");
    Ok(())
}

impl Store {
    /// Creates a store with the standard built-ins registered.
    ///
    /// # Errors
    ///
    /// Never fails in practice; registration errors are propagated.
    pub fn with_defaults() -> Result<Self> {
        let mut store = Self::new();
        register_defaults(&mut store)?;
        Ok(store)
    }
}
