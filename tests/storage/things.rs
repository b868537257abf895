//! Integration tests for thing lifecycle
//!
//! Tests creation, built-in registration, lookup, and destruction.

use cairn_foundation::{ErrorKind, IdRange, SPECIAL_MAX_ID, TERRAIN_MAX_ID, ThingId};
use cairn_storage::builtin::{FLOOR, TILE_AGENT, WALL};
use cairn_storage::components::{Damage, Name, Pos, Tile};
use cairn_storage::{ComponentKind, Store};

// =============================================================================
// Creation
// =============================================================================

#[test]
fn first_created_thing_gets_first_ordinary_id() {
    let mut store = Store::with_defaults().unwrap();
    let id = store.create_obj(()).unwrap();
    assert_eq!(id, ThingId(SPECIAL_MAX_ID));
    assert_eq!(id.range(), Some(IdRange::Ordinary));
}

#[test]
fn created_ids_are_unique_and_increasing() {
    let mut store = Store::new();
    let ids: Vec<_> = (0..50).map(|_| store.create_obj(()).unwrap()).collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(store.len(), 50);
}

#[test]
fn created_thing_mask_lists_its_components() {
    let mut store = Store::new();
    let id = store.create_obj((Pos::new(0, 1, 1, 0), Damage(2))).unwrap();
    let thing = store.get_obj(id).unwrap();
    assert!(thing.has(ComponentKind::Pos));
    assert!(thing.has(ComponentKind::Damage));
    assert!(!thing.has(ComponentKind::Name));
    assert_eq!(thing.systems.len(), 2);
}

// =============================================================================
// Built-in Registration
// =============================================================================

#[test]
fn builtins_are_found_by_fixed_id() {
    let store = Store::with_defaults().unwrap();
    assert_eq!(store.get::<Tile>(WALL), Some(&Tile::SOLID));
    assert_eq!(store.get::<Name>(FLOOR), Some(&Name::new("floor")));
    assert!(store.get_obj(TILE_AGENT).is_some());
}

#[test]
fn terrain_outside_band_is_rejected() {
    let mut store = Store::new();
    let err = store
        .register_terrain(ThingId(TERRAIN_MAX_ID + 3), ())
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::IdOutOfRange {
            range: IdRange::Terrain,
            ..
        }
    ));
    assert!(store.is_empty());
}

#[test]
fn special_outside_band_is_rejected() {
    let mut store = Store::new();
    assert!(store.register_special(ThingId(SPECIAL_MAX_ID), ()).is_err());
    assert!(store.register_special(ThingId(10), ()).is_err());
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut store = Store::with_defaults().unwrap();
    let err = store.register_terrain(WALL, (Tile::OPEN,)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AlreadyRegistered(_)));
    assert_eq!(store.get::<Tile>(WALL), Some(&Tile::SOLID));
}

// =============================================================================
// Destruction
// =============================================================================

#[test]
fn destroyed_thing_is_gone_everywhere() {
    let mut store = Store::new();
    let here = Pos::new(2, 4, 4, 0);
    let id = store.create_obj((here, Name::new("goblin"))).unwrap();
    store.destroy_obj(id).unwrap();

    assert!(store.get_obj(id).is_none());
    assert!(store.get::<Pos>(id).is_none());
    assert!(store.get_all::<Name>().is_empty());
    assert!(store.get_all_by(&here).is_empty());
    assert!(store.components_of(id).is_empty());
}

#[test]
fn destroying_twice_reports_missing_thing() {
    let mut store = Store::new();
    let id = store.create_obj(()).unwrap();
    store.destroy_obj(id).unwrap();
    let err = store.destroy_obj(id).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ThingNotFound(_)));
}

#[test]
fn builtins_cannot_be_destroyed() {
    let mut store = Store::with_defaults().unwrap();
    for id in [WALL, TILE_AGENT] {
        let err = store.destroy_obj(id).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::NotDestroyable(_)));
        assert!(store.get_obj(id).is_some());
    }
}

#[test]
fn ids_are_not_reused_after_destroy() {
    let mut store = Store::new();
    let first = store.create_obj(()).unwrap();
    let second = store.create_obj(()).unwrap();
    store.destroy_obj(second).unwrap();
    store.destroy_obj(first).unwrap();
    let third = store.create_obj(()).unwrap();
    assert!(third > second);
}
