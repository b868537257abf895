//! Integration tests for save and load
//!
//! Tests round trips, built-in handling, block ordering, and failure atomicity.

use cairn_foundation::{ErrorKind, ThingId};
use cairn_storage::builtin::{FLOOR, WALL};
use cairn_storage::components::{Actor, Damage, Inventory, Name, Pos, Tile};
use cairn_storage::{
    BlockDocument, BlockWriter, ComponentKind, LoadSource, SaveSink, Store, StoreConfig,
    THINGS_BLOCK,
};

fn world() -> Store {
    let mut store = Store::with_defaults().unwrap();
    let here = Pos::new(1, 0, 0, 1);
    let coin = store.create_obj((Name::new("coin"), here)).unwrap();
    store.create_obj((Name::new("miner"), here, Actor { speed: 10 })).unwrap();
    store.create_obj((Inventory::with_items(vec![coin]), Damage(2))).unwrap();
    store
}

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn roundtrip_preserves_every_thing_and_component() {
    let store = world();
    let doc = store.save_document().unwrap();

    let mut loaded = Store::with_defaults().unwrap();
    loaded.load_document(&doc).unwrap();

    assert_eq!(loaded.len(), store.len());
    assert_eq!(loaded.next_id(), store.next_id());
    for thing in store.things() {
        assert_eq!(loaded.get_obj(thing.id), Some(thing));
        assert_eq!(loaded.get::<Name>(thing.id), store.get::<Name>(thing.id));
        assert_eq!(loaded.get::<Pos>(thing.id), store.get::<Pos>(thing.id));
        assert_eq!(
            loaded.get::<Inventory>(thing.id),
            store.get::<Inventory>(thing.id)
        );
    }
}

#[test]
fn roundtrip_preserves_index_order_and_new_lists() {
    let store = world();
    let mut loaded = Store::with_defaults().unwrap();
    loaded.load_bytes(&store.to_bytes().unwrap()).unwrap();

    let here = Pos::new(1, 0, 0, 1);
    assert_eq!(loaded.get_all_by(&here), store.get_all_by(&here));
    assert_eq!(loaded.get_all_new::<Actor>(), store.get_all_new::<Actor>());
    assert_eq!(loaded.get_all_new::<Damage>(), store.get_all_new::<Damage>());
}

#[test]
fn creation_after_load_continues_counter() {
    let store = world();
    let mut loaded = Store::with_defaults().unwrap();
    loaded.load_document(&store.save_document().unwrap()).unwrap();
    let next = loaded.create_obj(()).unwrap();
    assert_eq!(next, store.next_id());
}

#[test]
fn destroyed_ids_stay_retired_after_load() {
    let mut store = world();
    let last = store.create_obj(()).unwrap();
    store.destroy_obj(last).unwrap();

    let mut loaded = Store::with_defaults().unwrap();
    loaded.load_document(&store.save_document().unwrap()).unwrap();
    assert!(loaded.create_obj(()).unwrap() > last);
}

// =============================================================================
// Built-in Handling
// =============================================================================

#[test]
fn builtins_are_left_out_of_saved_data() {
    let store = world();
    let mut bare = Store::with_config(StoreConfig::default().with_restore_builtin(false));
    bare.load_document(&store.save_document().unwrap()).unwrap();

    assert!(bare.get_obj(WALL).is_none());
    assert!(bare.things().all(|thing| thing.id.is_ordinary()));
}

#[test]
fn builtin_edits_in_saved_store_do_not_leak_into_load() {
    let mut store = world();
    store.add(FLOOR, Tile::SOLID).unwrap();
    let doc = store.save_document().unwrap();

    let mut loaded = Store::with_defaults().unwrap();
    loaded.load_document(&doc).unwrap();
    assert_eq!(loaded.get::<Tile>(FLOOR), Some(&Tile::OPEN));
}

#[test]
fn builtin_records_in_file_are_ignored() {
    let mut store = Store::with_config(StoreConfig::inspection());
    cairn_storage::builtin::register_defaults(&mut store).unwrap();
    store.add(WALL, Name::new("painted wall")).unwrap();
    let doc = store.save_document().unwrap();

    let mut loaded = Store::with_defaults().unwrap();
    loaded.load_document(&doc).unwrap();
    assert_eq!(loaded.get::<Name>(WALL), Some(&Name::new("wall")));
}

// =============================================================================
// Block Ordering and Failures
// =============================================================================

#[test]
fn blocks_follow_registry_order() {
    let doc = world().save_document().unwrap();
    let names = doc.block_names();
    assert_eq!(names[0], THINGS_BLOCK);
    let kinds: Vec<_> = ComponentKind::ALL.iter().map(|kind| kind.name()).collect();
    assert_eq!(&names[1..], kinds.as_slice());
}

#[test]
fn missing_things_block_is_load_failure() {
    let doc = BlockDocument::new();
    let mut store = world();
    let err = store.load_document(&doc).unwrap_err();
    assert!(err.is_load());
}

#[test]
fn component_block_before_things_is_load_failure() {
    let mut writer = BlockWriter::new();
    writer.begin_block("name").unwrap();
    writer.put("count", &0u64).unwrap();
    writer.end_block().unwrap();
    let doc = writer.finish().unwrap();

    let mut store = Store::with_defaults().unwrap();
    assert!(store.load_document(&doc).unwrap_err().is_load());
}

#[test]
fn truncated_component_block_is_load_failure() {
    let mut writer = BlockWriter::new();
    let store = world();
    store.save(&mut writer).unwrap();
    let full = writer.finish().unwrap();

    // Drop the trailing component blocks.
    let mut writer = BlockWriter::new();
    writer.begin_block(THINGS_BLOCK).unwrap();
    let mut reader = full.reader();
    reader.check_and_enter_block(THINGS_BLOCK).unwrap();
    let next: ThingId = reader.parse("next_id").unwrap();
    let count: u64 = reader.parse("count").unwrap();
    writer.put("next_id", &next).unwrap();
    writer.put("count", &count).unwrap();
    for _ in 0..count {
        let thing: cairn_storage::Thing = reader.parse("thing").unwrap();
        writer.put("thing", &thing).unwrap();
    }
    writer.end_block().unwrap();
    let truncated = writer.finish().unwrap();

    let mut target = Store::with_defaults().unwrap();
    let err = target.load_document(&truncated).unwrap_err();
    assert!(err.is_load());
    assert!(target.get_obj(ThingId(100)).is_none());
}

/// A document with no things whose id counter is `next`.
fn empty_document(next: ThingId) -> BlockDocument {
    let mut writer = BlockWriter::new();
    writer.begin_block(THINGS_BLOCK).unwrap();
    writer.put("next_id", &next).unwrap();
    writer.put("count", &0u64).unwrap();
    writer.end_block().unwrap();
    for kind in ComponentKind::ALL {
        writer.begin_block(kind.name()).unwrap();
        writer.put("count", &0u64).unwrap();
        if kind.tracks_new() {
            writer.put("new", &Vec::<ThingId>::new()).unwrap();
        }
        writer.end_block().unwrap();
    }
    writer.finish().unwrap()
}

#[test]
fn exhausted_counter_refuses_creation_after_load() {
    let mut store = Store::with_defaults().unwrap();
    store.load_document(&empty_document(ThingId(u64::MAX))).unwrap();

    for _ in 0..3 {
        let err = store.create_obj(()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::IdsExhausted));
    }
    assert!(store.get_obj(ThingId(0)).is_none());
    assert_eq!(store.get::<Tile>(WALL), Some(&Tile::SOLID));
    assert!(store.get_obj(WALL).unwrap().has(ComponentKind::Tile));
    assert!(store.things().all(|thing| thing.id.is_builtin()));
}

#[test]
fn counter_near_the_top_hands_out_remaining_ids() {
    let mut store = Store::with_defaults().unwrap();
    store
        .load_document(&empty_document(ThingId(u64::MAX - 1)))
        .unwrap();

    assert_eq!(store.create_obj(()).unwrap(), ThingId(u64::MAX - 1));
    assert!(store.create_obj(()).is_err());
}

#[test]
fn failed_load_keeps_previous_contents() {
    let mut store = world();
    let before = store.clone();
    let bytes = store.to_bytes().unwrap();

    assert!(store.load_bytes(&bytes[..bytes.len() - 3]).is_err());
    assert_eq!(store.len(), before.len());
    for thing in before.things() {
        assert_eq!(store.get_obj(thing.id), Some(thing));
    }
}
