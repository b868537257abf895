//! Integration tests for thing ids
//!
//! Tests range classification and monotonic allocation.

use cairn_foundation::{IdAllocator, IdRange, SPECIAL_MAX_ID, TERRAIN_MAX_ID, ThingId};

// =============================================================================
// Range Classification
// =============================================================================

#[test]
fn zero_is_in_no_range() {
    assert_eq!(ThingId(0).range(), None);
    assert!(!ThingId(0).is_builtin());
    assert!(!ThingId(0).is_ordinary());
}

#[test]
fn range_boundaries() {
    assert_eq!(ThingId(1).range(), Some(IdRange::Terrain));
    assert_eq!(ThingId(TERRAIN_MAX_ID - 1).range(), Some(IdRange::Terrain));
    assert_eq!(ThingId(TERRAIN_MAX_ID).range(), Some(IdRange::Special));
    assert_eq!(ThingId(SPECIAL_MAX_ID - 1).range(), Some(IdRange::Special));
    assert_eq!(ThingId(SPECIAL_MAX_ID).range(), Some(IdRange::Ordinary));
    assert_eq!(ThingId(u64::MAX).range(), Some(IdRange::Ordinary));
}

#[test]
fn builtin_covers_terrain_and_special() {
    assert!(ThingId(1).is_builtin());
    assert!(ThingId(TERRAIN_MAX_ID).is_builtin());
    assert!(!ThingId(SPECIAL_MAX_ID).is_builtin());
    assert!(ThingId(SPECIAL_MAX_ID).is_ordinary());
}

#[test]
fn range_display_names_bounds() {
    assert_eq!(format!("{}", IdRange::Terrain), "terrain [1, 64)");
    assert_eq!(format!("{}", IdRange::Special), "special [64, 100)");
    assert_eq!(format!("{}", ThingId(300)), "#300");
}

// =============================================================================
// Allocation
// =============================================================================

#[test]
fn allocation_starts_at_first_ordinary() {
    let mut ids = IdAllocator::new();
    assert_eq!(ids.peek(), ThingId::FIRST_ORDINARY);
    assert_eq!(ids.allocate(), Some(ThingId(SPECIAL_MAX_ID)));
    assert_eq!(ids.allocate(), Some(ThingId(SPECIAL_MAX_ID + 1)));
    assert_eq!(ids.peek(), ThingId(SPECIAL_MAX_ID + 2));
}

#[test]
fn resumed_allocator_continues_from_counter() {
    let mut ids = IdAllocator::resume(ThingId(1_000)).unwrap();
    assert!(ids.has_issued(ThingId(999)));
    assert_eq!(ids.allocate(), Some(ThingId(1_000)));
    assert!(ids.has_issued(ThingId(1_000)));
}

#[test]
fn exhausted_allocator_never_wraps() {
    let mut ids = IdAllocator::resume(ThingId(u64::MAX)).unwrap();
    assert!(ids.is_exhausted());
    assert_eq!(ids.allocate(), None);
    assert_eq!(ids.peek(), ThingId(u64::MAX));
}

#[test]
fn resume_refuses_reserved_counter() {
    assert!(IdAllocator::resume(ThingId(0)).is_none());
    assert!(IdAllocator::resume(ThingId(TERRAIN_MAX_ID)).is_none());
}
