//! Integration tests for component presence masks

use cairn_foundation::Systems;

#[test]
fn empty_mask_has_no_bits() {
    let mask = Systems::EMPTY;
    assert!(mask.is_empty());
    assert_eq!(mask.len(), 0);
    assert_eq!(mask.iter().count(), 0);
}

#[test]
fn insert_and_remove_bits() {
    let mut mask = Systems::EMPTY;
    mask.insert(0);
    mask.insert(5);
    mask.insert(Systems::CAPACITY - 1);
    assert!(mask.contains(5));
    assert_eq!(mask.len(), 3);

    mask.remove(5);
    assert!(!mask.contains(5));
    assert_eq!(mask.iter().collect::<Vec<_>>(), vec![0, Systems::CAPACITY - 1]);
}

#[test]
fn collect_from_bits() {
    let mask: Systems = [1, 3, 3, 7].into_iter().collect();
    assert_eq!(mask.bits(), 0b1000_1010);
    assert_eq!(Systems::from_bits(mask.bits()), mask);
}
