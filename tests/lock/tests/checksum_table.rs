//! Checksum table lock tests, keyed by real fingerprints.

use sokowahn_kernel::proof::checksum_table::{ChecksumTable, ChecksumTableNormal};
use sokowahn_kernel::proof::fingerprint::{Fingerprint, START};

#[test]
fn empty_fingerprint_is_the_offset_basis() {
    assert_eq!(Fingerprint::start().value(), START);
    assert_eq!(Fingerprint::default().value(), START);
}

#[test]
fn u64_folds_low_half_first() {
    let value = 0x0000_0002_0000_0001u64;
    let folded = Fingerprint::start().update_u64(value);
    let by_halves = Fingerprint::start().update_u32(1).update_u32(2);
    assert_eq!(folded, by_halves);
}

#[test]
fn keep_best_value_per_key() {
    let mut table = ChecksumTableNormal::new();
    let keys: Vec<u64> = (0..100u32)
        .map(|i| Fingerprint::start().update_u32(i).value())
        .collect();
    for (&key, cost) in keys.iter().zip(100u64..) {
        table.add(key, cost);
    }
    assert_eq!(table.count(), 100);

    for &key in &keys {
        let best = table.get(key, u64::MAX);
        if best % 2 == 0 {
            table.update(key, best / 2);
        }
    }
    assert_eq!(table.get(keys[0], u64::MAX), 50);
    assert_eq!(table.get(keys[1], u64::MAX), 101);
    assert_eq!(table.count(), 100);
}

#[test]
fn miss_returns_caller_default() {
    let table = ChecksumTableNormal::new();
    assert_eq!(table.get(42, 7), 7);
    assert_eq!(table.get(42, u64::MAX), u64::MAX);
}

#[test]
#[should_panic(expected = "already present")]
fn double_add_faults() {
    let mut table = ChecksumTableNormal::new();
    table.add(1, 1);
    table.add(1, 2);
}

#[test]
#[should_panic(expected = "not present")]
fn update_of_absent_key_faults() {
    ChecksumTableNormal::new().update(1, 1);
}
