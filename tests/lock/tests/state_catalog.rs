//! State catalog lock tests: handle stability and idempotent registration.

use sokowahn_kernel::carrier::state_list::{StateList, StateListNormal};

fn catalog() -> StateListNormal {
    StateListNormal::new(&[10, 11, 12, 13], &[12, 13])
}

#[test]
fn handles_are_dense_and_in_insertion_order() {
    let mut list = catalog();
    let sets: [&[u32]; 4] = [&[12, 13], &[], &[10], &[11, 10]];
    for (expected, set) in (0u64..).zip(sets) {
        assert_eq!(list.add(set), expected);
    }
    assert_eq!(list.count(), 4);
    let handles: Vec<u64> = list.states().map(|(id, _)| id).collect();
    assert_eq!(handles, vec![0, 1, 2, 3]);
}

#[test]
fn registration_is_idempotent_and_order_insensitive() {
    let mut list = catalog();
    let a = list.add(&[13, 10]);
    let b = list.add(&[10, 13]);
    assert_eq!(a, b);
    assert_eq!(list.count(), 1);
    assert_eq!(list.get(a), &[10, 13]);
    assert_eq!(list.find(&[13, 10]), Some(a));
    assert_eq!(list.find(&[11]), None);
}

#[test]
fn goal_boxes_are_counted() {
    let mut list = catalog();
    let s = list.add(&[10, 12, 13]);
    assert_eq!(list.box_count(s), 3);
    assert_eq!(list.goal_box_count(s), 2);
}

#[test]
#[should_panic(expected = "box position outside room")]
fn foreign_position_faults() {
    catalog().add(&[99]);
}

#[test]
#[should_panic(expected = "duplicate box position")]
fn repeated_position_faults() {
    catalog().add(&[10, 10]);
}

#[test]
#[should_panic(expected = "out of range")]
fn dangling_handle_faults() {
    let list = catalog();
    let _ = list.get(0);
}

#[test]
fn readding_the_enumeration_adds_nothing() {
    let mut list = catalog();
    let sets: [&[u32]; 5] = [&[13, 12], &[], &[11], &[12, 10, 11], &[10, 13]];
    for set in sets {
        list.add(set);
    }
    let before = list.count();

    let erased: &dyn StateList = &list;
    let listed: Vec<(u64, Vec<u32>)> = erased
        .states()
        .map(|(id, boxes)| (id, boxes.to_vec()))
        .collect();
    assert_eq!(listed.len() as u64, before);

    for (id, boxes) in &listed {
        assert_eq!(list.add(boxes), *id);
        let mut reversed = boxes.clone();
        reversed.reverse();
        assert_eq!(list.add(&reversed), *id);
    }
    assert_eq!(list.count(), before);
    assert_eq!(list.get(3), &[10, 11, 12]);
}
