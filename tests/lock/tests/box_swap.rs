//! Box-swap index lock tests.

use sokowahn_kernel::carrier::box_swap::{BoxSwap, BoxSwapNormal};
use sokowahn_kernel::carrier::state_list::{StateList, StateListNormal};

/// States: 0 = {}, 1 = {5}, 2 = {6}, 3 = {5, 6}.
fn catalog() -> StateListNormal {
    let mut list = StateListNormal::new(&[5, 6], &[6]);
    let sets: [&[u32]; 4] = [&[], &[5], &[6], &[5, 6]];
    for set in sets {
        list.add(set);
    }
    list
}

#[test]
fn miss_returns_input_state() {
    let swaps = BoxSwapNormal::new();
    for state in 0..4 {
        assert_eq!(swaps.get(state), state);
    }
    assert_eq!(swaps.count(), 0);
}

#[test]
fn edges_enumerate_in_pre_state_order() {
    let states = catalog();
    let mut swaps = BoxSwapNormal::new();
    swaps.add(&states, 2, 3);
    swaps.add(&states, 0, 1);
    assert_eq!(swaps.get(0), 1);
    assert_eq!(swaps.get(2), 3);
    assert_eq!(swaps.get(1), 1);
    assert_eq!(swaps.keys().collect::<Vec<_>>(), vec![0, 2]);
    assert_eq!(swaps.iter().collect::<Vec<_>>(), vec![(0, 1), (2, 3)]);
}

#[test]
#[should_panic(expected = "must add exactly one box")]
fn edge_removing_a_box_faults() {
    let states = catalog();
    BoxSwapNormal::new().add(&states, 1, 0);
}

#[test]
#[should_panic(expected = "must differ in exactly one box position")]
fn edge_moving_a_box_faults() {
    let mut wide = StateListNormal::new(&[5, 6, 7], &[]);
    let one = wide.add(&[5]);
    let two_elsewhere = wide.add(&[6, 7]);
    BoxSwapNormal::new().add(&wide, one, two_elsewhere);
}

#[test]
#[should_panic(expected = "registered twice")]
fn second_edge_for_same_state_faults() {
    let states = catalog();
    let mut swaps = BoxSwapNormal::new();
    swaps.add(&states, 0, 1);
    swaps.add(&states, 0, 2);
}
