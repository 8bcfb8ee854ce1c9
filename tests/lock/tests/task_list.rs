//! Task list lock tests: FIFO and LIFO use of one buffer.

use sokowahn_kernel::carrier::task_list::{TaskList, TaskListNormal};

#[test]
fn fifo_order_and_fetch_counter() {
    let mut list = TaskListNormal::new(2);
    for i in 0..5u64 {
        list.add(&[i, i + 100]);
    }
    let mut out = [0u64; 2];
    let mut seen = Vec::new();
    while list.fetch_first(&mut out) {
        seen.push(out);
    }
    assert_eq!(seen[0], [0, 100]);
    assert_eq!(seen[4], [4, 104]);
    assert_eq!(list.count(), 0);
    assert_eq!(list.count_fetched_first(), 5);
    assert!(list.is_empty());
}

#[test]
fn lifo_order() {
    let mut list = TaskListNormal::new(1);
    for i in 0..4u64 {
        list.add(&[i]);
    }
    let mut out = [0u64; 1];
    let mut seen = Vec::new();
    while list.fetch_last(&mut out) {
        seen.push(out[0]);
    }
    assert_eq!(seen, vec![3, 2, 1, 0]);
    assert_eq!(list.count_fetched_first(), 0);
}

#[test]
fn peek_does_not_consume() {
    let mut list = TaskListNormal::new(1);
    list.add(&[7]);
    list.add(&[8]);
    let mut out = [0u64; 1];
    assert!(list.peek_first(&mut out));
    assert_eq!(out, [7]);
    assert!(list.peek_last(&mut out));
    assert_eq!(out, [8]);
    assert_eq!(list.count(), 2);
}

#[test]
fn empty_fetch_is_false_and_leaves_buffer() {
    let mut list = TaskListNormal::new(3);
    let mut out = [9u64; 3];
    assert!(!list.fetch_first(&mut out));
    assert!(!list.fetch_last(&mut out));
    assert_eq!(out, [9, 9, 9]);
}

#[test]
fn buffer_grows_geometrically() {
    let mut list = TaskListNormal::new(1);
    assert_eq!(list.capacity(), 1);
    for i in 0..5u64 {
        list.add(&[i]);
    }
    assert_eq!(list.capacity(), 8);
    let summary = list.to_string();
    assert!(summary.starts_with("count=5 read_pos=0 write_pos=5"), "{summary}");
}

#[test]
#[should_panic(expected = "width mismatch")]
fn wrong_width_faults() {
    TaskListNormal::new(2).add(&[1]);
}
