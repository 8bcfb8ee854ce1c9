//! Task list: a double-ended queue of fixed-width `u64` records.
//!
//! The list does not interpret records. Callers choose FIFO or LIFO order by
//! fetching from the head (`fetch_first`) or the tail (`fetch_last`).
//!
//! Storage grows geometrically and is never reclaimed within a pass: records
//! fetched from the head keep their slots, so the buffer size reflects the
//! largest backlog written so far.

use std::fmt;

/// Capability of a task list.
pub trait TaskList {
    /// Width of one record in `u64` fields.
    fn task_len(&self) -> usize;

    /// Append a record at the tail.
    ///
    /// # Panics
    ///
    /// Implementations panic if `task.len() != task_len()`.
    fn add(&mut self, task: &[u64]);

    /// Remove the head record into `out`. Returns `false` when empty.
    ///
    /// # Panics
    ///
    /// Implementations panic if `out` is shorter than `task_len()`.
    fn fetch_first(&mut self, out: &mut [u64]) -> bool;

    /// Copy the head record into `out` without removing it.
    fn peek_first(&self, out: &mut [u64]) -> bool;

    /// Remove the tail record into `out`. Returns `false` when empty.
    fn fetch_last(&mut self, out: &mut [u64]) -> bool;

    /// Copy the tail record into `out` without removing it.
    fn peek_last(&self, out: &mut [u64]) -> bool;

    /// Records not yet fetched (tail position minus head position).
    fn count(&self) -> u64;

    /// Records fetched from the head so far.
    fn count_fetched_first(&self) -> u64;

    /// Whether no record is pending.
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// In-memory task list over a single flat buffer.
#[derive(Debug, Clone)]
pub struct TaskListNormal {
    task_len: usize,
    data: Vec<u64>,
    /// Head position, in records.
    read_pos: usize,
    /// Tail position, in records.
    write_pos: usize,
}

impl TaskListNormal {
    /// Create an empty list for records of `task_len` fields.
    ///
    /// The initial buffer holds one record.
    ///
    /// # Panics
    ///
    /// Panics if `task_len` is zero.
    #[must_use]
    pub fn new(task_len: usize) -> Self {
        assert!(task_len > 0, "task records need at least one field");
        Self {
            task_len,
            data: vec![0; task_len],
            read_pos: 0,
            write_pos: 0,
        }
    }

    /// Current buffer capacity in records.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len() / self.task_len
    }

    fn record(&self, pos: usize) -> &[u64] {
        let offset = pos * self.task_len;
        &self.data[offset..offset + self.task_len]
    }

    fn check_out(&self, out: &[u64]) {
        assert!(
            out.len() >= self.task_len,
            "read buffer holds {} fields, record has {}",
            out.len(),
            self.task_len
        );
    }
}

impl TaskList for TaskListNormal {
    fn task_len(&self) -> usize {
        self.task_len
    }

    fn add(&mut self, task: &[u64]) {
        assert_eq!(
            task.len(),
            self.task_len,
            "task record width mismatch"
        );
        let offset = self.write_pos * self.task_len;
        if offset == self.data.len() {
            let doubled = self.data.len() * 2;
            self.data.resize(doubled, 0);
        }
        self.data[offset..offset + self.task_len].copy_from_slice(task);
        self.write_pos += 1;
    }

    fn fetch_first(&mut self, out: &mut [u64]) -> bool {
        if !self.peek_first(out) {
            return false;
        }
        self.read_pos += 1;
        true
    }

    fn peek_first(&self, out: &mut [u64]) -> bool {
        self.check_out(out);
        if self.read_pos == self.write_pos {
            return false;
        }
        out[..self.task_len].copy_from_slice(self.record(self.read_pos));
        true
    }

    fn fetch_last(&mut self, out: &mut [u64]) -> bool {
        if !self.peek_last(out) {
            return false;
        }
        self.write_pos -= 1;
        true
    }

    fn peek_last(&self, out: &mut [u64]) -> bool {
        self.check_out(out);
        if self.read_pos == self.write_pos {
            return false;
        }
        out[..self.task_len].copy_from_slice(self.record(self.write_pos - 1));
        true
    }

    fn count(&self) -> u64 {
        (self.write_pos - self.read_pos) as u64
    }

    fn count_fetched_first(&self) -> u64 {
        self.read_pos as u64
    }
}

impl fmt::Display for TaskListNormal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[allow(clippy::cast_precision_loss)]
        let kib = (self.data.len() * std::mem::size_of::<u64>()) as f64 / 1024.0;
        write!(
            f,
            "count={} read_pos={} write_pos={} buffer={kib:.1} KiB",
            self.count(),
            self.read_pos,
            self.write_pos
        )
    }
}
