//! Carrier module: the per-room stores a profile search reads.
//!
//! This is the foundational layer. No other kernel module is imported here.

pub mod box_swap;
pub mod state_list;
pub mod task_list;
pub mod variant;
