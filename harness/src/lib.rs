//! Sokowahn Harness: fixture rooms and content-addressed profile bundles.
//!
//! The harness runs a world's room through the profile search and packages
//! the result as a self-contained artifact bundle that can be written to
//! disk and verified offline.
//!
//! The harness does NOT implement search or hashing; it delegates to
//! `sokowahn_search` and the kernel. Worlds provide room data only.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bundle;
pub mod bundle_dir;
pub mod contract;
pub mod runner;
pub mod worlds;
