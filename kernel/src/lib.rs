//! SokoWahn Kernel: per-room data stores and proof primitives of the
//! compositional Sokoban solver.
//!
//! # API Surface
//!
//! - [`carrier`] -- state catalog, box-swap index, variant catalog, task queue
//! - [`room`] -- the room model a profile search consumes, plus builders
//! - [`proof`] -- 64-bit fingerprint, checksum table, canonical JSON, content hash
//!
//! # Module Dependency Direction
//!
//! `carrier` ← `room`, `proof` ← `room`
//!
//! One-way only. No cycles. `carrier` and `proof` depend on nothing internal.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod carrier;
pub mod proof;
pub mod room;
