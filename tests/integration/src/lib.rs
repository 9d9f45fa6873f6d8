//! Integration test utilities for the forum server
//!
//! Spawns the full HTTP application on a local port, wired to the in-memory
//! stores and a scripted identity provider, and drives it with `reqwest`.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
