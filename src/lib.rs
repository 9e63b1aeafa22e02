//! sorare-limited: auction price tracker for a curated card roster.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. The `fetch` command pages through
//! each player's auction history and writes one CSV table per position; the
//! `serve` command renders those tables as a tabbed dashboard.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
