//! Core domain types and logic.

pub mod aggregator;
pub mod board;
pub mod error;
pub mod money;
pub mod pacer;
pub mod position;
pub mod roster;
pub mod sale;
pub mod settings;
pub mod table;
pub mod trend;
