//! Port traits at the I/O boundaries.

pub mod auction_port;
pub mod config_port;
pub mod table_port;
