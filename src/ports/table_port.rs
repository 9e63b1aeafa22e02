//! Position table storage port trait.

use std::path::PathBuf;

use crate::domain::error::BoardError;
use crate::domain::position::Position;
use crate::domain::table::PositionTable;

pub trait TablePort {
    /// Replaces the stored table for `table.position`; returns where it went.
    fn write_table(&self, table: &PositionTable) -> Result<PathBuf, BoardError>;

    /// Reads the stored table, or `MissingArtifact` when none exists.
    fn read_table(&self, position: Position) -> Result<PositionTable, BoardError>;
}
