//! Per-position output tables.

use crate::domain::money::UsdCents;
use crate::domain::position::Position;
use crate::domain::roster::Role;

/// Fixed leading columns of every table.
pub const IDENTITY_COLUMNS: [&str; 3] = ["player", "team", "role"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    /// `"<Name> (<TEAM>)"`.
    pub player: String,
    pub team: String,
    pub role: Role,
    /// Most recent sale first. May be empty.
    pub prices: Vec<UsdCents>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionTable {
    pub position: Position,
    pub rows: Vec<PlayerRow>,
}

impl PositionTable {
    pub fn new(position: Position, rows: Vec<PlayerRow>) -> Self {
        Self { position, rows }
    }

    /// Number of price columns: the longest price history in the table.
    pub fn rank_count(&self) -> usize {
        self.rows.iter().map(|r| r.prices.len()).max().unwrap_or(0)
    }

    pub fn header(&self) -> Vec<String> {
        IDENTITY_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain((1..=self.rank_count()).map(ordinal))
            .collect()
    }

    pub fn sale_count(&self) -> usize {
        self.rows.iter().map(|r| r.prices.len()).sum()
    }
}

/// 1-based English ordinal: 1st, 2nd, 3rd, 4th, 11th, 21st, 112th.
pub fn ordinal(n: usize) -> String {
    let suffix = if (11..=13).contains(&(n % 100)) {
        "th"
    } else {
        match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{}{}", n, suffix)
}
