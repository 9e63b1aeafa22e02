//! Dashboard view model: one tab per position, rows ranked by average price.

use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::domain::error::BoardError;
use crate::domain::position::Position;
use crate::domain::table::{PlayerRow, PositionTable};
use crate::domain::trend::RowStats;
use crate::ports::table_port::TablePort;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow {
    pub row: PlayerRow,
    pub stats: RowStats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabContent {
    Grid { rows: Vec<BoardRow>, ranks: usize },
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTab {
    pub position: Position,
    pub label: String,
    pub content: TabContent,
}

/// `limited` + GK becomes `LimitedGK`.
pub fn tab_label(rarity: &str, position: Position) -> String {
    let mut chars = rarity.chars();
    let rarity: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{}{}", rarity, position.code())
}

/// Average price descending, undefined averages last, ties keep input order.
pub fn sort_rows(rows: &mut [BoardRow]) {
    rows.sort_by(|a, b| match (a.stats.average, b.stats.average) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

pub fn rank_table(table: PositionTable) -> TabContent {
    if table.rows.is_empty() {
        return TabContent::Placeholder;
    }
    let ranks = table.rank_count();
    let mut rows: Vec<BoardRow> = table
        .rows
        .into_iter()
        .map(|row| BoardRow {
            stats: RowStats::compute(&row.prices),
            row,
        })
        .collect();
    sort_rows(&mut rows);
    TabContent::Grid { rows, ranks }
}

/// Reads one position's table; any failure becomes a placeholder tab.
pub fn load_tab(tables: &dyn TablePort, rarity: &str, position: Position) -> BoardTab {
    let content = match tables.read_table(position) {
        Ok(table) => rank_table(table),
        Err(BoardError::MissingArtifact { path }) => {
            debug!(position = %position, %path, "no table yet");
            TabContent::Placeholder
        }
        Err(e) => {
            warn!(position = %position, error = %e, "unreadable table");
            TabContent::Placeholder
        }
    };
    BoardTab {
        position,
        label: tab_label(rarity, position),
        content,
    }
}

pub fn load_board(tables: &dyn TablePort, rarity: &str) -> Vec<BoardTab> {
    Position::ALL
        .into_iter()
        .map(|position| load_tab(tables, rarity, position))
        .collect()
}
