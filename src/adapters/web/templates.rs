//! HTML templates using Askama.
//!
//! Templates only see pre-formatted strings; all number formatting and
//! ranking happens here and in the domain layer.

use askama::Template;

use crate::domain::board::{BoardRow, BoardTab, TabContent};
use crate::domain::table::ordinal;
use crate::domain::trend::Trend;

pub struct GridCell {
    pub display: String,
    pub sort: String,
}

pub struct GridRow {
    pub player: String,
    pub role: String,
    pub trend_symbol: &'static str,
    pub trend_class: &'static str,
    pub trend_rank: u8,
    pub avg_display: String,
    pub avg_sort: String,
    pub sales: usize,
    pub cells: Vec<GridCell>,
}

pub struct GridView {
    pub rank_headers: Vec<String>,
    pub rows: Vec<GridRow>,
}

pub struct TabView {
    pub id: String,
    pub label: String,
    pub grid: Option<GridView>,
}

impl TabView {
    pub fn from_tab(tab: &BoardTab) -> Self {
        let grid = match &tab.content {
            TabContent::Grid { rows, ranks } => Some(GridView {
                rank_headers: (1..=*ranks).map(ordinal).collect(),
                rows: rows.iter().map(|r| grid_row(r, *ranks)).collect(),
            }),
            TabContent::Placeholder => None,
        };
        Self {
            id: tab.position.key().to_string(),
            label: tab.label.clone(),
            grid,
        }
    }
}

fn trend_rank(trend: Trend) -> u8 {
    match trend {
        Trend::Rising => 3,
        Trend::Flat => 2,
        Trend::Falling => 1,
        Trend::Unknown => 0,
    }
}

fn grid_row(board_row: &BoardRow, ranks: usize) -> GridRow {
    let stats = &board_row.stats;
    let mut cells: Vec<GridCell> = board_row
        .row
        .prices
        .iter()
        .map(|p| GridCell {
            display: p.to_currency(),
            sort: p.to_string(),
        })
        .collect();
    while cells.len() < ranks {
        cells.push(GridCell {
            display: String::new(),
            sort: String::new(),
        });
    }

    GridRow {
        player: board_row.row.player.clone(),
        role: board_row.row.role.to_string(),
        trend_symbol: stats.trend.symbol(),
        trend_class: stats.trend.label(),
        trend_rank: trend_rank(stats.trend),
        avg_display: stats
            .average
            .map(|a| a.rounded().to_currency())
            .unwrap_or_default(),
        avg_sort: stats
            .average
            .map(|a| format!("{:.4}", a.as_dollars()))
            .unwrap_or_default(),
        sales: stats.sales,
        cells,
    }
}

#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate<'a> {
    pub title: &'a str,
    pub tabs: &'a [TabView],
}

/// A single tab as an HTML fragment.
#[derive(Template)]
#[template(path = "tab.html")]
pub struct TabTemplate<'a> {
    pub tab: &'a TabView,
}

/// A single tab wrapped in the full page layout.
#[derive(Template)]
#[template(path = "tab_page.html")]
pub struct TabPageTemplate<'a> {
    pub title: &'a str,
    pub tab: &'a TabView,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}
