//! Fetch-and-aggregate pipeline.
//!
//! Walks the roster one player at a time, pages backwards through each
//! player's auction history, keeps auction prices in feed order and writes one
//! table per position. Requests are strictly sequential and spaced by the
//! run's [`Pacer`].

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::error::BoardError;
use crate::domain::money::UsdCents;
use crate::domain::pacer::Pacer;
use crate::domain::position::Position;
use crate::domain::roster::{PlayerEntry, Roster};
use crate::domain::sale::{FeedResponse, PageRequest};
use crate::domain::settings::FeedSettings;
use crate::domain::table::{PlayerRow, PositionTable};
use crate::ports::auction_port::AuctionFeedPort;
use crate::ports::table_port::TablePort;

/// Why pagination ended for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The feed returned an empty page.
    Exhausted,
    /// The feed returned fewer records than requested.
    ShortPage,
    /// The API rejected the query for its complexity budget.
    BudgetExceeded,
    /// The response could not be read; counted as an empty page.
    ResponseShape,
    /// A full page carried no usable timestamp to continue from.
    NoCursor,
    /// The oldest timestamp did not move backwards.
    StalledCursor,
    /// `max_pages` requests were made.
    PageCap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerHistory {
    /// Auction prices, most recent first.
    pub prices: Vec<UsdCents>,
    pub requests: usize,
    pub stop: StopReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub players: usize,
    pub sales: usize,
    pub tables: Vec<(Position, PathBuf)>,
}

pub struct Aggregator<'a> {
    feed: &'a dyn AuctionFeedPort,
    settings: &'a FeedSettings,
    pacer: Pacer,
}

impl<'a> Aggregator<'a> {
    pub fn new(feed: &'a dyn AuctionFeedPort, settings: &'a FeedSettings) -> Self {
        Self {
            feed,
            settings,
            pacer: Pacer::new(settings.request_delay),
        }
    }

    /// Collects one player's auction prices across as many pages as the feed
    /// provides.
    pub fn fetch_history(&mut self, slug: &str) -> Result<PlayerHistory, BoardError> {
        let page_size = self.settings.page_size;
        let mut prices = Vec::new();
        let mut before: Option<DateTime<Utc>> = None;
        let mut requests = 0usize;

        let stop = loop {
            if requests >= self.settings.max_pages {
                warn!(slug, max_pages = self.settings.max_pages, "page cap reached");
                break StopReason::PageCap;
            }

            let request = PageRequest {
                slug: slug.to_string(),
                page_size,
                before,
            };
            self.pacer.wait();
            debug!(slug, cursor = ?before, "requesting page");
            requests += 1;

            let page = match self.feed.fetch_page(&request) {
                Ok(FeedResponse::Page(page)) => page,
                Ok(FeedResponse::BudgetExceeded { message }) => {
                    info!(slug, %message, "complexity budget exceeded, keeping pages so far");
                    break StopReason::BudgetExceeded;
                }
                Err(BoardError::ResponseShape { reason, .. }) => {
                    warn!(slug, %reason, "unreadable page, treating as empty");
                    break StopReason::ResponseShape;
                }
                Err(e) => return Err(e),
            };

            prices.extend(page.retained_prices());

            if page.record_count < page_size {
                break if page.record_count == 0 {
                    StopReason::Exhausted
                } else {
                    StopReason::ShortPage
                };
            }

            let Some(oldest) = page.oldest() else {
                warn!(slug, "full page without timestamps, stopping");
                break StopReason::NoCursor;
            };
            if before.is_some_and(|b| oldest >= b) {
                warn!(slug, cursor = %oldest, "cursor did not advance, stopping");
                break StopReason::StalledCursor;
            }
            before = Some(oldest);
        };

        Ok(PlayerHistory {
            prices,
            requests,
            stop,
        })
    }

    /// Builds the table for one position; rows follow roster order.
    pub fn build_table(
        &mut self,
        position: Position,
        players: &[PlayerEntry],
    ) -> Result<PositionTable, BoardError> {
        let mut rows = Vec::with_capacity(players.len());
        for entry in players {
            let history = self.fetch_history(&entry.slug)?;
            info!(
                slug = %entry.slug,
                position = %position,
                sales = history.prices.len(),
                requests = history.requests,
                "fetched {}: {} auctions",
                entry.slug,
                history.prices.len(),
            );
            rows.push(PlayerRow {
                player: entry.display_name(),
                team: entry.team.clone(),
                role: entry.role,
                prices: history.prices,
            });
        }
        Ok(PositionTable::new(position, rows))
    }

    /// Fetches every position and writes each table as soon as it is complete.
    /// Tables written before a fatal error are left in place.
    pub fn run(
        &mut self,
        roster: &Roster,
        tables: &dyn TablePort,
    ) -> Result<RunSummary, BoardError> {
        let mut summary = RunSummary::default();
        for (position, players) in roster.groups() {
            let table = self.build_table(position, players)?;
            let path = tables.write_table(&table)?;
            info!(
                position = %position,
                path = %path.display(),
                rows = table.rows.len(),
                columns = table.header().len(),
                "wrote table"
            );
            summary.players += table.rows.len();
            summary.sales += table.sale_count();
            summary.tables.push((position, path));
        }
        info!(
            players = summary.players,
            sales = summary.sales,
            tables = summary.tables.len(),
            "fetch run complete"
        );
        Ok(summary)
    }
}
