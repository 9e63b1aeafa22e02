#![allow(dead_code)]

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use sorare_limited::domain::error::BoardError;
use sorare_limited::domain::money::UsdCents;
use sorare_limited::domain::position::Position;
use sorare_limited::domain::roster::{PlayerEntry, Role, Roster};
use sorare_limited::domain::sale::{AuctionSale, DealKind, FeedResponse, PageRequest, SalePage};
use sorare_limited::domain::settings::FeedSettings;
use sorare_limited::domain::table::{PlayerRow, PositionTable};
use sorare_limited::ports::auction_port::AuctionFeedPort;
use sorare_limited::ports::table_port::TablePort;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

/// Feed that replays scripted pages per player slug. Once a slug's script
/// runs out it answers with empty pages.
pub struct MockFeed {
    scripts: Mutex<HashMap<String, VecDeque<Result<FeedResponse, BoardError>>>>,
    pub requests: Mutex<Vec<PageRequest>>,
}

impl MockFeed {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_pages(self, slug: &str, pages: Vec<Vec<AuctionSale>>) -> Self {
        let responses = pages
            .into_iter()
            .map(|sales| Ok(FeedResponse::Page(SalePage::new(sales))))
            .collect();
        self.with_responses(slug, responses)
    }

    pub fn with_responses(self, slug: &str, responses: Vec<Result<FeedResponse, BoardError>>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(slug.to_string(), responses.into());
        self
    }

    pub fn with_network_error(self, slug: &str) -> Self {
        self.with_responses(
            slug,
            vec![Err(BoardError::Network {
                slug: slug.to_string(),
                reason: "connection reset".into(),
            })],
        )
    }

    pub fn requested_slugs(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.slug.clone())
            .collect()
    }
}

impl AuctionFeedPort for MockFeed {
    fn fetch_page(&self, request: &PageRequest) -> Result<FeedResponse, BoardError> {
        self.requests.lock().unwrap().push(request.clone());
        self.scripts
            .lock()
            .unwrap()
            .get_mut(&request.slug)
            .and_then(|script| script.pop_front())
            .unwrap_or_else(|| Ok(FeedResponse::Page(SalePage::default())))
    }
}

/// In-memory table store keyed by position.
pub struct MemoryTables {
    pub tables: Mutex<HashMap<Position, PositionTable>>,
    pub broken: Mutex<Vec<Position>>,
    pub writes: Mutex<Vec<Position>>,
}

impl MemoryTables {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            broken: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn with_table(self, table: PositionTable) -> Self {
        self.tables.lock().unwrap().insert(table.position, table);
        self
    }

    /// Makes reads of `position` fail as an unreadable table.
    pub fn with_broken(self, position: Position) -> Self {
        self.broken.lock().unwrap().push(position);
        self
    }

    pub fn get(&self, position: Position) -> Option<PositionTable> {
        self.tables.lock().unwrap().get(&position).cloned()
    }
}

impl TablePort for MemoryTables {
    fn write_table(&self, table: &PositionTable) -> Result<PathBuf, BoardError> {
        self.writes.lock().unwrap().push(table.position);
        self.tables
            .lock()
            .unwrap()
            .insert(table.position, table.clone());
        Ok(PathBuf::from(format!("memory/{}.csv", table.position.key())))
    }

    fn read_table(&self, position: Position) -> Result<PositionTable, BoardError> {
        let path = format!("memory/{}.csv", position.key());
        if self.broken.lock().unwrap().contains(&position) {
            return Err(BoardError::Table {
                path,
                reason: "corrupt".into(),
            });
        }
        self.get(position)
            .ok_or(BoardError::MissingArtifact { path })
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn sale(minutes_ago: i64, cents: i64, deal: DealKind) -> AuctionSale {
    AuctionSale {
        occurred_at: base_time() - ChronoDuration::minutes(minutes_ago),
        price: UsdCents(cents),
        deal,
    }
}

/// Auctions spaced one minute apart, most recent first, starting
/// `offset` minutes back.
pub fn auctions(offset: i64, cents: &[i64]) -> Vec<AuctionSale> {
    cents
        .iter()
        .enumerate()
        .map(|(i, &c)| sale(offset + i as i64, c, DealKind::Auction))
        .collect()
}

pub fn entry(position: Position, slug: &str, team: &str, role: Role) -> PlayerEntry {
    PlayerEntry {
        slug: slug.to_string(),
        team: team.to_string(),
        role,
        position,
    }
}

pub fn sample_roster() -> Roster {
    Roster::new(vec![
        (
            Position::Goalkeeper,
            vec![entry(Position::Goalkeeper, "roman-celentano", "CIN", Role::Starter)],
        ),
        (
            Position::Defender,
            vec![
                entry(Position::Defender, "matt-miazga", "CIN", Role::Starter),
                entry(Position::Defender, "yerson-mosquera", "CIN", Role::LeanStarter),
            ],
        ),
        (
            Position::Forward,
            vec![entry(Position::Forward, "kevin-kelsy", "CIN", Role::LikelyBackup)],
        ),
    ])
}

pub fn test_settings(page_size: usize) -> FeedSettings {
    FeedSettings {
        page_size,
        request_delay: Duration::ZERO,
        ..FeedSettings::default()
    }
}

pub fn row(player: &str, role: Role, cents: &[i64]) -> PlayerRow {
    PlayerRow {
        player: player.to_string(),
        team: "CIN".to_string(),
        role,
        prices: cents.iter().map(|&c| UsdCents(c)).collect(),
    }
}

pub const SAMPLE_INI: &str = r#"
[fetch]
page_size = 10
request_delay_secs = 0

[output]
data_dir = data

[web]
listen = 127.0.0.1:9100
title = Test Board

[gk]
roman-celentano = CIN, Starter

[df]
matt-miazga = CIN, Starter
yerson-mosquera = CIN, Lean Starter

[fw]
kevin-kelsy = CIN, Likely Backup
"#;
