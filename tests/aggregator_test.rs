//! Aggregator pipeline tests against a scripted feed and in-memory tables.

mod common;

use common::*;
use proptest::prelude::*;
use sorare_limited::domain::aggregator::{Aggregator, StopReason};
use sorare_limited::domain::error::BoardError;
use sorare_limited::domain::money::UsdCents;
use sorare_limited::domain::position::Position;
use sorare_limited::domain::roster::Role;
use sorare_limited::domain::sale::{DealKind, FeedResponse};
use std::time::{Duration, Instant};

fn cents(values: &[i64]) -> Vec<UsdCents> {
    values.iter().map(|&c| UsdCents(c)).collect()
}

#[test]
fn run_writes_every_position_in_fixed_order() {
    let feed = MockFeed::new()
        .with_pages("roman-celentano", vec![auctions(0, &[1500, 1400])])
        .with_pages("matt-miazga", vec![auctions(0, &[900])])
        .with_pages("kevin-kelsy", vec![auctions(0, &[300, 250, 200])]);
    let tables = MemoryTables::new();
    let settings = test_settings(10);

    let summary = Aggregator::new(&feed, &settings)
        .run(&sample_roster(), &tables)
        .unwrap();

    assert_eq!(
        *tables.writes.lock().unwrap(),
        vec![
            Position::Goalkeeper,
            Position::Defender,
            Position::Midfielder,
            Position::Forward
        ]
    );
    assert_eq!(summary.players, 4);
    assert_eq!(summary.sales, 6);
    assert_eq!(summary.tables.len(), 4);

    let mf = tables.get(Position::Midfielder).unwrap();
    assert!(mf.rows.is_empty());
}

#[test]
fn rows_follow_roster_order_and_zero_sale_players_keep_a_row() {
    let feed = MockFeed::new().with_pages("matt-miazga", vec![auctions(0, &[900, 800])]);
    let tables = MemoryTables::new();
    let settings = test_settings(10);

    Aggregator::new(&feed, &settings)
        .run(&sample_roster(), &tables)
        .unwrap();

    let df = tables.get(Position::Defender).unwrap();
    let names: Vec<&str> = df.rows.iter().map(|r| r.player.as_str()).collect();
    assert_eq!(names, vec!["Miazga (CIN)", "Mosquera (CIN)"]);
    assert_eq!(df.rows[0].prices, cents(&[900, 800]));
    assert_eq!(df.rows[1].role, Role::LeanStarter);
    assert!(df.rows[1].prices.is_empty());
    assert_eq!(df.rank_count(), 2);
    assert_eq!(df.header(), vec!["player", "team", "role", "1st", "2nd"]);
}

#[test]
fn pages_are_concatenated_most_recent_first_and_offers_dropped() {
    let feed = MockFeed::new().with_pages(
        "roman-celentano",
        vec![
            vec![
                sale(0, 1500, DealKind::Auction),
                sale(1, 9999, DealKind::Offer),
            ],
            vec![
                sale(2, 1400, DealKind::Auction),
                sale(3, 1300, DealKind::Auction),
            ],
            vec![sale(4, 8888, DealKind::Offer)],
        ],
    );
    let settings = test_settings(2);
    let mut aggregator = Aggregator::new(&feed, &settings);

    let history = aggregator.fetch_history("roman-celentano").unwrap();

    assert_eq!(history.prices, cents(&[1500, 1400, 1300]));
    assert_eq!(history.requests, 3);
    assert_eq!(history.stop, StopReason::ShortPage);

    let requests = feed.requests.lock().unwrap();
    assert_eq!(requests[0].before, None);
    assert_eq!(requests[1].before, Some(requests_cursor(1)));
    assert_eq!(requests[2].before, Some(requests_cursor(3)));
}

fn requests_cursor(minutes_ago: i64) -> chrono::DateTime<chrono::Utc> {
    sale(minutes_ago, 0, DealKind::Auction).occurred_at
}

#[test]
fn budget_error_keeps_pages_already_collected() {
    let feed = MockFeed::new().with_responses(
        "roman-celentano",
        vec![
            Ok(FeedResponse::Page(sorare_limited::domain::sale::SalePage::new(
                auctions(0, &[1500, 1400]),
            ))),
            Ok(FeedResponse::BudgetExceeded {
                message: "complexity too high".into(),
            }),
        ],
    );
    let settings = test_settings(2);

    let history = Aggregator::new(&feed, &settings)
        .fetch_history("roman-celentano")
        .unwrap();

    assert_eq!(history.prices, cents(&[1500, 1400]));
    assert_eq!(history.stop, StopReason::BudgetExceeded);
}

#[test]
fn unreadable_page_counts_as_empty() {
    let feed = MockFeed::new().with_responses(
        "kevin-kelsy",
        vec![Err(BoardError::ResponseShape {
            slug: "kevin-kelsy".into(),
            reason: "missing tokens".into(),
        })],
    );
    let tables = MemoryTables::new();
    let settings = test_settings(5);

    Aggregator::new(&feed, &settings)
        .run(&sample_roster(), &tables)
        .unwrap();

    let fw = tables.get(Position::Forward).unwrap();
    assert_eq!(fw.rows.len(), 1);
    assert!(fw.rows[0].prices.is_empty());
}

#[test]
fn network_error_aborts_but_keeps_finished_tables() {
    let feed = MockFeed::new()
        .with_pages("roman-celentano", vec![auctions(0, &[1500])])
        .with_network_error("yerson-mosquera");
    let tables = MemoryTables::new();
    let settings = test_settings(10);

    let err = Aggregator::new(&feed, &settings)
        .run(&sample_roster(), &tables)
        .unwrap_err();

    assert!(matches!(err, BoardError::Network { ref slug, .. } if slug == "yerson-mosquera"));
    assert!(tables.get(Position::Goalkeeper).is_some());
    assert!(tables.get(Position::Defender).is_none());
    assert!(tables.get(Position::Forward).is_none());
    assert!(!feed.requested_slugs().contains(&"kevin-kelsy".to_string()));
}

#[test]
fn page_cap_bounds_a_feed_that_never_runs_dry() {
    let pages: Vec<_> = (0..10).map(|i| auctions(i * 2, &[100, 100])).collect();
    let feed = MockFeed::new().with_pages("roman-celentano", pages);
    let mut settings = test_settings(2);
    settings.max_pages = 3;

    let history = Aggregator::new(&feed, &settings)
        .fetch_history("roman-celentano")
        .unwrap();

    assert_eq!(history.requests, 3);
    assert_eq!(history.prices.len(), 6);
    assert_eq!(history.stop, StopReason::PageCap);
}

#[test]
fn stalled_cursor_stops_pagination() {
    let feed = MockFeed::new().with_pages(
        "roman-celentano",
        vec![auctions(0, &[100, 100]), auctions(0, &[100, 100])],
    );
    let settings = test_settings(2);

    let history = Aggregator::new(&feed, &settings)
        .fetch_history("roman-celentano")
        .unwrap();

    assert_eq!(history.requests, 2);
    assert_eq!(history.stop, StopReason::StalledCursor);
}

#[test]
fn one_delay_spaces_every_request_across_players_and_positions() {
    let delay = Duration::from_millis(100);
    let feed = MockFeed::new();
    let tables = MemoryTables::new();
    let mut settings = test_settings(10);
    settings.request_delay = delay;

    let start = Instant::now();
    Aggregator::new(&feed, &settings)
        .run(&sample_roster(), &tables)
        .unwrap();
    let elapsed = start.elapsed();

    let requests = feed.requests.lock().unwrap().len();
    assert_eq!(requests, 4);
    assert!(
        elapsed >= delay * (requests as u32 - 1),
        "{requests} requests finished in {elapsed:?}"
    );
}

fn deals() -> impl Strategy<Value = Vec<(bool, i64)>> {
    prop::collection::vec((any::<bool>(), 1i64..1_000_000), 0..40)
}

proptest! {
    #[test]
    fn retained_prices_preserve_feed_order_across_pages(
        records in deals(),
        page_size in 1usize..8,
    ) {
        let sales: Vec<_> = records
            .iter()
            .enumerate()
            .map(|(i, &(is_auction, c))| {
                let deal = if is_auction { DealKind::Auction } else { DealKind::Offer };
                sale(i as i64, c, deal)
            })
            .collect();
        let pages: Vec<_> = sales.chunks(page_size).map(|c| c.to_vec()).collect();
        let feed = MockFeed::new().with_pages("p", pages);
        let mut settings = test_settings(page_size);
        settings.max_pages = 1_000;

        let history = Aggregator::new(&feed, &settings).fetch_history("p").unwrap();

        let expected: Vec<UsdCents> = records
            .iter()
            .filter(|(is_auction, _)| *is_auction)
            .map(|&(_, c)| UsdCents(c))
            .collect();
        prop_assert_eq!(history.prices, expected);
        prop_assert!(history.requests <= records.len() / page_size + 1);
    }
}
