//! Auction history records as seen at the feed boundary.

use chrono::{DateTime, Utc};

use crate::domain::money::UsdCents;

/// How a sale was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealKind {
    /// Ascending-bid auction with a clearing price.
    Auction,
    /// Fixed-price offer accepted between managers.
    Offer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionSale {
    pub occurred_at: DateTime<Utc>,
    pub price: UsdCents,
    pub deal: DealKind,
}

impl AuctionSale {
    /// The single rule for which sales count toward a player's price history.
    pub fn is_retained(&self) -> bool {
        match self.deal {
            DealKind::Auction => true,
            DealKind::Offer => false,
        }
    }
}

/// One page request against the auction feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub slug: String,
    pub page_size: usize,
    /// Upper time bound; `None` starts from the most recent sale.
    pub before: Option<DateTime<Utc>>,
}

/// One page of feed records, in feed order (most recent first).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalePage {
    /// Well-formed records of either deal kind.
    pub sales: Vec<AuctionSale>,
    /// Records the feed returned, including malformed ones that were dropped.
    pub record_count: usize,
}

impl SalePage {
    pub fn new(sales: Vec<AuctionSale>) -> Self {
        let record_count = sales.len();
        Self {
            sales,
            record_count,
        }
    }

    pub fn retained_prices(&self) -> impl Iterator<Item = UsdCents> + '_ {
        self.sales
            .iter()
            .filter(|s| s.is_retained())
            .map(|s| s.price)
    }

    pub fn oldest(&self) -> Option<DateTime<Utc>> {
        self.sales.iter().map(|s| s.occurred_at).min()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedResponse {
    Page(SalePage),
    /// The API refused the query for exceeding its complexity budget.
    BudgetExceeded { message: String },
}
