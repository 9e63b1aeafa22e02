//! Auction history feed port trait.

use crate::domain::error::BoardError;
use crate::domain::sale::{FeedResponse, PageRequest};

pub trait AuctionFeedPort {
    /// Fetches one page of sales, most recent first.
    ///
    /// Transport failures are `Network` errors. A response that cannot be
    /// read as auction history is a `ResponseShape` error, which callers may
    /// treat as an empty page.
    fn fetch_page(&self, request: &PageRequest) -> Result<FeedResponse, BoardError>;
}
