//! Sorare GraphQL auction feed adapter.
//!
//! Queries `tokens.tokenPrices` for one player and rarity. Each record's
//! `deal` is decoded on `__typename`; only records with a readable amount,
//! date and deal type become [`AuctionSale`]s, the rest are counted and
//! dropped.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::domain::error::BoardError;
use crate::domain::money::UsdCents;
use crate::domain::sale::{AuctionSale, DealKind, FeedResponse, PageRequest, SalePage};
use crate::domain::settings::FeedSettings;
use crate::ports::auction_port::AuctionFeedPort;

const QUERY_TEMPLATE: &str = r#"
query GetAuctionHistory($playerSlug: String!, $first: Int, $to: ISO8601DateTime) {
  tokens {
    tokenPrices(playerSlug: $playerSlug, rarity: RARITY, first: $first, to: $to) {
      amounts { usdCents }
      date
      deal {
        __typename
        ... on TokenAuction { id }
      }
    }
  }
}
"#;

pub fn build_query(rarity: &str) -> String {
    QUERY_TEMPLATE.replace("RARITY", rarity)
}

pub struct SorareGraphqlAdapter {
    client: reqwest::blocking::Client,
    api_url: String,
    query: String,
}

impl SorareGraphqlAdapter {
    pub fn from_settings(settings: &FeedSettings) -> Result<Self, BoardError> {
        Self::new(&settings.api_url, &settings.rarity, settings.timeout)
    }

    pub fn new(api_url: &str, rarity: &str, timeout: Duration) -> Result<Self, BoardError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sorare-limited/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BoardError::Network {
                slug: String::new(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            api_url: api_url.to_string(),
            query: build_query(rarity),
        })
    }

    fn request_body(&self, request: &PageRequest) -> serde_json::Value {
        let mut variables = serde_json::json!({
            "playerSlug": request.slug,
            "first": request.page_size,
        });
        if let Some(before) = request.before {
            variables["to"] = serde_json::Value::String(format_cursor(before));
        }
        serde_json::json!({ "query": self.query, "variables": variables })
    }
}

impl AuctionFeedPort for SorareGraphqlAdapter {
    fn fetch_page(&self, request: &PageRequest) -> Result<FeedResponse, BoardError> {
        let network = |e: reqwest::Error| BoardError::Network {
            slug: request.slug.clone(),
            reason: e.to_string(),
        };

        let body: serde_json::Value = self
            .client
            .post(&self.api_url)
            .json(&self.request_body(request))
            .send()
            .map_err(network)?
            .error_for_status()
            .map_err(network)?
            .json()
            .map_err(|e| BoardError::ResponseShape {
                slug: request.slug.clone(),
                reason: format!("body is not JSON: {}", e),
            })?;

        parse_response(&request.slug, body)
    }
}

pub fn format_cursor(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[derive(Debug, Deserialize)]
struct GraphqlBody {
    #[serde(default)]
    data: Option<QueryData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    tokens: Option<TokensField>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokensField {
    #[serde(default)]
    token_prices: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct TokenPrice {
    amounts: Amounts,
    date: String,
    deal: Option<DealFragment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Amounts {
    usd_cents: i64,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
enum DealFragment {
    TokenAuction {
        #[allow(dead_code)]
        id: String,
    },
    TokenOffer,
    #[serde(other)]
    Unknown,
}

impl DealFragment {
    fn kind(&self) -> Option<DealKind> {
        match self {
            DealFragment::TokenAuction { .. } => Some(DealKind::Auction),
            DealFragment::TokenOffer => Some(DealKind::Offer),
            DealFragment::Unknown => None,
        }
    }
}

fn is_complexity_error(message: &str) -> bool {
    message.to_lowercase().contains("complexity")
}

fn decode_record(value: serde_json::Value) -> Option<AuctionSale> {
    let record: TokenPrice = serde_json::from_value(value).ok()?;
    let deal = record.deal?.kind()?;
    let occurred_at = DateTime::parse_from_rfc3339(&record.date)
        .ok()?
        .with_timezone(&Utc);
    Some(AuctionSale {
        occurred_at,
        price: UsdCents(record.amounts.usd_cents),
        deal,
    })
}

/// Turns a GraphQL response body into a page of sales.
pub fn parse_response(slug: &str, body: serde_json::Value) -> Result<FeedResponse, BoardError> {
    let body: GraphqlBody =
        serde_json::from_value(body).map_err(|e| BoardError::ResponseShape {
            slug: slug.to_string(),
            reason: e.to_string(),
        })?;

    if let Some(err) = body.errors.iter().find(|e| is_complexity_error(&e.message)) {
        return Ok(FeedResponse::BudgetExceeded {
            message: err.message.clone(),
        });
    }
    for err in &body.errors {
        warn!(slug, message = %err.message, "API error");
    }

    let records = body
        .data
        .and_then(|d| d.tokens)
        .and_then(|t| t.token_prices)
        .unwrap_or_default();

    let record_count = records.len();
    let sales: Vec<AuctionSale> = records.into_iter().filter_map(decode_record).collect();
    let dropped = record_count - sales.len();
    if dropped > 0 {
        warn!(slug, dropped, "dropped malformed records");
    }

    Ok(FeedResponse::Page(SalePage {
        sales,
        record_count,
    }))
}
