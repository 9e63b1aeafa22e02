//! Run settings and their validation.
//!
//! Every value has a default so a file holding only roster sections is a
//! valid config. Values that are present but unusable are rejected with
//! `ConfigInvalid` before any network call is made.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::error::BoardError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_API_URL: &str = "https://api.sorare.com/graphql";
pub const DEFAULT_RARITY: &str = "limited";
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 50;
pub const DEFAULT_REQUEST_DELAY_SECS: f64 = 3.0;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_PAGES: usize = 100;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8501";
pub const DEFAULT_TITLE: &str = "Sorare MLS Limited Auctions";
/// Dashboard CSS and JS shipped with the crate, independent of the working
/// directory.
pub const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

#[derive(Debug, Clone, PartialEq)]
pub struct FeedSettings {
    pub api_url: String,
    pub rarity: String,
    pub page_size: usize,
    pub request_delay: Duration,
    pub timeout: Duration,
    pub max_pages: usize,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            rarity: DEFAULT_RARITY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_delay: Duration::from_secs_f64(DEFAULT_REQUEST_DELAY_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebSettings {
    pub listen: SocketAddr,
    pub title: String,
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub feed: FeedSettings,
    pub output: OutputSettings,
    pub web: WebSettings,
}

impl Settings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, BoardError> {
        Ok(Self {
            feed: feed_settings(config)?,
            output: OutputSettings {
                data_dir: PathBuf::from(non_empty(
                    config,
                    "output",
                    "data_dir",
                    DEFAULT_DATA_DIR,
                )?),
            },
            web: web_settings(config)?,
        })
    }
}

fn feed_settings(config: &dyn ConfigPort) -> Result<FeedSettings, BoardError> {
    let api_url = non_empty(config, "fetch", "api_url", DEFAULT_API_URL)?;
    if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
        return Err(BoardError::invalid(
            "fetch",
            "api_url",
            "api_url must be an http(s) URL",
        ));
    }

    let rarity = non_empty(config, "fetch", "rarity", DEFAULT_RARITY)?;
    if !rarity.bytes().all(|b| b.is_ascii_lowercase() || b == b'_') {
        return Err(BoardError::invalid(
            "fetch",
            "rarity",
            "rarity must be a lower-case identifier such as 'limited'",
        ));
    }

    let page_size = parse_or(config, "fetch", "page_size", DEFAULT_PAGE_SIZE)?;
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(BoardError::invalid(
            "fetch",
            "page_size",
            format!("page_size must be between 1 and {}", MAX_PAGE_SIZE),
        ));
    }

    let delay_secs = parse_or(
        config,
        "fetch",
        "request_delay_secs",
        DEFAULT_REQUEST_DELAY_SECS,
    )?;
    if !delay_secs.is_finite() || delay_secs < 0.0 {
        return Err(BoardError::invalid(
            "fetch",
            "request_delay_secs",
            "request_delay_secs must be non-negative",
        ));
    }

    let timeout_secs = parse_or(config, "fetch", "timeout_secs", DEFAULT_TIMEOUT_SECS)?;
    if timeout_secs == 0 {
        return Err(BoardError::invalid(
            "fetch",
            "timeout_secs",
            "timeout_secs must be at least 1",
        ));
    }

    let max_pages = parse_or(config, "fetch", "max_pages", DEFAULT_MAX_PAGES)?;
    if max_pages == 0 {
        return Err(BoardError::invalid(
            "fetch",
            "max_pages",
            "max_pages must be at least 1",
        ));
    }

    Ok(FeedSettings {
        api_url,
        rarity,
        page_size,
        request_delay: Duration::from_secs_f64(delay_secs),
        timeout: Duration::from_secs(timeout_secs),
        max_pages,
    })
}

fn web_settings(config: &dyn ConfigPort) -> Result<WebSettings, BoardError> {
    let listen = non_empty(config, "web", "listen", DEFAULT_LISTEN)?;
    let listen = listen.parse::<SocketAddr>().map_err(|_| {
        BoardError::invalid("web", "listen", format!("'{}' is not a socket address", listen))
    })?;
    let title = non_empty(config, "web", "title", DEFAULT_TITLE)?;
    let static_dir = PathBuf::from(non_empty(config, "web", "static_dir", DEFAULT_STATIC_DIR)?);
    Ok(WebSettings {
        listen,
        title,
        static_dir,
    })
}

fn non_empty(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: &str,
) -> Result<String, BoardError> {
    match config.get_string(section, key) {
        None => Ok(default.to_string()),
        Some(v) if v.trim().is_empty() => Err(BoardError::invalid(
            section,
            key,
            format!("{} must not be empty", key),
        )),
        Some(v) => Ok(v.trim().to_string()),
    }
}

fn parse_or<T: std::str::FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, BoardError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(v) => v.trim().parse::<T>().map_err(|_| {
            BoardError::invalid(section, key, format!("cannot parse '{}'", v.trim()))
        }),
    }
}
