//! Derived price statistics shown on the dashboard.
//!
//! All comparisons are done on integer cents so the 5% thresholds are exact:
//! a recent average of exactly 105% of the overall average is `Flat`.

use std::cmp::Ordering;

use crate::domain::money::UsdCents;

/// Minimum history length before a trend is reported.
pub const TREND_MIN_SALES: usize = 4;
/// Number of most recent sales forming the recent average.
pub const RECENT_WINDOW: usize = 3;
/// Thresholds in percent of the overall average.
pub const RISING_PCT: i128 = 105;
pub const FALLING_PCT: i128 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Falling,
    Flat,
    Unknown,
}

impl Trend {
    pub fn symbol(self) -> &'static str {
        match self {
            Trend::Rising => "↑",
            Trend::Falling => "↓",
            Trend::Flat => "→",
            Trend::Unknown => "-",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Flat => "flat",
            Trend::Unknown => "unknown",
        }
    }
}

/// Exact arithmetic mean of a non-empty price sequence.
#[derive(Debug, Clone, Copy)]
pub struct Average {
    total: i128,
    count: usize,
}

impl Average {
    pub fn of(prices: &[UsdCents]) -> Option<Self> {
        if prices.is_empty() {
            return None;
        }
        Some(Self {
            total: prices.iter().map(|p| p.cents() as i128).sum(),
            count: prices.len(),
        })
    }

    pub fn as_dollars(self) -> f64 {
        self.total as f64 / self.count as f64 / 100.0
    }

    /// Rounded half away from zero to the nearest cent.
    pub fn rounded(self) -> UsdCents {
        let n = self.count as i128;
        let rounded = if self.total >= 0 {
            (2 * self.total + n) / (2 * n)
        } else {
            -((-2 * self.total + n) / (2 * n))
        };
        UsdCents(rounded as i64)
    }
}

impl PartialEq for Average {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Average {}

impl Ord for Average {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.total * other.count as i128).cmp(&(other.total * self.count as i128))
    }
}

impl PartialOrd for Average {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compares the mean of the three most recent prices to the overall mean.
pub fn compute_trend(prices: &[UsdCents]) -> Trend {
    if prices.len() < TREND_MIN_SALES {
        return Trend::Unknown;
    }
    let n = prices.len() as i128;
    let total: i128 = prices.iter().map(|p| p.cents() as i128).sum();
    if total == 0 {
        return Trend::Flat;
    }
    let recent: i128 = prices[..RECENT_WINDOW]
        .iter()
        .map(|p| p.cents() as i128)
        .sum();

    // recent / 3 against total / n * pct / 100, cross-multiplied.
    let lhs = recent * n * 100;
    let window = RECENT_WINDOW as i128;
    if lhs > total * window * RISING_PCT {
        Trend::Rising
    } else if lhs < total * window * FALLING_PCT {
        Trend::Falling
    } else {
        Trend::Flat
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowStats {
    pub sales: usize,
    pub average: Option<Average>,
    pub trend: Trend,
}

impl RowStats {
    pub fn compute(prices: &[UsdCents]) -> Self {
        Self {
            sales: prices.len(),
            average: Average::of(prices),
            trend: compute_trend(prices),
        }
    }
}
