//! Integer USD amounts.
//!
//! Prices travel as whole cents from the feed through the CSV tables and into
//! the dashboard. They are rendered as `D.CC` strings for storage and
//! `$D,DDD.CC` for display without passing through floating point.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UsdCents(pub i64);

impl UsdCents {
    pub fn cents(self) -> i64 {
        self.0
    }

    /// Display form with a dollar sign and thousands separators.
    pub fn to_currency(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = group_thousands(abs / 100);
        format!("{}${}.{:02}", sign, whole, abs % 100)
    }
}

/// Plain storage form: `1234.50`, no grouping, always two fraction digits.
impl fmt::Display for UsdCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount '{0}'")]
pub struct AmountParseError(pub String);

impl FromStr for UsdCents {
    type Err = AmountParseError;

    /// Accepts `12`, `12.3` and `12.34`; rejects more than two fraction digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || AmountParseError(s.to_string());
        let trimmed = s.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, frac) = body.split_once('.').unwrap_or((body, ""));
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        if frac.len() > 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let whole: i64 = whole.parse().map_err(|_| err())?;
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| err())? * 10,
            _ => frac.parse().map_err(|_| err())?,
        };
        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .ok_or_else(err)?;
        Ok(UsdCents(if negative { -cents } else { cents }))
    }
}

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if n < 1000 {
            groups.push(n.to_string());
            break;
        }
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.reverse();
    groups.join(",")
}
