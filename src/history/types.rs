//! History request types

use crate::error::{Error, Result};
use crate::types::QueryParameters;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bar period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// One bar per trading day
    #[default]
    Daily,
    /// One bar per week
    Weekly,
    /// One bar per month
    Monthly,
}

impl Period {
    /// Upstream `klt` code
    pub fn code(self) -> u32 {
        match self {
            Period::Daily => 101,
            Period::Weekly => 102,
            Period::Monthly => 103,
        }
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            other => Err(Error::invalid_value(
                "period",
                format!("expected daily, weekly or monthly, got '{other}'"),
            )),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        })
    }
}

/// Price adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjust {
    /// Raw prices
    #[default]
    None,
    /// Forward adjusted
    Qfq,
    /// Backward adjusted
    Hfq,
}

impl Adjust {
    /// Upstream `fqt` code
    pub fn code(self) -> u32 {
        match self {
            Adjust::None => 0,
            Adjust::Qfq => 1,
            Adjust::Hfq => 2,
        }
    }
}

impl FromStr for Adjust {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Adjust::None),
            "qfq" => Ok(Adjust::Qfq),
            "hfq" => Ok(Adjust::Hfq),
            other => Err(Error::invalid_value(
                "adjust",
                format!("expected none, qfq or hfq, got '{other}'"),
            )),
        }
    }
}

impl fmt::Display for Adjust {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Adjust::None => "none",
            Adjust::Qfq => "qfq",
            Adjust::Hfq => "hfq",
        })
    }
}

/// Klines for one symbol over a date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    /// Six-digit exchange code, e.g. `600000`
    pub symbol: String,
    /// Bar period
    pub period: Period,
    /// Price adjustment
    pub adjust: Adjust,
    /// First day, inclusive
    pub start: NaiveDate,
    /// Last day, inclusive
    pub end: NaiveDate,
}

impl HistoryRequest {
    /// Daily unadjusted klines covering 1970-01-01 through 2050-01-01
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            period: Period::default(),
            adjust: Adjust::default(),
            start: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2050, 1, 1).unwrap_or_default(),
        }
    }

    /// Set the bar period
    #[must_use]
    pub fn with_period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    /// Set the adjustment
    #[must_use]
    pub fn with_adjust(mut self, adjust: Adjust) -> Self {
        self.adjust = adjust;
        self
    }

    /// Set the date range
    #[must_use]
    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Market prefix: Shanghai codes start with `6`
    pub fn market(&self) -> u8 {
        u8::from(self.symbol.starts_with('6'))
    }

    /// `<market>.<symbol>`
    pub fn secid(&self) -> String {
        format!("{}.{}", self.market(), self.symbol)
    }

    /// Check the symbol and range
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(Error::invalid_value("symbol", "must not be empty"));
        }
        if self.start > self.end {
            return Err(Error::invalid_value(
                "start",
                format!("{} is after end {}", self.start, self.end),
            ));
        }
        Ok(())
    }

    /// Request parameters layered over `base`
    pub fn to_params(&self, base: &QueryParameters) -> QueryParameters {
        base.clone()
            .with("secid", self.secid())
            .with("klt", self.period.code())
            .with("fqt", self.adjust.code())
            .with("beg", self.start.format("%Y%m%d").to_string())
            .with("end", self.end.format("%Y%m%d").to_string())
    }
}

/// Parse `YYYYMMDD` or `YYYY-MM-DD`
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|e| Error::invalid_value("date", format!("'{value}': {e}")))
}
