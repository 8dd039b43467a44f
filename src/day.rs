//! Day-of-week symbols and the clock that decides what "today" is.
//!
//! Every place that needs the current day goes through [`Clock::today`] so
//! the menu listing and the vote engine can never disagree.

use chrono::{DateTime, Datelike, Utc, Weekday};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One of the seven fixed weekday symbols, stored as `mon`..`sun`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(3))")]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    #[sea_orm(string_value = "mon")]
    Mon,
    #[sea_orm(string_value = "tue")]
    Tue,
    #[sea_orm(string_value = "wed")]
    Wed,
    #[sea_orm(string_value = "thu")]
    Thu,
    #[sea_orm(string_value = "fri")]
    Fri,
    #[sea_orm(string_value = "sat")]
    Sat,
    #[sea_orm(string_value = "sun")]
    Sun,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        Self::Mon,
        Self::Tue,
        Self::Wed,
        Self::Thu,
        Self::Fri,
        Self::Sat,
        Self::Sun,
    ];

    /// Parses a lowercase three-letter symbol. Anything else is `None`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "mon" => Some(Self::Mon),
            "tue" => Some(Self::Tue),
            "wed" => Some(Self::Wed),
            "thu" => Some(Self::Thu),
            "fri" => Some(Self::Fri),
            "sat" => Some(Self::Sat),
            "sun" => Some(Self::Sun),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Mon => "mon",
            Self::Tue => "tue",
            Self::Wed => "wed",
            Self::Thu => "thu",
            Self::Fri => "fri",
            Self::Sat => "sat",
            Self::Sun => "sun",
        }
    }

    /// Human readable name, e.g. "Monday".
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Mon => "Monday",
            Self::Tue => "Tuesday",
            Self::Wed => "Wednesday",
            Self::Thu => "Thursday",
            Self::Fri => "Friday",
            Self::Sat => "Saturday",
            Self::Sun => "Sunday",
        }
    }
}

impl Default for DayOfWeek {
    fn default() -> Self {
        Self::Mon
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => Self::Mon,
            Weekday::Tue => Self::Tue,
            Weekday::Wed => Self::Wed,
            Weekday::Thu => Self::Thu,
            Weekday::Fri => Self::Fri,
            Weekday::Sat => Self::Sat,
            Weekday::Sun => Self::Sun,
        }
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Source of the current time.
///
/// Injected into handlers as app data so tests can pin the day.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// The canonical "today", using the UTC calendar.
    fn today(&self) -> DayOfWeek {
        DayOfWeek::from(self.now().weekday())
    }
}

/// Shared handle stored in app data.
pub type SharedClock = Arc<dyn Clock>;

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
