// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar-month periods and the period selector.
//!
//! A [`Period`] is one calendar month keyed as `YYYY-MM`. [`resolve_periods`]
//! builds the contiguous list of months a user can pick on the dashboard,
//! from the configured epoch month up to the month of their latest
//! transaction, and chooses which one is selected by default.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::clock::Clock;
use crate::error::PeriodError;

static PERIOD_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})$").expect("period key pattern is valid")
});

/// Half-open date interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    start: NaiveDate,
    end: NaiveDate,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        let out_of_range = || PeriodError::InvalidPeriodRange { year, month };
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(out_of_range)?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(out_of_range)?;
        Ok(Period { start, end })
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Result<Self, PeriodError> {
        Period::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn month(&self) -> u32 {
        self.start.month()
    }

    /// Canonical `YYYY-MM` key.
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year(), self.month())
    }

    /// Display label such as `March 2025`.
    pub fn label(&self) -> String {
        self.start.format("%B %Y").to_string()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start
    }

    pub fn next_month_start(&self) -> NaiveDate {
        self.end
    }

    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start,
            end: self.end,
        }
    }

    /// The following month, or `None` past the end of the calendar.
    pub fn next(&self) -> Option<Period> {
        Period::containing(self.end).ok()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = PERIOD_KEY
            .captures(s.trim())
            .ok_or_else(|| PeriodError::Malformed(s.to_string()))?;
        let year: i32 = caps[1]
            .parse()
            .map_err(|_| PeriodError::Malformed(s.to_string()))?;
        let month: u32 = caps[2]
            .parse()
            .map_err(|_| PeriodError::Malformed(s.to_string()))?;
        Period::new(year, month)
    }
}

impl Serialize for Period {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

/// One entry of the period selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodOption {
    pub value: String,
    pub label: String,
}

impl From<&Period> for PeriodOption {
    fn from(p: &Period) -> Self {
        PeriodOption {
            value: p.key(),
            label: p.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodOptions {
    pub periods: Vec<Period>,
    pub default: Period,
}

impl PeriodOptions {
    pub fn contains(&self, period: &Period) -> bool {
        self.periods.binary_search(period).is_ok()
    }

    pub fn options(&self) -> Vec<PeriodOption> {
        self.periods.iter().map(PeriodOption::from).collect()
    }
}

/// Builds the selectable months from `earliest` through the month of
/// `latest_known` (today when the store has no transactions).
///
/// The current month is the default when it is listed, otherwise the most
/// recent period. When `earliest` lies after the latest month the list holds
/// only the current month.
pub fn resolve_periods(
    earliest: Period,
    latest_known: Option<NaiveDate>,
    clock: &dyn Clock,
) -> Result<PeriodOptions, PeriodError> {
    let today = clock.today();
    let current = Period::containing(today)?;
    let last = Period::containing(latest_known.unwrap_or(today))?;

    if earliest > last {
        return Ok(PeriodOptions {
            periods: vec![current],
            default: current,
        });
    }

    let mut periods = Vec::new();
    let mut cursor = Some(earliest);
    while let Some(p) = cursor {
        if p > last {
            break;
        }
        periods.push(p);
        cursor = p.next();
    }

    let default = if periods.contains(&current) {
        current
    } else {
        last
    };
    Ok(PeriodOptions { periods, default })
}
