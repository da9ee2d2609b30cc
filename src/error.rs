// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Invalid period '{0}', expected YYYY-MM")]
    Malformed(String),
    #[error("Period {year}-{month:02} is outside the supported calendar range")]
    InvalidPeriodRange { year: i32, month: u32 },
}

#[derive(Debug, Error)]
#[error("Unknown transaction type '{0}', expected income|expense")]
pub struct UnknownTransactionKind(pub String);

/// Failures raised by a transaction store while answering a read.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("remote store returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed row: {0}")]
    MalformedRow(String),
}

/// Names the four reads issued for one dashboard period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryName {
    RealizedIncome,
    PendingIncome,
    RealizedExpenses,
    UpcomingBills,
}

impl fmt::Display for QueryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QueryName::RealizedIncome => "realized income",
            QueryName::PendingIncome => "pending income",
            QueryName::RealizedExpenses => "realized expenses",
            QueryName::UpcomingBills => "upcoming bills",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("{query} query failed: {source}")]
    QueryFailure {
        query: QueryName,
        #[source]
        source: StoreError,
    },
    #[error("{0} is outside the representable amount range")]
    Overflow(&'static str),
}

impl AggregateError {
    /// The read that failed, if the failure came from a store.
    pub fn query(&self) -> Option<QueryName> {
        match self {
            AggregateError::QueryFailure { query, .. } => Some(*query),
            AggregateError::Overflow(_) => None,
        }
    }
}
