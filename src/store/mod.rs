// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read access to transaction stores.
//!
//! The aggregator only ever talks to a [`TransactionQuery`]. Filters are
//! plain data so each backend can translate them into its own query
//! language: SQL for [`SqliteStore`], PostgREST parameters for [`RestStore`].

pub mod rest;
pub mod sqlite;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::StoreError;
use crate::models::{Transaction, TransactionKind};
use crate::period::DateRange;

pub use rest::{RestConfig, RestStore};
pub use sqlite::SqliteStore;

/// Which date column a range filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    /// `transaction_date` in range.
    TransactionDate(DateRange),
    /// `due_date` in range, or `due_date` is null and `transaction_date` in range.
    EffectiveDate(DateRange),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFilter {
    pub user_id: String,
    pub kind: TransactionKind,
    pub is_paid: bool,
    pub dates: DateFilter,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        if tx.user_id != self.user_id || tx.kind != self.kind || tx.is_paid != self.is_paid {
            return false;
        }
        match self.dates {
            DateFilter::TransactionDate(r) => r.contains(tx.transaction_date),
            DateFilter::EffectiveDate(r) => r.contains(tx.effective_date()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmountTotals {
    pub sum: Decimal,
    pub count: usize,
}

impl AmountTotals {
    /// Sums `amounts`, failing instead of wrapping when the total leaves the
    /// representable decimal range.
    pub fn from_amounts(amounts: &[Decimal]) -> Result<Self, StoreError> {
        let sum = amounts
            .iter()
            .try_fold(Decimal::ZERO, |acc, a| acc.checked_add(*a))
            .ok_or_else(|| StoreError::MalformedRow("amount sum overflows".into()))?;
        Ok(AmountTotals {
            sum,
            count: amounts.len(),
        })
    }
}

/// Query capability over a user's transactions.
pub trait TransactionQuery: Sync {
    /// Amounts of every transaction matching `filter`.
    fn amounts(&self, filter: &TransactionFilter) -> Result<Vec<Decimal>, StoreError>;

    /// Most recent `transaction_date` for the user, optionally restricted to one kind.
    fn latest_transaction_date(
        &self,
        user_id: &str,
        kind: Option<TransactionKind>,
    ) -> Result<Option<NaiveDate>, StoreError>;

    /// Sum and count of matching amounts. Reduces client-side unless a
    /// backend can aggregate on its side.
    fn sum_amounts(&self, filter: &TransactionFilter) -> Result<AmountTotals, StoreError> {
        let amounts = self.amounts(filter)?;
        AmountTotals::from_amounts(&amounts)
    }
}
