// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reduces one user's transactions for a period into a [`FinancialSummary`].

use std::panic;
use std::thread::{self, ScopedJoinHandle};

use tracing::{debug, info, warn};

use crate::error::{AggregateError, QueryName};
use crate::models::{FinancialSummary, TransactionKind};
use crate::period::Period;
use crate::store::{AmountTotals, DateFilter, TransactionFilter, TransactionQuery};

/// The four reads behind a dashboard period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodQueries {
    pub realized_income: TransactionFilter,
    pub pending_income: TransactionFilter,
    pub realized_expenses: TransactionFilter,
    pub upcoming_bills: TransactionFilter,
}

impl PeriodQueries {
    pub fn new(user_id: &str, period: &Period) -> Self {
        let range = period.range();
        let filter = |kind, is_paid, dates| TransactionFilter {
            user_id: user_id.to_string(),
            kind,
            is_paid,
            dates,
        };
        PeriodQueries {
            realized_income: filter(
                TransactionKind::Income,
                true,
                DateFilter::TransactionDate(range),
            ),
            pending_income: filter(
                TransactionKind::Income,
                false,
                DateFilter::TransactionDate(range),
            ),
            realized_expenses: filter(
                TransactionKind::Expense,
                true,
                DateFilter::TransactionDate(range),
            ),
            upcoming_bills: filter(
                TransactionKind::Expense,
                false,
                DateFilter::EffectiveDate(range),
            ),
        }
    }
}

fn run<Q: TransactionQuery + ?Sized>(
    query: &Q,
    name: QueryName,
    filter: &TransactionFilter,
) -> Result<AmountTotals, AggregateError> {
    let totals = query
        .sum_amounts(filter)
        .map_err(|source| AggregateError::QueryFailure {
            query: name,
            source,
        })?;
    debug!(query = %name, sum = %totals.sum, count = totals.count, "query reduced");
    Ok(totals)
}

fn reduce(
    income: Result<AmountTotals, AggregateError>,
    pending: Result<AmountTotals, AggregateError>,
    expenses: Result<AmountTotals, AggregateError>,
    bills: Result<AmountTotals, AggregateError>,
) -> Result<FinancialSummary, AggregateError> {
    let (income, pending, expenses, bills) = (income?, pending?, expenses?, bills?);
    FinancialSummary::new(
        income.sum,
        expenses.sum,
        pending.sum,
        bills.sum,
        bills.count,
    )
    .ok_or(AggregateError::Overflow("balance"))
}

fn join<T>(handle: ScopedJoinHandle<'_, T>) -> T {
    handle.join().unwrap_or_else(|p| panic::resume_unwind(p))
}

/// Computes the dashboard summary for `user_id` in `period`.
///
/// The four reads run concurrently and are all joined before reducing. The
/// first failing read, in declaration order, is returned and no partial
/// summary is produced. Nothing is cached: every call re-queries.
pub fn aggregate<Q: TransactionQuery + ?Sized>(
    user_id: &str,
    period: &Period,
    query: &Q,
) -> Result<FinancialSummary, AggregateError> {
    let queries = PeriodQueries::new(user_id, period);

    let [income, pending, expenses, bills] = thread::scope(|s| {
        let income =
            s.spawn(|| run(query, QueryName::RealizedIncome, &queries.realized_income));
        let pending = s.spawn(|| run(query, QueryName::PendingIncome, &queries.pending_income));
        let expenses =
            s.spawn(|| run(query, QueryName::RealizedExpenses, &queries.realized_expenses));
        let bills = s.spawn(|| run(query, QueryName::UpcomingBills, &queries.upcoming_bills));
        [join(income), join(pending), join(expenses), join(bills)]
    });

    let summary = reduce(income, pending, expenses, bills).inspect_err(|e| {
        warn!(user = user_id, period = %period, error = %e, "aggregation aborted");
    })?;
    info!(
        user = user_id,
        period = %period,
        balance = %summary.balance,
        upcoming_bills = summary.upcoming_bills_count,
        "summary computed"
    );
    Ok(summary)
}
