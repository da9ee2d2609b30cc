// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use tracing::debug;

use super::{DateFilter, TransactionFilter, TransactionQuery};
use crate::error::StoreError;
use crate::models::TransactionKind;

/// Local SQLite transaction store.
///
/// Amounts are stored as TEXT and reduced with `Decimal`, never with
/// SQLite's floating point `SUM`.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        SqliteStore {
            conn: Mutex::new(conn),
        }
    }

    pub fn into_inner(self) -> Connection {
        self.conn.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn filter_sql(filter: &TransactionFilter) -> (String, NaiveDate, NaiveDate) {
    let mut sql = String::from(
        "SELECT amount FROM transactions WHERE user_id=?1 AND type=?2 AND is_paid=?3",
    );
    let range = match filter.dates {
        DateFilter::TransactionDate(r) => {
            sql.push_str(" AND transaction_date >= ?4 AND transaction_date < ?5");
            r
        }
        DateFilter::EffectiveDate(r) => {
            sql.push_str(
                " AND ((due_date >= ?4 AND due_date < ?5) \
                 OR (due_date IS NULL AND transaction_date >= ?4 AND transaction_date < ?5))",
            );
            r
        }
    };
    (sql, range.start, range.end)
}

impl TransactionQuery for SqliteStore {
    fn amounts(&self, filter: &TransactionFilter) -> Result<Vec<Decimal>, StoreError> {
        let (sql, start, end) = filter_sql(filter);
        let conn = self.lock();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                filter.user_id,
                filter.kind.as_str(),
                filter.is_paid,
                start,
                end
            ],
            |r| r.get::<_, String>(0),
        )?;
        let mut out = Vec::new();
        for row in rows {
            let raw = row?;
            let amount = raw
                .trim()
                .parse::<Decimal>()
                .map_err(|_| StoreError::MalformedRow(format!("amount '{}'", raw)))?;
            out.push(amount);
        }
        debug!(user = %filter.user_id, kind = %filter.kind, rows = out.len(), "sqlite amounts");
        Ok(out)
    }

    fn latest_transaction_date(
        &self,
        user_id: &str,
        kind: Option<TransactionKind>,
    ) -> Result<Option<NaiveDate>, StoreError> {
        let conn = self.lock();
        let latest: Option<NaiveDate> = match kind {
            Some(k) => conn
                .query_row(
                    "SELECT transaction_date FROM transactions WHERE user_id=?1 AND type=?2
                     ORDER BY transaction_date DESC LIMIT 1",
                    params![user_id, k.as_str()],
                    |r| r.get(0),
                )
                .optional()?,
            None => conn
                .query_row(
                    "SELECT transaction_date FROM transactions WHERE user_id=?1
                     ORDER BY transaction_date DESC LIMIT 1",
                    params![user_id],
                    |r| r.get(0),
                )
                .optional()?,
        };
        Ok(latest)
    }
}
