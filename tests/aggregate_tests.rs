// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Mutex;

use cashmonth::aggregate::aggregate;
use cashmonth::commands::transactions::insert_transaction;
use cashmonth::db::init_schema;
use cashmonth::error::{AggregateError, QueryName, StoreError};
use cashmonth::models::{NewTransaction, Transaction, TransactionKind};
use cashmonth::period::Period;
use cashmonth::store::{DateFilter, SqliteStore, TransactionFilter, TransactionQuery};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn tx(
    kind: TransactionKind,
    amount: &str,
    is_paid: bool,
    on: &str,
    due: Option<&str>,
) -> Transaction {
    Transaction {
        id: 0,
        user_id: "alice".into(),
        amount: dec(amount),
        kind,
        is_paid,
        transaction_date: date(on),
        due_date: due.map(date),
        description: None,
        category: None,
    }
}

/// In-memory store counting the reads it serves.
#[derive(Default)]
struct VecStore {
    rows: Vec<Transaction>,
    fail_bills: bool,
    calls: Mutex<usize>,
}

impl TransactionQuery for VecStore {
    fn amounts(&self, filter: &TransactionFilter) -> Result<Vec<Decimal>, StoreError> {
        *self.calls.lock().unwrap() += 1;
        if self.fail_bills && matches!(filter.dates, DateFilter::EffectiveDate(_)) {
            return Err(StoreError::Status {
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(self
            .rows
            .iter()
            .filter(|t| filter.matches(t))
            .map(|t| t.amount)
            .collect())
    }

    fn latest_transaction_date(
        &self,
        user_id: &str,
        kind: Option<TransactionKind>,
    ) -> Result<Option<NaiveDate>, StoreError> {
        Ok(self
            .rows
            .iter()
            .filter(|t| t.user_id == user_id && kind.is_none_or(|k| k == t.kind))
            .map(|t| t.transaction_date)
            .max())
    }
}

fn sample() -> VecStore {
    use TransactionKind::*;
    VecStore {
        rows: vec![
            tx(Income, "3000.00", true, "2025-03-01", None),
            tx(Income, "250.50", true, "2025-03-31", None),
            tx(Income, "999.00", true, "2025-04-01", None),
            tx(Income, "400.00", false, "2025-03-20", None),
            tx(Expense, "1200.00", true, "2025-03-05", None),
            tx(Expense, "80.25", true, "2025-02-28", None),
            tx(Expense, "150.00", false, "2025-02-20", Some("2025-03-05")),
            tx(Expense, "60.00", false, "2025-03-10", None),
            tx(Expense, "75.00", false, "2025-03-25", Some("2025-04-02")),
        ],
        ..Default::default()
    }
}

#[test]
fn summarizes_a_month() {
    let store = sample();
    let s = aggregate("alice", &Period::new(2025, 3).unwrap(), &store).unwrap();
    assert_eq!(s.total_income, dec("3250.50"));
    assert_eq!(s.total_expenses, dec("1200.00"));
    assert_eq!(s.balance, dec("2050.50"));
    assert_eq!(s.pre_income_amount, dec("400.00"));
    assert_eq!(s.upcoming_bills_amount, dec("210.00"));
    assert_eq!(s.upcoming_bills_count, 2);
    assert_eq!(s.pre_balance_amount, dec("190.00"));
    assert_eq!(*store.calls.lock().unwrap(), 4);
}

#[test]
fn due_date_places_bill_in_its_month() {
    let store = VecStore {
        rows: vec![tx(
            TransactionKind::Expense,
            "150.00",
            false,
            "2025-02-20",
            Some("2025-03-05"),
        )],
        ..Default::default()
    };
    let march = aggregate("alice", &Period::new(2025, 3).unwrap(), &store).unwrap();
    assert_eq!(march.upcoming_bills_amount, dec("150.00"));
    assert_eq!(march.upcoming_bills_count, 1);

    let feb = aggregate("alice", &Period::new(2025, 2).unwrap(), &store).unwrap();
    assert_eq!(feb.upcoming_bills_amount, Decimal::ZERO);
    assert_eq!(feb.upcoming_bills_count, 0);
}

#[test]
fn new_realized_income_adds_exactly_its_amount() {
    let mut store = sample();
    let period = Period::new(2025, 3).unwrap();
    let before = aggregate("alice", &period, &store).unwrap();
    store
        .rows
        .push(tx(TransactionKind::Income, "12.34", true, "2025-03-15", None));
    let after = aggregate("alice", &period, &store).unwrap();
    assert_eq!(after.total_income - before.total_income, dec("12.34"));
    assert_eq!(after.balance, after.total_income - after.total_expenses);
}

#[test]
fn other_users_are_ignored() {
    let mut store = sample();
    let mut bob = tx(TransactionKind::Income, "10000", true, "2025-03-02", None);
    bob.user_id = "bob".into();
    store.rows.push(bob);
    let s = aggregate("alice", &Period::new(2025, 3).unwrap(), &store).unwrap();
    assert_eq!(s.total_income, dec("3250.50"));
}

#[test]
fn empty_store_is_all_zero() {
    let store = VecStore::default();
    let s = aggregate("alice", &Period::new(2025, 3).unwrap(), &store).unwrap();
    assert_eq!(s, Default::default());
}

#[test]
fn failing_bills_query_aborts_the_summary() {
    let mut store = sample();
    store.fail_bills = true;
    let err = aggregate("alice", &Period::new(2025, 3).unwrap(), &store).unwrap_err();
    assert_eq!(err.query(), Some(QueryName::UpcomingBills));
    let AggregateError::QueryFailure { source, .. } = err else {
        panic!("expected a query failure, got {:?}", err);
    };
    assert!(matches!(source, StoreError::Status { status: 503, .. }));
}

#[test]
fn sums_match_exact_decimal_reference() {
    let rows: Vec<_> = (0..1000)
        .map(|i| {
            let day = format!("2025-05-{:02}", i % 28 + 1);
            tx(TransactionKind::Income, "0.10", true, &day, None)
        })
        .collect();
    let store = VecStore {
        rows,
        ..Default::default()
    };
    let s = aggregate("alice", &Period::new(2025, 5).unwrap(), &store).unwrap();
    assert_eq!(s.total_income, dec("100.00"));
    assert_eq!(s.total_income.to_string(), "100.00");
}

fn sqlite_with(rows: &[Transaction]) -> SqliteStore {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    for t in rows {
        insert_transaction(
            &conn,
            &NewTransaction {
                user_id: t.user_id.clone(),
                amount: t.amount,
                kind: t.kind,
                is_paid: t.is_paid,
                transaction_date: t.transaction_date,
                due_date: t.due_date,
                description: None,
                category: None,
            },
        )
        .unwrap();
    }
    SqliteStore::new(conn)
}

#[test]
fn sqlite_store_agrees_with_in_memory_filtering() {
    let reference = sample();
    let store = sqlite_with(&reference.rows);
    for month in 2..=4 {
        let period = Period::new(2025, month).unwrap();
        assert_eq!(
            aggregate("alice", &period, &store).unwrap(),
            aggregate("alice", &period, &reference).unwrap(),
            "month {}",
            period
        );
    }
}

#[test]
fn sqlite_latest_date_respects_kind() {
    let store = sqlite_with(&sample().rows);
    assert_eq!(
        store
            .latest_transaction_date("alice", Some(TransactionKind::Expense))
            .unwrap(),
        Some(date("2025-03-25"))
    );
    assert_eq!(
        store.latest_transaction_date("alice", None).unwrap(),
        Some(date("2025-04-01"))
    );
    assert_eq!(store.latest_transaction_date("nobody", None).unwrap(), None);
}

#[test]
fn sqlite_malformed_amount_is_a_query_failure() {
    let store = sqlite_with(&[]);
    let conn = store.into_inner();
    conn.execute(
        "INSERT INTO transactions(user_id,type,amount,is_paid,transaction_date) VALUES ('alice','income','abc',1,'2025-03-03')",
        [],
    )
    .unwrap();
    let store = SqliteStore::new(conn);
    let err = aggregate("alice", &Period::new(2025, 3).unwrap(), &store).unwrap_err();
    assert_eq!(err.query(), Some(QueryName::RealizedIncome));
}

const MAX_AMOUNT: &str = "79228162514264337593543950335";

#[test]
fn overflowing_income_sum_is_a_query_failure() {
    use cashmonth::dashboard::{Dashboard, Refresh};
    use cashmonth::session::{Session, StaticSession};

    let store = sqlite_with(&[
        tx(TransactionKind::Income, MAX_AMOUNT, true, "2025-03-02", None),
        tx(TransactionKind::Income, "1", true, "2025-03-03", None),
    ]);
    let march = Period::new(2025, 3).unwrap();
    let err = aggregate("alice", &march, &store).unwrap_err();
    assert_eq!(err.query(), Some(QueryName::RealizedIncome));
    assert!(err.to_string().contains("amount sum overflows"));

    let dash = Dashboard::new();
    let outcome = dash.refresh(&StaticSession(Some(Session::new("alice"))), march, &store);
    assert!(matches!(outcome, Refresh::Failed(_)), "got {:?}", outcome);
    assert!(dash.current().is_none());
}

#[test]
fn unrepresentable_balance_aborts_the_summary() {
    let store = VecStore {
        rows: vec![
            tx(TransactionKind::Income, MAX_AMOUNT, true, "2025-03-02", None),
            tx(TransactionKind::Expense, "-1", true, "2025-03-03", None),
        ],
        ..Default::default()
    };
    let err = aggregate("alice", &Period::new(2025, 3).unwrap(), &store).unwrap_err();
    assert!(matches!(err, AggregateError::Overflow("balance")));
    assert_eq!(err.query(), None);
}
