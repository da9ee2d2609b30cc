// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::UnknownTransactionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = UnknownTransactionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(UnknownTransactionKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub is_paid: bool,
    pub transaction_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl Transaction {
    /// Date that places an unpaid bill in a month: the due date when set.
    pub fn effective_date(&self) -> NaiveDate {
        self.due_date.unwrap_or(self.transaction_date)
    }
}

/// A transaction about to be recorded; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub user_id: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub is_paid: bool,
    pub transaction_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Dashboard metrics for one user and one period. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub pre_income_amount: Decimal,
    pub upcoming_bills_amount: Decimal,
    pub upcoming_bills_count: usize,
    pub pre_balance_amount: Decimal,
}

impl FinancialSummary {
    /// Builds a summary from the four reduced reads. `None` when a derived
    /// balance is not representable.
    pub fn new(
        total_income: Decimal,
        total_expenses: Decimal,
        pre_income_amount: Decimal,
        upcoming_bills_amount: Decimal,
        upcoming_bills_count: usize,
    ) -> Option<Self> {
        Some(FinancialSummary {
            total_income,
            total_expenses,
            balance: total_income.checked_sub(total_expenses)?,
            pre_income_amount,
            upcoming_bills_amount,
            upcoming_bills_count,
            pre_balance_amount: pre_income_amount.checked_sub(upcoming_bills_amount)?,
        })
    }
}
