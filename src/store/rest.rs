// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! PostgREST-compatible remote transaction store.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{DateFilter, TransactionFilter, TransactionQuery};
use crate::error::StoreError;
use crate::models::TransactionKind;

#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Project URL, e.g. `https://xyz.example.co`.
    pub base_url: String,
    pub api_key: String,
    /// User access token; the API key is sent as bearer when absent.
    pub access_token: Option<String>,
    pub table: String,
}

pub struct RestStore {
    client: Client,
    config: RestConfig,
}

/// `amount` is selected as text so numeric columns never pass through `f64`.
#[derive(Deserialize)]
struct AmountRow {
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
}

#[derive(Deserialize)]
struct DateRow {
    transaction_date: NaiveDate,
}

impl RestStore {
    pub fn new(client: Client, config: RestConfig) -> Self {
        RestStore { client, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.table
        )
    }

    fn get<T: for<'de> Deserialize<'de>>(
        &self,
        query: &[(String, String)],
    ) -> Result<Vec<T>, StoreError> {
        let bearer = self
            .config
            .access_token
            .as_deref()
            .unwrap_or(&self.config.api_key);
        let resp = self
            .client
            .get(self.endpoint())
            .header("apikey", &self.config.api_key)
            .bearer_auth(bearer)
            .query(query)
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            warn!(status = status.as_u16(), "remote store rejected query");
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.json::<Vec<T>>()?)
    }
}

/// PostgREST query parameters selecting the amounts matched by `filter`.
pub fn filter_params(filter: &TransactionFilter) -> Vec<(String, String)> {
    let mut q = vec![
        ("select".to_string(), "amount:amount::text".to_string()),
        ("user_id".to_string(), format!("eq.{}", filter.user_id)),
        ("type".to_string(), format!("eq.{}", filter.kind)),
        ("is_paid".to_string(), format!("eq.{}", filter.is_paid)),
    ];
    match filter.dates {
        DateFilter::TransactionDate(r) => {
            q.push(("transaction_date".into(), format!("gte.{}", r.start)));
            q.push(("transaction_date".into(), format!("lt.{}", r.end)));
        }
        DateFilter::EffectiveDate(r) => {
            q.push((
                "or".into(),
                format!(
                    "(and(due_date.gte.{s},due_date.lt.{e}),and(due_date.is.null,transaction_date.gte.{s},transaction_date.lt.{e}))",
                    s = r.start,
                    e = r.end
                ),
            ));
        }
    }
    q
}

/// Parameters for the newest `transaction_date` of a user.
pub fn latest_date_params(user_id: &str, kind: Option<TransactionKind>) -> Vec<(String, String)> {
    let mut q = vec![
        ("select".to_string(), "transaction_date".to_string()),
        ("user_id".to_string(), format!("eq.{}", user_id)),
    ];
    if let Some(k) = kind {
        q.push(("type".into(), format!("eq.{}", k)));
    }
    q.push(("order".into(), "transaction_date.desc".into()));
    q.push(("limit".into(), "1".into()));
    q
}

impl TransactionQuery for RestStore {
    fn amounts(&self, filter: &TransactionFilter) -> Result<Vec<Decimal>, StoreError> {
        let rows: Vec<AmountRow> = self.get(&filter_params(filter))?;
        debug!(user = %filter.user_id, kind = %filter.kind, rows = rows.len(), "remote amounts");
        Ok(rows.into_iter().map(|r| r.amount).collect())
    }

    fn latest_transaction_date(
        &self,
        user_id: &str,
        kind: Option<TransactionKind>,
    ) -> Result<Option<NaiveDate>, StoreError> {
        let rows: Vec<DateRow> = self.get(&latest_date_params(user_id, kind))?;
        Ok(rows.into_iter().next().map(|r| r.transaction_date))
    }
}
