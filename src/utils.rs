// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::models::TransactionKind;
use crate::period::Period;
use crate::session::Session;
use crate::store::{RestConfig, RestStore, SqliteStore, TransactionQuery};

pub const DEFAULT_EPOCH: &str = "2025-01";

const UA: &str = concat!(
    "cashmonth/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/cashmonth)"
);

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<Period> {
    s.parse::<Period>()
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_kind(s: &str) -> Result<TransactionKind> {
    Ok(s.parse::<TransactionKind>()?)
}

pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "paid" => Ok(true),
        "false" | "0" | "no" | "n" | "" | "pending" => Ok(false),
        other => Err(anyhow::anyhow!("Invalid flag '{}', expected true|false", other)),
    }
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

// Epoch month settings
pub fn get_epoch(conn: &Connection) -> Result<Period> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key='epoch_month'", [], |r| {
            r.get(0)
        })
        .optional()?;
    parse_month(v.as_deref().unwrap_or(DEFAULT_EPOCH))
}

pub fn set_epoch(conn: &Connection, epoch: &Period) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('epoch_month', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![epoch.key()],
    )?;
    Ok(())
}

/// Remote store settings from `CASHMONTH_REST_URL` / `CASHMONTH_REST_KEY`.
pub fn rest_config_from_env(access_token: Option<String>) -> Result<RestConfig> {
    let base_url = std::env::var("CASHMONTH_REST_URL")
        .context("CASHMONTH_REST_URL is not set; required for --remote")?;
    let api_key = std::env::var("CASHMONTH_REST_KEY")
        .context("CASHMONTH_REST_KEY is not set; required for --remote")?;
    let table = std::env::var("CASHMONTH_REST_TABLE").unwrap_or_else(|_| "transactions".into());
    Ok(RestConfig {
        base_url,
        api_key,
        access_token,
        table,
    })
}

/// The store a read-only command queries: the local database, or the remote
/// store when `remote` is set.
pub fn open_store(
    conn: Connection,
    remote: bool,
    session: Option<&Session>,
) -> Result<Box<dyn TransactionQuery>> {
    if remote {
        let token = session.and_then(|s| s.access_token.clone());
        let config = rest_config_from_env(token)?;
        return Ok(Box::new(RestStore::new(http_client()?, config)));
    }
    Ok(Box::new(SqliteStore::new(conn)))
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
