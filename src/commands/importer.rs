// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::transactions::insert_transaction;
use crate::models::NewTransaction;
use crate::utils::{parse_bool, parse_date, parse_decimal, parse_kind};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn optional(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Expected columns: user_id,type,amount,is_paid,transaction_date,due_date,description,category
fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut count = 0usize;
    for (line, result) in rdr.records().enumerate() {
        let rec = result?;
        let row = line + 2;
        let user_id = rec.get(0).context("user_id missing")?.trim().to_string();
        let kind = parse_kind(rec.get(1).context("type missing")?)
            .with_context(|| format!("Row {}", row))?;
        let amount = parse_decimal(rec.get(2).context("amount missing")?)
            .with_context(|| format!("Row {}", row))?;
        let is_paid = parse_bool(rec.get(3).unwrap_or(""))
            .with_context(|| format!("Row {}", row))?;
        let transaction_date = parse_date(rec.get(4).context("transaction_date missing")?)
            .with_context(|| format!("Row {}", row))?;
        let due_date = optional(rec.get(5))
            .map(|d| parse_date(&d))
            .transpose()
            .with_context(|| format!("Row {}", row))?;

        insert_transaction(
            &tx,
            &NewTransaction {
                user_id,
                amount,
                kind,
                is_paid,
                transaction_date,
                due_date,
                description: optional(rec.get(6)),
                category: optional(rec.get(7)),
            },
        )?;
        count += 1;
    }
    tx.commit()?;
    info!(path, count, "import finished");
    println!("Imported {} transactions from {}", count, path);
    Ok(())
}
