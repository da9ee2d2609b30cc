// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

type Row = (
    String,
    String,
    String,
    bool,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
);

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }
    let user = sub.get_one::<String>("user").map(|u| u.trim().to_string());

    let mut stmt = conn.prepare(
        "SELECT user_id, type, amount, is_paid, transaction_date, due_date, description, category
         FROM transactions
         WHERE ?1 IS NULL OR user_id=?1
         ORDER BY transaction_date, id",
    )?;
    let rows = stmt
        .query_map([&user], |r| -> rusqlite::Result<Row> {
            Ok((
                r.get(0)?,
                r.get(1)?,
                r.get(2)?,
                r.get(3)?,
                r.get(4)?,
                r.get(5)?,
                r.get(6)?,
                r.get(7)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record([
            "user_id",
            "type",
            "amount",
            "is_paid",
            "transaction_date",
            "due_date",
            "description",
            "category",
        ])?;
        for (u, t, amt, paid, d, due, desc, cat) in rows {
            wtr.write_record([
                u,
                t,
                amt,
                paid.to_string(),
                d,
                due.unwrap_or_default(),
                desc.unwrap_or_default(),
                cat.unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
    } else {
        let items: Vec<_> = rows
            .into_iter()
            .map(|(u, t, amt, paid, d, due, desc, cat)| {
                json!({
                    "user_id": u, "type": t, "amount": amt, "is_paid": paid,
                    "transaction_date": d, "due_date": due, "description": desc, "category": cat
                })
            })
            .collect();
        std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
