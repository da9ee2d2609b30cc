// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::NewTransaction;
use crate::utils::{
    fmt_money, maybe_print_json, parse_date, parse_decimal, parse_kind, parse_month, pretty_table,
};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn insert_transaction(conn: &Connection, tx: &NewTransaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(user_id, type, amount, is_paid, transaction_date, due_date, description, category)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            tx.user_id,
            tx.kind.as_str(),
            tx.amount.to_string(),
            tx.is_paid,
            tx.transaction_date,
            tx.due_date,
            tx.description,
            tx.category
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = sub.get_one::<String>("user").unwrap().trim().to_string();
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let kind = parse_kind(sub.get_one::<String>("type").unwrap())?;
    let due_date = sub
        .get_one::<String>("due")
        .map(|s| parse_date(s))
        .transpose()?;

    let tx = NewTransaction {
        user_id,
        amount,
        kind,
        is_paid: sub.get_flag("paid"),
        transaction_date: date,
        due_date,
        description: sub.get_one::<String>("description").cloned(),
        category: sub.get_one::<String>("category").cloned(),
    };
    let id = insert_transaction(conn, &tx)?;
    println!(
        "Recorded {} {} on {} for '{}' (id {}, {})",
        tx.kind,
        fmt_money(&tx.amount),
        tx.transaction_date,
        tx.user_id,
        id,
        if tx.is_paid { "paid" } else { "pending" }
    );
    Ok(())
}

fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute("UPDATE transactions SET is_paid=1 WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(anyhow!("Transaction {} not found", id));
    }
    println!("Marked transaction {} as paid", id);
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(anyhow!("Transaction {} not found", id));
    }
    println!("Removed transaction {}", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.r#type.clone(),
                    r.amount.clone(),
                    if r.paid { "yes".into() } else { "no".into() },
                    r.due.clone(),
                    r.description.clone(),
                    r.category.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Type", "Amount", "Paid", "Due", "Description", "Category"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub r#type: String,
    pub amount: String,
    pub paid: bool,
    pub due: String,
    pub description: String,
    pub category: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT id, transaction_date, type, amount, is_paid, due_date, description, category
         FROM transactions WHERE user_id=?",
    );
    let mut params_vec: Vec<String> = vec![sub.get_one::<String>("user").unwrap().trim().into()];

    if let Some(month) = sub.get_one::<String>("month") {
        let period = parse_month(month)?;
        sql.push_str(" AND transaction_date >= ? AND transaction_date < ?");
        params_vec.push(period.first_day().to_string());
        params_vec.push(period.next_month_start().to_string());
    }
    sql.push_str(" ORDER BY transaction_date DESC, id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let due: Option<String> = r.get(5)?;
        let description: Option<String> = r.get(6)?;
        let category: Option<String> = r.get(7)?;
        data.push(TransactionRow {
            id: r.get(0)?,
            date: r.get(1)?,
            r#type: r.get(2)?,
            amount: r.get(3)?,
            paid: r.get(4)?,
            due: due.unwrap_or_default(),
            description: description.unwrap_or_default(),
            category: category.unwrap_or_default(),
        });
    }
    Ok(data)
}
