// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::periods::period_options;
use crate::clock::Clock;
use crate::dashboard::{Dashboard, Notice, Refresh};
use crate::models::FinancialSummary;
use crate::period::Period;
use crate::session::{SessionProvider, StaticSession};
use crate::utils::{fmt_money, get_epoch, open_store, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Serialize)]
struct DashboardOutput<'a> {
    period: String,
    label: String,
    #[serde(flatten)]
    summary: &'a FinancialSummary,
}

pub fn summary_rows(summary: &FinancialSummary) -> Vec<Vec<String>> {
    vec![
        vec!["Income".into(), fmt_money(&summary.total_income)],
        vec!["Expenses".into(), fmt_money(&summary.total_expenses)],
        vec!["Balance".into(), fmt_money(&summary.balance)],
        vec!["Pending income".into(), fmt_money(&summary.pre_income_amount)],
        vec![
            format!("Upcoming bills ({})", summary.upcoming_bills_count),
            fmt_money(&summary.upcoming_bills_amount),
        ],
        vec!["Projected balance".into(), fmt_money(&summary.pre_balance_amount)],
    ]
}

fn render(period: &Period, summary: &FinancialSummary, json_flag: bool) -> Result<()> {
    if json_flag {
        let out = DashboardOutput {
            period: period.key(),
            label: period.label(),
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", period.label());
        println!("{}", pretty_table(&["Metric", "Amount"], summary_rows(summary)));
    }
    Ok(())
}

/// Outcome of one dashboard refresh, before rendering.
#[derive(Debug)]
pub struct DashboardRun {
    pub period: Period,
    pub outcome: Refresh,
    pub notices: Vec<Notice>,
}

pub fn load(
    conn: Connection,
    sub: &clap::ArgMatches,
    clock: &dyn Clock,
) -> Result<DashboardRun> {
    let sessions =
        StaticSession::from_user_or_env(sub.get_one::<String>("user").map(String::as_str));
    let session = sessions.current_session();
    let epoch = get_epoch(&conn)?;
    let store = open_store(conn, sub.get_flag("remote"), session.as_ref())?;

    let period = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => {
            let user = session.as_ref().map(|s| s.user_id.as_str());
            period_options(store.as_ref(), user, epoch, clock)?.default
        }
    };

    let dashboard = Dashboard::new();
    let outcome = dashboard.refresh(&sessions, period, store.as_ref());
    Ok(DashboardRun {
        period,
        outcome,
        notices: dashboard.take_notices(),
    })
}

pub fn handle(conn: Connection, sub: &clap::ArgMatches, clock: &dyn Clock) -> Result<()> {
    let run = load(conn, sub, clock)?;
    for notice in &run.notices {
        eprintln!("{}", notice);
    }
    if let Refresh::Updated(summary) = &run.outcome {
        render(&run.period, summary, sub.get_flag("json"))?;
    }
    Ok(())
}
