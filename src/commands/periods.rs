// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::clock::Clock;
use crate::models::TransactionKind;
use crate::period::{Period, PeriodOption, PeriodOptions, resolve_periods};
use crate::session::{SessionProvider, StaticSession};
use crate::store::TransactionQuery;
use crate::utils::{get_epoch, open_store, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;

/// Selectable periods for `user`, bounded by their latest expense.
pub fn period_options(
    store: &dyn TransactionQuery,
    user: Option<&str>,
    epoch: Period,
    clock: &dyn Clock,
) -> Result<PeriodOptions> {
    let latest = match user {
        Some(u) => store
            .latest_transaction_date(u, Some(TransactionKind::Expense))
            .with_context(|| format!("Looking up latest transaction for '{}'", u))?,
        None => None,
    };
    Ok(resolve_periods(epoch, latest, clock)?)
}

#[derive(Serialize)]
struct PeriodsOutput {
    periods: Vec<PeriodOption>,
    default: String,
}

/// Resolves the selector for the `periods` arguments, from the same store
/// `dashboard` would query.
pub fn load(
    conn: Connection,
    sub: &clap::ArgMatches,
    clock: &dyn Clock,
) -> Result<PeriodOptions> {
    let sessions =
        StaticSession::from_user_or_env(sub.get_one::<String>("user").map(String::as_str));
    let session = sessions.current_session();
    let epoch = get_epoch(&conn)?;
    let store = open_store(conn, sub.get_flag("remote"), session.as_ref())?;
    let user = session.as_ref().map(|s| s.user_id.as_str());
    period_options(store.as_ref(), user, epoch, clock)
}

pub fn handle(conn: Connection, sub: &clap::ArgMatches, clock: &dyn Clock) -> Result<()> {
    let options = load(conn, sub, clock)?;

    if sub.get_flag("json") {
        let out = PeriodsOutput {
            periods: options.options(),
            default: options.default.key(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    let rows: Vec<Vec<String>> = options
        .periods
        .iter()
        .map(|p| {
            let marker = if *p == options.default { "*" } else { "" };
            vec![p.key(), p.label(), marker.to_string()]
        })
        .collect();
    println!("{}", pretty_table(&["Period", "Label", "Default"], rows));
    Ok(())
}
