// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::db_path;
use crate::utils::{get_epoch, parse_month, pretty_table, set_epoch};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-epoch", sub)) => {
            let epoch = parse_month(sub.get_one::<String>("month").unwrap())?;
            set_epoch(conn, &epoch)?;
            println!("First selectable month set to {}", epoch.label());
        }
        Some(("show", _)) => {
            let remote = std::env::var("CASHMONTH_REST_URL").unwrap_or_else(|_| "(unset)".into());
            let rows = vec![
                vec!["database".into(), db_path()?.display().to_string()],
                vec!["epoch_month".into(), get_epoch(conn)?.key()],
                vec!["remote_url".into(), remote],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        _ => {}
    }
    Ok(())
}
