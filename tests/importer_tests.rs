// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashmonth::aggregate::aggregate;
use cashmonth::period::Period;
use cashmonth::store::SqliteStore;
use cashmonth::{cli, commands::importer, db};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn import(conn: &mut Connection, contents: &str) -> anyhow::Result<()> {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let padded = format!("  {}  ", path);
    let matches =
        cli::build_cli().get_matches_from(["cashmonth", "import", "transactions", "--path", &padded]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn imported_rows_feed_the_dashboard() {
    let mut conn = base_conn();
    import(
        &mut conn,
        "user_id,type,amount,is_paid,transaction_date,due_date,description,category\n\
         alice,income,2500.00,true,2025-04-01,,Salary,Work\n\
         alice,Expense,89.90,false,2025-03-28,2025-04-05,Internet,\n\
         alice,expense,12.00,0,2025-04-09,,,\n",
    )
    .unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 3);

    let store = SqliteStore::new(conn);
    let s = aggregate("alice", &Period::new(2025, 4).unwrap(), &store).unwrap();
    assert_eq!(s.total_income, Decimal::new(250000, 2));
    assert_eq!(s.upcoming_bills_amount, Decimal::new(10190, 2));
    assert_eq!(s.upcoming_bills_count, 2);
}

#[test]
fn bad_row_rolls_back_whole_import() {
    let mut conn = base_conn();
    let err = import(
        &mut conn,
        "user_id,type,amount,is_paid,transaction_date,due_date,description,category\n\
         alice,income,10,true,2025-04-01,,,\n\
         alice,transfer,10,true,2025-04-02,,,\n",
    )
    .unwrap_err();
    assert!(format!("{:#}", err).contains("Row 3"));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
