// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashmonth::{cli, commands::exporter, db};
use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO transactions(user_id,type,amount,is_paid,transaction_date,due_date,description,category) VALUES
            ('alice','expense','-12.34',0,'2025-01-02','2025-01-15','Corner Shop','Groceries'),
            ('bob','income','5',1,'2025-01-03',NULL,NULL,NULL);
        "#,
    )
    .unwrap();
    conn
}

fn export(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_streams_pretty_json() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    export(
        &conn,
        &[
            "cashmonth", "export", "transactions", "--format", "json", "--out", &out_str,
            "--user", "alice",
        ],
    )
    .unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "user_id": "alice",
                "type": "expense",
                "amount": "-12.34",
                "is_paid": false,
                "transaction_date": "2025-01-02",
                "due_date": "2025-01-15",
                "description": "Corner Shop",
                "category": "Groceries"
            }
        ])
    );
}

#[test]
fn export_csv_includes_every_user_by_default() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    export(&conn, &["cashmonth", "export", "transactions", "--out", &out_str]).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines[0],
        "user_id,type,amount,is_paid,transaction_date,due_date,description,category"
    );
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "bob,income,5,true,2025-01-03,,,");
}

#[test]
fn export_transactions_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    assert!(export(
        &conn,
        &["cashmonth", "export", "transactions", "--format", "xml", "--out", &out_str],
    )
    .is_err());
    assert!(!out_path.exists());
}
