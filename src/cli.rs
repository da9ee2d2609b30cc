// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .short('u')
        .help("User id (defaults to $CASHMONTH_USER)")
}

fn remote_arg() -> Arg {
    Arg::new("remote")
        .long("remote")
        .action(ArgAction::SetTrue)
        .help("Query the remote store ($CASHMONTH_REST_URL)")
}

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON document per line"),
    )
}

pub fn build_cli() -> Command {
    Command::new("cashmonth")
        .version(crate_version!())
        .about("Monthly income, expense and upcoming-bill dashboard")
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions")
                .subcommand(
                    Command::new("add")
                        .arg(user_arg().required(true))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true),
                        )
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .value_parser(["income", "expense"]),
                        )
                        .arg(
                            Arg::new("paid")
                                .long("paid")
                                .action(ArgAction::SetTrue)
                                .help("Already settled"),
                        )
                        .arg(Arg::new("due").long("due").help("Due date YYYY-MM-DD"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(json_args(
                    Command::new("list")
                        .arg(user_arg().required(true))
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("pay").about("Mark a transaction as paid").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("periods")
                .about("List selectable months and the default selection")
                .arg(user_arg())
                .arg(remote_arg())
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Monthly totals, pending income and upcoming bills")
                .arg(user_arg())
                .arg(Arg::new("month").long("month").help("YYYY-MM"))
                .arg(remote_arg())
                .arg(Arg::new("json").long("json").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set-epoch")
                        .about("First selectable month")
                        .arg(Arg::new("month").required(true).help("YYYY-MM")),
                ),
        )
        .subcommand(
            Command::new("import").subcommand(
                Command::new("transactions").arg(Arg::new("path").long("path").required(true)),
            ),
        )
        .subcommand(
            Command::new("export").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true))
                    .arg(user_arg()),
            ),
        )
}
