// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

use crate::models::MAX_INSTALLMENTS;

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn period_arg() -> Arg {
    Arg::new("period")
        .long("period")
        .default_value("all")
        .help("all | current-month | last-month | last-N-months")
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .help("Id or unique id prefix")
}

pub fn build_cli() -> Command {
    Command::new("ledgerlite")
        .about("Personal income/expense tracker with installments, fixed monthly entries, reminders and goals")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("LEDGERLITE_DB")
                .help("Path to the SQLite data file"),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .global(true)
                .env("LEDGERLITE_LOG")
                .help("Log filter, e.g. info or ledgerlite=debug"),
        )
        .arg(
            Arg::new("today")
                .long("today")
                .global(true)
                .help("Treat this date (YYYY-MM-DD) as today"),
        )
        .subcommand(Command::new("init").about("Create the data file"))
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record income or an expense")
                        .arg(Arg::new("desc").long("desc").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .default_value("expense")
                                .help("income | expense"),
                        )
                        .arg(Arg::new("date").long("date").help("Defaults to today"))
                        .arg(Arg::new("due").long("due"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("installments")
                                .long("installments")
                                .value_parser(
                                    value_parser!(u32).range(2..=i64::from(MAX_INSTALLMENTS)),
                                )
                                .help("Split into N monthly installments of the full amount"),
                        )
                        .arg(
                            Arg::new("fixed")
                                .long("fixed")
                                .action(ArgAction::SetTrue)
                                .help("Repeat every month"),
                        )
                        .arg(
                            Arg::new("settled")
                                .long("settled")
                                .action(ArgAction::SetTrue)
                                .help("Already paid or received"),
                        ),
                )
                .subcommand(json_args(
                    Command::new("list")
                        .arg(period_arg())
                        .arg(Arg::new("kind").long("kind"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("open")
                                .long("open")
                                .action(ArgAction::SetTrue)
                                .help("Only unsettled"),
                        )
                        .arg(
                            Arg::new("settled")
                                .long("settled")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("open")
                                .help("Only settled"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(json_args(
                    Command::new("overdue").about("Unsettled records past their due date"),
                ))
                .subcommand(
                    Command::new("rm")
                        .arg(id_arg())
                        .arg(
                            Arg::new("series")
                                .long("series")
                                .action(ArgAction::SetTrue)
                                .help("Remove every record of the series"),
                        ),
                )
                .subcommand(
                    Command::new("settle")
                        .arg(id_arg())
                        .arg(Arg::new("on").long("on").help("Defaults to today")),
                )
                .subcommand(Command::new("reopen").arg(id_arg())),
        )
        .subcommand(
            Command::new("category")
                .about("Categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .default_value("both")
                                .help("income | expense | both"),
                        )
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true))),
        )
        .subcommand(
            Command::new("reminder")
                .about("Reminders")
                .subcommand(Command::new("add").arg(Arg::new("text").long("text").required(true)))
                .subcommand(json_args(
                    Command::new("list").arg(
                        Arg::new("completed")
                            .long("completed")
                            .action(ArgAction::SetTrue)
                            .help("Show completed reminders instead of open ones"),
                    ),
                ))
                .subcommand(Command::new("done").arg(id_arg()))
                .subcommand(Command::new("reopen").arg(id_arg()))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("desc").long("desc").required(true))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(Arg::new("current").long("current").default_value("0"))
                        .arg(Arg::new("by").long("by").required(true)),
                )
                .subcommand(
                    Command::new("contribute")
                        .arg(id_arg())
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("payday")
                .about("Next payday")
                .subcommand(Command::new("set").arg(Arg::new("date").long("date").required(true)))
                .subcommand(Command::new("show"))
                .subcommand(Command::new("clear")),
        )
        .subcommand(
            Command::new("report")
                .about("Reports")
                .subcommand(json_args(
                    Command::new("totals").arg(period_arg()).arg(
                        Arg::new("settled-only")
                            .long("settled-only")
                            .action(ArgAction::SetTrue),
                    ),
                ))
                .subcommand(json_args(
                    Command::new("by-category")
                        .arg(period_arg())
                        .arg(Arg::new("kind").long("kind").default_value("expense")),
                ))
                .subcommand(json_args(
                    Command::new("allowance")
                        .about("Balance per day until the next payday")
                        .arg(
                            Arg::new("payday")
                                .long("payday")
                                .help("Defaults to the stored payday"),
                        )
                        .arg(
                            Arg::new("settled-only")
                                .long("settled-only")
                                .action(ArgAction::SetTrue),
                        ),
                ))
                .subcommand(json_args(
                    Command::new("cashflow").arg(
                        Arg::new("months")
                            .long("months")
                            .value_parser(value_parser!(usize))
                            .default_value("12"),
                    ),
                )),
        )
        .subcommand(
            Command::new("rollover")
                .about("Fixed monthly entries")
                .subcommand(
                    Command::new("run")
                        .about("Materialize this month's missing fixed entries, ignoring the monthly marker"),
                ),
        )
}
