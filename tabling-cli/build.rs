//! Build script for tabling-cli.
//!
//! Renders the `tabling.1` man page into OUT_DIR with clap_mangen. Build
//! scripts cannot depend on the crate being built, so the command tree is
//! restated here.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Keep in step with src/cli.rs.
fn build_cli() -> Command {
    let global_flag = |name: &'static str, help: &'static str| {
        Arg::new(name)
            .long(name)
            .help(help)
            .global(true)
            .action(ArgAction::SetTrue)
    };

    Command::new("tabling")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage restaurant reservations and table allocation")
        .long_about(
            "Front-of-house tool for booking tables, moving reservations through their \
             lifecycle and keeping table status consistent across staff terminals",
        )
        .arg(global_flag("verbose", "Enable verbose output"))
        .arg(global_flag("quiet", "Suppress non-essential output"))
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("TABLING_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("How long to wait for another terminal's lock (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("TABLING_BUSY_TIMEOUT"),
        )
        .arg(
            global_flag("disable-autoinit", "Disable automatic database initialization")
                .env("TABLING_DISABLE_AUTOINIT"),
        )
        .subcommands([
            Command::new("init").about("Initialize the data directory and database"),
            Command::new("table")
                .about("Manage the floor plan")
                .subcommands([
                    Command::new("add").about("Add a table"),
                    Command::new("list").about("List every table with its status"),
                    Command::new("show").about("Show one table with its reservations and orders"),
                    Command::new("remove").about("Remove a table from the floor plan"),
                    Command::new("import").about("Add the tables configured under floor_plan"),
                ]),
            Command::new("book").about("Book a table (or combined tables) for a party"),
            Command::new("confirm").about("Confirm a pending reservation and hold its tables"),
            Command::new("seat").about("Seat a confirmed reservation"),
            Command::new("complete").about("Complete a seated visit and release its tables"),
            Command::new("cancel").about("Cancel a reservation"),
            Command::new("no-show").about("Mark a reservation as a no-show"),
            Command::new("order")
                .about("Open, close and list orders")
                .subcommands([
                    Command::new("open").about("Open an order on a table"),
                    Command::new("close").about("Close an order and release its table"),
                    Command::new("list").about("List orders"),
                ]),
            Command::new("list").about("List reservations"),
            Command::new("validate").about("Validate a configuration file"),
            Command::new("show-data-dir").about("Show the resolved data directory path"),
            Command::new("completions").about("Generate shell completion scripts"),
        ])
}

fn main() -> io::Result<()> {
    let out_dir = PathBuf::from(
        std::env::var("OUT_DIR").map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?,
    );
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let mut buffer = Vec::new();
    Man::new(build_cli()).render(&mut buffer)?;
    fs::write(man_dir.join("tabling.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
