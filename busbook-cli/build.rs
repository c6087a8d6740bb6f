//! Build script for busbook-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("busbook")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage staff bus seat bookings")
        .long_about(
            "Command-line tool for the 45-seat staff bus booking ledger: bookings, \
             seat maps, passenger profiles and rollover requests",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("BUSBOOK_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the database lock wait (in seconds)")
                .value_name("SECONDS")
                .global(true),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Output format for listings: table, json, csv or tsv")
                .value_name("FORMAT")
                .global(true),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the data directory and database")
                .long_about("Create the busbook database and, optionally, a default configuration"),
            Command::new("book")
                .about("Book a seat on one or two travel dates")
                .long_about("Book a seat for a passenger; round trips book both dates or neither"),
            Command::new("rebook")
                .about("Book a seat on one date, overwriting the passenger's own record")
                .long_about("Move a passenger to a seat; a slot held by someone else is a conflict"),
            Command::new("cancel")
                .about("Cancel a reservation")
                .long_about("Delete a reservation by email, seat and date; a missing one is not an error"),
            Command::new("checkin")
                .about("Mark a passenger as boarded")
                .long_about("Set the check-in flag on a reservation, named by key or by email, seat and date"),
            Command::new("list")
                .about("List reservations")
                .long_about("Display reservations filtered by seat, email, date or destination"),
            Command::new("seats")
                .about("Show the seat map for a travel date")
                .long_about("Show which of the 45 seats are booked on a date"),
            Command::new("report")
                .about("Summarize bookings by destination")
                .long_about("Group active bookings by destination interchange in route order"),
            Command::new("reset")
                .about("Delete every reservation")
                .long_about("Delete every reservation one at a time; safe to run again"),
            Command::new("user")
                .about("Show, update and list passenger profiles")
                .long_about("Read and correct the passenger profiles saved by bookings"),
            Command::new("rollover")
                .about("Manage rollover requests")
                .long_about("Open, stage, finalize, dismiss and clear rollover requests"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("busbook.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
