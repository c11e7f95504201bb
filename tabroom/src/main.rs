//! # tabroom
//!
//! Command-line front end for tabroomlib: render JSON data as fixed-width
//! text tables, publish the recent-tournament listing, and exercise the
//! summary cache against a directory-backed store.
//!
//! ## Usage
//!
//! ```bash
//! # Render a JSON array of rows (first row is the header)
//! echo '[["School","Wins"],["Lincoln",4]]' | tabroom table --align l,r
//!
//! # Publish the recent tournaments listing
//! tabroom recent --input tournaments.json --store ./cache
//!
//! # Look up a school's cached summary
//! tabroom lookup --store ./cache --tournament 20134 --school Lincoln
//!
//! # Store summarizer output for a tournament
//! tabroom store --store ./cache --tournament 20134 --input summaries.json
//! ```
//!
//! Logging goes to stderr. The filter comes from `TABROOM_LOG`, then
//! `RUST_LOG`, and defaults to `warn`; `-v` switches it to `debug`.

mod adapters;

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use console::style;
use tabroomlib::listing::{ListingOptions, TournamentRecord};
use tabroomlib::table::{parse_list, DEFAULT_MAX_WIDTH};
use tabroomlib::{
    handle_request, publish_recent, run_generation, Align, CellValue, Decorations, DirStore,
    Dtype, SummaryRequest, Texttable, VAlign,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::adapters::{FileSummarizer, LogNotifier, LogTrigger};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "TABROOM_LOG";

fn store_arg() -> Arg {
    Arg::new("store")
        .long("store")
        .env("TABROOM_STORE")
        .required(true)
        .help("Directory backing the object store")
}

fn max_width_arg() -> Arg {
    Arg::new("max-width")
        .short('w')
        .long("max-width")
        .value_parser(value_parser!(usize))
        .help("Maximum table width, 0 for unlimited")
}

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("tabroom")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Fixed-width tables and cached tournament summaries")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug output to stderr"),
        )
        .subcommand(
            Command::new("table")
                .about("Render a JSON array of rows as a text table")
                .arg(Arg::new("file").help("Input file (defaults to stdin)"))
                .arg(
                    Arg::new("no-header")
                        .long("no-header")
                        .action(ArgAction::SetTrue)
                        .help("Treat the first row as data"),
                )
                .arg(max_width_arg())
                .arg(
                    Arg::new("align")
                        .short('a')
                        .long("align")
                        .help("Column alignment (comma-separated: l,c,r)"),
                )
                .arg(
                    Arg::new("valign")
                        .long("valign")
                        .help("Vertical alignment (comma-separated: t,m,b)"),
                )
                .arg(
                    Arg::new("dtype")
                        .short('d')
                        .long("dtype")
                        .help("Column datatypes (comma-separated: a,t,f,e,i)"),
                )
                .arg(
                    Arg::new("width")
                        .long("width")
                        .value_delimiter(',')
                        .value_parser(value_parser!(usize))
                        .help("Fixed column widths (comma-separated)"),
                )
                .arg(
                    Arg::new("precision")
                        .short('p')
                        .long("precision")
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i64))
                        .help("Digits after the decimal point for float and exponential columns"),
                )
                .arg(
                    Arg::new("deco")
                        .long("deco")
                        .help("Decorations (comma-separated: border,header,hlines,vlines; or all, none)"),
                )
                .arg(
                    Arg::new("chars")
                        .long("chars")
                        .allow_hyphen_values(true)
                        .help("Line characters: horizontal, vertical, corner, header (e.g. \"-|+=\")"),
                ),
        )
        .subcommand(
            Command::new("recent")
                .about("Publish the recently updated tournaments listing")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .required(true)
                        .help("JSON array of tournament records"),
                )
                .arg(store_arg())
                .arg(
                    Arg::new("limit")
                        .short('n')
                        .long("limit")
                        .value_parser(value_parser!(usize))
                        .help("Maximum number of tournaments listed"),
                )
                .arg(max_width_arg()),
        )
        .subcommand(
            Command::new("lookup")
                .about("Look up a school's cached summary")
                .arg(store_arg())
                .arg(
                    Arg::new("body")
                        .long("body")
                        .conflicts_with_all(["tournament", "school"])
                        .help("Raw JSON request body"),
                )
                .arg(
                    Arg::new("tournament")
                        .short('t')
                        .long("tournament")
                        .help("Tournament id"),
                )
                .arg(
                    Arg::new("school")
                        .short('s')
                        .long("school")
                        .help("School name"),
                ),
        )
        .subcommand(
            Command::new("store")
                .about("Store generated summaries for a tournament")
                .arg(store_arg())
                .arg(
                    Arg::new("tournament")
                        .short('t')
                        .long("tournament")
                        .required(true)
                        .help("Tournament id"),
                )
                .arg(
                    Arg::new("school")
                        .short('s')
                        .long("school")
                        .default_value("")
                        .help("School that requested generation"),
                )
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .required(true)
                        .help("JSON object of per-school summaries"),
                ),
        )
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Read a file, or stdin when no path (or `-`) is given.
fn read_input(path: Option<&String>) -> anyhow::Result<String> {
    match path.map(String::as_str) {
        None | Some("-") => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read {path}")),
    }
}

/// Apply table options from the command line.
///
/// Options that affect normalization (precision, dtype) must be set
/// before any rows are added.
fn configure_table(table: &mut Texttable, matches: &ArgMatches) -> anyhow::Result<()> {
    if let Some(deco) = matches.get_one::<String>("deco") {
        table.set_deco(Decorations::from_str(deco)?);
    }
    if let Some(chars) = matches.get_one::<String>("chars") {
        let chars: Vec<String> = chars.chars().map(String::from).collect();
        table.set_chars(&chars)?;
    }
    if let Some(&precision) = matches.get_one::<i64>("precision") {
        table.set_precision(precision)?;
    }
    if let Some(dtype) = matches.get_one::<String>("dtype") {
        table.set_cols_dtype(&parse_list::<Dtype>(dtype)?)?;
    }
    if let Some(align) = matches.get_one::<String>("align") {
        table.set_cols_align(&parse_list::<Align>(align)?)?;
    }
    if let Some(valign) = matches.get_one::<String>("valign") {
        table.set_cols_valign(&parse_list::<VAlign>(valign)?)?;
    }
    if let Some(widths) = matches.get_many::<usize>("width") {
        let widths: Vec<usize> = widths.copied().collect();
        table.set_cols_width(&widths)?;
    }
    Ok(())
}

/// Handler for table command
fn table_handler(matches: &ArgMatches) -> anyhow::Result<ExitCode> {
    let text = read_input(matches.get_one::<String>("file"))?;
    let rows: Vec<Vec<serde_json::Value>> =
        serde_json::from_str(&text).context("input must be a JSON array of rows")?;

    let max_width = matches
        .get_one::<usize>("max-width")
        .copied()
        .unwrap_or(DEFAULT_MAX_WIDTH);
    let mut table = Texttable::with_max_width(max_width);
    configure_table(&mut table, matches)?;

    let with_header = !matches.get_flag("no-header");
    debug!(rows = rows.len(), with_header, "rendering table");
    let rows = rows
        .into_iter()
        .map(|row| row.into_iter().map(CellValue::from).collect::<Vec<_>>());
    table.add_rows(rows, with_header)?;

    let out = table.draw();
    if !out.is_empty() {
        println!("{out}");
    }
    Ok(ExitCode::SUCCESS)
}

/// Handler for recent command
fn recent_handler(matches: &ArgMatches) -> anyhow::Result<ExitCode> {
    let text = read_input(matches.get_one::<String>("input"))?;
    let records: Vec<TournamentRecord> =
        serde_json::from_str(&text).context("input must be a JSON array of tournament records")?;

    let mut options = ListingOptions::new();
    if let Some(&limit) = matches.get_one::<usize>("limit") {
        options = options.limit(limit);
    }
    if let Some(&max_width) = matches.get_one::<usize>("max-width") {
        options = options.max_width(max_width);
    }

    let mut store = open_store(matches)?;
    let listing = publish_recent(&mut store, &records, options)?;
    println!("{listing}");
    Ok(ExitCode::SUCCESS)
}

/// Handler for lookup command
fn lookup_handler(matches: &ArgMatches) -> anyhow::Result<ExitCode> {
    let body = match matches.get_one::<String>("body") {
        Some(body) => body.clone(),
        None => {
            let field = |name: &str| {
                matches
                    .get_one::<String>(name)
                    .cloned()
                    .unwrap_or_default()
            };
            serde_json::to_string(&SummaryRequest::new(field("tournament"), field("school")))?
        }
    };

    let mut store = open_store(matches)?;
    let response = handle_request(&mut store, &LogTrigger, &body)?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if response.status_code == 200 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Handler for store command
fn store_handler(matches: &ArgMatches) -> anyhow::Result<ExitCode> {
    let tournament = matches
        .get_one::<String>("tournament")
        .cloned()
        .unwrap_or_default();
    let school = matches
        .get_one::<String>("school")
        .cloned()
        .unwrap_or_default();
    let input = matches
        .get_one::<String>("input")
        .context("--input is required")?;

    let mut store = open_store(matches)?;
    let report = run_generation(
        &SummaryRequest::new(tournament, school),
        &FileSummarizer::new(input),
        &mut store,
        &LogNotifier,
    )?;
    for key in &report.written {
        println!("{key}");
    }
    eprintln!(
        "Stored {} objects for {} schools in tournament {}",
        report.written.len(),
        report.schools,
        report.tournament
    );
    Ok(ExitCode::SUCCESS)
}

fn open_store(matches: &ArgMatches) -> anyhow::Result<DirStore> {
    let root = matches
        .get_one::<String>("store")
        .context("--store (or TABROOM_STORE) is required")?;
    Ok(DirStore::open(root)?)
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let result = match matches.subcommand() {
        Some(("table", sub)) => table_handler(sub),
        Some(("recent", sub)) => recent_handler(sub),
        Some(("lookup", sub)) => lookup_handler(sub),
        Some(("store", sub)) => store_handler(sub),
        _ => Ok(ExitCode::FAILURE),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", style("Error:").for_stderr().red().bold());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_configure_table_applies_options() {
        let matches = build_command()
            .try_get_matches_from([
                "tabroom", "table", "--align", "r,l", "--deco", "none", "--precision", "1",
                "--dtype", "f,t",
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let mut table = Texttable::new();
        configure_table(&mut table, sub).unwrap();
        table.add_row([CellValue::from(1.26), CellValue::from("x")]).unwrap();
        assert_eq!(table.draw(), "1.3   x ");
    }

    #[test]
    fn test_configure_table_rejects_bad_chars() {
        let matches = build_command()
            .try_get_matches_from(["tabroom", "table", "--chars=-|+"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let err = configure_table(&mut Texttable::new(), sub).unwrap_err();
        assert!(err.to_string().contains("array should contain 4 elements"));
    }

    #[test]
    fn test_width_list_parses() {
        let matches = build_command()
            .try_get_matches_from(["tabroom", "table", "--width", "3,4"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        let mut table = Texttable::new();
        configure_table(&mut table, sub).unwrap();
        assert_eq!(table.column_count(), Some(2));
    }
}
