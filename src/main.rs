use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use salary_rank::{load_file, parse_query, render, resolve, LoadOptions, RankReport, ReferenceTable};

/// Where does an income sit in the national distribution?
///
/// Loads a per-mille income bracket table and reports the percentile of a
/// queried annual income. With no QUERY, runs an interactive prompt.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Reference table (.csv or .json, UTF-8)
    #[arg(long, default_value = "data/income_brackets.csv")]
    data: PathBuf,

    /// Multiplier applied to monetary values in the file.
    /// The National Tax Service file reports 100-million-won units.
    #[arg(long, default_value_t = 1e8)]
    scale: f64,

    /// Emit the result as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Annual income in won (e.g. 35,000,000)
    query: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let table = load_file(&args.data, &LoadOptions { scale: args.scale })
        .with_context(|| format!("loading {}", args.data.display()))?;
    log::info!(
        "loaded {} brackets from {}",
        table.len(),
        args.data.display()
    );

    match &args.query {
        Some(text) => {
            let query = parse_query(text)?;
            answer(&table, query, args.json)
        }
        None => interactive(&table, args.json),
    }
}

/// Resolve one query and print the result.
fn answer(table: &ReferenceTable, query: f64, json: bool) -> Result<()> {
    let report = RankReport::new(query, resolve(table, query));
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render(&report));
    }
    Ok(())
}

/// Prompt loop: one income per line, blank line or EOF exits. Invalid input
/// is reported and re-prompted; it never reaches the resolver.
fn interactive(table: &ReferenceTable, json: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("Annual income in won (blank to quit): ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(l) => l.context("reading stdin")?,
            None => break,
        };
        if line.trim().is_empty() {
            break;
        }

        match parse_query(&line) {
            Ok(query) => answer(table, query, json)?,
            Err(e) => eprintln!("{e}"),
        }
    }
    Ok(())
}
