//! Interactive shopper ledger on the terminal.

use std::io::{self, Write as _};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use owo_colors::OwoColorize;
use shopper_ledger::models::{Shopper, Tier};
use shopper_ledger::platform::{DEFAULT_PLATFORM_NAME, PlatformSnapshot, ShoppingPlatform};
use shopper_ledger::session::Session;

/// Environment variable naming the platform.
const PLATFORM_ENV: &str = "SHOPPER_LEDGER_PLATFORM";

/// Shopper ledger: create shoppers, record purchases and refunds, and
/// manage coupons and rewards points from a numbered menu.
#[derive(Debug, Parser)]
#[command(name = "shopper-ledger", version, about)]
struct Cli {
    /// Name of the shopping platform.
    #[arg(long, env = PLATFORM_ENV, default_value = DEFAULT_PLATFORM_NAME)]
    platform_name: String,
    /// What to print once the session ends.
    #[arg(long, value_enum, default_value_t = SummaryFormat::Table)]
    summary: SummaryFormat,
}

/// Closing summary formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SummaryFormat {
    /// Table of shoppers with a total line.
    Table,
    /// Pretty-printed JSON snapshot.
    Json,
    /// Print nothing.
    #[value(name = "none")]
    Skip,
}

/// Installs the log subscriber on stderr, defaulting to `warn` so log
/// lines do not interleave with the menu.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    let _dotenv = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();
    let mut platform = ShoppingPlatform::new(cli.platform_name);

    Session::new(&mut platform, io::stdin().lock(), io::stdout().lock()).run()?;

    print_summary(&platform.snapshot(), cli.summary)
}

/// Prints the closing summary in the requested format.
fn print_summary(snapshot: &PlatformSnapshot, format: SummaryFormat) -> io::Result<ExitCode> {
    match format {
        SummaryFormat::Table => {
            print_shoppers_table(snapshot)?;
            Ok(ExitCode::SUCCESS)
        }
        SummaryFormat::Json => match snapshot.to_json_pretty() {
            Ok(json) => {
                writeln!(io::stdout().lock(), "{json}")?;
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                writeln!(
                    io::stderr().lock(),
                    "{} failed to render summary: {err}",
                    "error:".red().bold()
                )?;
                Ok(ExitCode::FAILURE)
            }
        },
        SummaryFormat::Skip => Ok(ExitCode::SUCCESS),
    }
}

/// Coupon and points cells for a shopper.
fn perk_cells(shopper: &Shopper) -> (Cell, Cell) {
    let dash = || Cell::new("\u{2014}").fg(Color::DarkGrey);
    match *shopper.tier() {
        Tier::Basic(perks) => (
            perks
                .discount_coupon()
                .map_or_else(dash, |rate| Cell::new(rate).fg(Color::Yellow)),
            dash(),
        ),
        Tier::Premium(perks) => (
            dash(),
            Cell::new(perks.rewards_points()).fg(Color::Green),
        ),
    }
}

/// Prints shoppers in a table followed by the platform total.
fn print_shoppers_table(snapshot: &PlatformSnapshot) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out)?;
    if snapshot.shoppers.is_empty() {
        writeln!(
            out,
            "{}",
            format_args!("No shoppers on {}.", snapshot.platform_name).dimmed()
        )?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Name").fg(Color::Cyan),
        Cell::new("Kind").fg(Color::Cyan),
        Cell::new("Spending").fg(Color::Cyan),
        Cell::new("Coupon").fg(Color::Cyan),
        Cell::new("Points").fg(Color::Cyan),
    ]);

    for shopper in &snapshot.shoppers {
        let (coupon, points) = perk_cells(shopper);
        _ = table.add_row(vec![
            Cell::new(shopper.id()),
            Cell::new(shopper.name()),
            Cell::new(shopper.kind()),
            Cell::new(format!("{:.2}", shopper.check_spending())),
            coupon,
            points,
        ]);
    }

    writeln!(
        out,
        "{} {}",
        snapshot.platform_name.green().bold(),
        format_args!("({} shoppers)", snapshot.shoppers.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    writeln!(
        out,
        "{} {:.2}",
        "Total spending:".bold(),
        snapshot.total_spending
    )?;
    Ok(())
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // Last-resort error output; if stderr itself failed there is
            // nothing left to report to.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
