use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kostopro::domain::{
    discount_schedule, growth_projection, growth_rate_percent, normalize_input, present_value,
    CostingInput, CostingRecord, MAX_PERIODS,
};
use kostopro::infra::export::{csv_file_name, render_csv, render_json, render_summary};
use kostopro::infra::settings::Settings;
use kostopro::util::version::{version_label, APP_NAME};

#[derive(Parser)]
#[command(name = "kostopro", about = "Raw material costing for seafood products")]
struct Cli {
    /// Path to a settings TOML file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cost a batch from a JSON input sheet.
    Calculate {
        /// Input file; reads stdin when omitted.
        input: Option<PathBuf>,

        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Zero out negative or non-numeric fields before costing.
        #[arg(long)]
        normalize: bool,
    },

    /// Print a starter input sheet.
    Template,

    /// Growth rate between two values.
    Growth {
        #[arg(long)]
        initial: f64,
        #[arg(long = "final")]
        final_value: f64,
        /// At most 1200.
        #[arg(long, default_value_t = 1, value_parser = periods_parser())]
        periods: u32,
    },

    /// Present value of a future amount.
    PresentValue {
        #[arg(long)]
        future: f64,
        /// Discount rate in percent per period.
        #[arg(long)]
        rate: f64,
        /// At most 1200.
        #[arg(long, default_value_t = 1, value_parser = periods_parser())]
        periods: u32,
    },

    /// Show version information.
    Version,
}

#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kostopro=info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Calculate {
            input,
            format,
            normalize,
        } => {
            let mut sheet = read_input(input.as_deref())?;
            if normalize {
                sheet = normalize_input(&sheet);
            }

            let record = match CostingRecord::compute(sheet) {
                Ok(record) => record,
                Err(err) => {
                    error!("calculation failed: {err}");
                    eprintln!("Cannot calculate: {err}");
                    return Ok(ExitCode::FAILURE);
                }
            };
            info!(id = %record.id, "calculation completed");

            match format {
                OutputFormat::Text => print!("{}", render_summary(&record, &settings)),
                OutputFormat::Json => println!("{}", render_json(&record)?),
                OutputFormat::Csv => {
                    info!(
                        "suggested file name: {}",
                        csv_file_name(record.computed_at.date())?
                    );
                    print!("{}", render_csv(&record.result));
                }
            }
        }
        Commands::Template => {
            let template = settings.template_input();
            println!("{}", serde_json::to_string_pretty(&template)?);
        }
        Commands::Growth {
            initial,
            final_value,
            periods,
        } => {
            println!(
                "Growth rate: {:.2}%",
                growth_rate_percent(initial, final_value)
            );
            for point in growth_projection(initial, final_value, periods) {
                println!("  {:>3}  {:>14.2}", point.period, point.value);
            }
        }
        Commands::PresentValue {
            future,
            rate,
            periods,
        } => {
            println!(
                "Present value: {}{:.2}",
                settings.currency,
                present_value(future, rate, periods)
            );
            for point in discount_schedule(future, rate, periods) {
                println!(
                    "  {:>3}  {:>14.2}  {:.4}",
                    point.period, point.present_value, point.discount_factor
                );
            }
        }
        Commands::Version => {
            println!("{APP_NAME} {}", version_label());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn periods_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(0..=i64::from(MAX_PERIODS))
}

fn read_input(path: Option<&Path>) -> anyhow::Result<CostingInput> {
    let content = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    serde_json::from_str(&content).context("input is not a valid costing sheet")
}
