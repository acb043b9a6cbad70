mod commands;
mod output;

use clap::{Parser, Subcommand};
use commands::LoadArgs;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "seutu",
    version,
    about = "Regional statistics for the Kaustinen sub-region from Statistics Finland"
)]
struct Cli {
    /// Log decoding details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every dataset and print the published series
    Fetch {
        #[command(flatten)]
        load: LoadArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the loaded data to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Decode a local JSON-stat file
    Decode {
        /// Path to a JSON-stat 2.0 document
        input_file: PathBuf,

        /// Area dimension code (e.g. "Alue")
        #[arg(long, default_value = "Alue")]
        entity: String,

        /// Year dimension code
        #[arg(long, default_value = "Vuosi")]
        year: String,

        /// Indicator dimension code (e.g. "Tiedot")
        #[arg(long)]
        indicator: Option<String>,

        /// Keep the indicator whose label contains this keyword (repeatable)
        #[arg(short, long = "keyword", value_name = "WORD")]
        keyword: Vec<String>,

        /// One series per indicator category
        #[arg(long, conflicts_with = "sum")]
        split: bool,

        /// Sum all indicator categories into one series
        #[arg(long)]
        sum: bool,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Regional overview of the selected municipalities
    Overview {
        #[command(flatten)]
        load: LoadArgs,

        /// Year to show (default: latest population year)
        #[arg(long)]
        year: Option<u32>,

        /// Municipality name or code (repeatable, default: all)
        #[arg(short, long = "municipality", value_name = "NAME")]
        municipality: Vec<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Key figures, trends and forecast for one municipality
    Executive {
        #[command(flatten)]
        load: LoadArgs,

        /// Municipality name or code
        #[arg(short, long = "municipality", value_name = "NAME", default_value = "Kaustinen")]
        municipality: String,

        /// Year to show (default: latest population year)
        #[arg(long)]
        year: Option<u32>,

        /// Years of enterprise forecast (at most 50)
        #[arg(
            long,
            default_value_t = seutu_core::series::DEFAULT_HORIZON,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new()
                .range(0..=seutu_core::series::MAX_HORIZON as u64)
        )]
        horizon: usize,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Numeric summary for the text generator, and its answer
    Summary {
        #[command(flatten)]
        load: LoadArgs,

        /// Municipality name or code (repeatable, default: all)
        #[arg(short, long = "municipality", value_name = "NAME")]
        municipality: Vec<String>,
    },
    /// Inspect and validate dataset catalogs
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List embedded catalogs
    List,
    /// Show the datasets and series of a catalog
    Show {
        /// Preset name (e.g., "statfin")
        preset: String,
    },
    /// Validate a custom catalog file
    Validate {
        /// Path to JSON catalog file
        file: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Fetch { load, output, out } => commands::fetch::run(&load, &output, out).await,
        Commands::Decode {
            input_file,
            entity,
            year,
            indicator,
            keyword,
            split,
            sum,
            output,
        } => {
            let plan = commands::decode::plan(entity, year, indicator, keyword, split, sum);
            commands::decode::run(input_file, &plan, &output)
        }
        Commands::Overview {
            load,
            year,
            municipality,
            output,
        } => commands::overview::run(&load, year, &municipality, &output).await,
        Commands::Executive {
            load,
            municipality,
            year,
            horizon,
            output,
        } => commands::executive::run(&load, &municipality, year, horizon, &output).await,
        Commands::Summary { load, municipality } => commands::summary::run(&load, &municipality).await,
        Commands::Catalog { action } => match action {
            CatalogAction::List => commands::catalog::list(),
            CatalogAction::Show { preset } => commands::catalog::show(&preset),
            CatalogAction::Validate { file } => commands::catalog::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
