use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use store_optimizer::utils::geocode::{GeocodeTable, Geocoder};
use store_optimizer::utils::init_dataset::init_dataset;
use store_optimizer::utils::store_directory::StoreDirectory;
use store_optimizer::{Location, OptimizeRequest, Optimizer, OptimizerConfig, Origin, Outcome};

#[derive(Debug, Parser)]
#[command(name = "store-optimizer")]
#[command(about = "Pick the cheapest set of stores for a grocery list, travel included")]
struct Cli {
    /// Price snapshot CSV (store_name,store_location,address,item,price,lat,lon)
    #[arg(long)]
    data: PathBuf,

    /// Item to buy; repeat the flag or separate with commas
    #[arg(long = "item", required = true, value_delimiter = ',')]
    items: Vec<String>,

    /// Maximum number of stores to visit
    #[arg(long, default_value_t = 2)]
    max_stores: usize,

    /// Starting address, resolved through --geocode-table
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    address: Option<String>,

    /// Starting latitude
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Starting longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// JSON object mapping addresses to {"lat", "lon"}; also fills snapshot rows without coordinates
    #[arg(long)]
    geocode_table: Option<PathBuf>,

    /// JSON store directory used to fill blank addresses in the snapshot
    #[arg(long)]
    store_directory: Option<PathBuf>,

    /// Reject combinations whose total cost exceeds this amount
    #[arg(long)]
    budget: Option<f64>,

    /// JSON optimizer configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured travel cost per mile
    #[arg(long)]
    cost_per_mile: Option<f64>,

    /// Evaluate combinations in parallel
    #[arg(long)]
    parallel: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match OptimizerConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading configuration: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => OptimizerConfig::default(),
    };
    if let Some(cost_per_mile) = cli.cost_per_mile {
        config.cost_per_mile = cost_per_mile;
    }
    config.parallel |= cli.parallel;
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let directory = match &cli.store_directory {
        Some(path) => match StoreDirectory::from_file(path) {
            Ok(directory) => Some(directory),
            Err(e) => {
                eprintln!("Error loading store directory: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let geocoder = match &cli.geocode_table {
        Some(path) => match GeocodeTable::from_file(path) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("Error loading geocode table: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => GeocodeTable::new(),
    };

    // Rows without coordinates are only geocoded when a table was supplied
    let row_geocoder: Option<&dyn Geocoder> = cli
        .geocode_table
        .as_ref()
        .map(|_| &geocoder as &dyn Geocoder);
    let (dataset, report) = match init_dataset(&cli.data, directory.as_ref(), row_geocoder) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error loading price snapshot: {}", e);
            eprintln!("Ensure the file is a CSV with store_name,store_location,address,item,price,lat,lon columns");
            return ExitCode::FAILURE;
        }
    };

    let origin = match (&cli.address, cli.lat, cli.lon) {
        (Some(address), _, _) => Origin::Address(address.clone()),
        (None, Some(lat), Some(lon)) => Origin::Coordinate(Location::new(lat, lon)),
        _ => {
            eprintln!("Error: provide --address or both --lat and --lon");
            return ExitCode::FAILURE;
        }
    };

    let mut request = OptimizeRequest::new(cli.items, cli.max_stores, origin);
    request.budget = cli.budget;

    let optimizer = Optimizer::new(config);
    let outcome = match optimizer.optimize(&request, &dataset, &geocoder) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match outcome {
        Outcome::Optimized(result) => Outcome::Optimized(result.rounded()),
        infeasible => infeasible,
    };

    let output = json!({
        "data_quality": report,
        "outcome": outcome,
    });
    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Failed to serialize result: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if outcome.is_optimized() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}
