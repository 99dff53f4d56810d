use clap::{Parser, Subcommand};
use sales_forecast::{logging, AppConfig, DataLoader, ProductId, SalesPredictor};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "sales-report", about = "Sales forecasts and restock advice from CSV exports")]
struct Cli {
    /// Directory holding products.csv and sales.csv
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Configuration file (without extension)
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Daily and monthly forecast for one product
    Forecast {
        #[arg(long)]
        product: ProductId,
        #[arg(long)]
        days: Option<usize>,
    },
    /// Restock recommendations for every product
    Restock,
    /// Monthly sales totals and best sellers
    Trends,
    /// History and forecast series for charting
    Chart {
        #[arg(long)]
        product: ProductId,
        #[arg(long)]
        days: Option<usize>,
    },
}

fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    let app_config = AppConfig::load(cli.config.as_deref())?;
    let data_dir = cli.data_dir.unwrap_or(app_config.data_dir);
    let store = DataLoader::from_csv_dir(&data_dir)?;
    let horizon = app_config.forecast.default_horizon_days;
    let predictor = SalesPredictor::with_config(store, app_config.forecast)?;

    let output = match cli.command {
        Command::Forecast { product, days } => {
            let forecast = predictor.predict_sales(product, days.unwrap_or(horizon))?;
            serde_json::to_string_pretty(&forecast)?
        }
        Command::Restock => serde_json::to_string_pretty(&predictor.get_restock_recommendations()?)?,
        Command::Trends => serde_json::to_string_pretty(&predictor.sales_trends()?)?,
        Command::Chart { product, days } => {
            serde_json::to_string_pretty(&predictor.chart_data(product, days.unwrap_or(horizon))?)?
        }
    };

    Ok(output)
}

fn main() -> ExitCode {
    logging::init();

    match run(Cli::parse()) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "sales-report failed");
            ExitCode::FAILURE
        }
    }
}
