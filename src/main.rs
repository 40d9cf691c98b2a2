use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use sales_consolidation::config::{
    DEFAULT_API_TIMEOUT_SECS, DEFAULT_DATA_DIR, DEFAULT_EMPLOYEES_URL, DEFAULT_REPORT_DIR,
};
use sales_consolidation::{logging, pipeline, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "sales-consolidation")]
#[command(about = "Consolidate sales, products, discounts and employees into sales reports")]
#[command(version)]
struct Cli {
    /// Directory holding anyname.sqlite, products.csv, sales.csv and discounts.txt
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Directory the reports are written to
    #[arg(long, default_value = DEFAULT_REPORT_DIR)]
    report_dir: PathBuf,

    /// Override the SQLite customers database path
    #[arg(long)]
    sqlite: Option<PathBuf>,

    /// Override the products CSV path
    #[arg(long)]
    products: Option<PathBuf>,

    /// Override the sales CSV path
    #[arg(long)]
    sales: Option<PathBuf>,

    /// Override the header-less discounts file path
    #[arg(long)]
    discounts: Option<PathBuf>,

    /// Employee API endpoint
    #[arg(long, default_value = DEFAULT_EMPLOYEES_URL)]
    employees_url: String,

    /// Employee API timeout in seconds
    #[arg(long, default_value_t = DEFAULT_API_TIMEOUT_SECS)]
    api_timeout_secs: u64,
}

impl Cli {
    fn into_config(self) -> PipelineConfig {
        let mut config = PipelineConfig::from_data_dir(&self.data_dir, &self.report_dir)
            .with_employees_url(self.employees_url)
            .with_api_timeout_secs(self.api_timeout_secs);

        if let Some(path) = self.sqlite {
            config.sqlite_path = path;
        }
        if let Some(path) = self.products {
            config.products_path = path;
        }
        if let Some(path) = self.sales {
            config.sales_path = path;
        }
        if let Some(path) = self.discounts {
            config.discounts_path = path;
        }

        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging();

    let config = cli.into_config();

    match pipeline::run(&config) {
        Ok(manifest) => {
            println!("\n📊 Sales consolidation complete");
            println!("   Run: {}", manifest.run_id);
            println!("   Unified records: {}", manifest.stats.unified_records);
            println!(
                "   Dropped (invalid dates): {}",
                manifest.stats.dropped_invalid_dates
            );
            for artifact in &manifest.artifacts {
                println!("   ✓ {} ({} rows)", artifact.file_name, artifact.rows);
            }
            Ok(())
        }
        Err(err) if err.is_critical_data_missing() => {
            eprintln!("❌ {}", err);
            eprintln!("   No reports were written.");
            std::process::exit(err.exit_code());
        }
        Err(err) => Err(err).with_context(|| {
            format!("Failed to write reports to {}", config.report_dir.display())
        }),
    }
}
