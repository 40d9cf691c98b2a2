// 🚚 Pipeline - sources → validator → reconciler → transformer → aggregator → reports
//
// `consolidate` is the in-memory core and never touches the filesystem.
// `run` wraps it with the source adapters and the report sink.

use crate::aggregator::aggregate;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::model::{SalesReport, SourceTables, UnifiedRecord};
use crate::reconciler::reconcile;
use crate::report::{write_reports, RunManifest};
use crate::sources::{fetch_employees, load_customers, load_discounts, load_products, load_sales};
use crate::transformer::transform;
use crate::validator::validate_sources;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Row counts observed at each stage of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineStats {
    pub customers: usize,
    pub products: usize,
    pub sales: usize,
    pub discounts: usize,
    pub employees: usize,
    pub reconciled_records: usize,
    pub dropped_invalid_dates: usize,
    pub unified_records: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedOutput {
    pub records: Vec<UnifiedRecord>,
    pub report: SalesReport,
    pub stats: PipelineStats,
}

/// Read every source. Unavailable sources come back as empty tables.
pub fn load_sources(config: &PipelineConfig) -> SourceTables {
    SourceTables {
        customers: load_customers(&config.sqlite_path).into_table(),
        products: load_products(&config.products_path).into_table(),
        sales: load_sales(&config.sales_path).into_table(),
        discounts: load_discounts(&config.discounts_path).into_table(),
        employees: fetch_employees(&config.employees_url, config.api_timeout()).into_table(),
    }
}

pub fn consolidate(tables: SourceTables) -> Result<ConsolidatedOutput> {
    validate_sources(&tables.sales, &tables.products)?;

    let mut stats = PipelineStats {
        customers: tables.customers.len(),
        products: tables.products.len(),
        sales: tables.sales.len(),
        discounts: tables.discounts.len(),
        employees: tables.employees.len(),
        ..PipelineStats::default()
    };

    let reconciled = reconcile(
        &tables.sales,
        &tables.products,
        &tables.discounts,
        &tables.employees,
    );
    stats.reconciled_records = reconciled.len();

    let transformed = transform(reconciled);
    stats.dropped_invalid_dates = transformed.dropped_invalid_dates;
    stats.unified_records = transformed.records.len();

    let report = aggregate(&transformed.records);

    Ok(ConsolidatedOutput {
        records: transformed.records,
        report,
        stats,
    })
}

/// Full batch run. Reports are only written once consolidation succeeds.
pub fn run(config: &PipelineConfig) -> Result<RunManifest> {
    let tables = load_sources(config);
    let output = consolidate(tables)?;
    let manifest = write_reports(&config.report_dir, &output)?;

    info!(run_id = %manifest.run_id, "Pipeline completed successfully!");
    Ok(manifest)
}

// ============================================================================
// TESTS
// ============================================================================
