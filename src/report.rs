// 💾 Report sink - CSV artifacts plus a run manifest
//
// Files written to the report directory:
//   product_sales.csv, employee_sales.csv, monthly_sales.csv,
//   full_sales_data.csv, run_manifest.json
// Every CSV gets a header row, even when it has no data rows.

use crate::error::{PipelineError, Result};
use crate::pipeline::{ConsolidatedOutput, PipelineStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub const PRODUCT_SALES_FILE: &str = "product_sales.csv";
pub const EMPLOYEE_SALES_FILE: &str = "employee_sales.csv";
pub const MONTHLY_SALES_FILE: &str = "monthly_sales.csv";
pub const FULL_SALES_FILE: &str = "full_sales_data.csv";
pub const MANIFEST_FILE: &str = "run_manifest.json";

const PRODUCT_SALES_HEADERS: &[&str] = &["product_name", "total_quantity", "total_sales"];
const EMPLOYEE_SALES_HEADERS: &[&str] = &["employee_name", "total_quantity", "total_sales"];
const MONTHLY_SALES_HEADERS: &[&str] = &["month", "total_sales"];
const FULL_SALES_HEADERS: &[&str] = &[
    "sale_id",
    "product_id",
    "employee_id",
    "quantity",
    "sale_date",
    "product_name",
    "unit_price",
    "discount_percent",
    "employee_name",
    "total_price",
    "discounted_price",
    "month",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub file_name: String,
    pub rows: usize,
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub completed_at: DateTime<Utc>,
    pub stats: PipelineStats,
    pub artifacts: Vec<ArtifactRecord>,
}

impl RunManifest {
    pub fn artifact(&self, file_name: &str) -> Option<&ArtifactRecord> {
        self.artifacts.iter().find(|a| a.file_name == file_name)
    }
}

pub fn write_reports(report_dir: &Path, output: &ConsolidatedOutput) -> Result<RunManifest> {
    info!(dir = %report_dir.display(), "Saving reports...");
    fs::create_dir_all(report_dir)?;

    let artifacts = vec![
        write_csv(report_dir, PRODUCT_SALES_FILE, PRODUCT_SALES_HEADERS, &output.report.by_product)?,
        write_csv(report_dir, EMPLOYEE_SALES_FILE, EMPLOYEE_SALES_HEADERS, &output.report.by_employee)?,
        write_csv(report_dir, MONTHLY_SALES_FILE, MONTHLY_SALES_HEADERS, &output.report.by_month)?,
        write_csv(report_dir, FULL_SALES_FILE, FULL_SALES_HEADERS, &output.records)?,
    ];

    let manifest = RunManifest {
        run_id: uuid::Uuid::new_v4().to_string(),
        completed_at: Utc::now(),
        stats: output.stats.clone(),
        artifacts,
    };

    let manifest_json = serde_json::to_string_pretty(&manifest)?;
    fs::write(report_dir.join(MANIFEST_FILE), manifest_json)?;

    Ok(manifest)
}

fn write_csv<T: Serialize>(
    report_dir: &Path,
    file_name: &str,
    headers: &[&str],
    rows: &[T],
) -> Result<ArtifactRecord> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    wtr.write_record(headers)?;
    for row in rows {
        wtr.serialize(row)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| PipelineError::Io(e.into_error()))?;
    fs::write(report_dir.join(file_name), &bytes)?;

    let sha256 = format!("{:x}", Sha256::digest(&bytes));
    debug!(file = file_name, rows = rows.len(), sha256 = %sha256, "Wrote report");

    Ok(ArtifactRecord {
        file_name: file_name.to_string(),
        rows: rows.len(),
        sha256,
    })
}

// ============================================================================
// TESTS
// ============================================================================
