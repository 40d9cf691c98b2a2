// Sales Consolidation Pipeline - Core Library
// Exposes all modules for use in the CLI and tests

pub mod aggregator;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod reconciler;
pub mod report;
pub mod sources;
pub mod transformer;
pub mod validator;

// Re-export commonly used types
pub use aggregator::{aggregate, sales_by_employee, sales_by_month, sales_by_product};
pub use config::PipelineConfig;
pub use error::{PipelineError, SourceError};
pub use model::{
    Customer, Discount, Employee, EmployeeSalesSummary, Month, MonthlySalesSummary, Product,
    ProductSalesSummary, ReconciledRecord, Sale, SalesReport, SourceTables, UnifiedRecord,
};
pub use pipeline::{consolidate, load_sources, run, ConsolidatedOutput, PipelineStats};
pub use reconciler::{reconcile, UNKNOWN_EMPLOYEE};
pub use report::{write_reports, ArtifactRecord, RunManifest};
pub use sources::{SourceKind, SourceLoad};
pub use transformer::{parse_sale_date, transform, TransformOutput};
pub use validator::validate_sources;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
