// ✅ Validator - the single fatal gate before any merge work
//
// Sales and Products must both be non-empty. Every other source may be
// empty; the reconciler and transformer absorb that with defaults.

use crate::error::{PipelineError, Result};
use crate::model::{Product, Sale};
use tracing::{error, info};

pub fn validate_sources(sales: &[Sale], products: &[Product]) -> Result<()> {
    info!("Validating data...");

    let mut missing = Vec::new();
    if sales.is_empty() {
        missing.push("sales".to_string());
    }
    if products.is_empty() {
        missing.push("products".to_string());
    }

    if !missing.is_empty() {
        error!(missing = ?missing, "Critical data missing. Exiting pipeline.");
        return Err(PipelineError::CriticalDataMissing { missing });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_sale() -> Sale {
        Sale {
            sale_id: 1,
            product_id: 1,
            employee_id: Some(9),
            quantity: 2,
            sale_date: "2024-01-05".to_string(),
        }
    }

    fn create_test_product() -> Product {
        Product {
            product_id: 1,
            product_name: "Widget".to_string(),
            unit_price: Some(50.0),
        }
    }

    #[test]
    fn test_passes_with_sales_and_products() {
        assert!(validate_sources(&[create_test_sale()], &[create_test_product()]).is_ok());
    }

    #[test]
    fn test_empty_products_is_fatal() {
        let err = validate_sources(&[create_test_sale()], &[]).unwrap_err();
        match err {
            PipelineError::CriticalDataMissing { missing } => {
                assert_eq!(missing, vec!["products".to_string()])
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_sales_is_fatal() {
        let err = validate_sources(&[], &[create_test_product()]).unwrap_err();
        assert!(err.is_critical_data_missing());
    }

    #[test]
    fn test_both_empty_reports_both() {
        let err = validate_sources(&[], &[]).unwrap_err();
        match err {
            PipelineError::CriticalDataMissing { missing } => assert_eq!(missing.len(), 2),
            other => panic!("unexpected error: {}", other),
        }
    }
}
