// 🧮 Transformer - resolve defaults, derive prices, validate sale dates
//
// Per record, in order:
//   1. discount_percent: None -> 0
//   2. unit_price:       None -> 100
//   3. total_price      = quantity * unit_price
//   4. discounted_price = total_price * (1 - discount_percent / 100)
//   5. sale_date parsed; unparseable rows are dropped (the only row filter)
//   6. month derived from the parsed sale_date
//
// Discounts are not clamped: a negative discount raises the price.

use crate::model::{Month, ReconciledRecord, UnifiedRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

pub const DEFAULT_UNIT_PRICE: f64 = 100.0;
pub const DEFAULT_DISCOUNT_PERCENT: f64 = 0.0;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%d %B %Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformOutput {
    pub records: Vec<UnifiedRecord>,

    /// Rows excluded because their sale_date did not parse
    pub dropped_invalid_dates: usize,
}

pub fn transform(records: Vec<ReconciledRecord>) -> TransformOutput {
    info!("Cleaning and transforming data...");

    let mut output = TransformOutput::default();
    for record in records {
        match transform_record(record) {
            Some(unified) => output.records.push(unified),
            None => output.dropped_invalid_dates += 1,
        }
    }

    if output.dropped_invalid_dates > 0 {
        warn!(
            dropped = output.dropped_invalid_dates,
            "Removed rows with invalid sale dates"
        );
    }

    output
}

/// Returns `None` only when the sale date cannot be parsed.
pub fn transform_record(record: ReconciledRecord) -> Option<UnifiedRecord> {
    let discount_percent = record.discount_percent.unwrap_or(DEFAULT_DISCOUNT_PERCENT);
    let unit_price = record.unit_price.unwrap_or(DEFAULT_UNIT_PRICE);
    let total_price = record.sale.quantity as f64 * unit_price;
    let discounted_price = total_price * (1.0 - discount_percent / 100.0);

    let sale_date = match parse_sale_date(&record.sale.sale_date) {
        Some(date) => date,
        None => {
            debug!(
                sale_id = record.sale.sale_id,
                sale_date = %record.sale.sale_date,
                "Dropping sale with invalid date"
            );
            return None;
        }
    };

    Some(UnifiedRecord {
        sale_id: record.sale.sale_id,
        product_id: record.sale.product_id,
        employee_id: record.sale.employee_id,
        quantity: record.sale.quantity,
        sale_date,
        product_name: record.product_name,
        unit_price,
        discount_percent,
        employee_name: record.employee_name,
        total_price,
        discounted_price,
        month: Month::from(sale_date),
    })
}

/// Parse free-form sale date text. Timestamps are truncated to their date.
pub fn parse_sale_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sale;

    fn create_test_record(
        quantity: i64,
        unit_price: Option<f64>,
        discount_percent: Option<f64>,
        sale_date: &str,
    ) -> ReconciledRecord {
        ReconciledRecord {
            sale: Sale {
                sale_id: 1,
                product_id: 1,
                employee_id: Some(9),
                quantity,
                sale_date: sale_date.to_string(),
            },
            product_name: Some("Widget".to_string()),
            unit_price,
            discount_percent,
            employee_name: Some("Unknown".to_string()),
        }
    }

    #[test]
    fn test_no_discount() {
        let unified =
            transform_record(create_test_record(2, Some(50.0), None, "2024-01-05")).unwrap();

        assert_eq!(unified.discount_percent, 0.0);
        assert_eq!(unified.unit_price, 50.0);
        assert_eq!(unified.total_price, 100.0);
        assert_eq!(unified.discounted_price, 100.0);
        assert_eq!(unified.sale_date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(unified.month.to_string(), "2024-01");
    }

    #[test]
    fn test_ten_percent_discount() {
        let unified =
            transform_record(create_test_record(2, Some(50.0), Some(10.0), "2024-01-05")).unwrap();

        assert!((unified.discounted_price - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_unit_price_defaults_to_100() {
        let unified = transform_record(create_test_record(3, None, None, "2024-02-01")).unwrap();

        assert_eq!(unified.unit_price, DEFAULT_UNIT_PRICE);
        assert_eq!(unified.total_price, 300.0);
    }

    #[test]
    fn test_negative_discount_is_not_clamped() {
        let unified =
            transform_record(create_test_record(1, Some(100.0), Some(-20.0), "2024-01-05"))
                .unwrap();

        assert!((unified.discounted_price - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_date_drops_row() {
        let output = transform(vec![
            create_test_record(1, Some(10.0), None, "2024-01-05"),
            create_test_record(1, Some(10.0), None, "not-a-date"),
            create_test_record(1, Some(10.0), None, ""),
            create_test_record(1, Some(10.0), None, "2024-03-15"),
        ]);

        assert_eq!(output.records.len(), 2);
        assert_eq!(output.dropped_invalid_dates, 2);
        assert!(output
            .records
            .iter()
            .all(|r| r.sale_date.format("%Y").to_string() == "2024"));
    }

    #[test]
    fn test_parse_sale_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();

        for raw in [
            "2024-01-05",
            " 2024-01-05 ",
            "2024/01/05",
            "01/05/2024",
            "2024-01-05 13:45:00",
            "2024-01-05T13:45:00",
            "2024-01-05T13:45:00Z",
            "2024-01-05T13:45:00+02:00",
            "2024-01-05 13:45",
            "2024-01-05T13:45",
            "2024-01-05 13:45:00.123",
            "2024-01-05T13:45:00.123456",
            "January 05, 2024",
            "05 January 2024",
        ] {
            assert_eq!(parse_sale_date(raw), Some(expected), "format: {}", raw);
        }
    }

    #[test]
    fn test_timestamped_sales_are_kept() {
        let output = transform(vec![
            create_test_record(1, Some(10.0), None, "2024-01-05 13:45"),
            create_test_record(1, Some(10.0), None, "2024-01-31T23:59:59.999"),
        ]);

        assert_eq!(output.dropped_invalid_dates, 0);
        assert_eq!(output.records.len(), 2);
        assert!(output.records.iter().all(|r| r.month.to_string() == "2024-01"));
    }

    #[test]
    fn test_parse_sale_date_rejects_garbage() {
        assert_eq!(parse_sale_date("not-a-date"), None);
        assert_eq!(parse_sale_date("2024-02-30"), None);
        assert_eq!(parse_sale_date(""), None);
    }
}
