// 📊 Aggregator - product, employee and monthly roll-ups
//
// Each roll-up is a complete partition of the unified records: records with
// no product or employee name form their own `None` group instead of being
// dropped. Groups come out sorted by key (`None` first).

use crate::model::{
    EmployeeSalesSummary, Month, MonthlySalesSummary, ProductSalesSummary, SalesReport,
    UnifiedRecord,
};
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    quantity: i64,
    sales: f64,
}

impl Totals {
    fn add(&mut self, record: &UnifiedRecord) {
        self.quantity = self.quantity.saturating_add(record.quantity);
        self.sales += record.discounted_price;
    }
}

fn group_by<K: Ord>(
    records: &[UnifiedRecord],
    key: impl Fn(&UnifiedRecord) -> K,
) -> BTreeMap<K, Totals> {
    let mut groups: BTreeMap<K, Totals> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().add(record);
    }
    groups
}

pub fn aggregate(records: &[UnifiedRecord]) -> SalesReport {
    info!("Performing analysis...");

    let report = SalesReport {
        by_product: sales_by_product(records),
        by_employee: sales_by_employee(records),
        by_month: sales_by_month(records),
    };

    info!(
        products = report.by_product.len(),
        employees = report.by_employee.len(),
        months = report.by_month.len(),
        "Computed sales summaries"
    );

    report
}

pub fn sales_by_product(records: &[UnifiedRecord]) -> Vec<ProductSalesSummary> {
    group_by(records, |r| r.product_name.clone())
        .into_iter()
        .map(|(product_name, totals)| ProductSalesSummary {
            product_name,
            total_quantity: totals.quantity,
            total_sales: totals.sales,
        })
        .collect()
}

pub fn sales_by_employee(records: &[UnifiedRecord]) -> Vec<EmployeeSalesSummary> {
    group_by(records, |r| r.employee_name.clone())
        .into_iter()
        .map(|(employee_name, totals)| EmployeeSalesSummary {
            employee_name,
            total_quantity: totals.quantity,
            total_sales: totals.sales,
        })
        .collect()
}

/// Quantity is not carried into the monthly view.
pub fn sales_by_month(records: &[UnifiedRecord]) -> Vec<MonthlySalesSummary> {
    group_by(records, |r| r.month)
        .into_iter()
        .map(|(month, totals): (Month, Totals)| MonthlySalesSummary {
            month,
            total_sales: totals.sales,
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
